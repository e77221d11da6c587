//! The set of vehicles and their remaining capacity.
//!
//! Vehicles are kept in the order they were loaded, with a side index for
//! lookup by id. Vehicles are never removed one at a time, so positions in
//! the load order stay valid until the next [`Fleet::replace_all`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::{InvalidInput, Vehicle, VehicleId, VehicleSpec};

#[derive(Debug, Default)]
pub(crate) struct Fleet {
    vehicles: Vec<Vehicle>,
    index: HashMap<VehicleId, usize>,
}

impl Fleet {
    /// Discard every vehicle and install `specs`, each with all seats free.
    ///
    /// On error the fleet is left empty.
    pub(crate) fn replace_all(&mut self, specs: &[VehicleSpec]) -> Result<(), InvalidInput> {
        self.vehicles.clear();
        self.index.clear();

        let mut vehicles = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            spec.validate(position)?;
            match index.entry(spec.id) {
                Entry::Occupied(_) => return Err(InvalidInput::DuplicateVehicleId { id: spec.id }),
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
            vehicles.push(Vehicle::from_spec(*spec));
        }

        self.vehicles = vehicles;
        self.index = index;
        Ok(())
    }

    pub(crate) fn lookup(&self, id: VehicleId) -> Option<&Vehicle> {
        self.index
            .get(&id)
            .and_then(|&position| self.vehicles.get(position))
    }

    /// Vehicles in load order.
    pub(crate) fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub(crate) const fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Take `people` seats in `id`.
    ///
    /// # Panics
    ///
    /// Panics if the vehicle is unknown or has fewer than `people` free seats.
    /// The allocator checks both before committing, so either case is a
    /// defect in the caller.
    pub(crate) fn commit_assignment(&mut self, id: VehicleId, people: u8) {
        let vehicle = self.vehicle_mut(id);
        vehicle.available_seats = match vehicle.available_seats.checked_sub(people) {
            Some(remaining) => remaining,
            None => panic!(
                "vehicle {id} has {} free seats, cannot seat {people}",
                vehicle.available_seats
            ),
        };
    }

    /// Return `people` seats to `id`, never exceeding its capacity.
    ///
    /// Returns `false` when the vehicle is not part of the fleet.
    pub(crate) fn release(&mut self, id: VehicleId, people: u8) -> bool {
        let Some(vehicle) = self
            .index
            .get(&id)
            .copied()
            .and_then(|position| self.vehicles.get_mut(position))
        else {
            return false;
        };
        vehicle.available_seats = vehicle
            .available_seats
            .saturating_add(people)
            .min(vehicle.seats);
        true
    }

    fn vehicle_mut(&mut self, id: VehicleId) -> &mut Vehicle {
        match self
            .index
            .get(&id)
            .copied()
            .and_then(|position| self.vehicles.get_mut(position))
        {
            Some(vehicle) => vehicle,
            None => panic!("vehicle {id} is not part of the fleet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn fleet() -> Fleet {
        let mut fleet = Fleet::default();
        fleet
            .replace_all(&[VehicleSpec::new(1, 6), VehicleSpec::new(2, 4)])
            .expect("valid fleet");
        fleet
    }

    #[rstest]
    fn replace_all_preserves_load_order(fleet: Fleet) {
        let ids: Vec<u64> = fleet.vehicles().iter().map(|v| v.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(fleet.vehicles().iter().all(|v| v.available_seats == v.seats));
    }

    #[rstest]
    fn replace_all_discards_previous_vehicles(mut fleet: Fleet) {
        fleet
            .replace_all(&[VehicleSpec::new(3, 5)])
            .expect("valid fleet");
        assert_eq!(fleet.len(), 1);
        assert!(fleet.lookup(VehicleId::new(1)).is_none());
        assert!(fleet.lookup(VehicleId::new(3)).is_some());
    }

    #[rstest]
    fn duplicate_ids_leave_the_fleet_empty(mut fleet: Fleet) {
        let err = fleet
            .replace_all(&[VehicleSpec::new(5, 4), VehicleSpec::new(5, 6)])
            .expect_err("duplicate id");
        assert_eq!(
            err,
            InvalidInput::DuplicateVehicleId {
                id: VehicleId::new(5)
            }
        );
        assert_eq!(fleet.len(), 0);
        assert!(fleet.lookup(VehicleId::new(5)).is_none());
    }

    #[rstest]
    fn invalid_capacity_leaves_the_fleet_empty(mut fleet: Fleet) {
        let result = fleet.replace_all(&[VehicleSpec::new(7, 4), VehicleSpec::new(8, 3)]);
        assert!(matches!(result, Err(InvalidInput::SeatsOutOfRange { .. })));
        assert_eq!(fleet.len(), 0);
    }

    #[rstest]
    fn commit_and_release_track_free_seats(mut fleet: Fleet) {
        let id = VehicleId::new(1);
        fleet.commit_assignment(id, 4);
        assert_eq!(fleet.lookup(id).map(|v| v.available_seats), Some(2));
        assert!(fleet.release(id, 4));
        assert_eq!(fleet.lookup(id).map(|v| v.available_seats), Some(6));
    }

    #[rstest]
    fn release_is_capped_at_capacity(mut fleet: Fleet) {
        let id = VehicleId::new(2);
        assert!(fleet.release(id, 3));
        assert_eq!(fleet.lookup(id).map(|v| v.available_seats), Some(4));
    }

    #[rstest]
    fn release_of_unknown_vehicle_is_reported(mut fleet: Fleet) {
        assert!(!fleet.release(VehicleId::new(42), 1));
    }

    #[rstest]
    #[should_panic(expected = "cannot seat 5")]
    fn overfilling_a_vehicle_panics(mut fleet: Fleet) {
        fleet.commit_assignment(VehicleId::new(2), 5);
    }
}
