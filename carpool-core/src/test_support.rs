//! Helpers shared by unit, behaviour and property tests.

use crate::{Pool, PoolSnapshot, VehicleId, VehicleSpec};

/// Build vehicle specs from `(id, seats)` pairs, keeping their order.
#[must_use]
pub fn fleet(vehicles: &[(u64, u8)]) -> Vec<VehicleSpec> {
    vehicles
        .iter()
        .map(|&(id, seats)| VehicleSpec::new(id, seats))
        .collect()
}

/// A pool already loaded with the given `(id, seats)` vehicles.
///
/// # Panics
///
/// Panics if the fleet is rejected.
#[must_use]
pub fn pool_with_fleet(vehicles: &[(u64, u8)]) -> Pool {
    let pool = Pool::new();
    if let Err(err) = pool.load_fleet(&fleet(vehicles)) {
        panic!("test fleet rejected: {err}");
    }
    pool
}

/// Vehicles whose free seats do not equal capacity minus seated people.
///
/// Also reports vehicles referenced by a seated group but missing from the
/// fleet.
#[must_use]
pub fn capacity_violations(snapshot: &PoolSnapshot) -> Vec<VehicleId> {
    let mut violations: Vec<VehicleId> = snapshot
        .vehicles
        .iter()
        .filter(|vehicle| {
            let seated: u32 = snapshot
                .seated_in(vehicle.id)
                .map(|group| u32::from(group.people))
                .sum();
            vehicle.available_seats > vehicle.seats
                || u32::from(vehicle.occupied_seats()) != seated
        })
        .map(|vehicle| vehicle.id)
        .collect();
    violations.extend(
        snapshot
            .groups
            .iter()
            .filter_map(|group| group.vehicle)
            .filter(|id| snapshot.vehicle(*id).is_none()),
    );
    violations
}

/// Fail the test when [`capacity_violations`] reports anything.
///
/// # Panics
///
/// Panics listing the offending vehicles.
pub fn assert_capacity_invariant(snapshot: &PoolSnapshot) {
    let violations = capacity_violations(snapshot);
    assert!(
        violations.is_empty(),
        "capacity invariant broken for vehicles {violations:?} in {snapshot:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Group, GroupId, Vehicle};
    use rstest::rstest;

    fn snapshot(available_seats: u8, seated: &[u8]) -> PoolSnapshot {
        PoolSnapshot {
            vehicles: vec![Vehicle {
                id: VehicleId::new(1),
                seats: 4,
                available_seats,
            }],
            groups: seated
                .iter()
                .zip(1..)
                .map(|(&people, id)| Group {
                    id: GroupId::new(id),
                    people,
                    vehicle: Some(VehicleId::new(1)),
                })
                .collect(),
        }
    }

    #[rstest]
    #[case::empty(4, &[])]
    #[case::partly_full(1, &[2, 1])]
    #[case::full(0, &[4])]
    fn balanced_vehicles_pass(#[case] available_seats: u8, #[case] seated: &[u8]) {
        assert!(capacity_violations(&snapshot(available_seats, seated)).is_empty());
    }

    #[rstest]
    #[case::seats_leaked(1, &[2])]
    #[case::seats_overcounted(3, &[2])]
    #[case::more_free_than_capacity(5, &[])]
    fn unbalanced_vehicles_are_reported(#[case] available_seats: u8, #[case] seated: &[u8]) {
        assert_eq!(
            capacity_violations(&snapshot(available_seats, seated)),
            vec![VehicleId::new(1)]
        );
    }

    #[rstest]
    fn groups_in_unknown_vehicles_are_reported() {
        let mut broken = snapshot(4, &[]);
        broken.groups.push(Group {
            id: GroupId::new(9),
            people: 1,
            vehicle: Some(VehicleId::new(8)),
        });
        assert_eq!(capacity_violations(&broken), vec![VehicleId::new(8)]);
    }
}
