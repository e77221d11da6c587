//! Ride requests and their assignment state.
//!
//! Groups are keyed by id. A monotonically increasing arrival number keeps the
//! first-come-first-served order without tying storage to positions.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use crate::{Group, GroupId, GroupSpec, InvalidInput, VehicleId};

#[derive(Debug)]
struct Slot {
    arrival: u64,
    group: Group,
}

#[derive(Debug, Default)]
pub(crate) struct Ledger {
    groups: HashMap<GroupId, Slot>,
    arrivals: BTreeMap<u64, GroupId>,
    next_arrival: u64,
}

impl Ledger {
    /// Append a new pending group.
    ///
    /// On error the ledger is unchanged.
    pub(crate) fn enqueue(&mut self, spec: GroupSpec) -> Result<(), InvalidInput> {
        spec.validate()?;
        let arrival = self.next_arrival;
        match self.groups.entry(spec.id) {
            Entry::Occupied(_) => Err(InvalidInput::DuplicateGroupId { id: spec.id }),
            Entry::Vacant(slot) => {
                slot.insert(Slot {
                    arrival,
                    group: Group::pending(spec),
                });
                self.arrivals.insert(arrival, spec.id);
                self.next_arrival = arrival.wrapping_add(1);
                Ok(())
            }
        }
    }

    pub(crate) fn remove(&mut self, id: GroupId) -> Option<Group> {
        let slot = self.groups.remove(&id)?;
        self.arrivals.remove(&slot.arrival);
        Some(slot.group)
    }

    pub(crate) fn find(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id).map(|slot| &slot.group)
    }

    /// Every group, oldest request first.
    pub(crate) fn in_arrival_order(&self) -> impl Iterator<Item = &Group> + '_ {
        self.arrivals
            .values()
            .filter_map(|id| self.groups.get(id))
            .map(|slot| &slot.group)
    }

    /// Groups still waiting for a vehicle, oldest request first.
    pub(crate) fn pending_in_arrival_order(&self) -> impl Iterator<Item = &Group> + '_ {
        self.in_arrival_order().filter(|group| group.is_pending())
    }

    /// Record that `id` is seated in `vehicle`.
    ///
    /// # Panics
    ///
    /// Panics if the group is unknown or already seated; assignments are
    /// sticky and only the allocator seats groups.
    pub(crate) fn assign(&mut self, id: GroupId, vehicle: VehicleId) {
        let Some(slot) = self.groups.get_mut(&id) else {
            panic!("group {id} is not in the ledger");
        };
        if let Some(current) = slot.group.vehicle {
            panic!("group {id} is already seated in vehicle {current}");
        }
        slot.group.vehicle = Some(vehicle);
    }

    /// Drop every group. Only used as part of a fleet reload.
    pub(crate) fn clear(&mut self) {
        self.groups.clear();
        self.arrivals.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ledger() -> Ledger {
        let mut ledger = Ledger::default();
        for (id, people) in [(10, 2), (20, 4), (30, 1)] {
            ledger
                .enqueue(GroupSpec::new(id, people))
                .expect("valid group");
        }
        ledger
    }

    fn pending_ids(ledger: &Ledger) -> Vec<u64> {
        ledger
            .pending_in_arrival_order()
            .map(|group| group.id.get())
            .collect()
    }

    #[rstest]
    fn pending_groups_keep_arrival_order(ledger: Ledger) {
        assert_eq!(pending_ids(&ledger), vec![10, 20, 30]);
    }

    #[rstest]
    fn duplicate_enqueue_is_rejected_without_change(mut ledger: Ledger) {
        let err = ledger
            .enqueue(GroupSpec::new(20, 6))
            .expect_err("duplicate id");
        assert_eq!(
            err,
            InvalidInput::DuplicateGroupId {
                id: GroupId::new(20)
            }
        );
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.find(GroupId::new(20)).map(|g| g.people), Some(4));
    }

    #[rstest]
    fn invalid_size_is_rejected_without_change(mut ledger: Ledger) {
        assert!(ledger.enqueue(GroupSpec::new(40, 7)).is_err());
        assert_eq!(ledger.len(), 3);
        assert!(ledger.find(GroupId::new(40)).is_none());
    }

    #[rstest]
    fn assigned_groups_leave_the_pending_view(mut ledger: Ledger) {
        ledger.assign(GroupId::new(20), VehicleId::new(1));
        assert_eq!(pending_ids(&ledger), vec![10, 30]);
        assert_eq!(
            ledger.find(GroupId::new(20)).and_then(|g| g.vehicle),
            Some(VehicleId::new(1))
        );
    }

    #[rstest]
    fn remove_returns_the_group_once(mut ledger: Ledger) {
        let removed = ledger.remove(GroupId::new(10)).expect("known group");
        assert_eq!(removed.people, 2);
        assert!(ledger.remove(GroupId::new(10)).is_none());
        assert_eq!(pending_ids(&ledger), vec![20, 30]);
    }

    #[rstest]
    fn re_enqueued_ids_go_to_the_back(mut ledger: Ledger) {
        ledger.remove(GroupId::new(10));
        ledger
            .enqueue(GroupSpec::new(10, 3))
            .expect("id is free again");
        assert_eq!(pending_ids(&ledger), vec![20, 30, 10]);
    }

    #[rstest]
    fn clear_forgets_every_group(mut ledger: Ledger) {
        ledger.clear();
        assert_eq!(ledger.len(), 0);
        assert!(ledger.find(GroupId::new(30)).is_none());
    }

    #[rstest]
    #[should_panic(expected = "already seated")]
    fn seated_groups_are_never_reassigned(mut ledger: Ledger) {
        ledger.assign(GroupId::new(30), VehicleId::new(1));
        ledger.assign(GroupId::new(30), VehicleId::new(2));
    }
}
