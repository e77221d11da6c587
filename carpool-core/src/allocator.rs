//! Matching pending groups to vehicles with free seats.
//!
//! An [`Allocator`] only plans: it reads a capacity view of the fleet and the
//! pending groups, and returns the assignments to make. The [`crate::Pool`]
//! commits the plan, so allocators never touch live state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Group, GroupId, Vehicle, VehicleId};

/// One planned seating of a group in a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    /// Group being seated.
    pub group: GroupId,
    /// Vehicle receiving the group.
    pub vehicle: VehicleId,
}

/// Plan which pending groups can be seated right now.
///
/// `vehicles` is given in fleet load order and `pending` oldest first.
/// Implementations must never plan more people into a vehicle than its
/// `available_seats`, summed over the whole plan, and must plan each group
/// at most once. Allocators must be `Send + Sync` so a pool can be shared
/// across request handlers.
///
/// # Examples
/// ```
/// use carpool_core::{Allocator, Assignment, FirstFit, Group, GroupId, Vehicle, VehicleId};
///
/// let vehicles = [Vehicle { id: VehicleId::new(1), seats: 4, available_seats: 4 }];
/// let pending = [Group { id: GroupId::new(9), people: 3, vehicle: None }];
///
/// let plan = FirstFit.plan(&vehicles, &pending);
/// assert_eq!(plan, vec![Assignment { group: GroupId::new(9), vehicle: VehicleId::new(1) }]);
/// ```
pub trait Allocator: Send + Sync {
    /// Produce the assignments for a single allocation pass.
    fn plan(&self, vehicles: &[Vehicle], pending: &[Group]) -> Vec<Assignment>;
}

/// Smallest-vehicle-first, first-come-first-served allocation.
///
/// Vehicles are tried in ascending seat capacity; vehicles with equal capacity
/// keep their load order. Each pending group, oldest first, goes to the first
/// vehicle with enough free seats, and that vehicle's free seats shrink
/// immediately for the groups after it. A group that fits nowhere is skipped
/// until the next pass. Small vehicles fill first, which keeps large vehicles
/// free for large groups.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FirstFit;

impl Allocator for FirstFit {
    fn plan(&self, vehicles: &[Vehicle], pending: &[Group]) -> Vec<Assignment> {
        let mut ordered: Vec<Vehicle> = vehicles.to_vec();
        // Stable: equal capacities keep load order.
        ordered.sort_by_key(|vehicle| vehicle.seats);

        let mut plan = Vec::new();
        for group in pending {
            let Some(vehicle) = ordered
                .iter_mut()
                .find(|vehicle| vehicle.fits(group.people))
            else {
                continue;
            };
            vehicle.available_seats -= group.people;
            plan.push(Assignment {
                group: group.id,
                vehicle: vehicle.id,
            });
        }
        plan
    }
}
