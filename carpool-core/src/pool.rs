//! The shared fleet and ledger, and the operations that change them.
//!
//! Every operation takes the pool's lock once and holds it until the fleet,
//! the ledger and the follow-up allocation pass are all updated. Callers never
//! see a state between a mutation and its allocation pass.

use std::sync::{Mutex, MutexGuard};

use log::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fleet::Fleet;
use crate::ledger::Ledger;
use crate::{
    Allocator, FirstFit, Group, GroupId, GroupSpec, PoolError, Vehicle, VehicleId, VehicleSpec,
};

/// Result of a successful [`Pool::request_ride`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The group was seated by the allocation pass that followed the request.
    Seated(VehicleId),
    /// No vehicle had room; the group waits for a later pass.
    Waiting,
}

/// Result of a successful [`Pool::drop_off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOffOutcome {
    /// The group had been seated and its seats were returned to the vehicle.
    Released(VehicleId),
    /// The group was still waiting and simply left the queue.
    Withdrawn,
}

/// Result of a successful [`Pool::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The group is seated; carries a copy of the vehicle as it is now.
    Assigned(Vehicle),
    /// The group is waiting for a vehicle.
    Pending,
}

/// Consistent copy of the whole pool, taken under the pool's lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolSnapshot {
    /// Vehicles in load order.
    pub vehicles: Vec<Vehicle>,
    /// Groups, oldest request first.
    pub groups: Vec<Group>,
}

impl PoolSnapshot {
    /// Look up a vehicle by id.
    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    /// Groups seated in `vehicle`, oldest request first.
    pub fn seated_in(&self, vehicle: VehicleId) -> impl Iterator<Item = &Group> + '_ {
        self.groups
            .iter()
            .filter(move |group| group.vehicle == Some(vehicle))
    }

    /// Groups still waiting, oldest request first.
    pub fn pending(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.iter().filter(|group| group.is_pending())
    }
}

#[derive(Debug, Default)]
struct State {
    fleet: Fleet,
    ledger: Ledger,
}

/// Fleet and ledger behind a single lock, with allocation after each change.
///
/// Share a pool between request handlers with `Arc<Pool>`.
///
/// # Examples
/// ```
/// use carpool_core::{GroupId, GroupSpec, Location, Pool, RequestOutcome, VehicleId, VehicleSpec};
///
/// # fn main() -> Result<(), carpool_core::PoolError> {
/// let pool = Pool::new();
/// pool.load_fleet(&[VehicleSpec::new(1, 6), VehicleSpec::new(2, 4)])?;
///
/// assert_eq!(pool.request_ride(GroupSpec::new(10, 4))?, RequestOutcome::Seated(VehicleId::new(2)));
/// assert_eq!(pool.request_ride(GroupSpec::new(11, 4))?, RequestOutcome::Seated(VehicleId::new(1)));
///
/// match pool.locate(GroupId::new(10))? {
///     Location::Assigned(vehicle) => assert_eq!(vehicle.available_seats, 0),
///     Location::Pending => unreachable!("group 10 was seated"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pool<A = FirstFit> {
    state: Mutex<State>,
    allocator: A,
}

impl Pool<FirstFit> {
    /// An empty pool using [`FirstFit`] allocation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_allocator(FirstFit)
    }
}

impl Default for Pool<FirstFit> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Allocator> Pool<A> {
    /// An empty pool using the given allocator.
    #[must_use]
    pub fn with_allocator(allocator: A) -> Self {
        Self {
            state: Mutex::new(State::default()),
            allocator,
        }
    }

    /// Replace the fleet and forget every group.
    ///
    /// The reset happens before validation, so a rejected fleet leaves the
    /// pool with no vehicles and no groups rather than half-loaded.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidInput`] when a vehicle lacks an id, repeats
    /// an id, or declares a capacity outside 4 to 6 seats.
    ///
    /// # Panics
    ///
    /// Panics if an earlier operation panicked while holding the lock.
    pub fn load_fleet(&self, vehicles: &[VehicleSpec]) -> Result<(), PoolError> {
        let mut state = self.lock();
        state.ledger.clear();
        match state.fleet.replace_all(vehicles) {
            Ok(()) => {
                info!("loaded fleet of {} vehicles", state.fleet.len());
                Ok(())
            }
            Err(err) => {
                warn!("rejected fleet: {err}");
                Err(err.into())
            }
        }
    }

    /// Queue a ride request and run an allocation pass.
    ///
    /// Repeating a request with an id the ledger still holds is rejected; the
    /// pool never re-enqueues silently.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidInput`] when the id is missing or already
    /// registered, or the group size is outside 1 to 6. The ledger is
    /// unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if an earlier operation panicked while holding the lock, or if
    /// the allocator plans more people into a vehicle than it has free seats.
    pub fn request_ride(&self, group: GroupSpec) -> Result<RequestOutcome, PoolError> {
        let mut state = self.lock();
        if let Err(err) = state.ledger.enqueue(group) {
            warn!("rejected ride request: {err}");
            return Err(err.into());
        }
        debug!("group {} with {} people queued", group.id, group.people);
        self.allocate(&mut state);

        let seated = state.ledger.find(group.id).and_then(|entry| entry.vehicle);
        Ok(seated.map_or(RequestOutcome::Waiting, RequestOutcome::Seated))
    }

    /// Remove a group, whether seated or waiting.
    ///
    /// A seated group returns its seats to the vehicle and triggers an
    /// allocation pass; a waiting group just leaves the queue.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NotFound`] when the ledger holds no such group,
    /// including groups discarded by a fleet reload.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Pool::request_ride`].
    pub fn drop_off(&self, id: GroupId) -> Result<DropOffOutcome, PoolError> {
        let mut state = self.lock();
        let Some(group) = state.ledger.remove(id) else {
            debug!("drop-off for unknown group {id}");
            return Err(PoolError::NotFound { id });
        };
        let Some(vehicle) = group.vehicle else {
            debug!("group {id} withdrawn before being seated");
            return Ok(DropOffOutcome::Withdrawn);
        };

        if !state.fleet.release(vehicle, group.people) {
            warn!("group {id} was seated in vehicle {vehicle}, which is no longer in the fleet");
        }
        debug!("group {id} dropped off from vehicle {vehicle}");
        self.allocate(&mut state);
        Ok(DropOffOutcome::Released(vehicle))
    }

    /// Report where a group is.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NotFound`] when the ledger holds no such group.
    ///
    /// # Panics
    ///
    /// Panics if an earlier operation panicked while holding the lock.
    pub fn locate(&self, id: GroupId) -> Result<Location, PoolError> {
        let state = self.lock();
        let group = state.ledger.find(id).ok_or(PoolError::NotFound { id })?;
        let Some(vehicle) = group.vehicle else {
            return Ok(Location::Pending);
        };
        state
            .fleet
            .lookup(vehicle)
            .copied()
            .map(Location::Assigned)
            .ok_or(PoolError::NotFound { id })
    }

    /// Copy the current vehicles and groups.
    ///
    /// # Panics
    ///
    /// Panics if an earlier operation panicked while holding the lock.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.lock();
        PoolSnapshot {
            vehicles: state.fleet.vehicles().to_vec(),
            groups: state.ledger.in_arrival_order().copied().collect(),
        }
    }

    /// Run one allocation pass and commit its plan.
    fn allocate(&self, state: &mut State) {
        let pending: Vec<Group> = state.ledger.pending_in_arrival_order().copied().collect();
        if pending.is_empty() {
            return;
        }
        let plan = self.allocator.plan(state.fleet.vehicles(), &pending);
        for assignment in &plan {
            let people = pending
                .iter()
                .find(|group| group.id == assignment.group)
                .map_or(0, |group| group.people);
            state.fleet.commit_assignment(assignment.vehicle, people);
            state.ledger.assign(assignment.group, assignment.vehicle);
            info!(
                "group {} assigned to vehicle {}",
                assignment.group, assignment.vehicle
            );
        }
        let waiting = pending.len().saturating_sub(plan.len());
        if waiting > 0 {
            debug!("{waiting} groups still waiting for a vehicle");
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("pool state is poisoned; an earlier operation panicked mid-update"),
        }
    }
}
