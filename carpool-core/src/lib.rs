//! Core allocation engine for the car-pooling service.
//!
//! A [`Pool`] owns the fleet of vehicles and the ledger of ride requests
//! (groups). Each state change (a fleet reload, a new request, a drop-off)
//! runs under one lock and is followed by an allocation pass that seats as
//! many waiting groups as current capacity allows, without ever moving a
//! group that is already seated.
//!
//! Input records ([`VehicleSpec`], [`GroupSpec`]) are validated on insert and
//! rejected with a structured [`InvalidInput`].

#![forbid(unsafe_code)]

mod allocator;
mod error;
mod fleet;
mod group;
mod ledger;
mod pool;
mod vehicle;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use allocator::{Allocator, Assignment, FirstFit};
pub use error::{InvalidInput, PoolError};
pub use group::{Group, GroupId, GroupSpec, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
pub use pool::{DropOffOutcome, Location, Pool, PoolSnapshot, RequestOutcome};
pub use vehicle::{MAX_SEATS, MIN_SEATS, Vehicle, VehicleId, VehicleSpec};
