//! Facade crate for the car-pooling allocation engine.
//!
//! This crate re-exports the core domain types. The optional `test-support`
//! feature exposes the helpers used by the workspace's own tests.

#![forbid(unsafe_code)]

pub use carpool_core::{
    Allocator, Assignment, DropOffOutcome, FirstFit, Group, GroupId, GroupSpec, InvalidInput,
    Location, MAX_GROUP_SIZE, MAX_SEATS, MIN_GROUP_SIZE, MIN_SEATS, Pool, PoolError, PoolSnapshot,
    RequestOutcome, Vehicle, VehicleId, VehicleSpec,
};

#[cfg(feature = "test-support")]
pub use carpool_core::test_support;
