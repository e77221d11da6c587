use thiserror::Error;

use crate::{GroupId, VehicleId};

/// Rejected input, reported to the caller and never partially applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// A vehicle record carried no identifier.
    #[error("vehicle at position {position} has no id")]
    MissingVehicleId {
        /// Index of the record in the submitted fleet.
        position: usize,
    },
    /// Two vehicle records share an identifier.
    #[error("vehicle {id} appears more than once")]
    DuplicateVehicleId {
        /// The repeated identifier.
        id: VehicleId,
    },
    /// A vehicle declared an unsupported seat capacity.
    #[error("vehicle {id} has {seats} seats; capacity must be between 4 and 6")]
    SeatsOutOfRange {
        /// Offending vehicle.
        id: VehicleId,
        /// Declared capacity.
        seats: u8,
    },
    /// A ride request carried no identifier.
    #[error("group has no id")]
    MissingGroupId,
    /// A ride request reused an identifier still held by the ledger.
    #[error("group {id} is already registered")]
    DuplicateGroupId {
        /// The repeated identifier.
        id: GroupId,
    },
    /// A ride request declared an unsupported number of people.
    #[error("group {id} has {people} people; groups must have between 1 and 6")]
    GroupSizeOutOfRange {
        /// Offending group.
        id: GroupId,
        /// Declared size.
        people: u8,
    },
}

/// Errors returned by [`crate::Pool`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The request was malformed or violated a range or uniqueness rule.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    /// The referenced group is not in the ledger.
    #[error("group {id} not found")]
    NotFound {
        /// Identifier that was looked up.
        id: GroupId,
    },
}
