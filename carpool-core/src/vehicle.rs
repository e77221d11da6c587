//! Vehicles and the seat-capacity rules they must satisfy.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::InvalidInput;

/// Smallest seat capacity a vehicle may declare.
pub const MIN_SEATS: u8 = 4;

/// Largest seat capacity a vehicle may declare.
pub const MAX_SEATS: u8 = 6;

/// Externally assigned vehicle identifier.
///
/// The value `0` is reserved for "no identifier supplied" and is never
/// accepted into a fleet.
///
/// # Examples
/// ```
/// use carpool_core::VehicleId;
///
/// let id = VehicleId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VehicleId(u64);

impl VehicleId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Return the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn is_missing(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unvalidated vehicle record supplied when a fleet is (re)loaded.
///
/// # Examples
/// ```
/// use carpool_core::{InvalidInput, VehicleId, VehicleSpec};
///
/// let spec = VehicleSpec::new(1, 5);
/// assert!(spec.validate(0).is_ok());
///
/// let err = VehicleSpec::new(2, 3).validate(1).unwrap_err();
/// assert_eq!(err, InvalidInput::SeatsOutOfRange { id: VehicleId::new(2), seats: 3 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleSpec {
    /// Identifier assigned by the caller.
    pub id: VehicleId,
    /// Total number of seats.
    pub seats: u8,
}

impl VehicleSpec {
    /// Build an unvalidated record from raw values.
    #[must_use]
    pub const fn new(id: u64, seats: u8) -> Self {
        Self {
            id: VehicleId::new(id),
            seats,
        }
    }

    /// Check the record on its own, without regard to the rest of the fleet.
    ///
    /// `position` is the record's index in the submitted list and is only used
    /// to report a missing identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::MissingVehicleId`] when the id is zero and
    /// [`InvalidInput::SeatsOutOfRange`] when the capacity falls outside
    /// [`MIN_SEATS`]`..=`[`MAX_SEATS`].
    pub fn validate(&self, position: usize) -> Result<(), InvalidInput> {
        if self.id.is_missing() {
            return Err(InvalidInput::MissingVehicleId { position });
        }
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats) {
            return Err(InvalidInput::SeatsOutOfRange {
                id: self.id,
                seats: self.seats,
            });
        }
        Ok(())
    }
}

/// Point-in-time view of a vehicle and its free seats.
///
/// Values handed out by the pool are copies; mutating one has no effect on the
/// live fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// Vehicle identifier.
    pub id: VehicleId,
    /// Total number of seats.
    pub seats: u8,
    /// Seats not currently taken by a seated group.
    pub available_seats: u8,
}

impl Vehicle {
    /// An empty vehicle built from a validated spec.
    pub(crate) const fn from_spec(spec: VehicleSpec) -> Self {
        Self {
            id: spec.id,
            seats: spec.seats,
            available_seats: spec.seats,
        }
    }

    /// Seats currently occupied.
    ///
    /// # Examples
    /// ```
    /// use carpool_core::{Vehicle, VehicleId};
    ///
    /// let vehicle = Vehicle { id: VehicleId::new(1), seats: 6, available_seats: 2 };
    /// assert_eq!(vehicle.occupied_seats(), 4);
    /// ```
    #[must_use]
    pub const fn occupied_seats(&self) -> u8 {
        self.seats.saturating_sub(self.available_seats)
    }

    /// Whether a group of `people` fits in the remaining seats.
    #[must_use]
    pub const fn fits(&self, people: u8) -> bool {
        self.available_seats >= people
    }
}
