//! Ride requests: groups of people who travel together.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{InvalidInput, VehicleId};

/// Smallest group that may request a ride.
pub const MIN_GROUP_SIZE: u8 = 1;

/// Largest group that may request a ride.
pub const MAX_GROUP_SIZE: u8 = 6;

/// Externally assigned group identifier.
///
/// As with [`VehicleId`], `0` means "not supplied" and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupId(u64);

impl GroupId {
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

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unvalidated ride request.
///
/// # Examples
/// ```
/// use carpool_core::{GroupId, GroupSpec, InvalidInput};
///
/// assert!(GroupSpec::new(1, 6).validate().is_ok());
/// assert_eq!(
///     GroupSpec::new(1, 7).validate(),
///     Err(InvalidInput::GroupSizeOutOfRange { id: GroupId::new(1), people: 7 }),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupSpec {
    /// Identifier assigned by the caller.
    pub id: GroupId,
    /// Number of people travelling together.
    pub people: u8,
}

impl GroupSpec {
    /// Describe a ride request; checked later by [`GroupSpec::validate`].
    #[must_use]
    pub const fn new(id: u64, people: u8) -> Self {
        Self {
            id: GroupId::new(id),
            people,
        }
    }

    /// Check the request on its own, without regard to the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::MissingGroupId`] when the id is zero and
    /// [`InvalidInput::GroupSizeOutOfRange`] when the size falls outside
    /// [`MIN_GROUP_SIZE`]`..=`[`MAX_GROUP_SIZE`].
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.id.is_missing() {
            return Err(InvalidInput::MissingGroupId);
        }
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&self.people) {
            return Err(InvalidInput::GroupSizeOutOfRange {
                id: self.id,
                people: self.people,
            });
        }
        Ok(())
    }
}

/// A group held in the ledger together with its assignment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,
    /// Number of people travelling together.
    pub people: u8,
    /// Vehicle the group is seated in; `None` while pending.
    pub vehicle: Option<VehicleId>,
}

impl Group {
    pub(crate) const fn pending(spec: GroupSpec) -> Self {
        Self {
            id: spec.id,
            people: spec.people,
            vehicle: None,
        }
    }

    /// Whether the group is still waiting for a vehicle.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.vehicle.is_none()
    }
}
