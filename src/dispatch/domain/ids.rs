//! Identifier types for the dispatch domain.

use super::DispatchDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a dispatch selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(Uuid);

impl SelectionId {
    /// Creates a new random selection identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a selection identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SelectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of a farm, resolved outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FarmId(String);

impl FarmId {
    /// Creates a validated farm identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::EmptyFarmId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DispatchDomainError> {
        non_empty(value.into())
            .map(Self)
            .ok_or(DispatchDomainError::EmptyFarmId)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FarmId {
    type Error = DispatchDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FarmId> for String {
    fn from(value: FarmId) -> Self {
        value.0
    }
}

/// Catalog identifier of a truck, resolved outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TruckId(String);

impl TruckId {
    /// Creates a validated truck identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::EmptyTruckId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DispatchDomainError> {
        non_empty(value.into())
            .map(Self)
            .ok_or(DispatchDomainError::EmptyTruckId)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TruckId {
    type Error = DispatchDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TruckId> for String {
    fn from(value: TruckId) -> Self {
        value.0
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
