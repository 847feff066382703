//! Evidence values collected at the farm before a pickup can complete.

use super::PickupDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Positive number of crates loaded at the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CrateCount(u32);

impl CrateCount {
    /// Creates a validated crate count.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidCrateCount`] when the value is zero.
    pub fn new(value: u32) -> Result<Self, PickupDomainError> {
        if value == 0 {
            return Err(PickupDomainError::InvalidCrateCount(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses a crate count from raw driver input.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidCrateCount`] when the input is
    /// empty, not a non-negative integer, or zero.
    pub fn parse(raw: &str) -> Result<Self, PickupDomainError> {
        let value = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| PickupDomainError::InvalidCrateCount(raw.to_owned()))?;
        Self::new(value).map_err(|_| PickupDomainError::InvalidCrateCount(raw.to_owned()))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl FromStr for CrateCount {
    type Err = PickupDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for CrateCount {
    type Error = PickupDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CrateCount> for u32 {
    fn from(count: CrateCount) -> Self {
        count.0
    }
}

impl fmt::Display for CrateCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization code issued out-of-band by farm staff.
///
/// Only emptiness is checked here. Whether the code matches what the farm
/// actually issued is decided by an external authority.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseCode(String);

impl ReleaseCode {
    /// Creates a release code from raw driver input.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::EmptyReleaseCode`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, PickupDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PickupDomainError::EmptyReleaseCode);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ReleaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReleaseCode(<redacted>)")
    }
}

impl TryFrom<String> for ReleaseCode {
    type Error = PickupDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReleaseCode> for String {
    fn from(value: ReleaseCode) -> Self {
        value.0
    }
}

/// A piece of evidence required before a pickup can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRequirement {
    /// No positive crate count has been recorded.
    CrateCount,
    /// No release code has been recorded.
    ReleaseCode,
    /// No evidence photo has been captured.
    EvidencePhoto,
}

impl CompletionRequirement {
    /// Every requirement, in reporting order.
    pub const ALL: [Self; 3] = [Self::CrateCount, Self::ReleaseCode, Self::EvidencePhoto];

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CrateCount => "crate_count",
            Self::ReleaseCode => "release_code",
            Self::EvidencePhoto => "evidence_photo",
        }
    }
}

impl fmt::Display for CompletionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of unmet completion requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingRequirements(Vec<CompletionRequirement>);

impl MissingRequirements {
    /// Collects the requirements for which `is_missing` returns `true`, in
    /// [`CompletionRequirement::ALL`] order.
    #[must_use]
    pub fn collect(is_missing: impl Fn(CompletionRequirement) -> bool) -> Self {
        Self(
            CompletionRequirement::ALL
                .into_iter()
                .filter(|requirement| is_missing(*requirement))
                .collect(),
        )
    }

    /// Returns `true` when nothing is missing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `requirement` is unmet.
    #[must_use]
    pub fn contains(&self, requirement: CompletionRequirement) -> bool {
        self.0.contains(&requirement)
    }

    /// Returns the unmet requirements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CompletionRequirement] {
        &self.0
    }
}

impl fmt::Display for MissingRequirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for requirement in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            f.write_str(requirement.as_str())?;
        }
        Ok(())
    }
}
