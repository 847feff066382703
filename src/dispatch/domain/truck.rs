//! Truck and load values.

use super::{DispatchDomainError, TruckId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole kilograms.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Kilograms(u64);

impl Kilograms {
    /// Zero kilograms.
    pub const ZERO: Self = Self(0);

    /// Wraps a kilogram value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Kilograms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kg", self.0)
    }
}

/// A truck with its rated payload capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TruckRecord", into = "TruckRecord")]
pub struct Truck {
    id: TruckId,
    capacity: Kilograms,
}

impl Truck {
    /// Creates a truck from catalog data.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::EmptyTruckId`] for a blank identifier
    /// and [`DispatchDomainError::InvalidTruckCapacity`] for zero capacity.
    pub fn new(id: impl Into<String>, capacity_kg: u64) -> Result<Self, DispatchDomainError> {
        let truck_id = TruckId::new(id)?;
        if capacity_kg == 0 {
            return Err(DispatchDomainError::InvalidTruckCapacity(capacity_kg));
        }
        Ok(Self {
            id: truck_id,
            capacity: Kilograms::new(capacity_kg),
        })
    }

    /// Returns the truck identifier.
    #[must_use]
    pub const fn id(&self) -> &TruckId {
        &self.id
    }

    /// Returns the rated capacity.
    #[must_use]
    pub const fn capacity(&self) -> Kilograms {
        self.capacity
    }

    /// Returns whether `load` exceeds the rated capacity.
    ///
    /// A load equal to the capacity fits.
    #[must_use]
    pub fn is_exceeded_by(&self, load: Kilograms) -> bool {
        load > self.capacity
    }
}

/// Serialized form of [`Truck`], validated through [`Truck::new`].
#[derive(Serialize, Deserialize)]
struct TruckRecord {
    id: String,
    capacity: u64,
}

impl TryFrom<TruckRecord> for Truck {
    type Error = DispatchDomainError;

    fn try_from(record: TruckRecord) -> Result<Self, Self::Error> {
        Self::new(record.id, record.capacity)
    }
}

impl From<Truck> for TruckRecord {
    fn from(truck: Truck) -> Self {
        Self {
            id: truck.id.into(),
            capacity: truck.capacity.value(),
        }
    }
}

/// Load figures computed outside this crate from farm forecasts and routing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadEstimate {
    /// Aggregate produce weight of the selected farms.
    pub total_weight: Kilograms,
    /// Precomputed trip distance in kilometres.
    pub route_distance_km: u32,
}

impl LoadEstimate {
    /// Creates a load estimate.
    #[must_use]
    pub const fn new(total_weight_kg: u64, route_distance_km: u32) -> Self {
        Self {
            total_weight: Kilograms::new(total_weight_kg),
            route_distance_km,
        }
    }
}
