//! Driver pickup task lifecycle.
//!
//! A pickup task moves forward through `en_route`, `at_farm` and `completed`.
//! Completion is gated on three pieces of evidence collected at the farm: a
//! crate count, a release code issued by farm staff, and a captured photo.
//! The module follows hexagonal architecture:
//!
//! - Domain types and transition guards in [`domain`]
//! - Port contracts for persistence and photo capture in [`ports`]
//! - In-memory adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
