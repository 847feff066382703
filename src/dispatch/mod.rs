//! Dispatch admissibility for logistics officers.
//!
//! A dispatch selection gathers farms, a truck and an externally computed
//! load estimate for one trip. [`domain::evaluate`] decides, as a pure
//! function, whether that selection may be dispatched and reports every
//! blocking reason. The selection then tracks the dispatch request through
//! `idle`, `dispatching` and `dispatched`.
//!
//! - Domain types and admission rules in [`domain`]
//! - Port contracts for persistence and driver notification in [`ports`]
//! - In-memory adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
