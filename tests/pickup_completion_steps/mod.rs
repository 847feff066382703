//! Step definitions for pickup completion scenarios.

mod then;
pub mod world;
