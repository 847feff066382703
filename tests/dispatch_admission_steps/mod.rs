//! Step definitions for dispatch admission scenarios.

mod given;
mod then;
pub mod world;
