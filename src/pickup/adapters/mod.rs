//! Adapter implementations for pickup task ports.

pub mod memory;
