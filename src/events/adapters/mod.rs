//! Adapter implementations for the event publisher port.

mod json_lines;
mod memory;

pub use json_lines::JsonLinesEventSink;
pub use memory::InMemoryEventLog;
