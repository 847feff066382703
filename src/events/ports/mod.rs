//! Port contracts for event publishing.

pub mod publisher;

pub use publisher::{EventPublishError, EventPublishResult, EventPublisher};
