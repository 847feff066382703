//! Fieldgate: field task and dispatch state engine.
//!
//! This crate guards two irreversible real-world actions of an agricultural
//! export coordination platform behind verifiable preconditions: a driver
//! confirming a farm pickup, and a logistics officer dispatching a truck.
//! Rendering, routing, photo capture and persistence stay outside and are
//! reached through ports.
//!
//! # Architecture
//!
//! Fieldgate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure state machines and rules with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON lines)
//! - **Services**: Orchestration with per-instance serialization, timeouts,
//!   logging and event emission
//!
//! # Modules
//!
//! - [`pickup`]: Driver pickup task lifecycle
//! - [`dispatch`]: Dispatch admission and request lifecycle
//! - [`events`]: Event stream reported to downstream collaborators
//! - [`config`]: Collaborator timeouts
//! - [`error`]: Error taxonomy shared by both components

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod instance_lock;
pub mod pickup;
