//! Application services for dispatch orchestration.

mod dispatch;

pub use dispatch::{DispatchService, DispatchServiceError, DispatchServiceResult};
