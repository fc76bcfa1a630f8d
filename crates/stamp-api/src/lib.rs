//! Stamp API Library
//!
//! HTTP gateway: accepts a multipart upload, hands it to the content linker,
//! and reports the gateway URL of the pinned metadata document.

mod api_doc;
pub mod constants;
mod handlers;
pub mod middleware;
pub mod setup;
pub mod telemetry;
mod validation;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
