//! Stamp Pinning Library
//!
//! Pinning service abstraction, the Pinata HTTP client, and the two-phase
//! linker that turns an uploaded file into a pinned metadata document.

pub mod linker;
pub mod pinata;
#[cfg(any(test, feature = "test-util"))]
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use linker::{ContentLinker, LinkError, LinkerSettings};
pub use pinata::PinataClient;
pub use traits::{PinFile, PinReceipt, PinningError, PinningResult, PinningService};
