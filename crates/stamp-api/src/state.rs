//! Application state shared by all handlers.
//!
//! Read-only after startup: concurrent requests share it without locking.

use stamp_core::Config;
use stamp_pinning::ContentLinker;

pub struct AppState {
    pub config: Config,
    pub linker: ContentLinker,
}

impl AppState {
    pub fn new(config: Config, linker: ContentLinker) -> Self {
        Self { config, linker }
    }

    /// Whether error responses carry the error source chain
    pub fn expose_error_chain(&self) -> bool {
        self.config.is_development()
    }
}
