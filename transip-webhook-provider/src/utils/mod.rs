//! Utility modules

/// Log sanitization helpers
pub mod log_sanitizer;
