//! Mock infrastructure for testing external services
//!
//! Provides a wiremock-based stand-in for the generative-language API so
//! fallback behavior can be exercised without network access.

pub mod gemini;

pub use gemini::*;
