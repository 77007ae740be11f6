//! Proxy module
//!
//! Normalizes chat requests and forwards them to the upstream
//! generative-language API with payload-shape fallback.

pub mod fallback;
pub mod headers;
pub mod logging;
pub mod normalize;
pub mod types;
pub mod upstream;

pub use fallback::{FallbackConfig, FallbackOrchestrator, ProxyResponse};
pub use types::{
    infer_shape, AttemptResult, ChatMessage, PayloadShape, UpstreamBody, UpstreamTarget,
};
pub use upstream::{GeminiClient, TransportError, Upstream};
