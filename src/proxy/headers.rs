//! Header utilities for upstream proxying
//!
//! Client headers are never forwarded. Every attempt uses the same minimal
//! header set built once per inbound request.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::error::{AppError, AppResult};

/// Header carrying the upstream API key
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-goog-api-key");

/// Build the header set shared by all attempts of one request
pub fn build_upstream_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut key = HeaderValue::from_str(api_key).map_err(|_| {
        AppError::InvalidConfiguration("GEMINI_API_KEY contains invalid characters".to_string())
    })?;
    key.set_sensitive(true);

    headers.insert(API_KEY_HEADER, key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
