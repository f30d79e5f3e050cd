//! Token validator
//!
//! Shared-secret access control: requests must carry the configured token
//! in the `X-Access-Token` header.

use axum::http::HeaderMap;

use super::AccessControl;

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Performs basic input sanitation on a presented token.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[derive(Debug, Clone)]
pub struct TokenAccess {
    token: String,
}

impl TokenAccess {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Validates a presented token against the configured one.
    pub fn validate(&self, presented: &str) -> bool {
        is_valid_input(presented, self.token.len().max(1) * 4)
            && tokens_match(presented.as_bytes(), self.token.as_bytes())
    }
}

impl AccessControl for TokenAccess {
    fn is_allowed(&self, headers: &HeaderMap) -> bool {
        headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|presented| self.validate(presented))
    }
}
