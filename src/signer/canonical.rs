//! Canonical query-string construction.
//!
//! Parameter names are sorted byte-wise, values are percent-encoded with
//! everything outside `[A-Za-z0-9-_.~]` escaped, and absent values are
//! dropped. The output is a pure function of the endpoint and the set of
//! present parameters, so signing schemes that hash the canonical query can
//! rely on it bit-for-bit.

use super::error::SignerError;
use super::params::QueryParams;
use super::RequestSigner;
use async_trait::async_trait;

/// Serialize the present parameters into a canonical query string.
///
/// Returns an empty string when nothing is left after filtering.
#[must_use]
pub fn canonical_query_string(params: &QueryParams) -> String {
    let mut pairs: Vec<(&str, String)> = params
        .present()
        .filter_map(|(name, value)| value.render().map(|rendered| (name, rendered)))
        .collect();

    // `str` ordering is byte-wise on the UTF-8 encoding.
    pairs.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    pairs
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append the canonical query string for `params` to `endpoint`.
///
/// The endpoint is treated as an opaque prefix. When no parameter survives
/// filtering the endpoint is returned unchanged, without a bare `?`.
#[must_use]
pub fn build_signed_url(endpoint: &str, params: &QueryParams) -> String {
    let query = canonical_query_string(params);
    if query.is_empty() {
        endpoint.to_owned()
    } else {
        format!("{endpoint}?{query}")
    }
}

/// [`RequestSigner`] producing canonical signed URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalSigner;

impl CanonicalSigner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Synchronous form of [`RequestSigner::signed_url`].
    pub fn sign(&self, endpoint: &str, params: &QueryParams) -> Result<String, SignerError> {
        if endpoint.trim().is_empty() {
            return Err(SignerError::InvalidEndpoint);
        }
        Ok(build_signed_url(endpoint, params))
    }
}

#[async_trait]
impl RequestSigner for CanonicalSigner {
    async fn signed_url(&self, endpoint: &str, params: &QueryParams) -> Result<String, SignerError> {
        self.sign(endpoint, params)
    }
}
