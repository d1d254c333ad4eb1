//! Signed signaling URL construction.
//!
//! WebSocket handshakes cannot carry custom authorization headers, so the
//! signaling channel authenticates through query parameters. The backend
//! hands out pre-computed signing parameters; this module turns them into a
//! connectable URL.
//!
//! - [`build_signed_url`] / [`canonical_query_string`]: pure canonical form
//! - [`RequestSigner`]: the capability a signaling client consumes
//! - [`CanonicalSigner`], [`LegacySigner`]: interchangeable implementations

pub mod canonical;
pub mod error;
pub mod legacy;
pub mod params;

pub use canonical::{build_signed_url, canonical_query_string, CanonicalSigner};
pub use error::SignerError;
pub use legacy::LegacySigner;
pub use params::{QueryParams, QueryValue};

use async_trait::async_trait;
use std::sync::Arc;

/// Produces a signed URL for a signaling endpoint.
///
/// Signaling clients only depend on this capability, so alternative signing
/// schemes can be swapped in without touching the consumer.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    async fn signed_url(&self, endpoint: &str, params: &QueryParams) -> Result<String, SignerError>;
}

#[async_trait]
impl<T: RequestSigner + ?Sized> RequestSigner for Arc<T> {
    async fn signed_url(&self, endpoint: &str, params: &QueryParams) -> Result<String, SignerError> {
        (**self).signed_url(endpoint, params).await
    }
}

#[async_trait]
impl<T: RequestSigner + ?Sized> RequestSigner for Box<T> {
    async fn signed_url(&self, endpoint: &str, params: &QueryParams) -> Result<String, SignerError> {
        (**self).signed_url(endpoint, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signers_are_substitutable_behind_dyn() {
        let params = QueryParams::new().with("b", "1").with("a", "x y");
        let signers: Vec<Arc<dyn RequestSigner>> =
            vec![Arc::new(CanonicalSigner), Arc::new(LegacySigner)];

        let urls: Vec<String> = signers
            .iter()
            .map(|signer| tokio_test::block_on(signer.signed_url("wss://h", &params)).unwrap())
            .collect();

        assert_eq!(urls, vec!["wss://h?a=x%20y&b=1", "wss://h?b=1&a=x+y"]);
    }
}
