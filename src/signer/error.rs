use thiserror::Error;

/// Errors raised by the signer adapters.
///
/// `build_signed_url` itself never fails; these only come from endpoint
/// validation in the [`RequestSigner`](super::RequestSigner) implementations
/// and from converting backend JSON into [`QueryParams`](super::QueryParams).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("invalid signaling endpoint: endpoint must not be empty")]
    InvalidEndpoint,
    #[error("invalid query parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl SignerError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
