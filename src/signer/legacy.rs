use super::error::SignerError;
use super::params::QueryParams;
use super::RequestSigner;
use async_trait::async_trait;

/// Signer reproducing the first viewer integration's URL scheme.
///
/// Parameters keep their insertion order and are form-urlencoded (space
/// becomes `+`). A `?` is always appended, even with no parameters. Only use
/// it against backends that verified signatures over that exact layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySigner;

impl LegacySigner {
    pub fn sign(&self, endpoint: &str, params: &QueryParams) -> Result<String, SignerError> {
        if endpoint.trim().is_empty() {
            return Err(SignerError::InvalidEndpoint);
        }

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in params.present() {
            if let Some(rendered) = value.render() {
                query.append_pair(name, &rendered);
            }
        }

        Ok(format!("{endpoint}?{}", query.finish()))
    }
}

#[async_trait]
impl RequestSigner for LegacySigner {
    async fn signed_url(&self, endpoint: &str, params: &QueryParams) -> Result<String, SignerError> {
        self.sign(endpoint, params)
    }
}
