use std::fmt;
use thiserror::Error;

/// Backend call that produced an error, used as message context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    Login,
    CreateSession,
    ChannelData,
    SessionEvent,
}

impl ApiOperation {
    #[must_use]
    pub const fn failure_prefix(&self) -> &'static str {
        match self {
            Self::Login => "Authentication failed",
            Self::CreateSession => "Failed to create session",
            Self::ChannelData => "Failed to get channel data",
            Self::SessionEvent => "Failed to send session event",
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::CreateSession => "create_session",
            Self::ChannelData => "channel_data",
            Self::SessionEvent => "session_event",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`ApiClient`](super::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{}: {source}", .operation.failure_prefix())]
    Transport {
        operation: ApiOperation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{}: {message}", .operation.failure_prefix())]
    Status {
        operation: ApiOperation,
        status: u16,
        message: String,
    },
    #[error("{}: malformed response: {reason}", .operation.failure_prefix())]
    Decode {
        operation: ApiOperation,
        reason: String,
    },
    #[error("{}: response is missing `{field}`", .operation.failure_prefix())]
    MissingField {
        operation: ApiOperation,
        field: &'static str,
    },
}

impl ApiError {
    /// HTTP status when the backend answered with a non-success code.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn operation(&self) -> Option<ApiOperation> {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. }
            | Self::MissingField { operation, .. } => Some(*operation),
            Self::Client(_) | Self::InvalidUrl(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_uses_operation_prefix() {
        let err = ApiError::Status {
            operation: ApiOperation::CreateSession,
            status: 403,
            message: "forbidden session".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to create session: forbidden session");
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.operation(), Some(ApiOperation::CreateSession));
    }

    #[test]
    fn missing_field_message() {
        let err = ApiError::MissingField {
            operation: ApiOperation::Login,
            field: "access_token",
        };
        assert_eq!(
            err.to_string(),
            "Authentication failed: response is missing `access_token`"
        );
        assert_eq!(err.status(), None);
    }
}
