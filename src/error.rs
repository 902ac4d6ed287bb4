use std::fmt;

use crate::gateway::GatewayError;

/// Error returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No token (or an unusable one) for an operation that requires auth.
    Authentication(String),
    /// Local precondition failed before any request was made.
    Validation(String),
    /// The API answered with a non-2xx status.
    Remote { status: u16, message: String },
    /// No usable response: connection failure, timeout or malformed body.
    Transport(String),
}

impl ClientError {
    /// The bare human-readable message, as stored in a store's error field.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Authentication(msg)
            | ClientError::Validation(msg)
            | ClientError::Transport(msg) => msg,
            ClientError::Remote { message, .. } => message,
        }
    }

    /// HTTP status for remote errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_gateway(err: GatewayError, fallback: &str) -> Self {
        match err {
            GatewayError::Remote { status, message } => ClientError::Remote {
                status,
                message: message.unwrap_or_else(|| fallback.to_string()),
            },
            GatewayError::Transport(msg) => ClientError::Transport(msg),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Authentication(msg) => write!(f, "authentication error: {}", msg),
            ClientError::Validation(msg) => write!(f, "validation error: {}", msg),
            ClientError::Remote { status, message } => {
                write!(f, "remote error ({}): {}", status, message)
            }
            ClientError::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<GatewayError> for ClientError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Remote { status, .. } => {
                ClientError::from_gateway(err, &format!("HTTP Error {}", status))
            }
            GatewayError::Transport(_) => ClientError::from_gateway(err, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_message_falls_back_when_server_is_silent() {
        let err = ClientError::from_gateway(
            GatewayError::Remote {
                status: 500,
                message: None,
            },
            "Failed to update task",
        );
        assert_eq!(err.message(), "Failed to update task");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ClientError::from_gateway(
            GatewayError::Remote {
                status: 404,
                message: Some("Team not found".into()),
            },
            "Failed to update team",
        );
        assert_eq!(err.message(), "Team not found");
        assert_eq!(err.to_string(), "remote error (404): Team not found");
    }

    #[test]
    fn generic_conversion_uses_http_status_fallback() {
        let err: ClientError = GatewayError::Remote {
            status: 502,
            message: None,
        }
        .into();
        assert_eq!(err.message(), "HTTP Error 502");

        let err: ClientError = GatewayError::Transport("connection refused".into()).into();
        assert_eq!(err, ClientError::Transport("connection refused".into()));
    }
}
