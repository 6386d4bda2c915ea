//! API Errors

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors returned by the typed API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway failed or the response did not decode.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A request body could not be serialized.
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status of a rejected request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Gateway(error) => error.status(),
            ApiError::Encode(_) => None,
        }
    }

    /// Whether the server answered with a non-2xx status.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        self.status().is_some()
    }
}
