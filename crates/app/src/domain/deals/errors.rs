//! Deals service errors.

use thiserror::Error;

use crate::client::ClientError;

/// Errors returned by a [`DealsService`](super::DealsService).
#[derive(Debug, Error)]
pub enum DealsServiceError {
    /// No deal has the requested id.
    #[error("deal not found")]
    NotFound,

    /// The backend refused the request.
    #[error("backend rejected the request ({status}): {message}")]
    Remote {
        /// Reply status
        status: u16,

        /// Reply body
        message: String,
    },

    /// The backend could not be reached.
    #[error("backend unreachable")]
    Http(#[source] reqwest::Error),

    /// The backend replied with an unexpected shape.
    #[error("unexpected backend response")]
    Decode(#[source] serde_json::Error),
}

impl From<ClientError> for DealsServiceError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Http(error) => Self::Http(error),
            ClientError::Status { status, message } => Self::Remote {
                status: status.as_u16(),
                message,
            },
            ClientError::Decode(error) => Self::Decode(error),
        }
    }
}
