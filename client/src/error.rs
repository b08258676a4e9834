use eventreg_core::{ApiError, SessionError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response. The stored session has been
    /// cleared when this comes from an authenticated call.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// An upload part could not be built (bad content type).
    #[error("invalid upload: {0}")]
    Upload(#[source] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
