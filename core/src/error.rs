//! Error types for the event-registration client core.
//!
//! # Design
//! Server-reported failures are not errors here: they come back as a failed
//! `Envelope` carrying the server message. `ApiError` covers the cases the
//! caller has to act on differently (bad payloads, undecodable responses,
//! login rejection, expired tokens).

use thiserror::Error;

use crate::resource::{Operation, Resource};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A success response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The backend does not expose this operation for the resource, or the
    /// payload shape does not match what the endpoint takes.
    #[error("{operation} is not supported for {resource}")]
    UnsupportedOperation {
        resource: Resource,
        operation: Operation,
    },

    /// The base URL cannot carry a record path.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// `POST /auth/login` was rejected.
    #[error("{0}")]
    LoginFailed(String),

    /// The server reported that the bearer token has expired.
    #[error("token expired")]
    TokenExpired,
}
