//! Error types for the todo API client and store.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Status` with the raw status
//! code and body for debugging. The store treats every variant the same way.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods, transports, and the store.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("encoding failed: {0}")]
    Encode(String),
}
