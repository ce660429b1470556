//! Errors from the Tap HTTP admin client.
//!
//! Lives here rather than in `atproto-sync-core` because it's the only error
//! type in this family that needs to carry HTTP status/body detail, and the
//! only one pulling in `reqwest`.

use thiserror::Error;

/// Error returned by a [`crate::admin::TapAdminClient`] call.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The server responded with a non-2xx status.
    #[error("admin request failed: HTTP {status}: {body}")]
    Http {
        /// The response status code.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The request never reached the server, or the response couldn't be read.
    #[error("admin request transport error: {0}")]
    Transport(String),

    /// The response body wasn't valid JSON for the expected shape.
    #[error("admin response decode error: {0}")]
    Decode(String),
}
