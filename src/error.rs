use thiserror::Error;

/// Errors produced while talking to the CMS.
///
/// Shape problems (missing `data`, a collection field that is not an array)
/// are deliberately NOT errors — they normalize to empty/absent results at
/// the data-access layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or malformed response at the transport level.
    #[error("CMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The CMS answered with a non-success HTTP status.
    #[error("CMS returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// A payload that arrived but could not be decoded.
    #[error("failed to decode CMS payload: {0}")]
    Decode(#[from] serde_json::Error),
}
