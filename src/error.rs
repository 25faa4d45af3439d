//! Failure taxonomy for the fetch → decode pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// The upstream host could not be reached or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The upstream answered with something other than `200 OK`.
    #[error("upstream responded with status {status}")]
    FetchFailed { status: u16 },
    #[error("feed decode failed: {0}")]
    Decode(#[from] prost::DecodeError),
}

impl FeedError {
    /// Short label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Transport(_) => "transport_error",
            FeedError::FetchFailed { .. } => "fetch_failed",
            FeedError::Decode(_) => "decode_failed",
        }
    }
}
