//! Error types for the fetch/analyze pipeline.
//!
//! The transport's failure modes are collapsed into [`FetchError`] at the
//! connector boundary. Providers and analyzers wrap it unchanged, so a caller
//! can always tell "the fetch broke" apart from "there was nothing to compute".

use thiserror::Error;

/// Failure while retrieving or unpacking a block of items.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or I/O failure reaching the remote endpoint.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered, but not with 200 OK.
    #[error("request to '{url}' returned unexpected status code: {code}")]
    UnexpectedStatus { code: u16, url: String },

    /// Response body was not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    /// Payload did not have the expected shape.
    #[error("cannot extract list at '{pointer}': {reason}")]
    Extract { pointer: String, reason: String },

    /// A chunked source was configured with a zero-length step.
    #[error("step magnitude must be at least 1")]
    InvalidStep,
}

impl FetchError {
    /// HTTP status code, if this is an unexpected-status failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::UnexpectedStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Failure of a single-item pull from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// `take_next` was called with nothing left to deliver.
    #[error("provider has no more items")]
    Empty,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Failure of an analysis pass.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The analyzer already ran once; its stream cannot be replayed.
    #[error("data from this analyzer was already used")]
    Used,

    /// The operation needs at least one item and the stream was empty.
    #[error("no data to analyze")]
    NoData,

    /// The projector could not read a number from the item at this position.
    #[error("item #{position} has no usable numeric value")]
    Unprojectable { position: usize },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        match err {
            // Analyzers only pull after has_more() returned true.
            ProviderError::Empty => AnalysisError::NoData,
            ProviderError::Fetch(e) => AnalysisError::Fetch(e),
        }
    }
}
