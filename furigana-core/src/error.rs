//! Failure taxonomy for the annotation pipeline.
//!
//! Failures are values, not panics: every fallible step returns one of
//! these so the caller can render the failure into a tool response. No
//! layer retries; the first failure is terminal for the whole request.

use thiserror::Error;

/// Outcome classification for one remote annotation call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP status (connect, timeout, or
    /// body decode failure).
    #[error("network error: {message}")]
    Network { message: String },

    /// Non-success HTTP status from the service endpoint.
    #[error("HTTP {status} {status_text}")]
    Transport { status: u16, status_text: String },

    /// The service answered with an explicit error object.
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    /// Response carried neither `result` nor `error`.
    #[error("empty response: no result and no error")]
    EmptyResult,
}

/// Failure of a whole annotation request, with chunk attribution when the
/// input was split.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The input fit in one call; no chunk bookkeeping to report.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// One chunk of a split input failed; `chunk` is 1-based.
    #[error("chunk {chunk}/{total}: {source}")]
    Chunk {
        chunk: usize,
        total: usize,
        source: ApiError,
    },
}

impl PipelineError {
    /// The underlying remote-call failure.
    pub fn cause(&self) -> &ApiError {
        match self {
            PipelineError::Api(e) => e,
            PipelineError::Chunk { source, .. } => source,
        }
    }
}
