//! Sequential per-chunk annotation.
//!
//! Chunks are processed strictly in order: each remote call completes
//! before the next starts. Ordering keeps the joined output identical to
//! what one unbounded call would produce, and lets a failure name the
//! exact chunk that caused it. Do not parallelize this loop without
//! re-deriving both guarantees.

use crate::chunk::split_text;
use crate::error::{ApiError, PipelineError};
use crate::format::{format_words, OutputStyle};
use crate::model::Word;

/// One remote annotation call. Implemented by the HTTP client; tests
/// substitute stubs.
pub trait Annotate {
    /// Annotate `fragment`, which is at most the configured chunk size.
    /// `grade` is forwarded only when the caller validated it.
    fn annotate(&self, fragment: &str, grade: Option<u8>) -> Result<Vec<Word>, ApiError>;
}

/// Split `text`, annotate every chunk in order, and join the formatted
/// results. The first chunk failure aborts the rest; nothing partial is
/// ever returned.
pub fn process_text<A: Annotate>(
    api: &A,
    text: &str,
    grade: Option<u8>,
    style: OutputStyle,
    limit: usize,
) -> Result<String, PipelineError> {
    let chunks = split_text(text, limit);
    if chunks.len() == 1 {
        let words = api.annotate(&chunks[0], grade)?;
        return Ok(format_words(&words, style));
    }
    let total = chunks.len();
    let mut parts: Vec<String> = Vec::with_capacity(total);
    for (i, chunk) in chunks.iter().enumerate() {
        let words = api
            .annotate(chunk, grade)
            .map_err(|source| PipelineError::Chunk {
                chunk: i + 1,
                total,
                source,
            })?;
        parts.push(format_words(&words, style));
    }
    Ok(parts.join(style.chunk_separator()))
}
