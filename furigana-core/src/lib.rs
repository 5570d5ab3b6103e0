//! Core logic for the furigana annotation tool: byte-bounded chunk
//! splitting, the sequential annotation pipeline, and output formatting.
//! Network and protocol concerns live in the `furigana-mcp` binary.

pub mod chunk;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;

pub use chunk::{byte_len, split_text, MAX_CHUNK_BYTES};
pub use error::{ApiError, PipelineError};
pub use format::{format_words, OutputStyle};
pub use model::{Subword, Word};
pub use pipeline::{process_text, Annotate};
