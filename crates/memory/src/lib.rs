//! Best-effort extraction of user facts from recent conversation turns.
//!
//! The upstream model is asked for a JSON object, but its output is not a
//! controlled format: [`parse`] recovers what it can and every failure
//! falls back to returning the current memory unchanged.

pub mod extractor;
pub mod merge;
pub mod parse;
pub mod prompt;

pub use extractor::{ExtractionOutcome, MemoryExtractor};
pub use merge::{merge, MergeOutcome};
pub use parse::{parse_extraction, ExtractedMemory};
