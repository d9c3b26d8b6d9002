//! Reading documents, options and scripts, and writing field reports.

pub mod format;
pub mod input;
pub mod output;

pub use format::DocumentFormat;
pub use input::{parse_document_str, parse_with_fallback};
pub use output::{OutputDestination, OutputOptions, emit, serialize_value};
