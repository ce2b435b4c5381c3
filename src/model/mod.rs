//! Typed intermediate representation for extracted dataset documents.
//!
//! This module defines the record structure that bridges DOCX extraction
//! and MDX rendering. Extraction produces one immutable [`DatasetRecord`]
//! per document; both the front matter and prose renderers consume it
//! without ever touching the raw document model again.

mod dataset;
mod layer;
mod prose;

pub use dataset::{DatasetInfo, DatasetRecord, NOT_PROVIDED};
pub use layer::{LayerRecord, Legend};
pub use prose::{BlockKind, Inline, ProseBlock, StyledRun};
