//! DOCX parsing: container backend, raw object model and extraction.

mod backend;
mod extract;
mod raw;

pub use backend::{is_docx, DocxBackend};
pub use extract::extract;
pub use raw::{RawBlock, RawDocument, RawInline, RawParagraph, RawRow, RawRun, RawTable};
