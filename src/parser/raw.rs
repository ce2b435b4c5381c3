//! Raw block-ordered object model of a DOCX body.
//!
//! The backend fills this in document order; the extractor interprets it.
//! Nothing here knows about dataset semantics.

/// Body content of `word/document.xml`, top-level blocks in source order.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
}

impl RawDocument {
    /// Iterator over the top-level tables, in order.
    pub fn tables(&self) -> impl Iterator<Item = &RawTable> {
        self.blocks.iter().filter_map(|b| match b {
            RawBlock::Table(t) => Some(t),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum RawBlock {
    Paragraph(RawParagraph),
    Table(RawTable),
}

/// A top-level table. Cell content is flattened to text with embedded
/// newlines between cell paragraphs.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Normalized key of a row: first cell, first line, trimmed, lowercased.
    pub fn row_key(row: &RawRow) -> String {
        row.cells
            .first()
            .map(|c| c.lines().next().unwrap_or("").trim().to_lowercase())
            .unwrap_or_default()
    }

    /// Value cell of a key/value row, trimmed. Empty when the row has no
    /// second cell.
    pub fn row_value(row: &RawRow) -> String {
        row.cells
            .get(1)
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub cells: Vec<String>,
}

/// A top-level paragraph with its style and formatted runs.
#[derive(Debug, Clone, Default)]
pub struct RawParagraph {
    /// Paragraph style identifier from `w:pStyle` (e.g. "Heading2",
    /// "ListParagraph"), unset for body text.
    pub style: Option<String>,
    pub inlines: Vec<RawInline>,
    /// Alt text of an inline drawing (`wp:docPr/@descr`).
    pub image_alt: Option<String>,
}

impl RawParagraph {
    /// Concatenated run text, breaks ignored.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            if let RawInline::Run(run) = inline {
                out.push_str(&run.text);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum RawInline {
    Run(RawRun),
    /// Explicit line break (`w:br`).
    Break,
}

#[derive(Debug, Clone, Default)]
pub struct RawRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}
