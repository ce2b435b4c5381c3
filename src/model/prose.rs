use serde::{Deserialize, Serialize};

/// Structural role of a prose block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    /// Heading with level 1-6.
    Heading(u8),
    ListItem,
    /// An empty paragraph. Kept explicit: blank lines group prose.
    Break,
}

/// One run of text with its character formatting.
///
/// Bold/italic come from the document model's run properties, never from
/// inspecting the text itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl StyledRun {
    pub fn new(text: impl Into<String>) -> Self {
        StyledRun {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        StyledRun {
            bold: true,
            ..StyledRun::new(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        StyledRun {
            italic: true,
            ..StyledRun::new(text)
        }
    }
}

/// Inline content of a prose block: styled text or an explicit line break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inline {
    Run(StyledRun),
    Break,
}

/// One paragraph-level unit of prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProseBlock {
    pub kind: BlockKind,
    pub content: Vec<Inline>,
    /// Alt text of an inline drawing anchored in this paragraph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl ProseBlock {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        ProseBlock {
            kind: BlockKind::Paragraph,
            content,
            alt_text: None,
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        ProseBlock {
            kind: BlockKind::Heading(level.clamp(1, 6)),
            content: vec![Inline::Run(StyledRun::new(text))],
            alt_text: None,
        }
    }

    pub fn list_item(content: Vec<Inline>) -> Self {
        ProseBlock {
            kind: BlockKind::ListItem,
            content,
            alt_text: None,
        }
    }

    pub fn break_marker() -> Self {
        ProseBlock {
            kind: BlockKind::Break,
            content: Vec::new(),
            alt_text: None,
        }
    }

    /// Concatenated run text, formatting and breaks ignored.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for inline in &self.content {
            if let Inline::Run(run) = inline {
                out.push_str(&run.text);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.content
            .iter()
            .all(|i| matches!(i, Inline::Run(r) if r.text.trim().is_empty()))
    }
}
