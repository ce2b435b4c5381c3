//! # docx2mdx
//!
//! Convert structured DOCX dataset templates to MDX with YAML front matter.
//!
//! A template document carries a metadata table, a variable number of
//! repeated layer tables and free prose. The pipeline extracts a typed
//! record from the document, normalizes legend color stops to a single
//! encoding and renders a deterministic `.data.mdx` artifact: ordered
//! front matter followed by `<Block><Prose>` body fragments.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docx2mdx::{ColorMode, Docx2Mdx};
//!
//! fn main() -> docx2mdx::Result<()> {
//!     let doc = Docx2Mdx::new()
//!         .with_color_mode(ColorMode::Hex)
//!         .parse("dataset.docx")?;
//!
//!     println!("{}", doc.to_mdx()?);
//!     Ok(())
//! }
//! ```
//!
//! Or with the convenience functions:
//!
//! ```no_run
//! # fn main() -> docx2mdx::Result<()> {
//! let record = docx2mdx::parse_file("dataset.docx")?;
//! let mdx = docx2mdx::render::to_mdx(&record, &docx2mdx::RenderOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

use std::path::Path;

pub use color::{normalize, normalize_stop, ColorMode};
pub use error::{Error, Result};
pub use model::{
    BlockKind, DatasetInfo, DatasetRecord, Inline, LayerRecord, Legend, ProseBlock, StyledRun,
};
pub use parser::{extract, DocxBackend};
pub use render::{JsonFormat, RenderOptions};

/// Parse a DOCX file into a [`DatasetRecord`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DatasetRecord> {
    let raw = DocxBackend::open(path)?;
    extract(&raw)
}

/// Parse a DOCX package from memory into a [`DatasetRecord`].
pub fn parse_bytes(data: &[u8]) -> Result<DatasetRecord> {
    let raw = DocxBackend::from_bytes(data)?;
    extract(&raw)
}

/// Convert a DOCX file straight to MDX with the given options.
pub fn to_mdx<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let record = parse_file(path)?;
    render::to_mdx(&record, options)
}

/// Builder-style entry point.
#[derive(Debug, Clone, Default)]
pub struct Docx2Mdx {
    render_options: RenderOptions,
}

impl Docx2Mdx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target encoding for legend color stops.
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.render_options = self.render_options.with_color_mode(mode);
        self
    }

    /// Enable or disable Markdown escaping in prose.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.render_options = self.render_options.with_escaping(escape);
        self
    }

    /// Enable or disable the descriptor summary block.
    pub fn with_summary(mut self, include: bool) -> Self {
        self.render_options = self.render_options.with_summary(include);
        self
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Parse a DOCX file, keeping the options for later rendering.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<ConvertedDocument> {
        Ok(ConvertedDocument {
            record: parse_file(path)?,
            render_options: self.render_options.clone(),
        })
    }

    /// Parse a DOCX package from memory.
    pub fn parse_from_bytes(&self, data: &[u8]) -> Result<ConvertedDocument> {
        Ok(ConvertedDocument {
            record: parse_bytes(data)?,
            render_options: self.render_options.clone(),
        })
    }
}

/// A parsed document paired with its render options.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    record: DatasetRecord,
    render_options: RenderOptions,
}

impl ConvertedDocument {
    pub fn record(&self) -> &DatasetRecord {
        &self.record
    }

    /// Render the complete MDX artifact.
    pub fn to_mdx(&self) -> Result<String> {
        render::to_mdx(&self.record, &self.render_options)
    }

    /// Render only the front matter content.
    pub fn to_front_matter(&self) -> Result<String> {
        render::build_front_matter(&self.record, self.render_options.color_mode)
    }

    /// Serialize the extracted record as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.record, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let converter = Docx2Mdx::new();
        assert_eq!(converter.render_options().color_mode, ColorMode::Hex);
        assert!(converter.render_options().escape_special_chars);
    }

    #[test]
    fn test_builder_options_flow() {
        let converter = Docx2Mdx::new()
            .with_color_mode(ColorMode::Rgb)
            .with_escaping(false);
        assert_eq!(converter.render_options().color_mode, ColorMode::Rgb);
        assert!(!converter.render_options().escape_special_chars);
    }

    #[test]
    fn test_parse_bytes_rejects_garbage() {
        let err = parse_bytes(b"not a zip").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }
}
