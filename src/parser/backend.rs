//! DOCX container backend.
//!
//! Opens the zip package, streams `word/document.xml` with quick-xml and
//! builds the raw block-ordered object model. Only the constructs the
//! dataset template uses are materialized: top-level tables (cells
//! flattened to text), paragraphs with styled runs, explicit line breaks,
//! paragraph styles and inline-drawing alt text.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::parser::raw::{RawBlock, RawDocument, RawInline, RawParagraph, RawRow, RawRun, RawTable};

const DOCX_MAGIC: &[u8] = b"PK\x03\x04";
const DOCUMENT_PART: &str = "word/document.xml";

/// Reads a DOCX package into a [`RawDocument`].
pub struct DocxBackend;

impl DocxBackend {
    /// Open a DOCX file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<RawDocument> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Parse a DOCX package from memory.
    pub fn from_bytes(data: &[u8]) -> Result<RawDocument> {
        if !is_docx(data) {
            return Err(Error::UnknownFormat);
        }

        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut xml = String::new();
        archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
        debug!("read {} ({} bytes)", DOCUMENT_PART, xml.len());

        parse_document_xml(&xml)
    }
}

/// Zip local-file-header magic check; a DOCX is a zip package.
pub fn is_docx(data: &[u8]) -> bool {
    data.len() >= DOCX_MAGIC.len() && data[..DOCX_MAGIC.len()] == *DOCX_MAGIC
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn attr_value(element: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr.ok()?;
        if local_name(attr.key.as_ref()) == key {
            if let Ok(value) = attr.unescape_value() {
                return Some(value.into_owned());
            }
        }
    }
    None
}

/// `w:b`/`w:i` toggle an effective property off when `w:val` says so.
fn toggle_on(element: &BytesStart) -> bool {
    match attr_value(element, b"val") {
        Some(val) => !matches!(val.as_str(), "0" | "false" | "none" | "off"),
        None => true,
    }
}

fn parse_document_xml(xml: &str) -> Result<RawDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();

    let mut blocks: Vec<RawBlock> = Vec::new();

    let mut table_depth = 0usize;
    let mut rows: Vec<RawRow> = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut cell_text = String::new();
    let mut in_cell = false;

    let mut in_paragraph = false;
    let mut para = RawParagraph::default();

    let mut in_run = false;
    let mut in_run_props = false;
    let mut run = RawRun::default();
    let mut in_text = false;

    // Flushes the pending run into the paragraph.
    macro_rules! flush_run {
        () => {
            if !run.text.is_empty() {
                para.inlines.push(RawInline::Run(std::mem::take(&mut run)));
            } else {
                run = RawRun::default();
            }
        };
    }

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match local_name(e.name().as_ref()) {
                b"tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        rows.clear();
                    }
                }
                b"tr" if table_depth == 1 => {
                    cells.clear();
                }
                b"tc" if table_depth == 1 => {
                    in_cell = true;
                    cell_text.clear();
                }
                b"p" => {
                    if in_cell {
                        if !cell_text.is_empty() {
                            cell_text.push('\n');
                        }
                    } else if table_depth == 0 {
                        in_paragraph = true;
                        para = RawParagraph::default();
                    }
                }
                b"pStyle" => {
                    if in_paragraph && !in_cell {
                        para.style = attr_value(e, b"val");
                    }
                }
                b"r" => {
                    if in_paragraph && !in_cell {
                        in_run = true;
                        run = RawRun::default();
                    }
                }
                b"rPr" if in_run => in_run_props = true,
                b"b" if in_run_props => run.bold = toggle_on(e),
                b"i" if in_run_props => run.italic = toggle_on(e),
                b"t" => in_text = true,
                b"br" => {
                    if in_cell {
                        cell_text.push('\n');
                    } else if in_run {
                        let (bold, italic) = (run.bold, run.italic);
                        flush_run!();
                        para.inlines.push(RawInline::Break);
                        run.bold = bold;
                        run.italic = italic;
                    }
                }
                b"tab" => {
                    if in_cell {
                        cell_text.push('\t');
                    } else if in_run {
                        run.text.push('\t');
                    }
                }
                b"docPr" => {
                    if in_paragraph && !in_cell && para.image_alt.is_none() {
                        para.image_alt = attr_value(e, b"descr").filter(|s| !s.trim().is_empty());
                    }
                }
                _ => {}
            },
            Event::Empty(ref e) => match local_name(e.name().as_ref()) {
                // Self-closing empty paragraph.
                b"p" => {
                    if in_cell {
                        if !cell_text.is_empty() {
                            cell_text.push('\n');
                        }
                    } else if table_depth == 0 {
                        blocks.push(RawBlock::Paragraph(RawParagraph::default()));
                    }
                }
                b"pStyle" => {
                    if in_paragraph && !in_cell {
                        para.style = attr_value(e, b"val");
                    }
                }
                b"b" if in_run_props => run.bold = toggle_on(e),
                b"i" if in_run_props => run.italic = toggle_on(e),
                b"br" => {
                    if in_cell {
                        cell_text.push('\n');
                    } else if in_run {
                        let (bold, italic) = (run.bold, run.italic);
                        flush_run!();
                        para.inlines.push(RawInline::Break);
                        run.bold = bold;
                        run.italic = italic;
                    }
                }
                b"tab" => {
                    if in_cell {
                        cell_text.push('\t');
                    } else if in_run {
                        run.text.push('\t');
                    }
                }
                b"docPr" => {
                    if in_paragraph && !in_cell && para.image_alt.is_none() {
                        para.image_alt = attr_value(e, b"descr").filter(|s| !s.trim().is_empty());
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if in_text {
                    let text = e.unescape()?;
                    if in_cell {
                        cell_text.push_str(&text);
                    } else if in_run {
                        run.text.push_str(&text);
                    }
                }
            }
            Event::End(ref e) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"rPr" => in_run_props = false,
                b"r" => {
                    if in_run {
                        flush_run!();
                        in_run = false;
                    }
                }
                b"p" => {
                    if !in_cell && table_depth == 0 && in_paragraph {
                        blocks.push(RawBlock::Paragraph(std::mem::take(&mut para)));
                        in_paragraph = false;
                    }
                }
                b"tc" if table_depth == 1 => {
                    cells.push(std::mem::take(&mut cell_text));
                    in_cell = false;
                }
                b"tr" if table_depth == 1 => {
                    rows.push(RawRow {
                        cells: std::mem::take(&mut cells),
                    });
                }
                b"tbl" => {
                    if table_depth == 1 {
                        blocks.push(RawBlock::Table(RawTable {
                            rows: std::mem::take(&mut rows),
                        }));
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!("parsed {} top-level blocks", blocks.len());
    Ok(RawDocument { blocks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_check() {
        assert!(is_docx(b"PK\x03\x04rest"));
        assert!(!is_docx(b"%PDF-1.7"));
        assert!(!is_docx(b"PK"));
    }

    #[test]
    fn test_non_docx_rejected() {
        let err = DocxBackend::from_bytes(b"plain text, not a package").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }

    #[test]
    fn test_parse_paragraph_with_runs() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p>
              <w:r><w:rPr><w:b/></w:rPr><w:t>bold</w:t></w:r>
              <w:r><w:t xml:space="preserve"> plain</w:t></w:r>
            </w:p>
        </w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        match &doc.blocks[0] {
            RawBlock::Paragraph(p) => {
                assert_eq!(p.inlines.len(), 2);
                match &p.inlines[0] {
                    RawInline::Run(r) => {
                        assert_eq!(r.text, "bold");
                        assert!(r.bold);
                        assert!(!r.italic);
                    }
                    other => panic!("unexpected inline: {:?}", other),
                }
                assert_eq!(p.text(), "bold plain");
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn test_parse_table_cells() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:tbl>
              <w:tr>
                <w:tc><w:p><w:r><w:t>id</w:t></w:r></w:p></w:tc>
                <w:tc><w:p><w:r><w:t>lis-alaska-nrt</w:t></w:r></w:p></w:tc>
              </w:tr>
              <w:tr>
                <w:tc><w:p><w:r><w:t>name</w:t></w:r></w:p></w:tc>
                <w:tc><w:p><w:r><w:t>LIS Alaska</w:t></w:r></w:p>
                      <w:p><w:r><w:t>second line</w:t></w:r></w:p></w:tc>
              </w:tr>
            </w:tbl>
        </w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        match &doc.blocks[0] {
            RawBlock::Table(t) => {
                assert_eq!(t.rows.len(), 2);
                assert_eq!(t.rows[0].cells, vec!["id", "lis-alaska-nrt"]);
                assert_eq!(t.rows[1].cells[1], "LIS Alaska\nsecond line");
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn test_bold_toggle_off() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>not bold</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        match &doc.blocks[0] {
            RawBlock::Paragraph(p) => match &p.inlines[0] {
                RawInline::Run(r) => assert!(!r.bold),
                other => panic!("unexpected inline: {:?}", other),
            },
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn test_style_and_break() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p>
              <w:pPr><w:pStyle w:val="Heading2"/></w:pPr>
              <w:r><w:t>Above</w:t><w:br/><w:t>below</w:t></w:r>
            </w:p>
        </w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        match &doc.blocks[0] {
            RawBlock::Paragraph(p) => {
                assert_eq!(p.style.as_deref(), Some("Heading2"));
                assert_eq!(p.inlines.len(), 3);
                assert!(matches!(p.inlines[1], RawInline::Break));
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn test_drawing_alt_text() {
        let xml = r#"<w:document xmlns:w="ns" xmlns:wp="ns2"><w:body>
            <w:p>
              <w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture 1" descr="Soil moisture map"/></wp:inline></w:drawing></w:r>
              <w:r><w:t>Caption text</w:t></w:r>
            </w:p>
        </w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        match &doc.blocks[0] {
            RawBlock::Paragraph(p) => {
                assert_eq!(p.image_alt.as_deref(), Some("Soil moisture map"));
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }
}
