//! MDX assembly.
//!
//! Sole owner of the front-matter fences and the spacing between body
//! fragments: one blank line after the closing fence and between
//! successive fragments, single trailing newline.

use crate::error::Result;
use crate::model::DatasetRecord;
use crate::render::frontmatter::build_front_matter;
use crate::render::options::RenderOptions;
use crate::render::prose::{render_all, render_summary};

/// Render a record to the complete MDX artifact.
pub fn to_mdx(record: &DatasetRecord, options: &RenderOptions) -> Result<String> {
    let front_matter = build_front_matter(record, options.color_mode)?;

    let mut fragments: Vec<String> = Vec::new();
    if options.include_summary {
        if let Some(summary) = render_summary(&record.info) {
            fragments.push(summary);
        }
    }
    fragments.extend(render_all(&record.prose, options));

    Ok(assemble(&front_matter, &fragments))
}

/// Concatenate front matter and body fragments into one buffer.
pub fn assemble(front_matter: &str, fragments: &[String]) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(front_matter);
    if !front_matter.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("---\n");
    for fragment in fragments {
        out.push('\n');
        out.push_str(fragment.trim_end());
        out.push('\n');
    }
    out
}
