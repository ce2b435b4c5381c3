//! Prose assembly.
//!
//! Turns each [`ProseBlock`] into one `<Block><Prose>` fragment. Run
//! formatting maps to Markdown emphasis (bold outside italic when both are
//! set), explicit line breaks map to `<br />`, and an empty paragraph
//! becomes a `<br />` fragment of its own so blank lines keep grouping
//! prose in the rendered page.

use crate::model::{BlockKind, DatasetInfo, Inline, ProseBlock, StyledRun};
use crate::render::options::RenderOptions;

/// Render every block to its own fragment, in order.
pub fn render_all(blocks: &[ProseBlock], options: &RenderOptions) -> Vec<String> {
    blocks.iter().map(|b| render_block(b, options)).collect()
}

/// Render one block as a `<Block><Prose>` fragment.
pub fn render_block(block: &ProseBlock, options: &RenderOptions) -> String {
    let body = match block.kind {
        BlockKind::Break => "<br />".to_string(),
        BlockKind::Heading(level) => {
            let marker = "#".repeat(level as usize);
            format!("{} {}", marker, render_inlines(&block.content, options))
        }
        BlockKind::ListItem => format!(
            "{} {}",
            options.list_marker,
            render_inlines(&block.content, options)
        ),
        BlockKind::Paragraph => render_inlines(&block.content, options),
    };
    wrap_fragment(&body)
}

/// Summary fragment of the spatial/temporal descriptors, or `None` when
/// the document provided none.
pub fn render_summary(info: &DatasetInfo) -> Option<String> {
    if !info.has_descriptors() {
        return None;
    }
    let labeled = [
        ("Spatial Extent", &info.spatial_extent),
        ("Spatial Resolution", &info.spatial_resolution),
        ("Temporal Extent", &info.temporal_extent),
        ("Temporal Resolution", &info.temporal_resolution),
        ("Data Latency", &info.data_latency),
    ];
    let lines: Vec<String> = labeled
        .iter()
        .filter(|(_, value)| !value.is_empty() && value.as_str() != crate::model::NOT_PROVIDED)
        .map(|(label, value)| format!("**{}:** {}", label, value))
        .collect();
    Some(wrap_fragment(&lines.join("<br />")))
}

fn wrap_fragment(body: &str) -> String {
    format!("<Block>\n  <Prose>\n    {}\n  </Prose>\n</Block>", body)
}

fn render_inlines(inlines: &[Inline], options: &RenderOptions) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Run(run) => out.push_str(&render_run(run, options)),
            Inline::Break => out.push_str("<br />"),
        }
    }
    out
}

/// Applies emphasis around the run text. Surrounding whitespace stays
/// outside the markers, which would otherwise break the emphasis syntax.
fn render_run(run: &StyledRun, options: &RenderOptions) -> String {
    let text = if options.escape_special_chars {
        escape_markdown(&run.text)
    } else {
        run.text.clone()
    };

    if !run.bold && !run.italic {
        return text;
    }

    let core = text.trim();
    if core.is_empty() {
        return text;
    }
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];

    let mut wrapped = core.to_string();
    if run.italic {
        wrapped = format!("*{}*", wrapped);
    }
    if run.bold {
        wrapped = format!("**{}**", wrapped);
    }
    format!("{}{}{}", leading, wrapped, trailing)
}

/// Escape Markdown special characters in plain text.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
