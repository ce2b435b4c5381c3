//! Front matter assembly.
//!
//! Emits the YAML region of the output with a hand-rolled writer: the key
//! order is contractual (`id`, `name`, `description`, `layers`; per-layer
//! `id`, `stacCol`, `stacApiEndpoint`, `name`, `type`, `description`,
//! `legend`; legend `unit`, `type`, `min`, `max`, `stops`) and color stops
//! must appear as literal flow-sequence tokens, so a generic YAML
//! serializer cannot be trusted with it. The fences belong to the MDX
//! builder, not here.

use crate::color::{normalize_stop, ColorMode};
use crate::error::{Error, Result};
use crate::model::{DatasetRecord, Legend};

/// Build the front matter content for a record. The returned string ends
/// with a newline and carries no `---` fences.
pub fn build_front_matter(record: &DatasetRecord, mode: ColorMode) -> Result<String> {
    let mut out = String::new();

    write_scalar(&mut out, 0, "id", &record.info.id)?;
    write_scalar(&mut out, 0, "name", &record.info.name)?;
    write_scalar(&mut out, 0, "description", &record.info.description)?;

    if record.layers.is_empty() {
        out.push_str("layers: []\n");
        return Ok(out);
    }

    out.push_str("layers:\n");
    for layer in &record.layers {
        write_entry(&mut out, 1, true, "id", &layer.id)?;
        write_entry(&mut out, 1, false, "stacCol", &layer.stac_col)?;
        write_entry(&mut out, 1, false, "stacApiEndpoint", &layer.stac_api_endpoint)?;
        write_entry(&mut out, 1, false, "name", &layer.name)?;
        write_entry(&mut out, 1, false, "type", &layer.layer_type)?;
        write_entry(&mut out, 1, false, "description", &layer.description)?;
        write_legend(&mut out, &layer.legend, mode)?;
    }
    Ok(out)
}

fn write_legend(out: &mut String, legend: &Legend, mode: ColorMode) -> Result<()> {
    if legend.is_empty() {
        out.push_str("    legend: {}\n");
        return Ok(());
    }
    out.push_str("    legend:\n");
    if !legend.unit.is_empty() {
        write_scalar(out, 3, "unit", &legend.unit)?;
    }
    if !legend.legend_type.is_empty() {
        write_scalar(out, 3, "type", &legend.legend_type)?;
    }
    if let Some(min) = legend.min {
        out.push_str(&format!("      min: {}\n", format_number(min)));
    }
    if let Some(max) = legend.max {
        out.push_str(&format!("      max: {}\n", format_number(max)));
    }
    let mut stops = Vec::with_capacity(legend.stops.len());
    for stop in &legend.stops {
        stops.push(normalize_stop(stop, mode)?);
    }
    out.push_str(&format!("      stops: [{}]\n", stops.join(", ")));
    Ok(())
}

/// Writes one key of a layer sequence entry. The first key carries the
/// `- ` sequence marker.
fn write_entry(out: &mut String, depth: usize, first: bool, key: &str, value: &str) -> Result<()> {
    if first {
        let indent = "  ".repeat(depth);
        if value.contains('\n') {
            out.push_str(&format!("{}- {}: |-\n", indent, key));
            write_block_lines(out, depth + 2, key, value)?;
        } else {
            out.push_str(&format!("{}- {}: {}\n", indent, key, scalar_token(key, value)?));
        }
        Ok(())
    } else {
        write_scalar(out, depth + 1, key, value)
    }
}

fn write_scalar(out: &mut String, depth: usize, key: &str, value: &str) -> Result<()> {
    let indent = "  ".repeat(depth);
    if value.contains('\n') {
        out.push_str(&format!("{}{}: |-\n", indent, key));
        write_block_lines(out, depth + 1, key, value)?;
    } else {
        out.push_str(&format!("{}{}: {}\n", indent, key, scalar_token(key, value)?));
    }
    Ok(())
}

fn write_block_lines(out: &mut String, depth: usize, key: &str, value: &str) -> Result<()> {
    let indent = "  ".repeat(depth);
    for line in value.lines() {
        check_representable(key, line)?;
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{}{}\n", indent, line));
        }
    }
    Ok(())
}

/// Renders a single-line string as a YAML scalar, double-quoting when the
/// plain form would be ambiguous.
fn scalar_token(key: &str, value: &str) -> Result<String> {
    check_representable(key, value)?;
    if needs_quoting(value) {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for c in value.chars() {
            match c {
                '\\' => quoted.push_str("\\\\"),
                '"' => quoted.push_str("\\\""),
                '\t' => quoted.push_str("\\t"),
                _ => quoted.push(c),
            }
        }
        quoted.push('"');
        Ok(quoted)
    } else {
        Ok(value.to_string())
    }
}

/// Control characters other than tab have no representation in the simple
/// escaping strategy; surfacing beats silently mangling the text.
fn check_representable(key: &str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| c.is_control() && *c != '\t') {
        return Err(Error::Encoding(format!(
            "field '{}' contains unrepresentable control character U+{:04X}",
            key, c as u32
        )));
    }
    Ok(())
}

fn needs_quoting(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return true;
    }
    if value
        .starts_with(['-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`'])
    {
        return true;
    }
    value.contains(": ")
        || value.ends_with(':')
        || value.contains(" #")
        || value.contains('"')
        || value.contains('\t')
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
