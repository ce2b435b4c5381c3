//! Document extraction.
//!
//! Walks the raw block stream in source order and recovers the typed
//! [`DatasetRecord`]: scalar metadata from the first table, one
//! [`LayerRecord`] per layer-shaped table, and prose from every paragraph
//! after the last layer table. The layer count is never assumed; scanning
//! stops at the first table that is not layer-shaped.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{
    BlockKind, DatasetInfo, DatasetRecord, Inline, LayerRecord, ProseBlock, StyledRun,
};
use crate::parser::raw::{RawBlock, RawDocument, RawInline, RawParagraph, RawTable};

/// Extract a [`DatasetRecord`] from the raw document.
pub fn extract(doc: &RawDocument) -> Result<DatasetRecord> {
    let meta_index = doc
        .blocks
        .iter()
        .position(|b| matches!(b, RawBlock::Table(_)))
        .ok_or_else(|| Error::Structure("no metadata table found".to_string()))?;

    let info = match &doc.blocks[meta_index] {
        RawBlock::Table(table) => extract_info(table)?,
        _ => unreachable!(),
    };

    // Layer region: every table after the metadata table, until the first
    // one that is not layer-shaped.
    let mut layers: Vec<LayerRecord> = Vec::new();
    let mut schema: Option<Vec<String>> = None;
    let mut prose_start = meta_index + 1;

    for (index, block) in doc.blocks.iter().enumerate().skip(meta_index + 1) {
        let table = match block {
            RawBlock::Table(t) => t,
            RawBlock::Paragraph(_) => continue,
        };
        if !is_layer_table(table) {
            if looks_like_layer_body(table) {
                return Err(Error::Structure(format!(
                    "layer table {} is missing its header row",
                    layers.len() + 1
                )));
            }
            break;
        }
        let keys = attribute_keys(table);
        match &schema {
            None => schema = Some(keys),
            Some(expected) => {
                if *expected != keys {
                    return Err(Error::Structure(format!(
                        "layer table {} does not match the attribute schema of layer table 1 \
                         (expected [{}], found [{}])",
                        layers.len() + 1,
                        expected.join(", "),
                        keys.join(", ")
                    )));
                }
            }
        }
        layers.push(extract_layer(table)?);
        prose_start = index + 1;
    }
    debug!("extracted {} layer(s)", layers.len());

    let mut prose: Vec<ProseBlock> = Vec::new();
    for block in &doc.blocks[prose_start..] {
        if let RawBlock::Paragraph(para) = block {
            prose.push(extract_prose_block(para));
        }
    }

    Ok(DatasetRecord {
        info,
        layers,
        prose,
    })
}

fn extract_info(table: &RawTable) -> Result<DatasetInfo> {
    let mut info = DatasetInfo::default();
    for row in &table.rows {
        let key = RawTable::row_key(row);
        let value = RawTable::row_value(row);
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "id" => info.id = value,
            "name" => info.name = value,
            "description" => info.description = value,
            "spatial extent" => info.spatial_extent = value,
            "spatial resolution" => info.spatial_resolution = value,
            "temporal extent" => info.temporal_extent = value,
            "temporal resolution" => info.temporal_resolution = value,
            "data latency" => info.data_latency = value,
            other => warn!("ignoring unknown metadata key '{}'", other),
        }
    }

    for (field, value) in [
        ("id", &info.id),
        ("name", &info.name),
        ("description", &info.description),
    ] {
        if value.trim().is_empty() {
            return Err(Error::Structure(format!(
                "required metadata field '{}' is missing",
                field
            )));
        }
    }
    Ok(info)
}

/// A layer table announces itself with a header row whose key cell reads
/// "layer" (optionally numbered, e.g. "Layer 2").
fn is_layer_table(table: &RawTable) -> bool {
    table
        .rows
        .first()
        .map(|row| RawTable::row_key(row).starts_with("layer"))
        .unwrap_or(false)
}

/// A table that carries layer attribute keys but lacks the header row is a
/// malformed layer table, not the end of the layer region.
fn looks_like_layer_body(table: &RawTable) -> bool {
    table
        .rows
        .iter()
        .any(|row| matches!(RawTable::row_key(row).as_str(), "staccol" | "stacapiendpoint"))
}

/// Ordered normalized keys of the attribute rows (header excluded).
fn attribute_keys(table: &RawTable) -> Vec<String> {
    table
        .rows
        .iter()
        .skip(1)
        .map(RawTable::row_key)
        .collect()
}

fn extract_layer(table: &RawTable) -> Result<LayerRecord> {
    let mut layer = LayerRecord::new("");
    for row in table.rows.iter().skip(1) {
        let key = RawTable::row_key(row);
        let value = RawTable::row_value(row);
        match key.as_str() {
            "id" | "layer id" => layer.id = value,
            "staccol" => layer.stac_col = value,
            "stacapiendpoint" | "stac api endpoint" => layer.stac_api_endpoint = value,
            "name" | "layer name" => layer.name = value,
            "type" | "data format" => layer.layer_type = value,
            "description" | "layer description" => layer.description = value,
            "unit" | "units" => layer.legend.unit = value,
            "legend type" => layer.legend.legend_type = value,
            "min" | "legend minimum" => layer.legend.min = parse_number(&value),
            "max" | "legend maximum" => layer.legend.max = parse_number(&value),
            "stops" | "color stops" => layer.legend.stops = parse_stops(&value),
            other => warn!("ignoring unknown layer attribute '{}'", other),
        }
    }
    Ok(layer)
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
        return None;
    }
    match trimmed.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("ignoring non-numeric legend bound '{}'", trimmed);
            None
        }
    }
}

/// Splits a comma-separated stop list, optionally bracket-wrapped. Only
/// commas outside parentheses separate tokens, so `rgb(r,g,b)` entries
/// stay whole. Tokens keep their authored surface form; normalization
/// happens at render time.
fn parse_stops(value: &str) -> Vec<String> {
    let inner = value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');

    let mut stops = Vec::new();
    let mut depth = 0usize;
    let mut token = String::new();
    for c in inner.chars() {
        match c {
            '(' => {
                depth += 1;
                token.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                token.push(c);
            }
            ',' if depth == 0 => {
                push_stop(&mut stops, &token);
                token.clear();
            }
            _ => token.push(c),
        }
    }
    push_stop(&mut stops, &token);
    stops
}

fn push_stop(stops: &mut Vec<String>, raw: &str) {
    let token = raw.trim().trim_matches(|c| c == '\'' || c == '"').trim();
    if !token.is_empty() {
        stops.push(token.to_string());
    }
}

fn extract_prose_block(para: &RawParagraph) -> ProseBlock {
    let kind = classify(para);
    let mut block = match kind {
        BlockKind::Break => ProseBlock::break_marker(),
        BlockKind::Heading(level) => ProseBlock::heading(level, para.text().trim()),
        BlockKind::ListItem => ProseBlock::list_item(convert_inlines(para)),
        BlockKind::Paragraph => ProseBlock::paragraph(convert_inlines(para)),
    };
    block.alt_text = para.image_alt.clone();
    block
}

fn classify(para: &RawParagraph) -> BlockKind {
    if para.is_empty() && para.image_alt.is_none() {
        return BlockKind::Break;
    }
    if let Some(style) = &para.style {
        let style = style.to_lowercase();
        if let Some(rest) = style.strip_prefix("heading") {
            let level: u8 = rest.trim().parse().unwrap_or(1);
            return BlockKind::Heading(level.clamp(1, 6));
        }
        if style.contains("list") {
            return BlockKind::ListItem;
        }
    }
    BlockKind::Paragraph
}

fn convert_inlines(para: &RawParagraph) -> Vec<Inline> {
    para.inlines
        .iter()
        .map(|inline| match inline {
            RawInline::Run(run) => Inline::Run(StyledRun {
                text: run.text.clone(),
                bold: run.bold,
                italic: run.italic,
            }),
            RawInline::Break => Inline::Break,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::raw::{RawRow, RawRun};

    fn kv_table(rows: &[(&str, &str)]) -> RawTable {
        RawTable {
            rows: rows
                .iter()
                .map(|(k, v)| RawRow {
                    cells: vec![k.to_string(), v.to_string()],
                })
                .collect(),
        }
    }

    fn metadata_table() -> RawTable {
        kv_table(&[
            ("id", "lis-alaska-nrt"),
            ("name", "LIS Alaska Relative Soil Moisture"),
            ("description", "Near real-time soil moisture over Alaska"),
            ("Temporal Extent", "2020-01-01 to present"),
        ])
    }

    fn layer_table(id: &str) -> RawTable {
        kv_table(&[
            ("Layer", ""),
            ("id", id),
            ("stacCol", "lis_ak_rsm_10cm"),
            ("stacApiEndpoint", "https://example.com/api/stac"),
            ("name", "Relative Soil Moisture"),
            ("type", "raster"),
            ("description", "0-10 cm depth"),
            ("unit", "%"),
            ("Legend type", "gradient"),
            ("min", "0"),
            ("max", "1"),
            ("stops", "rgb(60,40,180), rgb(111,96,219)"),
        ])
    }

    fn text_para(text: &str) -> RawParagraph {
        RawParagraph {
            style: None,
            inlines: vec![RawInline::Run(RawRun {
                text: text.to_string(),
                ..Default::default()
            })],
            image_alt: None,
        }
    }

    #[test]
    fn test_no_metadata_table() {
        let doc = RawDocument {
            blocks: vec![RawBlock::Paragraph(text_para("just prose"))],
        };
        let err = extract(&doc).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_missing_required_field() {
        let doc = RawDocument {
            blocks: vec![RawBlock::Table(kv_table(&[
                ("id", "x"),
                ("name", "X"),
            ]))],
        };
        let err = extract(&doc).unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_zero_layers() {
        let doc = RawDocument {
            blocks: vec![
                RawBlock::Table(metadata_table()),
                RawBlock::Paragraph(text_para("prose right after metadata")),
            ],
        };
        let record = extract(&doc).unwrap();
        assert_eq!(record.layer_count(), 0);
        assert_eq!(record.prose_count(), 1);
    }

    #[test]
    fn test_dynamic_layer_count() {
        for count in [1usize, 4] {
            let mut blocks = vec![RawBlock::Table(metadata_table())];
            for i in 0..count {
                blocks.push(RawBlock::Table(layer_table(&format!("layer-{}", i))));
            }
            blocks.push(RawBlock::Paragraph(text_para("trailing prose")));
            let record = extract(&RawDocument { blocks }).unwrap();
            assert_eq!(record.layer_count(), count);
            assert_eq!(record.layers[0].stac_col, "lis_ak_rsm_10cm");
            assert_eq!(record.prose_count(), 1);
        }
    }

    #[test]
    fn test_layer_fields_and_stops() {
        let doc = RawDocument {
            blocks: vec![
                RawBlock::Table(metadata_table()),
                RawBlock::Table(layer_table("lis-alaska-nrt")),
            ],
        };
        let record = extract(&doc).unwrap();
        let layer = &record.layers[0];
        assert_eq!(layer.id, "lis-alaska-nrt");
        assert_eq!(layer.layer_type, "raster");
        assert_eq!(layer.legend.unit, "%");
        assert_eq!(layer.legend.min, Some(0.0));
        assert_eq!(layer.legend.max, Some(1.0));
        assert_eq!(
            layer.legend.stops,
            vec!["rgb(60,40,180)", "rgb(111,96,219)"]
        );
    }

    #[test]
    fn test_bracketed_stop_list() {
        assert_eq!(
            parse_stops("['#3C28B4', '#6F60DB', ]"),
            vec!["#3C28B4", "#6F60DB"]
        );
        assert_eq!(parse_stops("  "), Vec::<String>::new());
    }

    #[test]
    fn test_rgb_stops_survive_comma_split() {
        assert_eq!(
            parse_stops("rgb(60,40,180), rgb(111,96,219)"),
            vec!["rgb(60,40,180)", "rgb(111,96,219)"]
        );
        assert_eq!(
            parse_stops("['rgb(60, 40, 180)', '#6F60DB']"),
            vec!["rgb(60, 40, 180)", "#6F60DB"]
        );
    }

    #[test]
    fn test_schema_mismatch() {
        let mut second = layer_table("layer-b");
        second.rows.remove(3); // drop stacApiEndpoint
        let doc = RawDocument {
            blocks: vec![
                RawBlock::Table(metadata_table()),
                RawBlock::Table(layer_table("layer-a")),
                RawBlock::Table(second),
            ],
        };
        let err = extract(&doc).unwrap_err();
        assert!(err.to_string().contains("layer table 2"));
    }

    #[test]
    fn test_missing_layer_header() {
        let mut table = layer_table("layer-a");
        table.rows.remove(0);
        let doc = RawDocument {
            blocks: vec![RawBlock::Table(metadata_table()), RawBlock::Table(table)],
        };
        let err = extract(&doc).unwrap_err();
        assert!(err.to_string().contains("header row"));
    }

    #[test]
    fn test_prose_after_last_layer() {
        let doc = RawDocument {
            blocks: vec![
                RawBlock::Table(metadata_table()),
                RawBlock::Paragraph(text_para("between metadata and layers, ignored")),
                RawBlock::Table(layer_table("layer-a")),
                RawBlock::Paragraph(text_para("first prose")),
                RawBlock::Paragraph(RawParagraph::default()),
                RawBlock::Paragraph(text_para("second prose")),
            ],
        };
        let record = extract(&doc).unwrap();
        assert_eq!(record.prose_count(), 3);
        assert_eq!(record.prose[0].plain_text(), "first prose");
        assert_eq!(record.prose[1].kind, BlockKind::Break);
    }

    #[test]
    fn test_heading_and_list_classification() {
        let mut heading = text_para("Background");
        heading.style = Some("Heading2".to_string());
        let mut item = text_para("bullet point");
        item.style = Some("ListParagraph".to_string());
        let doc = RawDocument {
            blocks: vec![
                RawBlock::Table(metadata_table()),
                RawBlock::Paragraph(heading),
                RawBlock::Paragraph(item),
            ],
        };
        let record = extract(&doc).unwrap();
        assert_eq!(record.prose[0].kind, BlockKind::Heading(2));
        assert_eq!(record.prose[1].kind, BlockKind::ListItem);
    }

    #[test]
    fn test_formatting_from_runs() {
        let para = RawParagraph {
            style: None,
            inlines: vec![
                RawInline::Run(RawRun {
                    text: "plain ".to_string(),
                    ..Default::default()
                }),
                RawInline::Run(RawRun {
                    text: "emphasis".to_string(),
                    bold: true,
                    italic: true,
                }),
            ],
            image_alt: Some("Figure 1".to_string()),
        };
        let doc = RawDocument {
            blocks: vec![RawBlock::Table(metadata_table()), RawBlock::Paragraph(para)],
        };
        let record = extract(&doc).unwrap();
        let block = &record.prose[0];
        assert_eq!(block.alt_text.as_deref(), Some("Figure 1"));
        match &block.content[1] {
            Inline::Run(run) => {
                assert!(run.bold);
                assert!(run.italic);
            }
            other => panic!("unexpected inline: {:?}", other),
        }
    }
}
