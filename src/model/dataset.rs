use serde::{Deserialize, Serialize};

use super::{LayerRecord, ProseBlock};

/// Placeholder for metadata fields the document leaves blank.
pub const NOT_PROVIDED: &str = "Data not provided";

/// The complete extracted content of one dataset document.
///
/// Produced by the extractor in a single pass and consumed read-only by
/// every renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Scalar metadata from the leading key/value table.
    pub info: DatasetInfo,
    /// Layer records in document order. Any count including zero.
    pub layers: Vec<LayerRecord>,
    /// Prose blocks following the last layer table, in document order.
    pub prose: Vec<ProseBlock>,
}

impl DatasetRecord {
    pub fn new(info: DatasetInfo) -> Self {
        DatasetRecord {
            info,
            layers: Vec::new(),
            prose: Vec::new(),
        }
    }

    /// Number of extracted layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of prose blocks, paragraph-break markers included.
    pub fn prose_count(&self) -> usize {
        self.prose.len()
    }
}

/// Scalar dataset metadata from the fixed-shape key/value table.
///
/// `id`, `name` and `description` are required by the extractor; the
/// spatial/temporal descriptors default to [`NOT_PROVIDED`] when the
/// template leaves them blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub spatial_extent: String,
    pub spatial_resolution: String,
    pub temporal_extent: String,
    pub temporal_resolution: String,
    pub data_latency: String,
}

impl DatasetInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        DatasetInfo {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// True when any spatial/temporal descriptor carries a real value.
    pub fn has_descriptors(&self) -> bool {
        [
            &self.spatial_extent,
            &self.spatial_resolution,
            &self.temporal_extent,
            &self.temporal_resolution,
            &self.data_latency,
        ]
        .iter()
        .any(|v| !v.is_empty() && v.as_str() != NOT_PROVIDED)
    }
}

impl Default for DatasetInfo {
    fn default() -> Self {
        DatasetInfo {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            spatial_extent: NOT_PROVIDED.to_string(),
            spatial_resolution: NOT_PROVIDED.to_string(),
            temporal_extent: NOT_PROVIDED.to_string(),
            temporal_resolution: NOT_PROVIDED.to_string(),
            data_latency: NOT_PROVIDED.to_string(),
        }
    }
}
