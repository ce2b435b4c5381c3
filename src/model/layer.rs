use serde::{Deserialize, Serialize};

/// One visualization layer extracted from a repeated layer table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    pub id: String,
    /// STAC collection identifier.
    pub stac_col: String,
    pub stac_api_endpoint: String,
    pub name: String,
    /// Raster/vector type string as authored in the table.
    pub layer_type: String,
    pub description: String,
    pub legend: Legend,
}

impl LayerRecord {
    pub fn new(id: impl Into<String>) -> Self {
        LayerRecord {
            id: id.into(),
            stac_col: String::new(),
            stac_api_endpoint: String::new(),
            name: String::new(),
            layer_type: String::new(),
            description: String::new(),
            legend: Legend::default(),
        }
    }
}

/// Legend description for one layer.
///
/// `stops` holds color tokens in authored surface form (`#RRGGBB` or
/// `rgb(r,g,b)`); normalization to the run's target mode happens at
/// render time, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Legend {
    pub unit: String,
    pub legend_type: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub stops: Vec<String>,
}

impl Legend {
    /// True when no legend row carried a value.
    pub fn is_empty(&self) -> bool {
        self.unit.is_empty()
            && self.legend_type.is_empty()
            && self.min.is_none()
            && self.max.is_none()
            && self.stops.is_empty()
    }
}
