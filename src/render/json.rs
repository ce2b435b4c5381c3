//! JSON inspection output for the extracted record.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::DatasetRecord;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonFormat {
    #[default]
    Pretty,
    Compact,
}

/// Serialize a record for inspection.
pub fn to_json(record: &DatasetRecord, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(record),
        JsonFormat::Compact => serde_json::to_string(record),
    };
    result.map_err(|e| Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatasetInfo, DatasetRecord};

    #[test]
    fn test_json_roundtrip() {
        let record = DatasetRecord::new(DatasetInfo::new("id-1", "Name", "Desc"));
        let json = to_json(&record, JsonFormat::Compact).unwrap();
        assert!(json.contains("\"id\":\"id-1\""));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["layers"].as_array().unwrap().len(), 0);

        let pretty = to_json(&record, JsonFormat::Pretty).unwrap();
        assert!(pretty.contains('\n'));
    }
}
