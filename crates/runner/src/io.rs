//! JSON persistence of placed-details collections.
//!
//! A collection is stored as an array of records:
//!
//! ```json
//! [{"bottom_left": [0.0, 0.0], "top_right": [0.01, 0.005], "name": "S100", "detail_type": "detail"}]
//! ```

use crate::error::{Result, RunnerError};
use gamma_pack_core::{Detail, DetailType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serializes details to a JSON string.
pub fn serialize_details(details: &[Detail]) -> Result<String> {
    let records: Vec<RawDetail> = details.iter().map(RawDetail::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parses details from a JSON string.
pub fn deserialize_details(json: &str) -> Result<Vec<Detail>> {
    let records: Vec<RawDetail> = serde_json::from_str(json)?;
    records.into_iter().map(convert_raw_detail).collect()
}

/// Writes details to a JSON file.
pub fn save_details_json(details: &[Detail], path: impl AsRef<Path>) -> Result<()> {
    let json = serialize_details(details)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads details from a JSON file.
pub fn load_details_json(path: impl AsRef<Path>) -> Result<Vec<Detail>> {
    let content = fs::read_to_string(path)?;
    deserialize_details(&content)
}

fn convert_raw_detail(raw: RawDetail) -> Result<Detail> {
    let detail_type = DetailType::from_name(&raw.detail_type).ok_or_else(|| {
        RunnerError::InvalidFormat(format!(
            "unknown detail type '{}' for {}",
            raw.detail_type, raw.name
        ))
    })?;

    let [x0, y0] = raw.bottom_left;
    let [x1, y1] = raw.top_right;
    if x1 < x0 || y1 < y0 {
        return Err(RunnerError::InvalidFormat(format!(
            "{} has its top-right corner below or left of its bottom-left corner",
            raw.name
        )));
    }

    Ok(Detail::new((x0, y0), (x1, y1), raw.name, detail_type))
}

/// Detail record as stored in JSON.
#[derive(Debug, Serialize, Deserialize)]
struct RawDetail {
    bottom_left: [f64; 2],
    top_right: [f64; 2],
    name: String,
    detail_type: String,
}

impl From<&Detail> for RawDetail {
    fn from(detail: &Detail) -> Self {
        Self {
            bottom_left: [detail.bottom_left.x, detail.bottom_left.y],
            top_right: [detail.top_right.x, detail.top_right.y],
            name: detail.name.clone(),
            detail_type: detail.detail_type.as_str().to_string(),
        }
    }
}
