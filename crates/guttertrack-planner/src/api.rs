use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use guttertrack_core::{AssemblyEstimate, Bom, CostBreakdown, PriceTable, Track};
use guttertrack_validate::{validate_track, ValidationReport};

/// Failure modes of the raw-JSON boundary. Malformed input is data, not a
/// panic: validation findings ride along in the error.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid track description: {}", .0.errors.join("; "))]
    InvalidTrack(ValidationReport),

    #[error("malformed track document: {0}")]
    Json(#[from] serde_json::Error),
}

/// BOM quantities plus the derived cost breakdown, as consumed by the UI.
#[derive(Debug, Clone, Serialize)]
pub struct BomResponse {
    pub bom: Bom,
    pub cost: CostBreakdown,
}

/// Validate a raw description and build a `Track` from it.
pub fn parse_track(data: &Value) -> Result<Track, ApiError> {
    let report = validate_track(data);
    if !report.valid {
        return Err(ApiError::InvalidTrack(report));
    }
    Ok(Track::from_json(&data.to_string())?)
}

/// Compute the bill of materials and cost estimate for a raw track
/// description. Prices default to the catalog table when not supplied.
pub fn calculate_bom(data: &Value, prices: Option<&PriceTable>) -> Result<BomResponse, ApiError> {
    let track = parse_track(data)?;
    let bom = Bom::calculate(&track);
    let default_prices = PriceTable::default();
    let cost = CostBreakdown::calculate(&bom, prices.unwrap_or(&default_prices));
    log::debug!(
        "BOM for {} piece(s): {:.2} straight feet, total ${:.2}",
        track.piece_count(),
        bom.straight_feet,
        cost.total
    );
    Ok(BomResponse { bom, cost })
}

/// Estimate assembly time for a raw track description.
pub fn estimate_assembly_time(data: &Value) -> Result<AssemblyEstimate, ApiError> {
    let track = parse_track(data)?;
    Ok(AssemblyEstimate::calculate(&Bom::calculate(&track)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_description() -> Value {
        json!({
            "width": 8.0,
            "depth": 4.0,
            "lane_width": 6.0,
            "pieces": [
                {"type": "straight", "x": 0.0, "y": 0.0, "rotation": 0, "length": 3},
                {"type": "elbow_90", "x": 12.0, "y": 12.0, "rotation": 180, "length": 1},
                {"type": "t_junction", "x": 30.0, "y": 30.0, "rotation": 180, "length": 1}
            ]
        })
    }

    #[test]
    fn test_calculate_bom_from_raw_description() {
        let response = calculate_bom(&sample_description(), None).unwrap();
        assert!((response.bom.straight_feet - 1.5).abs() < 1e-10);
        assert_eq!(response.bom.elbows_90, 1);
        assert_eq!(response.bom.t_junctions, 1);
        assert_eq!(response.bom.connectors, 2);
        assert!(response.cost.total > 0.0);
    }

    #[test]
    fn test_custom_prices() {
        let prices = PriceTable {
            straight_foot: 10.0,
            ..PriceTable::default()
        };
        let response = calculate_bom(&sample_description(), Some(&prices)).unwrap();
        assert!((response.cost.straight - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_description_reported() {
        let data = json!({"width": -1.0, "depth": 4.0, "lane_width": 6.0, "pieces": []});
        match calculate_bom(&data, None) {
            Err(ApiError::InvalidTrack(report)) => {
                assert!(!report.valid);
                assert!(!report.errors.is_empty());
            }
            other => panic!("expected InvalidTrack, got {:?}", other.map(|r| r.bom)),
        }
    }

    #[test]
    fn test_estimate_assembly_time() {
        let est = estimate_assembly_time(&sample_description()).unwrap();
        // 15 + 2*1.5 + 3*2 + 1 + 2
        assert!((est.total_minutes - 27.0).abs() < 1e-10);
    }
}
