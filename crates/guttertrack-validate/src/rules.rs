use serde_json::Value;

use guttertrack_core::{PieceType, Rotation};

use crate::report::ValidationReport;

const REQUIRED_TRACK_FIELDS: [&str; 4] = ["width", "depth", "lane_width", "pieces"];
const REQUIRED_PIECE_FIELDS: [&str; 5] = ["type", "x", "y", "rotation", "length"];

const MAX_DIMENSION_FEET: f64 = 100.0;
const MIN_LANE_WIDTH_IN: f64 = 2.0;
const MAX_LANE_WIDTH_IN: f64 = 24.0;

/// Range checks on the three track dimensions (width/depth in feet,
/// lane width in inches).
pub fn validate_dimensions(width: f64, depth: f64, lane_width: f64) -> Vec<String> {
    let mut errors = Vec::new();

    if width <= 0.0 {
        errors.push("Width must be greater than zero".to_string());
    } else if width > MAX_DIMENSION_FEET {
        errors.push(format!("Width is too large (max {} feet)", MAX_DIMENSION_FEET));
    }

    if depth <= 0.0 {
        errors.push("Depth must be greater than zero".to_string());
    } else if depth > MAX_DIMENSION_FEET {
        errors.push(format!("Depth is too large (max {} feet)", MAX_DIMENSION_FEET));
    }

    if lane_width <= 0.0 {
        errors.push("Lane width must be greater than zero".to_string());
    } else if lane_width < MIN_LANE_WIDTH_IN {
        errors.push(format!(
            "Lane width is too small (min {} inches)",
            MIN_LANE_WIDTH_IN
        ));
    } else if lane_width > MAX_LANE_WIDTH_IN {
        errors.push(format!(
            "Lane width is too large (max {} inches)",
            MAX_LANE_WIDTH_IN
        ));
    }

    errors
}

/// Structurally validate a raw track description.
///
/// Field presence is checked first; a description missing any required
/// track field is reported without descending into the rest. Piece errors
/// are prefixed with a 1-based index.
pub fn validate_track(data: &Value) -> ValidationReport {
    let obj = match data.as_object() {
        Some(obj) => obj,
        None => {
            return ValidationReport::from_errors(vec![
                "Track description must be a JSON object".to_string(),
            ]);
        }
    };

    let mut errors: Vec<String> = REQUIRED_TRACK_FIELDS
        .iter()
        .filter(|field| !obj.contains_key(**field))
        .map(|field| format!("Missing required field: {}", field))
        .collect();
    if !errors.is_empty() {
        return ValidationReport::from_errors(errors);
    }

    match (
        number_field(obj, "width"),
        number_field(obj, "depth"),
        number_field(obj, "lane_width"),
    ) {
        (Some(width), Some(depth), Some(lane_width)) => {
            errors.extend(validate_dimensions(width, depth, lane_width));
        }
        (width, depth, lane_width) => {
            for (value, name) in [(width, "width"), (depth, "depth"), (lane_width, "lane_width")] {
                if value.is_none() {
                    errors.push(format!("Field '{}' must be a number", name));
                }
            }
        }
    }

    match obj["pieces"].as_array() {
        Some(pieces) => {
            for (i, piece) in pieces.iter().enumerate() {
                validate_piece(piece, i + 1, &mut errors);
            }
        }
        None => errors.push("Field 'pieces' must be an array".to_string()),
    }

    log::debug!("validated track description: {} error(s)", errors.len());
    ValidationReport::from_errors(errors)
}

fn validate_piece(piece: &Value, index: usize, errors: &mut Vec<String>) {
    let obj = match piece.as_object() {
        Some(obj) => obj,
        None => {
            errors.push(format!("Piece {}: must be a JSON object", index));
            return;
        }
    };

    for field in REQUIRED_PIECE_FIELDS {
        if !obj.contains_key(field) {
            errors.push(format!("Piece {}: Missing required field: {}", index, field));
        }
    }

    if let Some(type_tag) = obj.get("type") {
        if serde_json::from_value::<PieceType>(type_tag.clone()).is_err() {
            errors.push(format!("Piece {}: Invalid type: {}", index, type_tag));
        }
    }

    if let Some(rotation) = obj.get("rotation") {
        let valid = rotation
            .as_u64()
            .and_then(|deg| u16::try_from(deg).ok())
            .and_then(|deg| Rotation::try_from(deg).ok())
            .is_some();
        if !valid {
            errors.push(format!("Piece {}: Invalid rotation: {}", index, rotation));
        }
    }

    if let Some(length) = obj.get("length") {
        if length.as_u64().map(|l| l >= 1) != Some(true) {
            errors.push(format!(
                "Piece {}: Length must be a positive integer, got {}",
                index, length
            ));
        }
    }
}

fn number_field(obj: &serde_json::Map<String, Value>, field: &str) -> Option<f64> {
    obj.get(field).and_then(Value::as_f64)
}
