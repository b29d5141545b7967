use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::GridCell;

/// Unique piece identifier. Placement self-exclusion and mutation
/// addressing go through this id, never through value equality.
pub type PieceId = Uuid;

/// The closed set of track piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    #[serde(rename = "straight")]
    Straight,
    #[serde(rename = "elbow_22_5")]
    Elbow22,
    #[serde(rename = "elbow_45")]
    Elbow45,
    #[serde(rename = "elbow_90")]
    Elbow90,
    #[serde(rename = "t_junction")]
    Tee,
}

/// Piece orientation, quantized to right angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Step by 90 degrees, clockwise or counter-clockwise.
    pub fn stepped(&self, clockwise: bool) -> Self {
        let delta = if clockwise { 90 } else { 270 };
        match (self.degrees() + delta) % 360 {
            0 => Rotation::R0,
            90 => Rotation::R90,
            180 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    /// True for 0 and 180 degrees.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Rotation::R0 | Rotation::R180)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            other => Err(format!(
                "invalid rotation {} (must be 0, 90, 180 or 270)",
                other
            )),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.degrees()
    }
}

/// A placed track piece.
///
/// `x` and `y` are real coordinates on the track surface; the base grid
/// cell is derived by flooring against the cell size. `length` is in grid
/// units and only meaningful for straight pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    #[serde(default = "Uuid::new_v4")]
    pub id: PieceId,
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    pub x: f64,
    pub y: f64,
    pub rotation: Rotation,
    pub length: u32,
    #[serde(default)]
    pub flipped: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, x: f64, y: f64, rotation: Rotation, length: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            piece_type,
            x,
            y,
            rotation,
            // Length only applies to straight runs.
            length: if piece_type == PieceType::Straight {
                length.max(1)
            } else {
                1
            },
            flipped: false,
        }
    }

    /// The cell containing the piece's anchor point.
    pub fn base_cell(&self, cell_size: f64) -> GridCell {
        GridCell::new(
            (self.x / cell_size).floor() as i32,
            (self.y / cell_size).floor() as i32,
        )
    }

    /// The set of grid cells this piece covers.
    ///
    /// Pure and deterministic. Straight runs extend in +x when horizontal
    /// and +y when vertical regardless of the 180/270 flip of direction;
    /// the footprint is direction-agnostic. A 22.5-degree elbow covers only
    /// its base cell, narrower than the other elbow types.
    pub fn occupied_cells(&self, cell_size: f64) -> HashSet<GridCell> {
        let base = self.base_cell(cell_size);
        let mut cells = HashSet::new();
        cells.insert(base);

        match self.piece_type {
            PieceType::Straight => {
                for i in 1..self.length as i32 {
                    if self.rotation.is_horizontal() {
                        cells.insert(base.offset(i, 0));
                    } else {
                        cells.insert(base.offset(0, i));
                    }
                }
            }
            PieceType::Elbow45 | PieceType::Elbow90 => {
                let (dc, dr) = match self.rotation {
                    Rotation::R0 => (1, 1),
                    Rotation::R90 => (-1, 1),
                    Rotation::R180 => (-1, -1),
                    Rotation::R270 => (1, -1),
                };
                cells.insert(base.offset(dc, dr));
            }
            PieceType::Tee => {
                // Two arm cells plus the stem cell, rotated around the
                // junction point.
                let neighbors: [(i32, i32); 3] = match self.rotation {
                    Rotation::R0 => [(-1, 0), (1, 0), (0, 1)],
                    Rotation::R90 => [(0, -1), (0, 1), (-1, 0)],
                    Rotation::R180 => [(-1, 0), (1, 0), (0, -1)],
                    Rotation::R270 => [(0, -1), (0, 1), (1, 0)],
                };
                for (dc, dr) in neighbors {
                    cells.insert(base.offset(dc, dr));
                }
            }
            PieceType::Elbow22 => {}
        }

        cells
    }
}
