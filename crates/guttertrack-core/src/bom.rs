use serde::{Deserialize, Serialize};

use crate::piece::PieceType;
use crate::track::Track;

/// Round to 2 decimal places for display/money.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregated purchasable quantities for a track layout.
///
/// `straight_feet` sums `length * lane_width / 12` over straight pieces
/// (piece lengths are in grid units, one grid unit per lane width).
/// Connectors use the simplified chain model `max(0, pieces - 1)`; screws
/// use `floor(2 * straight_feet) + 2 * elbows + 3 * tees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bom {
    pub straight_feet: f64,
    pub elbows_22_5: u32,
    pub elbows_45: u32,
    pub elbows_90: u32,
    pub t_junctions: u32,
    pub connectors: u32,
    pub screws: u32,
}

impl Bom {
    /// Reduce the track's piece collection to quantities. Pure function of
    /// the current pieces; recomputed after every structural change.
    pub fn calculate(track: &Track) -> Self {
        let mut straight_feet = 0.0;
        let mut elbows_22_5 = 0;
        let mut elbows_45 = 0;
        let mut elbows_90 = 0;
        let mut t_junctions = 0;

        for piece in track.pieces() {
            match piece.piece_type {
                PieceType::Straight => {
                    straight_feet += piece.length as f64 * track.lane_width / 12.0;
                }
                PieceType::Elbow22 => elbows_22_5 += 1,
                PieceType::Elbow45 => elbows_45 += 1,
                PieceType::Elbow90 => elbows_90 += 1,
                PieceType::Tee => t_junctions += 1,
            }
        }

        let connectors = track.piece_count().saturating_sub(1) as u32;
        let screws = (2.0 * straight_feet).floor() as u32
            + 2 * (elbows_22_5 + elbows_45 + elbows_90)
            + 3 * t_junctions;

        Self {
            straight_feet: round2(straight_feet),
            elbows_22_5,
            elbows_45,
            elbows_90,
            t_junctions,
            connectors,
            screws,
        }
    }

    pub fn elbow_total(&self) -> u32 {
        self.elbows_22_5 + self.elbows_45 + self.elbows_90
    }
}

/// Per-unit prices in dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub straight_foot: f64,
    pub elbow_22_5: f64,
    pub elbow_45: f64,
    pub elbow_90: f64,
    pub t_junction: f64,
    pub connector: f64,
    pub screw: f64,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            straight_foot: 3.50,
            elbow_22_5: 3.99,
            elbow_45: 4.49,
            elbow_90: 4.99,
            t_junction: 7.99,
            connector: 1.99,
            screw: 0.10,
        }
    }
}

/// Cost per BOM category. Line items are rounded to 2 decimals before
/// summing; the total is rounded again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub straight: f64,
    pub elbows_22_5: f64,
    pub elbows_45: f64,
    pub elbows_90: f64,
    pub t_junctions: f64,
    pub connectors: f64,
    pub screws: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn calculate(bom: &Bom, prices: &PriceTable) -> Self {
        let straight = round2(bom.straight_feet * prices.straight_foot);
        let elbows_22_5 = round2(bom.elbows_22_5 as f64 * prices.elbow_22_5);
        let elbows_45 = round2(bom.elbows_45 as f64 * prices.elbow_45);
        let elbows_90 = round2(bom.elbows_90 as f64 * prices.elbow_90);
        let t_junctions = round2(bom.t_junctions as f64 * prices.t_junction);
        let connectors = round2(bom.connectors as f64 * prices.connector);
        let screws = round2(bom.screws as f64 * prices.screw);

        let total = round2(
            straight + elbows_22_5 + elbows_45 + elbows_90 + t_junctions + connectors + screws,
        );

        Self {
            straight,
            elbows_22_5,
            elbows_45,
            elbows_90,
            t_junctions,
            connectors,
            screws,
            total,
        }
    }
}

/// Rough assembly-time estimate derived from the BOM:
/// 15 base minutes, 2 per straight foot, 3 per connector, 1 per elbow,
/// 2 per tee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyEstimate {
    pub total_minutes: f64,
    pub hours: u32,
    pub minutes: u32,
}

impl AssemblyEstimate {
    const BASE_MINUTES: f64 = 15.0;

    pub fn calculate(bom: &Bom) -> Self {
        let total_minutes = Self::BASE_MINUTES
            + 2.0 * bom.straight_feet
            + 3.0 * bom.connectors as f64
            + bom.elbow_total() as f64
            + 2.0 * bom.t_junctions as f64;

        Self {
            total_minutes,
            hours: (total_minutes / 60.0) as u32,
            minutes: (total_minutes % 60.0) as u32,
        }
    }
}

impl std::fmt::Display for AssemblyEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, Rotation};

    fn sample_track() -> Track {
        let mut track = Track::new(8.0, 4.0, 6.0);
        track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 3))
            .unwrap();
        track
            .add_piece(Piece::new(PieceType::Elbow90, 12.0, 12.0, Rotation::R180, 1))
            .unwrap();
        track
            .add_piece(Piece::new(PieceType::Tee, 30.0, 30.0, Rotation::R180, 1))
            .unwrap();
        track
    }

    #[test]
    fn test_bom_quantities() {
        let bom = Bom::calculate(&sample_track());
        // One straight of 3 units at a 6in lane: (3 * 6) / 12 = 1.5 ft.
        assert!((bom.straight_feet - 1.5).abs() < 1e-10);
        assert_eq!(bom.elbows_90, 1);
        assert_eq!(bom.t_junctions, 1);
        assert_eq!(bom.connectors, 2);
        // floor(2 * 1.5) + 2 * 1 + 3 * 1
        assert_eq!(bom.screws, 8);
    }

    #[test]
    fn test_bom_empty_track() {
        let track = Track::new(8.0, 4.0, 6.0);
        let bom = Bom::calculate(&track);
        assert_eq!(bom.connectors, 0);
        assert_eq!(bom.screws, 0);
        assert!((bom.straight_feet - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_bom_is_pure() {
        let track = sample_track();
        assert_eq!(Bom::calculate(&track), Bom::calculate(&track));
    }

    #[test]
    fn test_cost_breakdown() {
        let bom = Bom::calculate(&sample_track());
        let cost = CostBreakdown::calculate(&bom, &PriceTable::default());
        assert!((cost.straight - 5.25).abs() < 1e-10); // 1.5 * 3.50
        assert!((cost.elbows_90 - 4.99).abs() < 1e-10);
        assert!((cost.t_junctions - 7.99).abs() < 1e-10);
        assert!((cost.connectors - 3.98).abs() < 1e-10); // 2 * 1.99
        assert!((cost.screws - 0.80).abs() < 1e-10); // 8 * 0.10
        let expected_total = round2(5.25 + 4.99 + 7.99 + 3.98 + 0.80);
        assert!((cost.total - expected_total).abs() < 1e-10);
    }

    #[test]
    fn test_assembly_estimate() {
        let bom = Bom::calculate(&sample_track());
        let est = AssemblyEstimate::calculate(&bom);
        // 15 + 2*1.5 + 3*2 + 1 + 2 = 27
        assert!((est.total_minutes - 27.0).abs() < 1e-10);
        assert_eq!(est.hours, 0);
        assert_eq!(est.minutes, 27);
        assert_eq!(est.to_string(), "27m");
    }

    #[test]
    fn test_assembly_estimate_display_hours() {
        let est = AssemblyEstimate {
            total_minutes: 65.0,
            hours: 1,
            minutes: 5,
        };
        assert_eq!(est.to_string(), "1h 5m");
    }

    #[test]
    fn test_round2() {
        assert!((round2(1.2344) - 1.23).abs() < 1e-10);
        assert!((round2(1.239) - 1.24).abs() < 1e-10);
        assert!((round2(1.5) - 1.5).abs() < 1e-10);
    }
}
