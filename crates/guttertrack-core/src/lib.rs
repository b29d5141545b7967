//! # GutterTrack Core
//!
//! Track layout model for the modular RC-car gutter track planner:
//! piece types and grid occupancy, the track container with collision and
//! bounds checking, and bill-of-materials aggregation with cost and
//! assembly-time estimates.
//!
//! This crate is the heart of the GutterTrack planner; everything UI-facing
//! lives in `guttertrack-planner`.

pub mod geometry;
pub mod piece;
pub mod track;
pub mod bom;

pub use geometry::{GridCell, Length};
pub use piece::{Piece, PieceId, PieceType, Rotation};
pub use track::{PlacementError, Track};
pub use bom::{AssemblyEstimate, Bom, CostBreakdown, PriceTable};
