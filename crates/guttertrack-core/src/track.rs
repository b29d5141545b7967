use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GridCell;
use crate::piece::{Piece, PieceId, PieceType, Rotation};

/// Why a placement or mutation was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("cell {cell} is outside the {grid_width}x{grid_height} grid")]
    OutOfBounds {
        cell: GridCell,
        grid_width: i32,
        grid_height: i32,
    },

    #[error("cell {cell} is already occupied")]
    Overlap { cell: GridCell },

    #[error("piece {0} not found")]
    PieceNotFound(PieceId),
}

/// The track layout surface: physical dimensions plus the ordered set of
/// placed pieces.
///
/// `width` and `depth` are in feet, `lane_width` in inches; the lane width
/// doubles as the grid cell size. All mutations are validated against the
/// proposed geometry before committing, so after any successful operation
/// every piece is in bounds and no two pieces share a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub width: f64,
    pub depth: f64,
    pub lane_width: f64,
    pieces: Vec<Piece>,
}

impl Track {
    pub fn new(width: f64, depth: f64, lane_width: f64) -> Self {
        Self {
            width,
            depth,
            lane_width,
            pieces: Vec::new(),
        }
    }

    /// Number of grid columns.
    pub fn grid_width(&self) -> i32 {
        (self.width * 12.0 / self.lane_width).floor() as i32
    }

    /// Number of grid rows.
    pub fn grid_height(&self) -> i32 {
        (self.depth * 12.0 / self.lane_width).floor() as i32
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn get_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Check whether `piece` fits: every occupied cell in bounds and no
    /// overlap with any *other* placed piece. A piece being re-validated
    /// after a property change is excluded from the overlap check by id.
    pub fn check_placement(&self, piece: &Piece) -> Result<(), PlacementError> {
        let cells = piece.occupied_cells(self.lane_width);
        let (gw, gh) = (self.grid_width(), self.grid_height());

        for cell in &cells {
            if cell.col < 0 || cell.col >= gw || cell.row < 0 || cell.row >= gh {
                return Err(PlacementError::OutOfBounds {
                    cell: *cell,
                    grid_width: gw,
                    grid_height: gh,
                });
            }
        }

        for existing in &self.pieces {
            if existing.id == piece.id {
                continue;
            }
            let existing_cells = existing.occupied_cells(self.lane_width);
            if let Some(cell) = cells.intersection(&existing_cells).next() {
                return Err(PlacementError::Overlap { cell: *cell });
            }
        }

        Ok(())
    }

    pub fn can_place(&self, piece: &Piece) -> bool {
        self.check_placement(piece).is_ok()
    }

    /// Validate-before-insert: the piece is appended only if it fits.
    pub fn add_piece(&mut self, piece: Piece) -> Result<PieceId, PlacementError> {
        self.check_placement(&piece)?;
        let id = piece.id;
        log::debug!(
            "placed {:?} at ({}, {}) rotation {}",
            piece.piece_type,
            piece.x,
            piece.y,
            piece.rotation.degrees()
        );
        self.pieces.push(piece);
        Ok(id)
    }

    /// Remove by identity.
    pub fn remove_piece(&mut self, id: PieceId) -> Result<Piece, PlacementError> {
        match self.pieces.iter().position(|p| p.id == id) {
            Some(index) => Ok(self.pieces.remove(index)),
            None => Err(PlacementError::PieceNotFound(id)),
        }
    }

    /// The first piece (in insertion order) whose footprint covers the cell.
    pub fn piece_at(&self, col: i32, row: i32) -> Option<&Piece> {
        let target = GridCell::new(col, row);
        self.pieces
            .iter()
            .find(|p| p.occupied_cells(self.lane_width).contains(&target))
    }

    /// Move a piece to a new anchor position.
    pub fn move_piece(&mut self, id: PieceId, x: f64, y: f64) -> Result<(), PlacementError> {
        self.mutate_piece(id, |p| {
            p.x = x;
            p.y = y;
        })
    }

    /// Set a piece's rotation.
    pub fn set_rotation(&mut self, id: PieceId, rotation: Rotation) -> Result<(), PlacementError> {
        self.mutate_piece(id, |p| p.rotation = rotation)
    }

    /// Rotate a piece by one 90-degree step.
    pub fn rotate_piece(&mut self, id: PieceId, clockwise: bool) -> Result<(), PlacementError> {
        self.mutate_piece(id, |p| p.rotation = p.rotation.stepped(clockwise))
    }

    /// Set a straight piece's length in grid units. Ignored (clamped to 1)
    /// for other piece types.
    pub fn set_length(&mut self, id: PieceId, length: u32) -> Result<(), PlacementError> {
        self.mutate_piece(id, |p| {
            p.length = if p.piece_type == PieceType::Straight {
                length.max(1)
            } else {
                1
            };
        })
    }

    /// Toggle a piece's mirror flag. The footprint is unaffected, but the
    /// change goes through the same validate-then-commit path as every
    /// other mutation.
    pub fn flip_piece(&mut self, id: PieceId) -> Result<(), PlacementError> {
        self.mutate_piece(id, |p| p.flipped = !p.flipped)
    }

    /// Apply `change` to a candidate copy, re-validate the proposed
    /// geometry, and commit only on success. On failure the stored piece
    /// is untouched.
    fn mutate_piece<F>(&mut self, id: PieceId, change: F) -> Result<(), PlacementError>
    where
        F: FnOnce(&mut Piece),
    {
        let index = self
            .pieces
            .iter()
            .position(|p| p.id == id)
            .ok_or(PlacementError::PieceNotFound(id))?;

        let mut candidate = self.pieces[index].clone();
        change(&mut candidate);
        self.check_placement(&candidate)?;
        self.pieces[index] = candidate;
        Ok(())
    }

    /// All cells currently covered by placed pieces.
    pub fn occupied_cells(&self) -> HashSet<GridCell> {
        self.pieces
            .iter()
            .flat_map(|p| p.occupied_cells(self.lane_width))
            .collect()
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a track document. Piece lengths are re-clamped so that loaded
    /// documents satisfy the same invariant as constructed pieces.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut track: Track = serde_json::from_str(json)?;
        for piece in &mut track.pieces {
            piece.length = if piece.piece_type == PieceType::Straight {
                piece.length.max(1)
            } else {
                1
            };
        }
        Ok(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_track() -> Track {
        // 8ft x 4ft at a 6in lane: 16 x 8 grid.
        Track::new(8.0, 4.0, 6.0)
    }

    #[test]
    fn test_grid_dimensions() {
        let track = test_track();
        assert_eq!(track.grid_width(), 16);
        assert_eq!(track.grid_height(), 8);
    }

    #[test]
    fn test_add_straight_at_origin() {
        let mut track = test_track();
        let piece = Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 3);
        let cells = piece.occupied_cells(track.lane_width);
        track.add_piece(piece).unwrap();
        let expected: HashSet<_> = [
            GridCell::new(0, 0),
            GridCell::new(1, 0),
            GridCell::new(2, 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(cells, expected);
        assert_eq!(track.piece_count(), 1);
    }

    #[test]
    fn test_overlap_rejected() {
        let mut track = test_track();
        track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 3))
            .unwrap();

        // Second piece landing on cell (1,0) must be rejected.
        let overlapping = Piece::new(PieceType::Straight, 6.0, 0.0, Rotation::R0, 1);
        let err = track.add_piece(overlapping).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Overlap {
                cell: GridCell::new(1, 0)
            }
        );
        assert_eq!(track.piece_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut track = test_track();
        let piece = Piece::new(PieceType::Straight, 90.0, 0.0, Rotation::R0, 2);
        assert!(matches!(
            track.add_piece(piece),
            Err(PlacementError::OutOfBounds { .. })
        ));
        assert_eq!(track.piece_count(), 0);
    }

    #[test]
    fn test_no_shared_cells_after_adds() {
        let mut track = test_track();
        track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 3))
            .unwrap();
        track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 12.0, Rotation::R0, 3))
            .unwrap();
        track
            .add_piece(Piece::new(PieceType::Elbow90, 30.0, 24.0, Rotation::R0, 1))
            .unwrap();

        let total: usize = track
            .pieces()
            .iter()
            .map(|p| p.occupied_cells(track.lane_width).len())
            .sum();
        assert_eq!(track.occupied_cells().len(), total);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut track = test_track();
        let id = track
            .add_piece(Piece::new(PieceType::Tee, 12.0, 12.0, Rotation::R0, 1))
            .unwrap();
        assert!(track.remove_piece(id).is_ok());
        assert_eq!(track.piece_count(), 0);
        assert_eq!(
            track.remove_piece(id),
            Err(PlacementError::PieceNotFound(id))
        );
    }

    #[test]
    fn test_piece_at_insertion_order() {
        let mut track = test_track();
        let first = track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 2))
            .unwrap();
        assert_eq!(track.piece_at(1, 0).map(|p| p.id), Some(first));
        assert!(track.piece_at(5, 5).is_none());
    }

    #[test]
    fn test_rejected_rotation_keeps_prior_state() {
        let mut track = test_track();
        // Elbow at (2,2) with diagonal (3,3) when rotated to 0.
        let elbow = track
            .add_piece(Piece::new(PieceType::Elbow90, 12.0, 12.0, Rotation::R180, 1))
            .unwrap();
        // Block cell (3,3).
        track
            .add_piece(Piece::new(PieceType::Straight, 18.0, 18.0, Rotation::R0, 1))
            .unwrap();

        let err = track.set_rotation(elbow, Rotation::R0).unwrap_err();
        assert!(matches!(err, PlacementError::Overlap { .. }));
        assert_eq!(track.get_piece(elbow).unwrap().rotation, Rotation::R180);
    }

    #[test]
    fn test_rejected_move_keeps_prior_state() {
        let mut track = test_track();
        let id = track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 2))
            .unwrap();
        assert!(track.move_piece(id, 200.0, 0.0).is_err());
        let piece = track.get_piece(id).unwrap();
        assert!((piece.x - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_set_length_revalidates() {
        let mut track = test_track();
        let id = track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 2))
            .unwrap();
        // Blocking piece at (4,0).
        track
            .add_piece(Piece::new(PieceType::Straight, 24.0, 0.0, Rotation::R0, 1))
            .unwrap();

        // Growing to 4 still fits (cells 0..=3); 5 would hit the blocker.
        track.set_length(id, 4).unwrap();
        assert!(track.set_length(id, 5).is_err());
        assert_eq!(track.get_piece(id).unwrap().length, 4);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut track = test_track();
        track
            .add_piece(Piece::new(PieceType::Straight, 0.0, 0.0, Rotation::R0, 3))
            .unwrap();
        track
            .add_piece(Piece::new(PieceType::Elbow45, 12.0, 12.0, Rotation::R90, 1))
            .unwrap();

        let json = track.to_json().unwrap();
        let restored = Track::from_json(&json).unwrap();
        assert!((restored.width - track.width).abs() < 1e-10);
        assert!((restored.depth - track.depth).abs() < 1e-10);
        assert!((restored.lane_width - track.lane_width).abs() < 1e-10);
        assert_eq!(restored.pieces(), track.pieces());
    }

    #[test]
    fn test_from_json_clamps_lengths() {
        let json = r#"{
            "width": 8.0, "depth": 4.0, "lane_width": 6.0,
            "pieces": [
                {"type": "elbow_90", "x": 0.0, "y": 0.0, "rotation": 0, "length": 7}
            ]
        }"#;
        let track = Track::from_json(json).unwrap();
        assert_eq!(track.pieces()[0].length, 1);
    }
}
