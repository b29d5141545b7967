use serde::{Deserialize, Serialize};

/// A discrete grid position. One cell is `lane_width` inches on a side.
///
/// Coordinates are signed so that footprints can be computed before the
/// bounds check; anything outside `[0, grid_width) x [0, grid_height)` is
/// rejected at placement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn offset(&self, dc: i32, dr: i32) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// An imperial length as a feet + inches pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub feet: u32,
    pub inches: f64,
}

impl Length {
    pub fn new(feet: u32, inches: f64) -> Self {
        Self { feet, inches }
    }

    pub fn total_inches(&self) -> f64 {
        self.feet as f64 * 12.0 + self.inches
    }

    pub fn from_inches(inches: f64) -> Self {
        let feet = (inches / 12.0).floor() as u32;
        let remaining = (inches % 12.0 * 10.0).round() / 10.0;
        Self {
            feet,
            inches: remaining,
        }
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}' {}\"", self.feet, self.inches)
    }
}

/// Snap a coordinate to the nearest grid point.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_total_inches() {
        let l = Length::new(8, 6.0);
        assert!((l.total_inches() - 102.0).abs() < 1e-10);
    }

    #[test]
    fn test_length_from_inches() {
        let l = Length::from_inches(102.0);
        assert_eq!(l.feet, 8);
        assert!((l.inches - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_length_display() {
        assert_eq!(Length::new(3, 6.0).to_string(), "3' 6\"");
    }

    #[test]
    fn test_snap_to_grid() {
        assert!((snap_to_grid(13.2, 6.0) - 12.0).abs() < 1e-10);
        assert!((snap_to_grid(15.1, 6.0) - 18.0).abs() < 1e-10);
        assert!((snap_to_grid(-2.9, 6.0) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_cell_offset() {
        let c = GridCell::new(2, 3);
        assert_eq!(c.offset(-1, 1), GridCell::new(1, 4));
    }
}
