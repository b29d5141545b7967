//! # GutterTrack Validate
//!
//! Structural validation of raw track-description JSON before it is turned
//! into a [`guttertrack_core::Track`]: required fields, dimension ranges,
//! the closed piece-type set, and the four permitted rotations.
//!
//! Validation never fails with an error of its own; malformed input always
//! comes back as a [`ValidationReport`] with human-readable messages.

pub mod report;
pub mod rules;

pub use report::ValidationReport;
pub use rules::{validate_dimensions, validate_track};
