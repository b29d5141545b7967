//! # GutterTrack Planner
//!
//! The layer a UI talks to: a [`Session`] that owns the current track and
//! publishes change notifications, a deferred task queue for sequencing
//! dialog callbacks, and the raw-JSON boundary functions (`calculate_bom`,
//! `estimate_assembly_time`) consumed by the frontend and the CLI.
//!
//! Piece and track data live entirely in `guttertrack-core` models; nothing
//! here holds domain state inside a widget.

pub mod api;
pub mod defer;
pub mod session;

pub use api::{calculate_bom, estimate_assembly_time, parse_track, ApiError, BomResponse};
pub use defer::DeferredQueue;
pub use session::{Session, SessionError, SessionEvent};
