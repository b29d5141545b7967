//! # GutterTrack I/O
//!
//! Reading and writing track documents as JSON, and a best-effort file
//! store for saved layouts (save/load/list/delete plus export/import to
//! arbitrary paths). Writes carry no atomicity or concurrency guarantees;
//! every operation reports success or failure through a `Result`.

pub mod storage;

pub use storage::{StorageError, TrackFileInfo, TrackStorage};
