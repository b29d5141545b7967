use thiserror::Error;

use guttertrack_core::{
    AssemblyEstimate, Bom, CostBreakdown, Piece, PieceId, PlacementError, PriceTable, Rotation,
    Track,
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no track has been created yet")]
    NoTrack,

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("invalid track document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A structural change to the session's track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    TrackReplaced,
    PieceAdded(PieceId),
    PieceRemoved(PieceId),
    PieceChanged(PieceId),
}

type Listener = Box<dyn Fn(&SessionEvent)>;

/// Owns the current track and gates every mutation through the core
/// placement checks. The presentation layer subscribes for change
/// notifications instead of keeping model fields of its own.
///
/// Single-threaded by design: all mutations happen synchronously inside
/// one input-event handler at a time.
#[derive(Default)]
pub struct Session {
    track: Option<Track>,
    listeners: Vec<Listener>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current track with a fresh, empty one.
    pub fn new_track(&mut self, width: f64, depth: f64, lane_width: f64) {
        log::info!(
            "new track: {}ft x {}ft, {}in lanes",
            width,
            depth,
            lane_width
        );
        self.track = Some(Track::new(width, depth, lane_width));
        self.notify(SessionEvent::TrackReplaced);
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), SessionError> {
        let track = Track::from_json(json)?;
        self.track = Some(track);
        self.notify(SessionEvent::TrackReplaced);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(self.track()?.to_json()?)
    }

    pub fn track(&self) -> Result<&Track, SessionError> {
        self.track.as_ref().ok_or(SessionError::NoTrack)
    }

    pub fn has_track(&self) -> bool {
        self.track.is_some()
    }

    /// Register a change listener. Fired after every committed mutation.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    // ── Piece operations ─────────────────────────────────────────────

    pub fn place_piece(&mut self, piece: Piece) -> Result<PieceId, SessionError> {
        let id = self.track_mut()?.add_piece(piece)?;
        self.notify(SessionEvent::PieceAdded(id));
        Ok(id)
    }

    pub fn remove_piece(&mut self, id: PieceId) -> Result<(), SessionError> {
        self.track_mut()?.remove_piece(id)?;
        self.notify(SessionEvent::PieceRemoved(id));
        Ok(())
    }

    pub fn move_piece(&mut self, id: PieceId, x: f64, y: f64) -> Result<(), SessionError> {
        self.track_mut()?.move_piece(id, x, y)?;
        self.notify(SessionEvent::PieceChanged(id));
        Ok(())
    }

    pub fn rotate_piece(&mut self, id: PieceId, clockwise: bool) -> Result<(), SessionError> {
        self.track_mut()?.rotate_piece(id, clockwise)?;
        self.notify(SessionEvent::PieceChanged(id));
        Ok(())
    }

    pub fn set_rotation(&mut self, id: PieceId, rotation: Rotation) -> Result<(), SessionError> {
        self.track_mut()?.set_rotation(id, rotation)?;
        self.notify(SessionEvent::PieceChanged(id));
        Ok(())
    }

    pub fn set_length(&mut self, id: PieceId, length: u32) -> Result<(), SessionError> {
        self.track_mut()?.set_length(id, length)?;
        self.notify(SessionEvent::PieceChanged(id));
        Ok(())
    }

    pub fn flip_piece(&mut self, id: PieceId) -> Result<(), SessionError> {
        self.track_mut()?.flip_piece(id)?;
        self.notify(SessionEvent::PieceChanged(id));
        Ok(())
    }

    // ── Derived views ────────────────────────────────────────────────

    pub fn bom(&self) -> Result<Bom, SessionError> {
        Ok(Bom::calculate(self.track()?))
    }

    pub fn cost(&self, prices: &PriceTable) -> Result<CostBreakdown, SessionError> {
        Ok(CostBreakdown::calculate(&self.bom()?, prices))
    }

    pub fn assembly_estimate(&self) -> Result<AssemblyEstimate, SessionError> {
        Ok(AssemblyEstimate::calculate(&self.bom()?))
    }

    fn track_mut(&mut self) -> Result<&mut Track, SessionError> {
        self.track.as_mut().ok_or(SessionError::NoTrack)
    }

    fn notify(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}
