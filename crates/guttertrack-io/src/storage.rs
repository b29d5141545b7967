use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

use guttertrack_core::Track;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid track document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("track '{0}' not found")]
    TrackNotFound(String),
}

/// A saved track file, for listing in a load dialog.
#[derive(Debug, Clone, Serialize)]
pub struct TrackFileInfo {
    pub name: String,
    pub path: PathBuf,
    /// Last modification time as seconds since the Unix epoch.
    pub modified: u64,
}

/// File store for track layouts, rooted at a caller-supplied directory.
///
/// Filenames always get a `.json` extension; a save without an explicit
/// name generates a timestamped one. Best effort only: a failed write
/// leaves whatever the filesystem left behind.
pub struct TrackStorage {
    data_dir: PathBuf,
}

impl TrackStorage {
    /// Open a store at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Save a track, returning the filename used.
    pub fn save_track(&self, track: &Track, name: Option<&str>) -> Result<String, StorageError> {
        let filename = match name {
            Some(name) => ensure_json_extension(name),
            None => {
                let epoch = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("track_{}.json", epoch)
            }
        };

        let json = track.to_json()?;
        let path = self.data_dir.join(&filename);
        fs::write(&path, json)?;
        log::info!("saved track to {}", path.display());
        Ok(filename)
    }

    pub fn load_track(&self, name: &str) -> Result<Track, StorageError> {
        let path = self.data_dir.join(ensure_json_extension(name));
        if !path.exists() {
            return Err(StorageError::TrackNotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        let track = Track::from_json(&json)?;
        log::info!(
            "loaded track from {} ({} pieces)",
            path.display(),
            track.piece_count()
        );
        Ok(track)
    }

    /// All saved tracks, newest first.
    pub fn list_tracks(&self) -> Result<Vec<TrackFileInfo>, StorageError> {
        let mut tracks = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let modified = entry
                .metadata()?
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0);
            tracks.push(TrackFileInfo {
                name,
                path,
                modified,
            });
        }

        tracks.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(tracks)
    }

    pub fn delete_track(&self, name: &str) -> Result<(), StorageError> {
        let path = self.data_dir.join(ensure_json_extension(name));
        if !path.exists() {
            return Err(StorageError::TrackNotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        log::info!("deleted track {}", name);
        Ok(())
    }

    /// Write a pretty-printed copy of the track to an arbitrary path.
    pub fn export_track(&self, track: &Track, path: &Path) -> Result<PathBuf, StorageError> {
        let path = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            path.to_path_buf()
        } else {
            path.with_extension("json")
        };
        fs::write(&path, track.to_json()?)?;
        Ok(path)
    }

    /// Load a track from an arbitrary path and copy it into the store.
    pub fn import_track(&self, path: &Path) -> Result<Track, StorageError> {
        let json = fs::read_to_string(path)?;
        let track = Track::from_json(&json)?;

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            self.save_track(&track, Some(name))?;
        }
        Ok(track)
    }
}

fn ensure_json_extension(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}
