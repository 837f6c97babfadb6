use super::{file_stem_for, PlayerStore, Result, StoreError};
use crate::core::game_state::PlayerState;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One pretty-printed JSON file per player.
#[derive(Debug, Clone)]
pub struct JsonPlayerStore {
    dir: PathBuf,
}

impl JsonPlayerStore {
    /// Store under `~/.skillbound/players`.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        Self::with_dir(home_dir.join(".skillbound").join("players"))
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.json", file_stem_for(id)?)))
    }

    fn read(path: &Path) -> Result<PlayerState> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl PlayerStore for JsonPlayerStore {
    fn get(&self, id: &str) -> Result<Option<PlayerState>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let player = Self::read(&path)?;
        if player.id != id {
            return Err(StoreError::Corrupted(format!(
                "{} holds player {:?}",
                path.display(),
                player.id
            )));
        }
        Ok(Some(player))
    }

    fn save(&self, player: &PlayerState) -> Result<()> {
        let path = self.path_for(&player.id)?;
        let json = serde_json::to_string_pretty(player)?;

        // Write then rename so a crash never leaves a half-written save
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();

            // Only process .json files
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match Self::read(&path) {
                Ok(player) => ids.push(player.id),
                Err(error) => warn!(path = %path.display(), %error, "skipping unreadable player file"),
            }
        }

        ids.sort();
        Ok(ids)
    }
}
