use super::{file_stem_for, PlayerStore, Result, StoreError};
use crate::core::constants::SAVE_VERSION_MAGIC;
use crate::core::game_state::PlayerState;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

const SAVE_EXTENSION: &str = "sav";
const HEADER_LEN: usize = 8 + 4;
const CHECKSUM_LEN: usize = 32;

/// Checksummed binary saves, one file per player.
///
/// File format:
/// - Version magic (8 bytes)
/// - Data length (4 bytes)
/// - Serialized player state (variable length)
/// - SHA256 checksum over everything before it (32 bytes)
#[derive(Debug, Clone)]
pub struct SnapshotPlayerStore {
    dir: PathBuf,
}

impl SnapshotPlayerStore {
    /// Store in the platform data directory.
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "skillbound").ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine data directory",
            )
        })?;
        Self::with_dir(project_dirs.data_dir().join("saves"))
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
        Ok(self
            .dir
            .join(format!("{}.{}", file_stem_for(id)?, SAVE_EXTENSION)))
    }

    fn read(path: &Path) -> Result<PlayerState> {
        decode(&fs::read(path)?)
    }
}

/// Serializes a player into the snapshot format.
pub fn encode(player: &PlayerState) -> Result<Vec<u8>> {
    let data = bincode::serialize(player).map_err(|e| StoreError::Encoding(e.to_string()))?;
    let data_len = u32::try_from(data.len())
        .map_err(|_| StoreError::Encoding(format!("save of {} bytes is too large", data.len())))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + data.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(&SAVE_VERSION_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.extend_from_slice(&data);

    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

/// Parses and verifies a snapshot.
///
/// Fails on a wrong version magic, a length that does not match the file,
/// a checksum mismatch or a payload that does not deserialize.
pub fn decode(bytes: &[u8]) -> Result<PlayerState> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(StoreError::Corrupted(format!(
            "save is only {} bytes",
            bytes.len()
        )));
    }

    let (version_bytes, rest) = bytes.split_at(8);
    let mut magic = [0u8; 8];
    magic.copy_from_slice(version_bytes);
    let version = u64::from_le_bytes(magic);
    if version != SAVE_VERSION_MAGIC {
        return Err(StoreError::Corrupted(format!(
            "Invalid save version: expected 0x{:016X}, got 0x{:016X}",
            SAVE_VERSION_MAGIC, version
        )));
    }

    let (length_bytes, rest) = rest.split_at(4);
    let mut length = [0u8; 4];
    length.copy_from_slice(length_bytes);
    let data_len = u32::from_le_bytes(length) as usize;
    if rest.len() != data_len + CHECKSUM_LEN {
        return Err(StoreError::Corrupted(format!(
            "declared length {} does not match file",
            data_len
        )));
    }

    let (data, stored_checksum) = rest.split_at(data_len);
    let computed_checksum = Sha256::digest(&bytes[..HEADER_LEN + data_len]);
    if stored_checksum != computed_checksum.as_slice() {
        return Err(StoreError::Corrupted(
            "Checksum verification failed".to_string(),
        ));
    }

    bincode::deserialize(data).map_err(|e| StoreError::Encoding(e.to_string()))
}

impl PlayerStore for SnapshotPlayerStore {
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
        let bytes = encode(player)?;

        let tmp = path.with_extension("sav.tmp");
        fs::write(&tmp, bytes)?;
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
            if path.extension().and_then(|s| s.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            match Self::read(&path) {
                Ok(player) => ids.push(player.id),
                Err(error) => warn!(path = %path.display(), %error, "skipping unreadable save"),
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::combat::types::Enemy;
    use crate::skills::types::SkillId;
    use tempfile::TempDir;

    fn player(id: &str) -> PlayerState {
        let catalog = StaticCatalog::standard();
        let mut player = PlayerState::new(id.to_string(), 1_234_567, &catalog);
        player.gold = 77;
        player.skill_mut(SkillId::Fishing).unwrap().is_active = true;
        player.skill_mut(SkillId::Fishing).unwrap().action_progress_ms = 1_500;
        player.combat.is_fighting = true;
        player.combat.current_enemy = Some(Enemy::new("goblin", "Goblin", 5, 3, 20));
        player.combat.pending_ms = 700;
        player
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let original = player("hero");
        let bytes = encode(&original).unwrap();
        assert_eq!(&bytes[..8], &SAVE_VERSION_MAGIC.to_le_bytes());
        assert_eq!(decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_flipped_byte_fails_checksum() {
        let mut bytes = encode(&player("hero")).unwrap();
        let middle = HEADER_LEN + 3;
        bytes[middle] ^= 0xFF;
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("Checksum"));
    }

    #[test]
    fn test_wrong_magic_is_rejected() {
        let mut bytes = encode(&player("hero")).unwrap();
        bytes[0] ^= 0x01;
        assert!(matches!(decode(&bytes), Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn test_truncated_save_is_rejected() {
        let bytes = encode(&player("hero")).unwrap();
        assert!(decode(&bytes[..bytes.len() - 1]).is_err());
        assert!(decode(&bytes[..10]).is_err());
    }

    #[test]
    fn test_store_round_trip_and_listing() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotPlayerStore::with_dir(dir.path()).unwrap();

        store.save(&player("zed")).unwrap();
        store.save(&player("amy")).unwrap();
        fs::write(dir.path().join("junk.sav"), b"nope").unwrap();

        assert_eq!(store.get("amy").unwrap().unwrap(), player("amy"));
        assert!(store.get("bob").unwrap().is_none());
        assert_eq!(store.list_ids().unwrap(), vec!["amy", "zed"]);

        assert!(store.delete("zed").unwrap());
        assert_eq!(store.list_ids().unwrap(), vec!["amy"]);
    }
}
