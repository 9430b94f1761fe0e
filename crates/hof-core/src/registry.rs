use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::{
    domain::{ChannelId, GuildId},
    errors::Error,
    Result,
};

/// Durable key-value backing for the guild to destination-channel map.
///
/// Injectable so the registry contract stays testable without disk and the
/// file store stays swappable for an external one.
pub trait DestinationStore: Send + Sync {
    fn load(&self) -> Result<HashMap<String, String>>;
    fn save(&self, map: &HashMap<String, String>) -> Result<()>;
}

/// Flat JSON object on disk, keyed by guild id string.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DestinationStore for JsonFileStore {
    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let txt = fs::read_to_string(&self.path)
            .map_err(|e| Error::StorageRead(format!("{}: {e}", self.path.display())))?;
        if txt.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&txt)
            .map_err(|e| Error::StorageRead(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, map: &HashMap<String, String>) -> Result<()> {
        let txt = serde_json::to_string_pretty(map)
            .map_err(|e| Error::StorageWrite(e.to_string()))?;
        fs::write(&self.path, txt)
            .map_err(|e| Error::StorageWrite(format!("{}: {e}", self.path.display())))
    }
}

/// At most one destination channel per guild; an absent entry means unset.
///
/// Every call re-reads or rewrites the full store. Call volume is low
/// (human-triggered commands), and reads after a successful write always
/// observe the write.
pub struct ChannelRegistry {
    store: Box<dyn DestinationStore>,
}

impl ChannelRegistry {
    pub fn new(store: Box<dyn DestinationStore>) -> Self {
        Self { store }
    }

    pub fn destination(&self, guild: GuildId) -> Result<Option<ChannelId>> {
        let map = self.store.load()?;
        let Some(raw) = map.get(&guild.to_string()) else {
            return Ok(None);
        };
        let id = raw.parse::<u64>().map_err(|_| {
            Error::StorageRead(format!("invalid channel id {raw:?} for guild {guild}"))
        })?;
        Ok(Some(ChannelId(id)))
    }

    pub fn set_destination(&self, guild: GuildId, channel: ChannelId) -> Result<()> {
        let mut map = self.store.load()?;
        map.insert(guild.to_string(), channel.to_string());
        self.store.save(&map)
    }
}
