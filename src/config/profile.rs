use super::Configuration;
use crate::api::DeviceType;
use eyre::Context;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Identifies one persisted configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{device_type}/{driver_id}")]
pub struct ProfileKey {
    /// Device type of the driver.
    pub device_type: DeviceType,
    /// Identity of the driver instance, e.g. `ascom.remote1.rotator`.
    pub driver_id: String,
}

impl ProfileKey {
    fn file_name(&self) -> String {
        let driver_id = self
            .driver_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>();

        format!("{}-{driver_id}.json", self.device_type)
    }
}

/// Key/value persistence of driver configuration.
///
/// Read once when a driver is constructed and written only after a
/// reconfiguration has fully succeeded.
pub trait ProfileStore: Debug + Send + Sync {
    /// Load the stored record, or `None` if nothing was saved yet.
    fn load(&self, key: &ProfileKey) -> eyre::Result<Option<Configuration>>;

    /// Persist a record, replacing any previous one.
    fn save(&self, key: &ProfileKey, config: &Configuration) -> eyre::Result<()>;
}

/// In-process profile store.
#[derive(Debug, Default)]
pub struct MemoryProfile {
    records: Mutex<HashMap<ProfileKey, Configuration>>,
}

impl MemoryProfile {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfile {
    fn load(&self, key: &ProfileKey) -> eyre::Result<Option<Configuration>> {
        let records = self
            .records
            .lock()
            .map_err(|err| eyre::eyre!("Profile lock poisoned: {err}"))?;
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &ProfileKey, config: &Configuration) -> eyre::Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|err| eyre::eyre!("Profile lock poisoned: {err}"))?;
        let _ = records.insert(key.clone(), config.clone());
        Ok(())
    }
}

/// Profile store keeping one JSON file per driver in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileProfile {
    dir: PathBuf,
}

impl JsonFileProfile {
    /// Use `dir` as the profile directory. It's created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing the given key.
    pub fn path_for(&self, key: &ProfileKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Profile directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ProfileStore for JsonFileProfile {
    #[tracing::instrument(level = "debug", skip(self), fields(dir = %self.dir.display()))]
    fn load(&self, key: &ProfileKey) -> eyre::Result<Option<Configuration>> {
        let path = self.path_for(key);
        let contents = match std::fs::read(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No stored profile, using defaults");
                return Ok(None);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Couldn't read {}", path.display()));
            }
        };
        serde_json::from_slice(&contents)
            .map(Some)
            .with_context(|| format!("Couldn't parse profile {}", path.display()))
    }

    #[tracing::instrument(level = "debug", skip(self, config), fields(dir = %self.dir.display()))]
    fn save(&self, key: &ProfileKey, config: &Configuration) -> eyre::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Couldn't create {}", self.dir.display()))?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        let contents = serde_json::to_vec_pretty(config)?;
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("Couldn't write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("Couldn't replace {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Saved profile");
        Ok(())
    }
}
