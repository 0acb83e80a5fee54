//! Save archive reading: `level.dat` extraction, header walk and mod table

pub mod archive;
pub mod header;
pub mod mods;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::Path;

use tracing::{debug, warn};

use crate::codec::{BinaryReader, Version, DEFAULT_MAX_STRING_LEN};
use crate::error::{Error, Result};

pub use archive::{extract_level_dat, LevelDat, DEFAULT_MAX_LEVEL_DAT_SIZE};
pub use header::skip_header;
pub use mods::{ModList, ModRecord, BASE_MOD};

/// Oldest save format this reader understands.
pub const MINIMUM_VERSION: Version = Version::new(0, 18, 0);

#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Saves older than this are rejected (inclusive)
    pub minimum_version: Version,
    pub max_string_len: usize,
    /// Upper bound on the decoded `level.dat` size
    pub max_level_dat_size: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            minimum_version: MINIMUM_VERSION,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_level_dat_size: DEFAULT_MAX_LEVEL_DAT_SIZE,
        }
    }
}

/// Builder for [`SaveReader`]
#[derive(Debug, Clone, Default)]
pub struct SaveReaderBuilder {
    config: ReaderConfig,
}

impl SaveReaderBuilder {
    pub fn minimum_version(mut self, version: Version) -> Self {
        self.config.minimum_version = version;
        self
    }

    pub fn max_string_len(mut self, max: usize) -> Self {
        self.config.max_string_len = max;
        self
    }

    pub fn max_level_dat_size(mut self, max: u64) -> Self {
        self.config.max_level_dat_size = max;
        self
    }

    pub fn build(self) -> SaveReader {
        SaveReader { config: self.config }
    }
}

/// Reads the mod list out of Factorio save archives
///
/// Holds configuration only; every call decodes into its own buffer, so a
/// single reader can serve concurrent reads.
#[derive(Debug, Clone, Default)]
pub struct SaveReader {
    config: ReaderConfig,
}

impl SaveReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SaveReaderBuilder {
        SaveReaderBuilder::default()
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read the mod list from the bytes of a save archive (zip).
    pub fn read(&self, data: &[u8]) -> Result<ModList> {
        let level_dat = extract_level_dat(data, self.config.max_level_dat_size)?;
        self.decode_level_dat(level_dat)
    }

    /// Decode an already extracted `level.dat` buffer.
    pub fn decode_level_dat(&self, level_dat: Vec<u8>) -> Result<ModList> {
        let mut reader =
            BinaryReader::new(level_dat).with_max_string_len(self.config.max_string_len);

        let version = Version::read(&mut reader, false)?;
        debug!(%version, "save format version");
        if version < self.config.minimum_version {
            warn!(%version, minimum = %self.config.minimum_version, "unsupported save version");
            return Err(Error::UnsupportedVersion {
                version,
                minimum: self.config.minimum_version,
            });
        }

        skip_header(&mut reader)?;
        let mods = ModList::read(&mut reader)?;
        debug!(count = mods.len(), "mod table decoded");
        Ok(mods)
    }

    /// Like [`read`](Self::read), on tokio's blocking pool.
    pub async fn read_owned(&self, data: Vec<u8>) -> Result<ModList> {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read(&data)).await?
    }

    /// Load a save from disk and read its mod list.
    pub async fn read_path(&self, path: impl AsRef<Path>) -> Result<ModList> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        debug!(path = %path.display(), size = data.len(), "save loaded");
        self.read_owned(data).await
    }
}

/// Read a save archive with the default configuration.
pub fn read_mods(data: &[u8]) -> Result<ModList> {
    SaveReader::new().read(data)
}

/// Load and read a save file with the default configuration.
pub async fn read_mods_from_path(path: impl AsRef<Path>) -> Result<ModList> {
    SaveReader::new().read_path(path).await
}
