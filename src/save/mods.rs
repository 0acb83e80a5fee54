use serde::Serialize;
use tracing::trace;

use crate::codec::{BinaryReader, BinaryWriter, Version};
use crate::error::DecodeResult;

/// Name of the mod that stands for the unmodded game.
pub const BASE_MOD: &str = "base";

/// Smallest encoded mod record: empty name, three one-byte components, checksum.
const MIN_RECORD_LEN: usize = 1 + 3 + 4;

/// Mod entry from the save's mod table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModRecord {
    pub name: String,
    pub version: Version,
    pub checksum: u32,
}

impl ModRecord {
    pub fn read(reader: &mut BinaryReader) -> DecodeResult<Self> {
        Ok(Self {
            name: reader.read_string()?,
            version: Version::read(reader, true)?,
            // Checksums are hashes, never compact
            checksum: reader.read_u32_le()?,
        })
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer.write_string(&self.name);
        writer.write_version(self.version, true);
        writer.write_u32_le(self.checksum);
    }

    pub fn is_base(&self) -> bool {
        self.name == BASE_MOD
    }
}

/// Mods in the order the save lists them
///
/// Duplicated names are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModList {
    mods: Vec<ModRecord>,
}

impl ModList {
    pub fn new(mods: Vec<ModRecord>) -> Self {
        Self { mods }
    }

    /// Read the mod count followed by that many records.
    pub fn read(reader: &mut BinaryReader) -> DecodeResult<Self> {
        let count = reader.read_opt_u32()? as usize;
        let mut mods = Vec::with_capacity(count.min(reader.remaining() / MIN_RECORD_LEN));
        for _ in 0..count {
            let record = ModRecord::read(reader)?;
            trace!(
                name = %record.name,
                version = %record.version,
                checksum = record.checksum,
                "mod"
            );
            mods.push(record);
        }
        Ok(Self { mods })
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModRecord> {
        self.mods.iter()
    }

    /// Mod names in save order, as sent to the combination lookup.
    pub fn names(&self) -> Vec<&str> {
        self.mods.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ModRecord> {
        self.mods.iter().find(|m| m.name == name)
    }

    pub fn base(&self) -> Option<&ModRecord> {
        self.get(BASE_MOD)
    }

    pub fn without_base(&self) -> Self {
        Self {
            mods: self.mods.iter().filter(|m| !m.is_base()).cloned().collect(),
        }
    }

    pub fn as_slice(&self) -> &[ModRecord] {
        &self.mods
    }

    pub fn into_vec(self) -> Vec<ModRecord> {
        self.mods
    }
}

impl IntoIterator for ModList {
    type Item = ModRecord;
    type IntoIter = std::vec::IntoIter<ModRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.mods.into_iter()
    }
}

impl<'a> IntoIterator for &'a ModList {
    type Item = &'a ModRecord;
    type IntoIter = std::slice::Iter<'a, ModRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.mods.iter()
    }
}
