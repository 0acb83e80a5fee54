use std::io::{Cursor, Read};

use flate2::read::DeflateDecoder;
use tracing::debug;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// Default cap on the decoded size of `level.dat`.
pub const DEFAULT_MAX_LEVEL_DAT_SIZE: u64 = 256 * 1024 * 1024;

/// Upper bound on the up-front allocation for the decoded entry. The
/// declared size comes from the archive and is not trusted.
const MAX_PREALLOC: u64 = 1024 * 1024;

/// Which flavour of the level entry a save carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDat {
    /// `<save>/level.dat`, stored as-is (older saves)
    Plain,
    /// `<save>/level.dat0`, raw deflate without a zlib wrapper (newer saves)
    Deflated,
}

impl LevelDat {
    pub fn from_entry_name(name: &str) -> Option<Self> {
        if name.ends_with("/level.dat") {
            Some(Self::Plain)
        } else if name.ends_with("/level.dat0") {
            Some(Self::Deflated)
        } else {
            None
        }
    }
}

/// Pull the decoded `level.dat` bytes out of a save archive.
///
/// Picks the first matching entry in archive order. No other entry is read.
pub fn extract_level_dat(data: &[u8], limit: u64) -> Result<Vec<u8>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| ArchiveError::Zip(e.to_string()))?;

    let (index, kind) = (0..archive.len())
        .find_map(|i| {
            let kind = LevelDat::from_entry_name(archive.name_for_index(i)?)?;
            Some((i, kind))
        })
        .ok_or(ArchiveError::MissingLevelDat)?;

    let entry = archive
        .by_index(index)
        .map_err(|e| ArchiveError::Zip(e.to_string()))?;
    debug!(
        entry = entry.name(),
        ?kind,
        stored_size = entry.size(),
        "selected level entry"
    );

    let mut decoded = Vec::with_capacity(initial_capacity(entry.size(), limit));
    // One byte past the limit is enough to tell "fits" from "too large"
    let read = match kind {
        LevelDat::Plain => entry
            .take(limit.saturating_add(1))
            .read_to_end(&mut decoded)
            .map_err(|e| ArchiveError::Zip(e.to_string())),
        LevelDat::Deflated => DeflateDecoder::new(entry)
            .take(limit.saturating_add(1))
            .read_to_end(&mut decoded)
            .map_err(|e| ArchiveError::Decompress(e.to_string())),
    };
    read?;

    if decoded.len() as u64 > limit {
        return Err(ArchiveError::TooLarge { limit });
    }
    debug!(decoded_size = decoded.len(), "level entry decoded");
    Ok(decoded)
}

fn initial_capacity(declared: u64, limit: u64) -> usize {
    declared.min(limit).min(MAX_PREALLOC) as usize
}
