//! Factorio Save Mods
//!
//! Reads the mod list (name, version, checksum) stored in the header of a
//! Factorio save archive, so callers can look up a matching mod combination.

pub mod codec;
pub mod error;
pub mod save;

pub use codec::{BinaryReader, BinaryWriter, ParseVersionError, Version};
pub use error::{ArchiveError, DecodeError, Error, InvalidFileReason, Result};
pub use save::{
    read_mods, read_mods_from_path, ModList, ModRecord, ReaderConfig, SaveReader,
    SaveReaderBuilder, MINIMUM_VERSION,
};
