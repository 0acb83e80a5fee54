use tracing::trace;

use crate::codec::{BinaryReader, Version};
use crate::error::DecodeResult;

/// Skip the save header between the format version and the mod table.
///
/// The layout is positional, so every field has to be consumed in order
/// even though none of the values are kept. Returns the embedded
/// application version, which is the only field that cannot be skipped
/// blindly (its width depends on the compact escapes).
///
/// Layout observed in 0.18.x and 1.1.x saves.
pub fn skip_header(reader: &mut BinaryReader) -> DecodeResult<Version> {
    // 1) Build byte + two flags
    reader.skip(3)?;

    // 2) Campaign, level and base mod names
    reader.skip_string()?;
    reader.skip_string()?;
    reader.skip_string()?;

    // 3) Difficulty, finished, player won
    reader.skip(3)?;

    // 4) Next level name
    reader.skip_string()?;

    // 5) Can continue, finished but continuing, replay saved, debug options
    reader.skip(4)?;

    // 6) Application version the save was written by
    let game_version = Version::read(reader, true)?;

    // 7) Build number + allowed commands
    reader.skip(3)?;

    trace!(%game_version, pos = reader.position(), "header skipped");
    Ok(game_version)
}
