pub mod reader;
pub mod types;
pub mod writer;

pub use reader::{BinaryReader, DEFAULT_MAX_STRING_LEN};
pub use types::{ParseVersionError, Version};
pub use writer::BinaryWriter;

/// First byte of a compact integer that announces the full-width value.
pub(crate) const OPT_ESCAPE: u8 = 0xFF;
