use crate::codec::Version;

/// Low-level failures of the byte cursor.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of data: need {need} bytes, have {have}")]
    UnexpectedEof { need: usize, have: usize },

    #[error("string too long: {len} bytes (max {max})")]
    StringTooLong { len: usize, max: usize },

    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },
}

/// Failures while pulling `level.dat` out of the save archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(String),

    #[error("archive has no level.dat or level.dat0 entry")]
    MissingLevelDat,

    #[error("inflate error: {0}")]
    Decompress(String),

    #[error("level.dat larger than {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Why a file was rejected as not being a readable save.
#[derive(Debug, thiserror::Error)]
pub enum InvalidFileReason {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid save file: {0}")]
    InvalidFile(#[from] InvalidFileReason),

    #[error("unsupported save version {version} (minimum {minimum})")]
    UnsupportedVersion { version: Version, minimum: Version },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn is_invalid_file(&self) -> bool {
        matches!(self, Self::InvalidFile(_))
    }

    pub fn is_unsupported_version(&self) -> bool {
        matches!(self, Self::UnsupportedVersion { .. })
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::InvalidFile(err.into())
    }
}

impl From<ArchiveError> for Error {
    fn from(err: ArchiveError) -> Self {
        Self::InvalidFile(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
