use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::BinaryReader;
use crate::error::DecodeResult;

/// Three-component game/mod version (`major.minor.patch`)
///
/// Ordering, equality and hashing all go through [`Version::key`], so two
/// versions are equal exactly when their composite keys are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// Read the three components, each either fixed u16 or opt_u16.
    ///
    /// The top-level save version is fixed-width; mod versions and the
    /// embedded application version are compact.
    pub fn read(reader: &mut BinaryReader, compact: bool) -> DecodeResult<Self> {
        let read: fn(&mut BinaryReader) -> DecodeResult<u16> = if compact {
            BinaryReader::read_opt_u16
        } else {
            BinaryReader::read_u16_le
        };
        Ok(Self {
            major: read(reader)?,
            minor: read(reader)?,
            patch: read(reader)?,
        })
    }

    pub fn key(self) -> u64 {
        self.major as u64 * 1_000_000 + self.minor as u64 * 1_000 + self.patch as u64
    }

    pub fn compare(a: Self, b: Self) -> Ordering {
        a.key().cmp(&b.key())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::compare(*self, *other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version {0:?}: expected major.minor.patch")]
pub struct ParseVersionError(String);

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());
        let mut parts = s
            .trim()
            .split('.')
            .map(|part| part.parse::<u16>().map_err(|_| invalid()));
        let mut next = || parts.next().unwrap_or_else(|| Err(invalid()));
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}
