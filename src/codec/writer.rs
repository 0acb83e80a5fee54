use byteorder::{ByteOrder, LittleEndian};

use super::{Version, OPT_ESCAPE};

/// Encoder for the `level.dat` header primitives
///
/// Mirrors [`BinaryReader`](super::BinaryReader) field for field, so header
/// fragments can be synthesized without hand-packing bytes. Never produces a
/// complete save.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Append bytes verbatim (flag groups, padding).
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16_le(&mut self, v: u16) {
        let mut field = [0; 2];
        LittleEndian::write_u16(&mut field, v);
        self.write_raw(&field);
    }

    pub fn write_u32_le(&mut self, v: u32) {
        let mut field = [0; 4];
        LittleEndian::write_u32(&mut field, v);
        self.write_raw(&field);
    }

    /// Compact u16: one byte below the escape, otherwise escape + u16.
    pub fn write_opt_u16(&mut self, v: u16) {
        match u8::try_from(v) {
            Ok(small) if small != OPT_ESCAPE => self.write_u8(small),
            _ => {
                self.write_u8(OPT_ESCAPE);
                self.write_u16_le(v);
            }
        }
    }

    /// Compact u32, same escape rule as [`write_opt_u16`](Self::write_opt_u16).
    pub fn write_opt_u32(&mut self, v: u32) {
        match u8::try_from(v) {
            Ok(small) if small != OPT_ESCAPE => self.write_u8(small),
            _ => {
                self.write_u8(OPT_ESCAPE);
                self.write_u32_le(v);
            }
        }
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_opt_u32(s.len() as u32);
        self.write_raw(s.as_bytes());
    }

    /// Inverse of [`Version::read`].
    pub fn write_version(&mut self, version: Version, compact: bool) {
        for component in [version.major, version.minor, version.patch] {
            if compact {
                self.write_opt_u16(component);
            } else {
                self.write_u16_le(component);
            }
        }
    }
}
