use byteorder::{ByteOrder, LittleEndian};

use super::OPT_ESCAPE;
use crate::error::{DecodeError, DecodeResult};

/// Longest string the reader accepts unless configured otherwise.
pub const DEFAULT_MAX_STRING_LEN: usize = 1024 * 1024;

/// Binary reader over a decoded `level.dat` buffer
///
/// Owns its buffer and only ever moves forward. A failed read leaves the
/// position where it was before the call.
pub struct BinaryReader {
    data: Vec<u8>,
    pos: usize,
    max_string_len: usize,
}

impl BinaryReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: 0,
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }

    pub fn with_max_string_len(mut self, max: usize) -> Self {
        self.max_string_len = max;
        self
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, n: usize) -> DecodeResult<()> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof {
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> DecodeResult<&[u8]> {
        self.ensure(n)?;
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> DecodeResult<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32_le(&mut self) -> DecodeResult<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a variable-length unsigned integer (Factorio's "optUint" format)
    /// First byte indicates size: 0xFF means next 4 bytes are u32, else it's the value
    pub fn read_opt_u32(&mut self) -> DecodeResult<u32> {
        self.read_opt(Self::read_u32_le)
    }

    /// Read a variable-length unsigned 16-bit (similar to opt_u32)
    pub fn read_opt_u16(&mut self) -> DecodeResult<u16> {
        self.read_opt(Self::read_u16_le)
    }

    fn read_opt<T: From<u8>>(
        &mut self,
        read_full: fn(&mut Self) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        let start = self.pos;
        let first = self.read_u8()?;
        if first != OPT_ESCAPE {
            return Ok(T::from(first));
        }
        read_full(self).map_err(|err| {
            self.pos = start;
            err
        })
    }

    /// Read a Factorio string (length-prefixed with opt_u32)
    pub fn read_string(&mut self) -> DecodeResult<String> {
        let start = self.pos;
        let len = self.read_opt_u32()? as usize;
        if len == 0 {
            return Ok(String::new());
        }
        if len > self.max_string_len {
            self.pos = start;
            return Err(DecodeError::StringTooLong { len, max: self.max_string_len });
        }
        let offset = self.pos;
        let text = match self.read_bytes(len) {
            Ok(bytes) => std::str::from_utf8(bytes).map(str::to_owned).ok(),
            Err(err) => {
                self.pos = start;
                return Err(err);
            }
        };
        text.ok_or_else(|| {
            self.pos = start;
            DecodeError::InvalidUtf8 { offset }
        })
    }

    /// Skip a Factorio string without decoding it
    pub fn skip_string(&mut self) -> DecodeResult<()> {
        let start = self.pos;
        let len = self.read_opt_u32()? as usize;
        self.skip(len).map_err(|err| {
            self.pos = start;
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &[u8]) -> BinaryReader {
        BinaryReader::new(data.to_vec())
    }

    #[test]
    fn test_fixed_widths_are_little_endian() {
        let mut r = reader(&[0x12, 0x00, 0x1E, 0x00, 0xE4, 0x71, 0x3A, 0x9D]);

        assert_eq!(r.read_u16_le().unwrap(), 18);
        assert_eq!(r.read_u16_le().unwrap(), 30);
        assert_eq!(r.read_u32_le().unwrap(), 0x9D3A_71E4);
        assert!(r.is_empty());
    }

    #[test]
    fn test_truncated_fixed_width() {
        let mut r = reader(&[0x01, 0x02, 0x03]);
        assert!(matches!(r.read_u32_le(), Err(DecodeError::UnexpectedEof { need: 4, have: 3 })));
        assert_eq!(r.position(), 0);

        r.skip(2).unwrap();
        assert!(matches!(r.read_u16_le(), Err(DecodeError::UnexpectedEof { need: 2, have: 1 })));
        assert_eq!(r.read_u8().unwrap(), 0x03);
    }

    #[test]
    fn test_compact_u32_wide_value() {
        // Mod counts past 254 take the escape
        let mut r = reader(&[0xFF, 0x2C, 0x01, 0x00, 0x00, 0x07]);
        assert_eq!(r.read_opt_u32().unwrap(), 300);
        assert_eq!(r.position(), 5);
        assert_eq!(r.read_opt_u32().unwrap(), 7);
    }

    #[test]
    fn test_compact_escape_boundary() {
        let mut r = reader(&[0xFE]);
        assert_eq!(r.read_opt_u16().unwrap(), 254);
        assert_eq!(r.position(), 1);

        // 0xFF always takes the wide path, even for values a single byte could hold
        let mut r = reader(&[0xFF, 0xFF, 0x00]);
        assert_eq!(r.read_opt_u16().unwrap(), 255);
        assert_eq!(r.position(), 3);

        let mut r = reader(&[0xFF, 0x00, 0x00]);
        assert_eq!(r.read_opt_u16().unwrap(), 0);

        let mut r = reader(&[0xFF, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(r.read_opt_u32().unwrap(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn test_truncated_escape_keeps_position() {
        let mut r = reader(&[0xFF, 0x01]);
        let err = r.read_opt_u32().unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { need: 4, have: 1 }));
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_read_string() {
        let mut r = reader(&[0x05, b'h', b'e', b'l', b'l', b'o', 0x00]);
        assert_eq!(r.read_string().unwrap(), "hello");
        assert_eq!(r.read_string().unwrap(), "");
        assert!(r.is_empty());
    }

    #[test]
    fn test_read_string_unicode() {
        let name = "工厂-mod 🚀";
        let mut data = vec![name.len() as u8];
        data.extend_from_slice(name.as_bytes());
        assert_eq!(reader(&data).read_string().unwrap(), name);
    }

    #[test]
    fn test_read_string_errors() {
        let mut r = reader(&[0x02, 0xC3, 0x28]);
        assert!(matches!(r.read_string(), Err(DecodeError::InvalidUtf8 { offset: 1 })));
        assert_eq!(r.position(), 0);

        let mut r = reader(&[0x05, b'a']);
        assert!(matches!(r.read_string(), Err(DecodeError::UnexpectedEof { need: 5, have: 1 })));

        let mut r = reader(&[0x05, b'a', b'b', b'c', b'd', b'e']).with_max_string_len(4);
        assert!(matches!(r.read_string(), Err(DecodeError::StringTooLong { len: 5, max: 4 })));
    }

    #[test]
    fn test_skip_and_skip_string() {
        let mut r = reader(&[0x00, 0x03, b'a', b'b', b'c', 0x09, 0x0A]);
        r.skip_string().unwrap();
        assert_eq!(r.position(), 1);
        r.skip_string().unwrap();
        assert_eq!(r.position(), 5);
        r.skip(1).unwrap();
        assert_eq!(r.read_u8().unwrap(), 0x0A);

        assert!(r.skip(1).is_err());
        assert!(r.read_u8().is_err());
        assert_eq!(r.position(), 7);
    }
}
