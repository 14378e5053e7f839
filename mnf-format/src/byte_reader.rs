//! Endianness-explicit integer and string reads over any [`Read`] source.
//!
//! Mirrors the shape of a classic `ReadInt`-style extension trait: every
//! accessor names its own width and byte order, because the formats this
//! toolchain parses mix big-endian framing with little-endian payloads (and
//! vice versa) within the same structure. There is deliberately no "native"
//! or "default" endianness anywhere in this trait.

use std::io::{ErrorKind, Read};

use crate::error::{FormatError, FormatResult};

/// Typed, endianness-explicit reads over a streaming byte source.
pub trait ByteReader: Read {
    /// Read a single byte.
    fn read_u8(&mut self) -> FormatResult<u8> {
        let mut buf = [0u8; 1];
        read_exact_eof(self, &mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian `u16`.
    fn read_u16le(&mut self) -> FormatResult<u16> {
        let mut buf = [0u8; 2];
        read_exact_eof(self, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a big-endian `u16`.
    fn read_u16be(&mut self) -> FormatResult<u16> {
        let mut buf = [0u8; 2];
        read_exact_eof(self, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read a little-endian `u32`.
    fn read_u32le(&mut self) -> FormatResult<u32> {
        let mut buf = [0u8; 4];
        read_exact_eof(self, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a big-endian `u32`.
    fn read_u32be(&mut self) -> FormatResult<u32> {
        let mut buf = [0u8; 4];
        read_exact_eof(self, &mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Read a little-endian `u64`.
    fn read_u64le(&mut self) -> FormatResult<u64> {
        let mut buf = [0u8; 8];
        read_exact_eof(self, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Read a big-endian `u64`.
    fn read_u64be(&mut self) -> FormatResult<u64> {
        let mut buf = [0u8; 8];
        read_exact_eof(self, &mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    /// Read exactly `len` bytes.
    fn read_bytes(&mut self, len: usize) -> FormatResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        read_exact_eof(self, &mut buf)?;
        Ok(buf)
    }

    /// Read a `u32`-big-endian length prefix followed by that many bytes.
    ///
    /// Matches the manifest's index-0 opaque block framing (`spec.md` §4.4).
    fn read_u32be_prefixed_bytes(&mut self) -> FormatResult<Vec<u8>> {
        let len = self.read_u32be()?;
        self.read_bytes(len as usize)
    }

    /// Verify that the next `signature.len()` bytes equal `signature`.
    fn expect_signature(&mut self, signature: &'static [u8]) -> FormatResult<()> {
        let actual = self.read_bytes(signature.len())?;
        if actual != signature {
            return Err(FormatError::BadSignature {
                expected: signature,
                actual,
            });
        }
        Ok(())
    }

    /// Read one NUL-terminated UTF-8 string.
    ///
    /// Returns `Err(FormatError::Eof)` if end-of-input is reached before any
    /// byte is read (the normal terminator for a string-blob scan loop), or
    /// `Err(FormatError::UnterminatedString)` if end-of-input is reached
    /// after one or more bytes without seeing a NUL.
    fn read_nul_terminated_string(&mut self) -> FormatResult<String> {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.read(&mut byte) {
                Ok(0) => {
                    return if buf.is_empty() {
                        Err(FormatError::Eof)
                    } else {
                        Err(FormatError::UnterminatedString(buf.len()))
                    };
                }
                Ok(_) => {
                    if byte[0] == 0x00 {
                        return String::from_utf8(buf)
                            .map_err(|e| FormatError::Io(std::io::Error::new(ErrorKind::InvalidData, e)));
                    }
                    buf.push(byte[0]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(FormatError::Io(e)),
            }
        }
    }
}

impl<R: Read + ?Sized> ByteReader for R {}

fn read_exact_eof<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> FormatResult<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(FormatError::Eof),
        Err(e) => Err(FormatError::Io(e)),
    }
}
