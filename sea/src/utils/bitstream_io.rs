//! Byte cursor and bit unpacking for SEA streams.
//!
//! The container layer is byte-oriented little-endian; the packed scale
//! factor and residual regions are MSB-first bit streams read through
//! `bitstream_io`.

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader};

use crate::utils::errors::BitstreamError;

/// Bounds-checked forward-only cursor over an encoded byte buffer.
///
/// Every read advances a single monotone position; there is no seeking.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], BitstreamError> {
        if len > self.remaining() {
            return Err(BitstreamError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }

        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), BitstreamError> {
        self.read_slice(len).map(|_| ())
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, BitstreamError> {
        Ok(self.read_slice(1)?[0])
    }

    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16, BitstreamError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    pub fn read_i16_le(&mut self) -> Result<i16, BitstreamError> {
        let bytes = self.read_slice(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32, BitstreamError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Unpacks `bit_size`-bit unsigned values from `src` into `out`.
///
/// The packed region is the concatenation of values written MSB-first in
/// `bit_size` bits each, grouped into bytes MSB-first. Exactly
/// `src.len() * 8 / bit_size` values are produced; trailing bits narrower
/// than `bit_size` do not yield a value.
pub fn unpack_bits(bit_size: u32, src: &[u8], out: &mut Vec<u8>) -> io::Result<()> {
    if !(1..=8).contains(&bit_size) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unpack_bits: bit size {bit_size} out of range"),
        ));
    }

    out.clear();
    let count = src.len() * 8 / bit_size as usize;
    out.reserve(count);

    let mut bs = BitReader::endian(io::Cursor::new(src), BigEndian);
    for _ in 0..count {
        out.push(bs.read_unsigned_var::<u8>(bit_size)?);
    }

    Ok(())
}
