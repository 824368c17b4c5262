//! Chunk subheader.
//!
//! Every chunk opens with four bytes describing its quantizer layout,
//! followed by one LMS seed block per channel and the two packed regions.

use anyhow::{Result, bail};

use crate::utils::bitstream_io::ByteCursor;
use crate::utils::errors::ChunkError;

/// The only defined chunk type: constant bit rate.
pub const CHUNK_TYPE_CBR: u8 = 0x01;

/// Fixed reserved byte closing every chunk subheader.
pub const CHUNK_RESERVED: u8 = 0x5A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Width of each packed scale factor, 1..=8 bits.
    pub scale_factor_bits: u8,
    /// Width of each packed residual code, 1..=8 bits.
    pub residual_bits: u8,
    /// Consecutive frames sharing one scale factor per channel.
    pub scale_factor_frames: u8,
}

impl ChunkHeader {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let chunk_type = cursor.read_u8()?;
        if chunk_type != CHUNK_TYPE_CBR {
            bail!(ChunkError::UnsupportedChunkType {
                read: chunk_type,
                offset,
            });
        }

        let packed = cursor.read_u8()?;
        let scale_factor_bits = packed >> 4;
        let residual_bits = packed & 0xF;
        if !(1..=8).contains(&scale_factor_bits) {
            bail!(ChunkError::InvalidScaleFactorBits {
                read: scale_factor_bits,
            });
        }
        if !(1..=8).contains(&residual_bits) {
            bail!(ChunkError::InvalidResidualBits { read: residual_bits });
        }

        let scale_factor_frames = cursor.read_u8()?;
        if scale_factor_frames == 0 {
            bail!(ChunkError::NoScaleFactorFrames);
        }

        let offset = cursor.position();
        let reserved = cursor.read_u8()?;
        if reserved != CHUNK_RESERVED {
            bail!(ChunkError::BadReservedByte {
                read: reserved,
                offset,
            });
        }

        Ok(Self {
            scale_factor_bits,
            residual_bits,
            scale_factor_frames,
        })
    }
}
