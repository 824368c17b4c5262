//! SEA container file header.
//!
//! A fixed 22-byte little-endian header opens every stream, followed by an
//! opaque metadata blob the decoder skips.

use anyhow::{Result, bail};
use log::debug;

use crate::utils::bitstream_io::ByteCursor;
use crate::utils::errors::HeaderError;

/// File magic: the ASCII bytes `s`,`e`,`a`,`c` read as a little-endian word.
pub const MAGIC: u32 = 0x6361_6573;

/// The only container version this decoder understands.
pub const FORMAT_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub channels: u8,
    /// Encoder chunk size hint in bytes. Advisory only, never used to slice
    /// the chunk sequence.
    pub chunk_size: u16,
    pub frames_per_chunk: u16,
    pub sample_rate: u32,
    pub total_frames: u32,
    pub metadata_len: u32,
}

impl StreamHeader {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let magic = cursor.read_u32_le()?;
        if magic != MAGIC {
            bail!(HeaderError::BadMagic { read: magic });
        }

        let version = cursor.read_u8()?;
        if version != FORMAT_VERSION {
            bail!(HeaderError::UnsupportedVersion { read: version });
        }

        let channels = cursor.read_u8()?;
        if channels == 0 {
            bail!(HeaderError::NoChannels);
        }

        let chunk_size = cursor.read_u16_le()?;

        let frames_per_chunk = cursor.read_u16_le()?;
        if frames_per_chunk == 0 {
            bail!(HeaderError::NoFramesPerChunk);
        }

        let header = Self {
            channels,
            chunk_size,
            frames_per_chunk,
            sample_rate: cursor.read_u32_le()?,
            total_frames: cursor.read_u32_le()?,
            metadata_len: cursor.read_u32_le()?,
        };

        debug!(
            "stream header: {} Hz, {} channel(s), {} frames ({} per chunk), {} metadata bytes",
            header.sample_rate,
            header.channels,
            header.total_frames,
            header.frames_per_chunk,
            header.metadata_len,
        );

        Ok(header)
    }

    /// Total interleaved sample count of the fully decoded stream.
    pub fn output_len(&self) -> usize {
        self.total_frames as usize * usize::from(self.channels)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        f64::from(self.total_frames) / f64::from(self.sample_rate)
    }
}
