//! Chunk-by-chunk decode sessions.

use anyhow::{Result, bail};
use log::trace;

use crate::structs::chunk::ChunkHeader;
use crate::structs::header::StreamHeader;
use crate::structs::lms::LmsState;
use crate::utils::bitstream_io::{ByteCursor, unpack_bits};
use crate::utils::dqt::DequantTable;
use crate::utils::errors::DecodeError;

/// A decode session over a complete in-memory stream.
///
/// Construction parses and validates the stream header and skips the
/// metadata blob; afterwards [`read_chunk`](Self::read_chunk) reconstructs
/// one chunk at a time. The session owns the dequantization table cache,
/// the per-channel LMS states, and the unpack scratch buffers, all reused
/// across chunks.
pub struct ChunkReader<'a> {
    cursor: ByteCursor<'a>,
    header: StreamHeader,
    frames_read: u32,
    lms: Vec<LmsState>,
    dqt: Option<DequantTable>,
    scale_factors: Vec<u8>,
    residuals: Vec<u8>,
}

impl<'a> ChunkReader<'a> {
    /// Opens a stream and positions the session at the first chunk.
    pub fn new(encoded: &'a [u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(encoded);
        let header = StreamHeader::read(&mut cursor)?;
        cursor.skip(header.metadata_len as usize)?;

        Ok(Self {
            cursor,
            lms: vec![LmsState::default(); usize::from(header.channels)],
            header,
            frames_read: 0,
            dqt: None,
            scale_factors: Vec::new(),
            residuals: Vec::new(),
        })
    }

    pub fn header(&self) -> &StreamHeader {
        &self.header
    }

    /// Frames decoded so far.
    pub fn frames_read(&self) -> u32 {
        self.frames_read
    }

    /// Decodes the next chunk into the front of `out`, writing exactly
    /// `frames_in_chunk * channels` interleaved samples.
    ///
    /// Returns the number of frames decoded, or `None` once all
    /// `total_frames` frames are out. Any parse error is fatal to the
    /// session and leaves `out` in an unspecified state.
    pub fn read_chunk(&mut self, out: &mut [i16]) -> Result<Option<usize>> {
        if self.frames_read >= self.header.total_frames {
            return Ok(None);
        }

        let channels = usize::from(self.header.channels);
        let frames_in_chunk = (self.header.total_frames - self.frames_read)
            .min(u32::from(self.header.frames_per_chunk)) as usize;
        let samples_in_chunk = frames_in_chunk * channels;
        if out.len() < samples_in_chunk {
            bail!(DecodeError::OutputSizeMismatch {
                expected: samples_in_chunk,
                actual: out.len(),
            });
        }

        let chunk = ChunkHeader::read(&mut self.cursor)?;
        trace!(
            "chunk at frame {}: sfb={} rb={} sff={} frames={}",
            self.frames_read,
            chunk.scale_factor_bits,
            chunk.residual_bits,
            chunk.scale_factor_frames,
            frames_in_chunk,
        );

        // Fresh predictor state every chunk, one seed block per channel.
        for lms in &mut self.lms {
            *lms = LmsState::read(&mut self.cursor)?;
        }

        let scale_factor_frames = usize::from(chunk.scale_factor_frames);
        let groups = frames_in_chunk.div_ceil(scale_factor_frames);

        let scale_factor_bytes =
            (groups * channels * usize::from(chunk.scale_factor_bits)).div_ceil(8);
        unpack_bits(
            u32::from(chunk.scale_factor_bits),
            self.cursor.read_slice(scale_factor_bytes)?,
            &mut self.scale_factors,
        )?;

        let residual_bytes =
            (frames_in_chunk * channels * usize::from(chunk.residual_bits)).div_ceil(8);
        unpack_bits(
            u32::from(chunk.residual_bits),
            self.cursor.read_slice(residual_bytes)?,
            &mut self.residuals,
        )?;

        let dqt = match self.dqt.take() {
            Some(table) if table.matches(chunk.scale_factor_bits, chunk.residual_bits) => {
                self.dqt.insert(table)
            }
            _ => self
                .dqt
                .insert(DequantTable::new(chunk.scale_factor_bits, chunk.residual_bits)?),
        };

        let mut written = 0;
        for group in 0..groups {
            for offset in 0..scale_factor_frames {
                let frame = group * scale_factor_frames + offset;
                if frame >= frames_in_chunk {
                    break;
                }

                for (channel, lms) in self.lms.iter_mut().enumerate() {
                    let scale_factor = self.scale_factors[group * channels + channel];
                    let code = self.residuals[frame * channels + channel];

                    let predicted = lms.predict();
                    let dequantized = dqt.lookup(scale_factor, code);
                    let reconstructed = clamp_i16(predicted.wrapping_add(dequantized));

                    out[written] = reconstructed;
                    written += 1;

                    lms.update(reconstructed, dequantized);
                }
            }
        }

        self.frames_read += frames_in_chunk as u32;
        Ok(Some(frames_in_chunk))
    }
}

#[inline]
fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
