//! One-shot decode operations.

use anyhow::{Result, bail};

use crate::process::reader::ChunkReader;
use crate::structs::header::StreamHeader;
use crate::utils::bitstream_io::ByteCursor;
use crate::utils::errors::DecodeError;

/// Reads the stream header without touching chunk data.
///
/// Callers use the returned header to size output buffers before a full
/// [`decode_into`] pass.
pub fn probe(encoded: &[u8]) -> Result<StreamHeader> {
    StreamHeader::read(&mut ByteCursor::new(encoded))
}

/// A fully decoded stream.
#[derive(Debug, Clone)]
pub struct DecodedStream {
    pub header: StreamHeader,
    /// Interleaved 16-bit samples, `total_frames * channels` long, channel
    /// order within each frame.
    pub samples: Vec<i16>,
}

/// Decodes an entire stream into a freshly allocated sample buffer.
pub fn decode(encoded: &[u8]) -> Result<DecodedStream> {
    let mut reader = ChunkReader::new(encoded)?;
    let header = *reader.header();

    let mut samples = vec![0i16; header.output_len()];
    run_to_end(&mut reader, &mut samples)?;

    Ok(DecodedStream { header, samples })
}

/// Decodes an entire stream into a caller-provided buffer of exactly
/// `total_frames * channels` samples.
///
/// On failure the buffer contents are unspecified.
pub fn decode_into(encoded: &[u8], out: &mut [i16]) -> Result<StreamHeader> {
    let mut reader = ChunkReader::new(encoded)?;
    let header = *reader.header();
    if out.len() != header.output_len() {
        bail!(DecodeError::OutputSizeMismatch {
            expected: header.output_len(),
            actual: out.len(),
        });
    }

    run_to_end(&mut reader, out)?;
    Ok(header)
}

fn run_to_end(reader: &mut ChunkReader<'_>, out: &mut [i16]) -> Result<()> {
    let channels = usize::from(reader.header().channels);
    let mut filled = 0;
    while let Some(frames) = reader.read_chunk(&mut out[filled..])? {
        filled += frames * channels;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::chunk::{CHUNK_RESERVED, CHUNK_TYPE_CBR};
    use crate::utils::dqt::DequantTable;
    use crate::utils::errors::BitstreamError;

    fn header_bytes(
        channels: u8,
        frames_per_chunk: u16,
        sample_rate: u32,
        total_frames: u32,
        metadata: &[u8],
    ) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"seac");
        bytes.push(1);
        bytes.push(channels);
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&frames_per_chunk.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&total_frames.to_le_bytes());
        bytes.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
        bytes.extend_from_slice(metadata);
        bytes
    }

    fn pack_bits(bit_size: u32, values: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut acc = 0u32;
        let mut nbits = 0u32;

        for &value in values {
            acc = (acc << bit_size) | u32::from(value);
            nbits += bit_size;
            while nbits >= 8 {
                nbits -= 8;
                out.push((acc >> nbits) as u8);
                acc &= (1 << nbits) - 1;
            }
        }
        if nbits > 0 {
            out.push((acc << (8 - nbits)) as u8);
        }

        out
    }

    fn chunk_bytes(
        scale_factor_bits: u8,
        residual_bits: u8,
        scale_factor_frames: u8,
        seeds: &[([i16; 4], [i16; 4])],
        scale_factors: &[u8],
        residuals: &[u8],
    ) -> Vec<u8> {
        let mut bytes = vec![
            CHUNK_TYPE_CBR,
            (scale_factor_bits << 4) | residual_bits,
            scale_factor_frames,
            CHUNK_RESERVED,
        ];

        for (history, weights) in seeds {
            for value in history {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            for value in weights {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }

        bytes.extend_from_slice(&pack_bits(u32::from(scale_factor_bits), scale_factors));
        bytes.extend_from_slice(&pack_bits(u32::from(residual_bits), residuals));
        bytes
    }

    const ZERO_SEED: ([i16; 4], [i16; 4]) = ([0; 4], [0; 4]);

    #[test]
    fn probe_reads_header_only() {
        let bytes = header_bytes(2, 1024, 44100, 8820, &[]);
        let header = probe(&bytes).unwrap();

        assert_eq!(header.sample_rate, 44100);
        assert_eq!(header.channels, 2);
        assert_eq!(header.total_frames, 8820);
    }

    #[test]
    fn decode_into_fails_when_chunks_are_missing() {
        let bytes = header_bytes(2, 1024, 44100, 8820, &[]);
        let mut out = vec![0i16; 17640];

        let err = decode_into(&bytes, &mut out).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<BitstreamError>(),
                Some(BitstreamError::Truncated { .. })
            ),
            "{err}"
        );
    }

    #[test]
    fn decode_into_rejects_wrong_buffer_size() {
        let bytes = header_bytes(2, 1024, 44100, 8820, &[]);
        let mut out = vec![0i16; 17639];

        let err = decode_into(&bytes, &mut out).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DecodeError>(),
            Some(DecodeError::OutputSizeMismatch {
                expected: 17640,
                actual: 17639,
            })
        ));
    }

    #[test]
    fn silence_decodes_to_the_zero_bin() {
        let mut bytes = header_bytes(1, 16, 44100, 16, &[]);
        bytes.extend(chunk_bytes(4, 3, 16, &[ZERO_SEED], &[0], &[0; 16]));

        let decoded = decode(&bytes).unwrap();

        // Prediction stays zero (the weight delta 1 >> 4 is zero), so every
        // frame lands on the first dequantization bin.
        let bin = DequantTable::new(4, 3).unwrap().lookup(0, 0);
        assert_eq!(bin, 1);
        assert_eq!(decoded.samples, vec![bin as i16; 16]);
    }

    #[test]
    fn dc_step_starts_on_the_negative_bin() {
        let mut bytes = header_bytes(1, 16, 44100, 16, &[]);
        bytes.extend(chunk_bytes(4, 3, 16, &[ZERO_SEED], &[0], &[1; 16]));

        let decoded = decode(&bytes).unwrap();

        let bin = DequantTable::new(4, 3).unwrap().lookup(0, 1);
        assert_eq!(bin, -1);
        assert_eq!(decoded.samples[0], -1);
        // The sign-sign updates drag the prediction negative after a few
        // frames of constant negative residuals.
        assert_eq!(&decoded.samples[..7], &[-1, -1, -1, -1, -1, -1, -2]);
    }

    #[test]
    fn reconstruction_clamps_at_the_positive_rail() {
        // predicted = 32767 * 32767 >> 13 = 131064, plus the +1 bin.
        let seed = ([0, 0, 0, 32767], [0, 0, 0, 32767]);
        let mut bytes = header_bytes(1, 1, 44100, 1, &[]);
        bytes.extend(chunk_bytes(4, 3, 1, &[seed], &[0], &[0]));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.samples, [32767]);
    }

    #[test]
    fn reconstruction_clamps_at_the_negative_rail() {
        let seed = ([0, 0, 0, 32767], [0, 0, 0, -32768]);
        let mut bytes = header_bytes(1, 1, 44100, 1, &[]);
        bytes.extend(chunk_bytes(4, 3, 1, &[seed], &[0], &[1]));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.samples, [-32768]);
    }

    #[test]
    fn channels_interleave_per_frame() {
        let mut bytes = header_bytes(2, 2, 44100, 2, &[]);
        // One scale factor group covering both frames; distinct residual
        // codes per frame and channel, all on scale factor row 0.
        bytes.extend(chunk_bytes(
            4,
            3,
            2,
            &[ZERO_SEED, ZERO_SEED],
            &[0, 0],
            &[0, 2, 4, 6],
        ));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.samples, [1, 3, 5, 7]);
    }

    #[test]
    fn lms_state_reseeds_at_chunk_boundaries() {
        let mut bytes = header_bytes(1, 2, 44100, 3, &[]);
        // First chunk: a live weight on the newest tap, two frames.
        bytes.extend(chunk_bytes(
            4,
            3,
            2,
            &[([0; 4], [0, 0, 0, 8192])],
            &[0],
            &[0, 0],
        ));
        // Second chunk: one frame from an all-zero seed. A carried-over
        // predictor would add 2 here.
        bytes.extend(chunk_bytes(4, 3, 2, &[ZERO_SEED], &[0], &[2]));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.samples, [1, 2, 3]);
    }

    #[test]
    fn quantizer_parameters_may_change_between_chunks() {
        let mut bytes = header_bytes(1, 2, 44100, 3, &[]);
        bytes.extend(chunk_bytes(4, 3, 2, &[ZERO_SEED], &[0], &[0, 0]));
        bytes.extend(chunk_bytes(4, 4, 2, &[ZERO_SEED], &[0], &[6]));

        let decoded = decode(&bytes).unwrap();

        // rb=4 row 0 holds the odd ladder 1, 3, 5, 7, ...; code 6 is +7.
        assert_eq!(decoded.samples, [1, 1, 7]);
    }

    #[test]
    fn metadata_blob_is_skipped() {
        let mut bytes = header_bytes(1, 1, 44100, 1, &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE]);
        bytes.extend(chunk_bytes(4, 3, 1, &[ZERO_SEED], &[0], &[0]));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.samples, [1]);
    }

    #[test]
    fn truncated_metadata_is_fatal() {
        let mut bytes = header_bytes(1, 1, 44100, 1, &[]);
        // Claim ten metadata bytes but provide three.
        let len = bytes.len();
        bytes[18..22].copy_from_slice(&10u32.to_le_bytes());
        bytes.resize(len + 3, 0);

        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BitstreamError>(),
            Some(BitstreamError::Truncated { .. })
        ));
    }

    #[test]
    fn partial_final_group_stops_at_the_chunk_frame_count() {
        // Five frames under a scale factor group of four: the second group
        // covers only one frame.
        let mut bytes = header_bytes(1, 5, 44100, 5, &[]);
        bytes.extend(chunk_bytes(4, 3, 4, &[ZERO_SEED], &[0, 0], &[0; 5]));

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.samples, [1, 1, 1, 1, 1]);
    }

    #[test]
    fn decoding_is_a_pure_function_of_the_input() {
        let mut bytes = header_bytes(2, 4, 22050, 7, &[]);
        bytes.extend(chunk_bytes(
            3,
            3,
            2,
            &[([10, -20, 30, -40], [5, -6, 7, -8]), ZERO_SEED],
            &[1, 0, 2, 1],
            &[3, 1, 0, 2, 5, 4, 7, 6],
        ));
        bytes.extend(chunk_bytes(
            3,
            5,
            4,
            &[ZERO_SEED, ([1, 2, 3, 4], [100, 200, 300, 400])],
            &[2, 3],
            &[0, 1, 2, 3, 4, 5],
        ));

        let first = decode(&bytes).unwrap();
        let second = decode(&bytes).unwrap();
        assert_eq!(first.samples, second.samples);

        let mut out = vec![0i16; first.header.output_len()];
        decode_into(&bytes, &mut out).unwrap();
        assert_eq!(out, first.samples);

        assert_eq!(first.samples.len(), 14);
    }
}
