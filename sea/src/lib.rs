#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Decoder for SEA version 1 streams.
//!
//! ### Container Organization
//!
//! A fixed little-endian file header (magic `seac`, version, channel count,
//! chunk layout, frame counts) is followed by an opaque metadata blob and a
//! sequence of chunks. Each chunk is self-contained: it carries its own
//! quantizer parameters, a fresh LMS seed per channel, a packed scale factor
//! region, and a packed residual region.
//!
//! ### Reconstruction
//!
//! Per sample, the decoder predicts from the channel's LMS state, adds the
//! dequantized residual selected by the chunk's scale factor, saturates to
//! the 16-bit range, and feeds the result back into the predictor. The
//! dequantization table is derived from `(scale_factor_bits, residual_bits)`
//! in single-precision float arithmetic and cached across chunks that share
//! those parameters.
//!
//! ## Quick Start
//!
//! 1. Inspect a stream without decoding using [`process::decode::probe`]
//! 2. Decode everything at once using [`process::decode::decode`], or into a
//!    preallocated buffer using [`process::decode::decode_into`]
//! 3. Step chunk by chunk using [`process::reader::ChunkReader`] when
//!    progress reporting or cooperative cancellation between chunks is needed

/// Decoding functionality for SEA streams.
///
/// 1. **Chunk Sessions** ([`process::reader`]): Stateful chunk-by-chunk
///    decoding over a complete byte buffer.
///
/// 2. **One-shot Operations** ([`process::decode`]): Header probing and
///    whole-stream decoding.
pub mod process;

/// Data structures representing SEA format components.
///
/// - **Stream Header** ([`structs::header`]): Container-level parameters
/// - **Chunk Subheader** ([`structs::chunk`]): Per-chunk quantizer layout
/// - **LMS State** ([`structs::lms`]): Per-channel adaptive predictor
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Byte/Bit I/O** ([`utils::bitstream_io`]): Bounds-checked cursor and
///   MSB-first unpacking
/// - **Dequantization** ([`utils::dqt`]): Scale factor × shape table
/// - **Error Handling** ([`utils::errors`]): Error types
pub mod utils;
