//! Decoding functionality for SEA streams.
//!
//! Provides the [`ChunkReader`](reader::ChunkReader) session for stepping a
//! stream chunk by chunk, and the one-shot operations
//! [`probe`](decode::probe), [`decode`](decode::decode) and
//! [`decode_into`](decode::decode_into) built on top of it.

/// Chunk-by-chunk decode sessions.
///
/// Provides the [`ChunkReader`](reader::ChunkReader) for decoding one chunk
/// at a time, the natural granularity for progress reporting and cooperative
/// cancellation.
pub mod reader;

/// One-shot decode operations.
///
/// Provides [`probe`](decode::probe) for header-only inspection and
/// [`decode`](decode::decode)/[`decode_into`](decode::decode_into) for
/// whole-stream reconstruction into a [`DecodedStream`](decode::DecodedStream)
/// or a caller-provided buffer.
pub mod decode;
