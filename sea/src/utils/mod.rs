//! Utility functions and supporting infrastructure.
//!
//! Provides byte-level and bit-level stream reading, dequantization table
//! construction, and error handling for the decoding pipeline.

pub mod bitstream_io;
pub mod dqt;
pub mod errors;
