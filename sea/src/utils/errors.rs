#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    #[error("Invalid magic: expected \"seac\" (0x63616573), read {read:#010X}")]
    BadMagic { read: u32 },

    #[error("Unsupported format version {read}, only version 1 is supported")]
    UnsupportedVersion { read: u8 },

    #[error("Stream must have at least one channel")]
    NoChannels,

    #[error("frames_per_chunk must be greater than zero")]
    NoFramesPerChunk,
}

#[derive(thiserror::Error, Debug)]
pub enum ChunkError {
    #[error("Unsupported chunk type {read:#04X} at offset {offset}, only CBR (0x01) is defined")]
    UnsupportedChunkType { read: u8, offset: usize },

    #[error("Reserved byte at offset {offset} must be 0x5A, read {read:#04X}")]
    BadReservedByte { read: u8, offset: usize },

    #[error("scale_factor_bits must be between 1 and 8, read {read}")]
    InvalidScaleFactorBits { read: u8 },

    #[error("residual_bits must be between 1 and 8, read {read}")]
    InvalidResidualBits { read: u8 },

    #[error("scale_factor_frames must be greater than zero")]
    NoScaleFactorFrames,
}

#[derive(thiserror::Error, Debug)]
pub enum BitstreamError {
    #[error("Truncated stream: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Output buffer holds {actual} samples, stream decodes to {expected}")]
    OutputSizeMismatch { expected: usize, actual: usize },
}
