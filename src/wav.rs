use std::io::{self, BufWriter, Seek, SeekFrom, Write};

use crate::byteorder::WriteBytesLe;
use seadec_macros::{ToBytes, riff_chunk_id};

/// PCM format tag in the RIFF `fmt ` chunk.
pub const WAVE_FORMAT_PCM: u16 = 1;

pub trait RiffChunk {
    fn chunk_id(&self) -> &[u8; 4];
    fn chunk_data(&self) -> Vec<u8>;

    fn write_all<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.chunk_id())?;

        let chunk_data = self.chunk_data();
        writer.write_all(&(chunk_data.len() as u32).to_le_bytes())?;
        writer.write_all(&chunk_data)?;

        Ok(())
    }
}

#[derive(ToBytes)]
#[riff_chunk_id(b"fmt ")]
pub struct FormatChunk {
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

/// RIFF/WAVE file writer for 16-bit PCM audio.
///
/// Emits the classic 44-byte header; the RIFF and data sizes are patched in
/// by [`finish`](Self::finish) once the sample count is final.
pub struct WavWriter<W: Write + Seek> {
    writer: BufWriter<W>,
    riff_size_position: u64,
    data_size_position: u64,
    data_written: u64,
    sample_rate: u32,
    channels: u32,
}

impl<W: Write + Seek> WavWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            riff_size_position: 0,
            data_size_position: 0,
            data_written: 0,
            sample_rate: 48000,
            channels: 2,
        }
    }

    /// Configure audio format parameters
    pub fn configure_audio_format(&mut self, sample_rate: u32, channels: u32) -> io::Result<()> {
        if self.data_written > 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Cannot change format after writing data",
            ));
        }

        self.sample_rate = sample_rate;
        self.channels = channels;
        Ok(())
    }

    /// Write the RIFF/WAVE header with placeholder sizes
    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(b"RIFF")?;
        self.riff_size_position = self.writer.stream_position()?;
        self.writer.write_all(&0u32.to_le_bytes())?; // RIFF size (to be updated later)
        self.writer.write_all(b"WAVE")?;

        let fmt = FormatChunk {
            audio_format: WAVE_FORMAT_PCM,
            num_channels: self.channels as u16,
            sample_rate: self.sample_rate,
            byte_rate: self.sample_rate * self.channels * 2,
            block_align: (self.channels * 2) as u16,
            bits_per_sample: 16,
        };
        fmt.write_all(&mut self.writer)?;

        self.writer.write_all(b"data")?;
        self.data_size_position = self.writer.stream_position()?;
        self.writer.write_all(&0u32.to_le_bytes())?; // Data size (to be updated later)

        Ok(())
    }

    /// Write 16-bit PCM samples as little-endian
    pub fn write_pcm_16bit(&mut self, samples: &[i16]) -> io::Result<()> {
        for &sample in samples {
            self.writer.write_all(&sample.to_le_bytes())?;
            self.data_written += 2;
        }
        Ok(())
    }

    /// Finish writing and update the header sizes
    pub fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()?;

        let current_pos = self.writer.stream_position()?;

        self.writer.seek(SeekFrom::Start(self.data_size_position))?;
        self.writer
            .write_all(&(self.data_written as u32).to_le_bytes())?;

        // RIFF size covers everything after the tag + size pair.
        self.writer.seek(SeekFrom::Start(self.riff_size_position))?;
        self.writer
            .write_all(&(self.data_written as u32 + 36).to_le_bytes())?;

        self.writer.seek(SeekFrom::Start(current_pos))?;
        self.writer.flush()?;

        Ok(())
    }

    /// Get the underlying writer
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
