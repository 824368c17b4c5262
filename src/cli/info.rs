use anyhow::Result;
use serde::Serialize;

use sea::process::decode::probe;

use crate::cli::command::InfoArgs;
use crate::cli::decode::time_str;
use crate::input::InputReader;

#[derive(Debug, Serialize)]
struct StreamReport {
    sample_rate: u32,
    channels: u8,
    total_frames: u32,
    duration: String,
    frames_per_chunk: u16,
    chunk_size_hint: u16,
    metadata_len: u32,
    encoded_size: usize,
    data_rate_kbps: f64,
}

pub fn cmd_info(args: &InfoArgs) -> Result<()> {
    log::info!("Analyzing SEA stream: {}", args.input.display());

    let mut input = InputReader::new(&args.input)?;
    let encoded = input.read_all()?;
    let header = probe(&encoded)?;

    let duration_secs = header.duration_secs();
    let data_rate_kbps = if duration_secs > 0.0 {
        (encoded.len() as f64 * 8.0) / (duration_secs * 1000.0)
    } else {
        0.0
    };

    let report = StreamReport {
        sample_rate: header.sample_rate,
        channels: header.channels,
        total_frames: header.total_frames,
        duration: time_str(duration_secs),
        frames_per_chunk: header.frames_per_chunk,
        chunk_size_hint: header.chunk_size,
        metadata_len: header.metadata_len,
        encoded_size: encoded.len(),
        data_rate_kbps,
    };

    if args.yaml {
        print!("{}", serde_yaml_ng::to_string(&report)?);
        return Ok(());
    }

    println!();
    println!("SEA Stream Information");
    println!("======================");
    println!();
    println!("  Sampling rate             {} Hz", report.sample_rate);
    println!("  Channels                  {}", report.channels);
    println!("  Total frames              {}", report.total_frames);
    println!("  Duration                  {}", report.duration);
    println!("  Frames per chunk          {}", report.frames_per_chunk);
    println!("  Chunk size hint           {} bytes", report.chunk_size_hint);
    println!("  Metadata                  {} bytes", report.metadata_len);
    println!(
        "  Size                      {:.2} MB ({} bytes)",
        report.encoded_size as f64 / 1_000_000.0,
        report.encoded_size
    );
    println!("  Average data rate         {:.1} kbps", report.data_rate_kbps);
    println!();

    Ok(())
}
