use std::fs::File;
use std::time::Instant;

use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use sea::process::reader::ChunkReader;

use crate::cli::command::DecodeArgs;
use crate::input::InputReader;
use crate::wav::WavWriter;

pub fn cmd_decode(args: &DecodeArgs, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Decoding SEA stream: {}", args.input.display());

    let mut input = InputReader::new(&args.input)?;
    if input.is_pipe() {
        log::debug!("Reading SEA stream from stdin");
    }
    let encoded = input.read_all()?;

    let mut reader = ChunkReader::new(&encoded)?;
    let header = *reader.header();

    log::info!(
        "{} Hz, {} channel(s), {} frames ({})",
        header.sample_rate,
        header.channels,
        header.total_frames,
        time_str(header.duration_secs()),
    );

    let pb = match multi {
        Some(multi) => Some(create_progress_bar(multi, u64::from(header.total_frames))?),
        None => None,
    };

    let start_time = Instant::now();
    let mut samples = vec![0i16; header.output_len()];

    match decode_all(&mut reader, &mut samples, &pb) {
        Ok(()) => {}
        Err(e) => {
            if let Some(pb) = pb {
                pb.finish_with_message("decode failed");
            }
            return Err(e);
        }
    }

    let mut writer = WavWriter::new(File::create(&args.output)?);
    writer.configure_audio_format(header.sample_rate, u32::from(header.channels))?;
    writer.write_header()?;
    writer.write_pcm_16bit(&samples)?;
    writer.finish()?;

    let elapsed = start_time.elapsed();
    let audio_duration_secs = header.duration_secs();
    let realtime_multiplier = if elapsed.as_secs_f64() > 0.0 {
        audio_duration_secs / elapsed.as_secs_f64()
    } else {
        0.0
    };

    if let Some(pb) = pb {
        pb.finish_with_message(format!(
            "speed: {realtime_multiplier:.1}x | timestamp: {}",
            time_str(audio_duration_secs)
        ));
    }

    log::info!(
        "Decoding completed successfully: {} written",
        args.output.display()
    );

    Ok(())
}

fn decode_all(
    reader: &mut ChunkReader<'_>,
    samples: &mut [i16],
    pb: &Option<ProgressBar>,
) -> Result<()> {
    let channels = usize::from(reader.header().channels);
    let mut filled = 0;

    while let Some(frames) = reader.read_chunk(&mut samples[filled..])? {
        filled += frames * channels;
        if let Some(pb) = pb {
            pb.inc(frames as u64);
        }
    }

    Ok(())
}

fn create_progress_bar(multi: &MultiProgress, total_frames: u64) -> Result<ProgressBar> {
    let pb = multi.add(ProgressBar::new(total_frames));
    pb.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} frames ({percent}%)\n{msg} | elapsed: {elapsed_precise} | ETA: {eta_precise}",
    )?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message("decoding chunks");

    Ok(pb)
}

pub fn time_str(sec: f64) -> String {
    let ms = sec * 1000f64;
    let hours = (ms / 3600000f64) as u64;
    let minutes = ((ms % 3600000f64) / 60000f64) as u64;
    let seconds = ((ms % 60000f64) / 1000f64) as u64;
    let milliseconds = (ms % 1000f64) as u64;

    format!(
        "{hours:0width$}:{minutes:02}:{seconds:02}.{milliseconds:03}",
        width = if hours >= 100 { 0 } else { 2 }
    )
}
