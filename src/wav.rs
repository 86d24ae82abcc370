//! WAV output — writes a channel matrix as an interleaved multi-channel file.

use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use hound::{SampleFormat as HoundFormat, WavSpec, WavWriter};
use log::info;

use crate::config::SampleFormat;
use crate::dsp::mixer::{ChannelMatrix, to_pcm_i16};
use crate::error::OutputError;

fn spec(matrix: &ChannelMatrix, sample_rate: u32, format: SampleFormat) -> WavSpec {
    let (bits_per_sample, sample_format) = match format {
        SampleFormat::Float32 => (32, HoundFormat::Float),
        SampleFormat::Pcm16 => (16, HoundFormat::Int),
    };
    WavSpec {
        // A WAV file needs at least one channel, even for an empty matrix.
        channels: matrix.channel_count().max(1) as u16,
        sample_rate,
        bits_per_sample,
        sample_format,
    }
}

fn write_samples<W: Write + Seek>(
    writer: W,
    matrix: &ChannelMatrix,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<(), OutputError> {
    let mut wav = WavWriter::new(writer, spec(matrix, sample_rate, format))?;
    for sample in matrix.interleaved() {
        match format {
            SampleFormat::Float32 => wav.write_sample(sample as f32)?,
            SampleFormat::Pcm16 => wav.write_sample(to_pcm_i16(sample))?,
        }
    }
    wav.finalize()?;
    Ok(())
}

/// Encode the matrix as a complete WAV file in memory.
pub fn encode_wav(
    matrix: &ChannelMatrix,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<Vec<u8>, OutputError> {
    let mut cursor = Cursor::new(Vec::new());
    write_samples(&mut cursor, matrix, sample_rate, format)?;
    Ok(cursor.into_inner())
}

/// Write the matrix to `path`. A failed write removes the partial file.
pub fn write_wav(
    path: &Path,
    matrix: &ChannelMatrix,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<(), OutputError> {
    let bytes = encode_wav(matrix, sample_rate, format)?;
    if let Err(e) = fs::write(path, &bytes) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    info!(
        "wrote {} ({} channels, {} frames at {} Hz)",
        path.display(),
        matrix.channel_count(),
        matrix.frame_count(),
        sample_rate
    );
    Ok(())
}
