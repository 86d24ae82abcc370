//! Channel renderer — concatenates composed bars into one flat sample array.

use log::{debug, info};

use super::composer::compose_bar;
use super::oscillator::Synthesizer;
use crate::ast::{Bar, Sheet};
use crate::error::SynthError;

/// Render `bars` back-to-back. No overlap, no cross-fade; an empty sequence
/// renders to an empty array.
pub fn render_bars(synth: &Synthesizer, bars: &[Bar]) -> Result<Vec<f64>, SynthError> {
    let mut wave = Vec::new();
    for bar in bars {
        let tone = compose_bar(synth, bar)?;
        debug!(
            "bar {} ({}): {} samples at offset {}",
            bar.line,
            bar.notes.join("+"),
            tone.len(),
            wave.len()
        );
        wave.extend_from_slice(&tone);
    }
    Ok(wave)
}

/// Render one channel's sheet.
pub fn render_channel(synth: &Synthesizer, name: &str, sheet: &Sheet) -> Result<Vec<f64>, SynthError> {
    let wave = render_bars(synth, &sheet.bars)?;
    info!(
        "rendered channel '{name}': {} bars, {} samples ({:.3}s)",
        sheet.len(),
        wave.len(),
        wave.len() as f64 / synth.sample_rate as f64
    );
    Ok(wave)
}
