//! Tone composer — realizes one bar (a chord sharing one duration) as one
//! sample array by linear summation.

use log::debug;

use super::oscillator::Synthesizer;
use crate::ast::Bar;
use crate::error::SynthError;

/// Synthesize every note of `bar` and sum them element-wise.
pub fn compose_bar(synth: &Synthesizer, bar: &Bar) -> Result<Vec<f64>, SynthError> {
    compose_chord(synth, bar.notes.as_slice(), &bar.duration)
}

/// Sum of the tones of `notes`, all lasting `duration`.
///
/// A single note is returned as-is. Every chord member shares the bar's
/// duration and sample rate, so differing lengths mean the synthesizer broke
/// its own contract and are reported as `ChordLengthMismatch`.
pub fn compose_chord<S: AsRef<str>>(
    synth: &Synthesizer,
    notes: &[S],
    duration: &str,
) -> Result<Vec<f64>, SynthError> {
    let mut notes = notes.iter().map(|n| n.as_ref());
    let Some(first) = notes.next() else {
        // An empty chord still occupies its time slot.
        return Ok(vec![0.0; synth.samples_for(duration)?]);
    };

    let mut sum = synth.tone(first, duration)?.into_samples();
    for note in notes {
        let tone = synth.tone(note, duration)?.into_samples();
        mix_into(&mut sum, &tone, note)?;
    }
    debug!("composed {} samples of '{duration}' from '{first}'", sum.len());
    Ok(sum)
}

/// `acc[i] += tone[i]`, requiring equal lengths.
pub fn mix_into(acc: &mut [f64], tone: &[f64], note: &str) -> Result<(), SynthError> {
    if tone.len() != acc.len() {
        return Err(SynthError::ChordLengthMismatch {
            note: note.to_string(),
            expected: acc.len(),
            found: tone.len(),
        });
    }
    for (a, &t) in acc.iter_mut().zip(tone) {
        *a += t;
    }
    Ok(())
}
