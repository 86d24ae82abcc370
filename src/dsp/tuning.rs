//! Tuning tables — note names to frequencies, duration symbols to seconds.
//!
//! Both tables are immutable once built. Tempo scaling produces a new
//! [`ScaledDurations`] instead of rewriting the base beat counts, so a table
//! can be rescaled for any number of renders without compounding.

use std::collections::BTreeMap;

use crate::error::SynthError;

/// The reserved note token for silence.
pub const REST: &str = "O";

/// Standard concert pitch for A4.
pub const DEFAULT_TUNING_PITCH: f64 = 440.0;

/// Seconds-per-beat numerator: `seconds = beats * beat_scale / tempo`.
///
/// 60 makes the quarter note the beat. Some notations count in half notes,
/// which corresponds to 120.
pub const DEFAULT_BEAT_SCALE: f64 = 60.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const LOWEST_OCTAVE: i32 = 0;
const HIGHEST_OCTAVE: i32 = 8;

/// Convert a MIDI note number to frequency using the given tuning pitch.
///
/// `tuning_pitch` is the frequency of A4 (MIDI 69).
pub fn midi_to_frequency(midi: i32, tuning_pitch: f64) -> f64 {
    tuning_pitch * (2.0_f64).powf((midi as f64 - 69.0) / 12.0)
}

/// Note name → frequency in Hz, for octaves 0 through 8.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    tuning_pitch: f64,
    entries: BTreeMap<String, f64>,
}

impl FrequencyTable {
    /// Twelve-tone equal temperament with A4 at `tuning_pitch`.
    pub fn equal_temperament(tuning_pitch: f64) -> Self {
        let mut entries = BTreeMap::new();
        for octave in LOWEST_OCTAVE..=HIGHEST_OCTAVE {
            for (semitone, name) in NOTE_NAMES.iter().enumerate() {
                // MIDI note number: C4 = 60
                let midi = (octave + 1) * 12 + semitone as i32;
                entries.insert(
                    format!("{name}{octave}"),
                    midi_to_frequency(midi, tuning_pitch),
                );
            }
        }
        FrequencyTable {
            tuning_pitch,
            entries,
        }
    }

    pub fn tuning_pitch(&self) -> f64 {
        self.tuning_pitch
    }

    /// Look up a note. The rest marker resolves to 0 Hz.
    pub fn frequency(&self, note: &str) -> Result<f64, SynthError> {
        if Self::is_rest(note) {
            return Ok(0.0);
        }
        self.entries
            .get(note)
            .copied()
            .ok_or_else(|| SynthError::UnknownNote(note.to_string()))
    }

    pub fn is_rest(note: &str) -> bool {
        note == REST
    }

    /// Number of pitched notes; the rest marker is not counted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable::equal_temperament(DEFAULT_TUNING_PITCH)
    }
}

/// Duration symbol → beat count. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationTable {
    beats: BTreeMap<String, f64>,
}

impl DurationTable {
    /// Four-four time: `w h q e s t`, plus dotted variants (`qd` = 1.5 × `q`).
    pub fn four_four() -> Self {
        let base = [
            ("w", 4.0),
            ("h", 2.0),
            ("q", 1.0),
            ("e", 0.5),
            ("s", 0.25),
            ("t", 0.125),
        ];
        DurationTable::from_beats(base.into_iter().flat_map(|(symbol, count)| {
            [
                (symbol.to_string(), count),
                (format!("{symbol}d"), count * 1.5),
            ]
        }))
    }

    pub fn from_beats<S: Into<String>>(entries: impl IntoIterator<Item = (S, f64)>) -> Self {
        DurationTable {
            beats: entries.into_iter().map(|(s, b)| (s.into(), b)).collect(),
        }
    }

    pub fn beats(&self, symbol: &str) -> Result<f64, SynthError> {
        self.beats
            .get(symbol)
            .copied()
            .ok_or_else(|| SynthError::UnknownDuration(symbol.to_string()))
    }

    /// Derive wall-clock durations for one tempo. The base table is untouched.
    ///
    /// A tempo of 0 yields infinite durations, which the synthesizer rejects
    /// as `InvalidDuration`.
    pub fn scaled(&self, tempo: f64, beat_scale: f64) -> ScaledDurations {
        let factor = beat_scale / tempo;
        let seconds = self
            .beats
            .iter()
            .map(|(symbol, beats)| (symbol.clone(), beats * factor))
            .collect();
        ScaledDurations {
            tempo,
            beat_scale,
            seconds,
        }
    }
}

impl Default for DurationTable {
    fn default() -> Self {
        DurationTable::four_four()
    }
}

/// Duration symbol → seconds for a fixed tempo.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledDurations {
    pub tempo: f64,
    pub beat_scale: f64,
    seconds: BTreeMap<String, f64>,
}

impl ScaledDurations {
    pub fn seconds(&self, symbol: &str) -> Result<f64, SynthError> {
        self.seconds
            .get(symbol)
            .copied()
            .ok_or_else(|| SynthError::UnknownDuration(symbol.to_string()))
    }
}

/// One-shot convenience: `duration_seconds("q", 120.0)` with the four-four
/// table and a quarter-note beat.
pub fn duration_seconds(symbol: &str, tempo: f64) -> Result<f64, SynthError> {
    Ok(DurationTable::four_four().beats(symbol)? * DEFAULT_BEAT_SCALE / tempo)
}
