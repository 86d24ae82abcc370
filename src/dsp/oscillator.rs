//! Waveform synthesis — one note, one duration, one sampled signal.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::envelope::DecayEnvelope;
use super::tuning::{FrequencyTable, ScaledDurations};
use crate::error::SynthError;

/// Supported waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// In-phase value at phase angle `2πft`, before amplitude scaling.
    fn in_phase(self, frequency: f64, t: f64) -> f64 {
        let angle = 2.0 * PI * frequency * t;
        match self {
            Waveform::Sine => angle.sin(),
            Waveform::Square => sign(angle.sin()),
            Waveform::Sawtooth => sawtooth(frequency * t),
            Waveform::Triangle => sawtooth(frequency * t).abs(),
        }
    }

    /// Quadrature value; only the sine has one.
    fn quadrature(self, frequency: f64, t: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * frequency * t).cos(),
            _ => 0.0,
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        };
        f.write_str(name)
    }
}

impl FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            other => Err(format!("unknown waveform '{other}'")),
        }
    }
}

/// Sign with `sign(0) = 0`, unlike `f64::signum`.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Rising ramp from -1 to +1 over each cycle; `cycles` = f·t.
fn sawtooth(cycles: f64) -> f64 {
    2.0 * (cycles - cycles.floor()) - 1.0
}

/// Per-tone shape parameters, passed explicitly into every synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthParams {
    pub waveform: Waveform,
    /// Peak amplitude (≥ 0).
    pub amplitude: f64,
    /// Exponential decay rate in 1/s (≥ 0, 0 = sustained).
    pub decay: f64,
}

impl Default for SynthParams {
    fn default() -> Self {
        SynthParams {
            waveform: Waveform::Sine,
            amplitude: 1.0,
            decay: 0.5,
        }
    }
}

/// A sampled tone. `real` is the component that feeds composition; `imag` is
/// the quadrature component (zero for every shape but sine).
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub time: Vec<f64>,
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

impl Signal {
    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.real
    }
}

/// `round(seconds * sample_rate)`, rejecting anything that is not a positive count.
pub fn sample_count(seconds: f64, sample_rate: u32) -> Result<usize, SynthError> {
    let count = (seconds * sample_rate as f64).round();
    if !count.is_finite() || count < 1.0 {
        return Err(SynthError::InvalidDuration {
            seconds,
            sample_rate,
        });
    }
    Ok(count as usize)
}

/// `points` evenly spaced values from 0 to `seconds`, both ends included.
pub fn time_axis(seconds: f64, points: usize) -> Vec<f64> {
    if points < 2 {
        return vec![0.0; points];
    }
    let step = seconds / (points - 1) as f64;
    (0..points).map(|i| i as f64 * step).collect()
}

/// Synthesize a tone of `frequency` Hz lasting `seconds`.
///
/// A frequency of 0 is a rest: the full-length signal is silent.
pub fn synthesize(
    frequency: f64,
    seconds: f64,
    sample_rate: u32,
    params: &SynthParams,
) -> Result<Signal, SynthError> {
    let points = sample_count(seconds, sample_rate)?;
    let time = time_axis(seconds, points);

    if frequency == 0.0 {
        return Ok(Signal {
            real: vec![0.0; points],
            imag: vec![0.0; points],
            time,
        });
    }

    let amplitude = params.amplitude;
    let mut real: Vec<f64> = time
        .iter()
        .map(|&t| amplitude * params.waveform.in_phase(frequency, t))
        .collect();
    let mut imag: Vec<f64> = time
        .iter()
        .map(|&t| amplitude * params.waveform.quadrature(frequency, t))
        .collect();

    let envelope = DecayEnvelope::new(params.decay);
    envelope.apply(&time, &mut real);
    envelope.apply(&time, &mut imag);

    Ok(Signal { time, real, imag })
}

/// Resolves note and duration names through the tuning tables, then synthesizes.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    pub frequencies: FrequencyTable,
    pub durations: ScaledDurations,
    pub sample_rate: u32,
    pub params: SynthParams,
}

impl Synthesizer {
    pub fn new(
        frequencies: FrequencyTable,
        durations: ScaledDurations,
        sample_rate: u32,
        params: SynthParams,
    ) -> Self {
        Synthesizer {
            frequencies,
            durations,
            sample_rate,
            params,
        }
    }

    /// Synthesize one `(note, duration)` pair.
    pub fn tone(&self, note: &str, duration: &str) -> Result<Signal, SynthError> {
        let frequency = self.frequencies.frequency(note)?;
        let seconds = self.durations.seconds(duration)?;
        synthesize(frequency, seconds, self.sample_rate, &self.params)
    }

    /// Samples a bar of `duration` will occupy.
    pub fn samples_for(&self, duration: &str) -> Result<usize, SynthError> {
        sample_count(self.durations.seconds(duration)?, self.sample_rate)
    }
}
