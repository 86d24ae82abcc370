//! Render configuration. Every render takes one of these explicitly; nothing
//! is read from process-wide state.

use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::{SynthParams, Synthesizer};
use crate::dsp::tuning::{DEFAULT_BEAT_SCALE, DEFAULT_TUNING_PITCH, DurationTable, FrequencyTable};
use crate::error::ConfigError;

/// 2^16 samples per second.
pub const DEFAULT_SAMPLE_RATE: u32 = 65536;
pub const DEFAULT_TEMPO: f64 = 120.0;

/// How samples are stored in the output WAV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// 32-bit float, written unclipped.
    #[default]
    Float32,
    /// 16-bit integer PCM, clamped to [-1, 1].
    Pcm16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Beats per minute.
    pub tempo: f64,
    /// Numerator of seconds-per-beat: 60 makes the quarter note the beat,
    /// 120 the half note.
    pub beat_scale: f64,
    pub sample_rate: u32,
    /// Frequency of A4 in Hz.
    pub tuning_pitch: f64,
    pub synth: SynthParams,
    pub sample_format: SampleFormat,
    /// Peak-normalize all channels together before writing.
    pub normalize: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            tempo: DEFAULT_TEMPO,
            beat_scale: DEFAULT_BEAT_SCALE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            tuning_pitch: DEFAULT_TUNING_PITCH,
            synth: SynthParams::default(),
            sample_format: SampleFormat::default(),
            normalize: false,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no render could use. A zero tempo passes here and fails
    /// at synthesis time as an invalid duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(invalid("sample_rate", "must be positive"));
        }
        if !(self.beat_scale.is_finite() && self.beat_scale > 0.0) {
            return Err(invalid("beat_scale", "must be a positive number"));
        }
        if !(self.tuning_pitch.is_finite() && self.tuning_pitch > 0.0) {
            return Err(invalid("tuning_pitch", "must be a positive number"));
        }
        if !(self.tempo.is_finite() && self.tempo >= 0.0) {
            return Err(invalid("tempo", "must be a non-negative number"));
        }
        if !(self.synth.amplitude.is_finite() && self.synth.amplitude >= 0.0) {
            return Err(invalid("amplitude", "must be non-negative"));
        }
        if !(self.synth.decay.is_finite() && self.synth.decay >= 0.0) {
            return Err(invalid("decay", "must be non-negative"));
        }
        Ok(())
    }

    /// Build the tables for this config and bind them into a synthesizer.
    pub fn synthesizer(&self) -> Synthesizer {
        let durations = DurationTable::four_four().scaled(self.tempo, self.beat_scale);
        Synthesizer::new(
            FrequencyTable::equal_temperament(self.tuning_pitch),
            durations,
            self.sample_rate,
            self.synth,
        )
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
