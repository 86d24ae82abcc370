//! Score assembly — render each channel independently, substitute silence
//! for missing channels, then pair the results into one channel matrix.

use log::warn;

use crate::ast::Sheet;
use crate::config::RenderConfig;
use crate::dsp::mixer::ChannelMatrix;
use crate::dsp::renderer::render_channel;
use crate::error::{ScoreError, SheetSynthError};

pub const TREBLE: &str = "treble";
pub const BASS: &str = "bass";

/// A named channel slot. `sheet` is `None` when its source was missing or
/// unreadable.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSlot {
    pub name: String,
    pub sheet: Option<Sheet>,
}

/// Channel slots in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    pub channels: Vec<ChannelSlot>,
}

impl Score {
    pub fn new() -> Self {
        Score::default()
    }

    /// The conventional two-channel layout: treble left, bass right.
    pub fn treble_bass(treble: Option<Sheet>, bass: Option<Sheet>) -> Self {
        Score::new().with_channel(TREBLE, treble).with_channel(BASS, bass)
    }

    pub fn with_channel(mut self, name: &str, sheet: Option<Sheet>) -> Self {
        self.channels.push(ChannelSlot {
            name: name.to_string(),
            sheet,
        });
        self
    }

    /// Names of the channels with no sheet, in output order.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.channels
            .iter()
            .filter(|c| c.sheet.is_none())
            .map(|c| c.name.as_str())
    }

    /// Render every present channel, fill missing ones with silence as long as
    /// the first rendered channel, and pair them sample-for-sample.
    ///
    /// Fails with `NoInput` when no channel is present and with
    /// `ChannelLengthMismatch` when the rendered channels disagree in length.
    pub fn render(&self, config: &RenderConfig) -> Result<ChannelMatrix, SheetSynthError> {
        config.validate()?;
        if self.missing().count() == self.channels.len() {
            return Err(ScoreError::NoInput.into());
        }

        let synth = config.synthesizer();
        let mut rendered = Vec::with_capacity(self.channels.len());
        for slot in &self.channels {
            let wave = match &slot.sheet {
                Some(sheet) => Some(render_channel(&synth, &slot.name, sheet)?),
                None => None,
            };
            rendered.push((slot.name.clone(), wave));
        }

        let silence_len = rendered
            .iter()
            .find_map(|(_, wave)| wave.as_ref().map(Vec::len))
            .unwrap_or(0);

        let named = rendered
            .into_iter()
            .map(|(name, wave)| {
                let wave = wave.unwrap_or_else(|| {
                    warn!("channel '{name}' has no input; substituting {silence_len} samples of silence");
                    vec![0.0; silence_len]
                });
                (name, wave)
            })
            .collect();

        let mut matrix = ChannelMatrix::new(named)?;
        if config.normalize {
            matrix.normalize();
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{SynthParams, Waveform};
    use crate::error::SynthError;
    use crate::parser::parse_sheet;

    fn config() -> RenderConfig {
        RenderConfig {
            sample_rate: 1000,
            synth: SynthParams {
                waveform: Waveform::Sine,
                amplitude: 1.0,
                decay: 0.0,
            },
            ..RenderConfig::default()
        }
    }

    fn sheet(src: &str) -> Option<Sheet> {
        Some(parse_sheet(src).unwrap())
    }

    #[test]
    fn two_channels_pair_up() {
        let score = Score::treble_bass(sheet("C5,q\nE5,q\n"), sheet("C3,h\n"));
        let m = score.render(&config()).unwrap();
        assert_eq!(m.channel_count(), 2);
        assert_eq!(m.frame_count(), 1000);
        assert_eq!(m.names(), &["treble".to_string(), "bass".to_string()]);
    }

    #[test]
    fn missing_bass_becomes_silence() {
        let score = Score::treble_bass(sheet("C4+E4,h\n"), None);
        let m = score.render(&config()).unwrap();
        let treble = m.channel(TREBLE).unwrap();
        let bass = m.channel(BASS).unwrap();
        assert_eq!(treble.len(), bass.len());
        assert!(bass.iter().all(|&s| s == 0.0));
        assert!(treble.iter().any(|&s| s != 0.0));
        assert_eq!(score.missing().collect::<Vec<_>>(), vec!["bass"]);
    }

    #[test]
    fn missing_treble_matches_bass_length() {
        let score = Score::treble_bass(None, sheet("C2,w\n"));
        let m = score.render(&config()).unwrap();
        assert_eq!(m.channel(TREBLE).unwrap().len(), 2000);
        assert!(m.channel(TREBLE).unwrap().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn both_missing_is_no_input() {
        let score = Score::treble_bass(None, None);
        assert!(matches!(
            score.render(&config()),
            Err(SheetSynthError::Score(ScoreError::NoInput))
        ));
        assert!(matches!(
            Score::new().render(&config()),
            Err(SheetSynthError::Score(ScoreError::NoInput))
        ));
    }

    #[test]
    fn unequal_channels_are_fatal() {
        let score = Score::treble_bass(sheet("C4,q\n"), sheet("C3,h\n"));
        match score.render(&config()) {
            Err(SheetSynthError::Score(ScoreError::ChannelLengthMismatch {
                left_len,
                right_len,
                ..
            })) => {
                assert_eq!(left_len, 500);
                assert_eq!(right_len, 1000);
            }
            other => panic!("Expected ChannelLengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_sheet_is_present_but_empty() {
        let score = Score::treble_bass(sheet(""), None);
        let m = score.render(&config()).unwrap();
        assert_eq!(m.frame_count(), 0);
    }

    #[test]
    fn synthesis_errors_abort_the_render() {
        let score = Score::treble_bass(sheet("C4,q\nQ4,q\n"), sheet("C3,h\n"));
        assert!(matches!(
            score.render(&config()),
            Err(SheetSynthError::Synth(SynthError::UnknownNote(note))) if note == "Q4"
        ));
    }

    #[test]
    fn zero_tempo_fails_as_invalid_duration() {
        let score = Score::treble_bass(sheet("C4,q\n"), None);
        let config = RenderConfig {
            tempo: 0.0,
            ..config()
        };
        assert!(matches!(
            score.render(&config),
            Err(SheetSynthError::Synth(SynthError::InvalidDuration { .. }))
        ));
    }

    #[test]
    fn normalize_scales_to_unit_peak() {
        let score = Score::treble_bass(sheet("C4+E4+G4,h\n"), sheet("C3,h\n"));
        let config = RenderConfig {
            normalize: true,
            ..config()
        };
        let m = score.render(&config).unwrap();
        assert!((m.peak() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn three_channel_score() {
        let score = Score::new()
            .with_channel("lead", sheet("A4,q\n"))
            .with_channel("pad", None)
            .with_channel("bass", sheet("A2,q\n"));
        let m = score.render(&config()).unwrap();
        assert_eq!(m.channel_count(), 3);
        assert_eq!(m.interleaved().len(), 3 * 500);
    }
}
