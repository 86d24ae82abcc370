pub mod ast;
pub mod config;
pub mod dsp;
pub mod error;
pub mod parser;
pub mod score;
pub mod wav;

use crate::config::RenderConfig;
use crate::dsp::mixer::ChannelMatrix;
use crate::error::SheetSynthError;
use crate::score::Score;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the sheetsynth version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Parse one channel of sheet music.
pub fn parse(input: &str) -> Result<ast::Sheet, SheetSynthError> {
    Ok(parser::parse_sheet(input)?)
}

/// Parse and render a treble/bass pair. `None` marks a missing channel.
pub fn render_sources(
    treble: Option<&str>,
    bass: Option<&str>,
    config: &RenderConfig,
) -> Result<ChannelMatrix, SheetSynthError> {
    let treble = treble.map(parse).transpose()?;
    let bass = bass.map(parse).transpose()?;
    Score::treble_bass(treble, bass).render(config)
}

fn js_config(config_json: &str) -> Result<RenderConfig, JsValue> {
    if config_json.trim().is_empty() {
        return Ok(RenderConfig::default());
    }
    RenderConfig::from_json_str(config_json).map_err(|e| JsValue::from_str(&format!("{e}")))
}

fn js_source(source: &str) -> Option<&str> {
    if source.trim().is_empty() { None } else { Some(source) }
}

/// WASM-exposed: parse sheet music into a JS object (`{ bars: [...] }`).
#[wasm_bindgen]
pub fn parse_sheet_json(source: &str) -> Result<JsValue, JsValue> {
    let sheet = parse(source).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&sheet).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render treble and bass to interleaved stereo f32 samples.
/// An empty source string is a missing channel.
#[wasm_bindgen]
pub fn render_sheet_samples(treble: &str, bass: &str, config_json: &str) -> Result<Vec<f32>, JsValue> {
    let config = js_config(config_json)?;
    let matrix = render_sources(js_source(treble), js_source(bass), &config)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(matrix.interleaved().iter().map(|&s| s as f32).collect())
}

/// WASM-exposed: render treble and bass to a complete WAV file.
#[wasm_bindgen]
pub fn render_sheet_wav(treble: &str, bass: &str, config_json: &str) -> Result<Vec<u8>, JsValue> {
    let config = js_config(config_json)?;
    let matrix = render_sources(js_source(treble), js_source(bass), &config)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    wav::encode_wav(&matrix, config.sample_rate, config.sample_format)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{SynthParams, Waveform};
    use crate::error::ScoreError;
    use std::f64::consts::PI;

    fn sine_at(sample_rate: u32) -> RenderConfig {
        RenderConfig {
            tempo: 120.0,
            sample_rate,
            synth: SynthParams {
                waveform: Waveform::Sine,
                amplitude: 1.0,
                decay: 0.0,
            },
            ..RenderConfig::default()
        }
    }

    #[test]
    fn c4_quarter_at_rate_8() {
        let matrix = render_sources(Some("C4,q"), None, &sine_at(8)).unwrap();
        let treble = matrix.channel("treble").unwrap();
        assert_eq!(treble.len(), 4);

        let f = 440.0 * 2.0_f64.powf(-9.0 / 12.0);
        for (i, t) in [0.0, 0.5 / 3.0, 1.0 / 3.0, 0.5].iter().enumerate() {
            let want = (2.0 * PI * f * t).sin();
            assert!((treble[i] - want).abs() < 1e-9, "sample {i}: {} vs {want}", treble[i]);
        }
        assert!(matrix.channel("bass").unwrap().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn chord_half_note_is_sum() {
        let config = sine_at(1000);
        let chord = render_sources(Some("C4+E4,h"), None, &config).unwrap();
        let c = render_sources(Some("C4,h"), None, &config).unwrap();
        let e = render_sources(Some("E4,h"), None, &config).unwrap();
        let chord = chord.channel("treble").unwrap();
        let c = c.channel("treble").unwrap();
        let e = e.channel("treble").unwrap();
        assert_eq!(chord.len(), c.len());
        for i in 0..chord.len() {
            assert!((chord[i] - (c[i] + e[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn parse_errors_surface() {
        assert!(matches!(
            render_sources(Some("C4"), None, &sine_at(8)),
            Err(SheetSynthError::Parse(_))
        ));
    }

    #[test]
    fn nothing_to_render() {
        assert!(matches!(
            render_sources(None, None, &sine_at(8)),
            Err(SheetSynthError::Score(ScoreError::NoInput))
        ));
    }

    #[test]
    fn version_is_set() {
        assert_eq!(core_version(), VERSION);
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn blank_source_is_missing() {
        assert_eq!(js_source("  \n"), None);
        assert_eq!(js_source("C4,q"), Some("C4,q"));
    }
}
