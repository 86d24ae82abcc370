//! `sheetsynth` — render treble and bass sheet music into a stereo WAV file.
//!
//! ```text
//! sheetsynth --treble tol3.txt --bass tolb.txt --tempo 120 --out song.wav
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{debug, error, warn};

use sheetsynth::ast::Sheet;
use sheetsynth::config::{RenderConfig, SampleFormat};
use sheetsynth::dsp::oscillator::Waveform;
use sheetsynth::error::{ConfigError, SheetSynthError};
use sheetsynth::parser::parse_sheet;
use sheetsynth::score::{BASS, Score, TREBLE};
use sheetsynth::wav::write_wav;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Treble (left channel) sheet music
    #[arg(short = 'r', long)]
    treble: Option<PathBuf>,

    /// Bass (right channel) sheet music
    #[arg(short, long)]
    bass: Option<PathBuf>,

    /// Tempo in beats per minute
    #[arg(short, long)]
    tempo: Option<f64>,

    /// Output WAV file
    #[arg(short, long, default_value = "song.wav")]
    out: PathBuf,

    /// sine, square, sawtooth or triangle (sin, saw and tri also work)
    #[arg(short, long)]
    waveform: Option<Waveform>,

    /// Peak amplitude of each note
    #[arg(short, long)]
    amplitude: Option<f64>,

    /// Exponential decay rate in 1/s (0 disables)
    #[arg(short, long)]
    decay: Option<f64>,

    /// Samples per second
    #[arg(short, long)]
    sample_rate: Option<u32>,

    /// Seconds-per-beat numerator: 60 = quarter-note beat, 120 = half-note beat
    #[arg(long)]
    beat_scale: Option<f64>,

    /// Frequency of A4 in Hz
    #[arg(long)]
    tuning: Option<f64>,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Peak-normalize the output
    #[arg(long)]
    normalize: bool,

    /// JSON render config; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every bar
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy)]
enum FormatArg {
    Float32,
    Pcm16,
}

impl From<FormatArg> for SampleFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Float32 => SampleFormat::Float32,
            FormatArg::Pcm16 => SampleFormat::Pcm16,
        }
    }
}

impl Cli {
    fn render_config(&self) -> Result<RenderConfig, SheetSynthError> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|e| ConfigError::Invalid {
                    field: "config",
                    reason: format!("{}: {e}", path.display()),
                })?;
                RenderConfig::from_json_str(&json)?
            }
            None => RenderConfig::default(),
        };
        if let Some(tempo) = self.tempo {
            config.tempo = tempo;
        }
        if let Some(beat_scale) = self.beat_scale {
            config.beat_scale = beat_scale;
        }
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        if let Some(tuning) = self.tuning {
            config.tuning_pitch = tuning;
        }
        if let Some(waveform) = self.waveform {
            config.synth.waveform = waveform;
        }
        if let Some(amplitude) = self.amplitude {
            config.synth.amplitude = amplitude;
        }
        if let Some(decay) = self.decay {
            config.synth.decay = decay;
        }
        if let Some(format) = self.format {
            config.sample_format = format.into();
        }
        config.normalize |= self.normalize;
        config.validate()?;
        debug!("render config:\n{}", config.to_json_pretty()?);
        Ok(config)
    }
}

/// Outcome of loading one channel: a sheet, a missing source, or a parse
/// failure that has already been reported.
enum Loaded {
    Sheet(Sheet),
    Missing,
    Invalid,
}

fn load_channel(name: &str, path: Option<&Path>) -> Loaded {
    let Some(path) = path else {
        warn!("no {name} file given");
        return Loaded::Missing;
    };
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            warn!("cannot read {name} file {}: {e}", path.display());
            return Loaded::Missing;
        }
    };
    let source_name = path.display().to_string();
    match parse_sheet(&source) {
        Ok(sheet) => Loaded::Sheet(sheet),
        Err(e) => {
            e.eprint(&source_name, &source);
            Loaded::Invalid
        }
    }
}

fn run(cli: &Cli) -> Result<bool, SheetSynthError> {
    let config = cli.render_config()?;

    let mut score = Score::new();
    let mut valid = true;
    for (name, path) in [(TREBLE, cli.treble.as_deref()), (BASS, cli.bass.as_deref())] {
        let sheet = match load_channel(name, path) {
            Loaded::Sheet(sheet) => Some(sheet),
            Loaded::Missing => None,
            Loaded::Invalid => {
                valid = false;
                None
            }
        };
        score = score.with_channel(name, sheet);
    }
    if !valid {
        return Ok(false);
    }

    let matrix = score.render(&config)?;
    write_wav(&cli.out, &matrix, config.sample_rate, config.sample_format)?;
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
