use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Error)]
pub enum SheetSynthError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Synthesis error: {0}")]
    Synth(#[from] SynthError),
    #[error("Score error: {0}")]
    Score(#[from] ScoreError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Syntax errors in sheet-music text. Spans are byte offsets into the source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected `chord,duration` at line {line}")]
    MissingDuration { line: usize, span: Span },
    #[error("unexpected extra field at line {line}")]
    TrailingField { line: usize, span: Span },
    #[error("empty note in chord at line {line}")]
    EmptyNote { line: usize, span: Span },
    #[error("empty duration at line {line}")]
    EmptyDuration { line: usize, span: Span },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("unknown note '{0}'")]
    UnknownNote(String),
    #[error("unknown duration '{0}'")]
    UnknownDuration(String),
    #[error("duration of {seconds}s at {sample_rate} Hz yields no samples")]
    InvalidDuration { seconds: f64, sample_rate: u32 },
    #[error("chord note '{note}' rendered {found} samples, expected {expected}")]
    ChordLengthMismatch {
        note: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("no channel input available")]
    NoInput,
    #[error("channel '{left}' has {left_len} samples but '{right}' has {right_len}")]
    ChannelLengthMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Wav(#[from] hound::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::MissingDuration { span, .. }
            | ParseError::TrailingField { span, .. }
            | ParseError::EmptyNote { span, .. }
            | ParseError::EmptyDuration { span, .. } => *span,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ParseError::MissingDuration { .. } => "add a duration after a comma, e.g. `C4,q`",
            ParseError::TrailingField { .. } => "only one comma is allowed per line",
            ParseError::EmptyNote { .. } => "a note name is missing here",
            ParseError::EmptyDuration { .. } => "a duration symbol is missing here",
        }
    }

    /// Render this error as a source-annotated report (no ANSI colour).
    pub fn report(&self, source_name: &str, source: &str) -> String {
        let mut out = Vec::new();
        let written = self
            .build_report(source_name, source, false)
            .write((source_name, Source::from(source)), &mut out);
        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => format!("{source_name}: {self}"),
        }
    }

    /// Print a coloured report to stderr.
    pub fn eprint(&self, source_name: &str, source: &str) {
        let printed = self
            .build_report(source_name, source, true)
            .eprint((source_name, Source::from(source)));
        if printed.is_err() {
            eprintln!("{source_name}: {self}");
        }
    }

    fn build_report<'a>(
        &self,
        source_name: &'a str,
        source: &str,
        color: bool,
    ) -> Report<'a, (&'a str, Range<usize>)> {
        let span = self.span();
        // ariadne wants a non-empty range inside the source
        let end = span.end.max(span.start + 1).min(source.len().max(1));
        let range = span.start.min(end.saturating_sub(1))..end;
        Report::build(ReportKind::Error, (source_name, range.clone()))
            .with_config(Config::default().with_color(color))
            .with_message(self.to_string())
            .with_label(Label::new((source_name, range)).with_message(self.label()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_lifts_into_top_level() {
        fn parse() -> Result<(), SheetSynthError> {
            let parsed: Result<(), ParseError> = Err(ParseError::EmptyNote {
                line: 3,
                span: Span { start: 0, end: 1 },
            });
            parsed?;
            Ok(())
        }
        let err = parse().unwrap_err();
        assert!(matches!(err, SheetSynthError::Parse(ParseError::EmptyNote { line: 3, .. })));
        assert_eq!(err.to_string(), "Parse error: empty note in chord at line 3");
    }

    #[test]
    fn report_names_source_and_message() {
        let src = "C4,q\nE4\n";
        let err = ParseError::MissingDuration {
            line: 2,
            span: Span { start: 5, end: 7 },
        };
        let report = err.report("treble.txt", src);
        assert!(report.contains("treble.txt"), "report should name the file:\n{report}");
        assert!(report.contains("expected `chord,duration` at line 2"));
        assert!(report.contains("add a duration"));
    }

    #[test]
    fn report_survives_span_at_end_of_source() {
        let src = "C4,";
        let err = ParseError::EmptyDuration {
            line: 1,
            span: Span { start: 3, end: 3 },
        };
        let report = err.report("bass.txt", src);
        assert!(report.contains("empty duration"));
    }

    #[test]
    fn synth_error_messages() {
        assert_eq!(SynthError::UnknownNote("H4".into()).to_string(), "unknown note 'H4'");
        let e = SynthError::InvalidDuration {
            seconds: 0.0,
            sample_rate: 8,
        };
        assert!(e.to_string().contains("yields no samples"));
    }
}
