//! Sheet-music parser.
//!
//! Format, one bar per line:
//!
//! ```text
//! # comment
//! C4,q
//! C#4+E4+G#4,h   # C# minor
//! O,q
//! ```
//!
//! Blank lines are ignored. `#` opens a comment only at the start of a line
//! or after whitespace, so sharps like `C#4` are note text.
//!
//! Note and duration names are not resolved here; the tuning tables do that
//! when the bar is synthesized.

use crate::ast::{Bar, Sheet, Span};
use crate::error::ParseError;

/// Joins the notes of a chord.
pub const CHORD_OPERATOR: char = '+';
/// Separates the chord from its duration.
pub const FIELD_SEPARATOR: char = ',';
const COMMENT: char = '#';

pub struct Parser<'a> {
    source: &'a str,
    /// Byte offset of the current line.
    offset: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            source,
            offset: 0,
            line: 0,
        }
    }

    pub fn parse_sheet(&mut self) -> Result<Sheet, ParseError> {
        let mut bars = Vec::new();
        let source = self.source;
        for raw in source.split_inclusive('\n') {
            self.line += 1;
            let start = self.offset;
            self.offset += raw.len();

            let content = strip_comment(raw);
            if let Some(bar) = self.parse_line(content, start)? {
                bars.push(bar);
            }
        }
        Ok(Sheet { bars })
    }

    fn parse_line(&self, content: &str, line_start: usize) -> Result<Option<Bar>, ParseError> {
        let (lead, body) = trim(content);
        if body.is_empty() {
            return Ok(None);
        }
        let body_start = line_start + lead;
        let span = Span {
            start: body_start,
            end: body_start + body.len(),
        };

        let mut fields = body.splitn(3, FIELD_SEPARATOR);
        let chord = fields.next().unwrap_or("");
        let Some(duration) = fields.next() else {
            return Err(ParseError::MissingDuration {
                line: self.line,
                span,
            });
        };
        if let Some(extra) = fields.next() {
            let extra_start = body_start + chord.len() + 1 + duration.len();
            return Err(ParseError::TrailingField {
                line: self.line,
                span: Span {
                    start: extra_start,
                    end: extra_start + 1 + extra.len(),
                },
            });
        }

        let notes = self.parse_chord(chord, body_start)?;

        let duration_start = body_start + chord.len() + 1;
        let (_, symbol) = trim(duration);
        if symbol.is_empty() {
            return Err(ParseError::EmptyDuration {
                line: self.line,
                span: Span {
                    start: duration_start,
                    end: duration_start + duration.len(),
                },
            });
        }

        Ok(Some(Bar {
            notes,
            duration: symbol.to_string(),
            line: self.line,
            span,
        }))
    }

    fn parse_chord(&self, chord: &str, chord_start: usize) -> Result<Vec<String>, ParseError> {
        let mut notes = Vec::new();
        let mut at = chord_start;
        for part in chord.split(CHORD_OPERATOR) {
            let (_, name) = trim(part);
            if name.is_empty() {
                return Err(ParseError::EmptyNote {
                    line: self.line,
                    span: Span {
                        start: at,
                        end: at + part.len(),
                    },
                });
            }
            notes.push(name.to_string());
            at += part.len() + CHORD_OPERATOR.len_utf8();
        }
        Ok(notes)
    }
}

/// Cut a trailing comment. The kept text is a prefix, so offsets still hold.
fn strip_comment(line: &str) -> &str {
    let mut prev_is_space = true;
    for (i, c) in line.char_indices() {
        if c == COMMENT && prev_is_space {
            return &line[..i];
        }
        prev_is_space = c.is_whitespace();
    }
    line
}

/// Trim surrounding whitespace, returning the number of leading bytes removed.
fn trim(s: &str) -> (usize, &str) {
    let start = s.trim_start();
    (s.len() - start.len(), start.trim_end())
}

/// Parse one channel's sheet music.
pub fn parse_sheet(source: &str) -> Result<Sheet, ParseError> {
    Parser::new(source).parse_sheet()
}
