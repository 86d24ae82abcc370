use serde::{Deserialize, Serialize};

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One parsed sheet-music file: the bars of a single channel, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub bars: Vec<Bar>,
}

/// `C4+E4+G4,h` — one or more notes sharing a single duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub notes: Vec<String>,
    pub duration: String,
    /// 1-based source line.
    pub line: usize,
    pub span: Span,
}

impl Bar {
    /// Build a bar without source information (programmatic scores, tests).
    pub fn new<N: Into<String>>(notes: impl IntoIterator<Item = N>, duration: &str) -> Self {
        Bar {
            notes: notes.into_iter().map(Into::into).collect(),
            duration: duration.to_string(),
            line: 0,
            span: Span { start: 0, end: 0 },
        }
    }

    pub fn is_chord(&self) -> bool {
        self.notes.len() > 1
    }
}

impl Sheet {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
