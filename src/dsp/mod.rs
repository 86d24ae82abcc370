//! Synthesis core — tuning tables, waveform synthesis, chord composition,
//! channel rendering and channel pairing.
//!
//! Everything here is pure and synchronous: inputs are fully buffered and
//! outputs are plain sample vectors.

pub mod composer;
pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod renderer;
pub mod tuning;
