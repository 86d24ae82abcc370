//! Mixer — pairs rendered channels sample-for-sample into a multi-channel
//! matrix. Channels are never summed into each other.

use crate::error::ScoreError;

/// Equal-length channels, ready for interleaving.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMatrix {
    names: Vec<String>,
    channels: Vec<Vec<f64>>,
}

impl ChannelMatrix {
    /// Pair channels index-for-index. Every channel must have the same length.
    pub fn new(named: Vec<(String, Vec<f64>)>) -> Result<Self, ScoreError> {
        if let Some((first_name, first)) = named.first() {
            for (name, samples) in &named[1..] {
                if samples.len() != first.len() {
                    return Err(ScoreError::ChannelLengthMismatch {
                        left: first_name.clone(),
                        left_len: first.len(),
                        right: name.clone(),
                        right_len: samples.len(),
                    });
                }
            }
        }
        let (names, channels) = named.into_iter().unzip();
        Ok(ChannelMatrix { names, channels })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.channels[i].as_slice())
    }

    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Row `i` of the matrix: one sample from each channel, or `None` past
    /// the last frame.
    pub fn frame(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.frame_count() {
            return None;
        }
        self.channels.iter().map(|c| c.get(i).copied()).collect()
    }

    /// Samples in frame order: `[c0[0], c1[0], c0[1], c1[1], …]`.
    pub fn interleaved(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.frame_count() * self.channel_count());
        for i in 0..self.frame_count() {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }

    /// Largest absolute sample across all channels.
    pub fn peak(&self) -> f64 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0_f64, |peak, &s| peak.max(s.abs()))
    }

    /// Scale every channel by the same factor so the loudest sample hits 1.0.
    /// Silent matrices are left as-is.
    pub fn normalize(&mut self) {
        let peak = self.peak();
        if peak == 0.0 || !peak.is_finite() {
            return;
        }
        for s in self.channels.iter_mut().flatten() {
            *s /= peak;
        }
    }
}

/// Clamp a sample to [-1, 1] and scale it to 16-bit PCM. The output range is
/// symmetric, so -32768 is never produced.
pub fn to_pcm_i16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(a: &[f64], b: &[f64]) -> Result<ChannelMatrix, ScoreError> {
        ChannelMatrix::new(vec![
            ("treble".to_string(), a.to_vec()),
            ("bass".to_string(), b.to_vec()),
        ])
    }

    #[test]
    fn pairs_index_for_index() {
        let m = matrix(&[1.0, 2.0, 3.0], &[-1.0, -2.0, -3.0]).unwrap();
        assert_eq!(m.channel_count(), 2);
        assert_eq!(m.frame_count(), 3);
        assert_eq!(m.frame(1), Some(vec![2.0, -2.0]));
        assert_eq!(m.frame(3), None);
        assert_eq!(m.interleaved(), vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        assert_eq!(m.channel("bass"), Some(&[-1.0, -2.0, -3.0][..]));
        assert_eq!(m.channel("alto"), None);
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let err = matrix(&[0.0; 4], &[0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            ScoreError::ChannelLengthMismatch {
                left: "treble".to_string(),
                left_len: 4,
                right: "bass".to_string(),
                right_len: 5,
            }
        );
    }

    #[test]
    fn empty_matrix() {
        let m = ChannelMatrix::new(Vec::new()).unwrap();
        assert_eq!(m.frame_count(), 0);
        assert_eq!(m.frame(0), None);
        assert!(m.interleaved().is_empty());
    }

    #[test]
    fn normalize_preserves_balance() {
        let mut m = matrix(&[0.5, -4.0], &[2.0, 1.0]).unwrap();
        m.normalize();
        assert_eq!(m.channels()[0], vec![0.125, -1.0]);
        assert_eq!(m.channels()[1], vec![0.5, 0.25]);
        assert_eq!(m.peak(), 1.0);
    }

    #[test]
    fn normalize_leaves_silence_alone() {
        let mut m = matrix(&[0.0, 0.0], &[0.0, 0.0]).unwrap();
        m.normalize();
        assert!(m.interleaved().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn pcm_conversion_clamps() {
        assert_eq!(to_pcm_i16(0.0), 0);
        assert_eq!(to_pcm_i16(1.0), 32767);
        assert_eq!(to_pcm_i16(-1.0), -32767);
        assert_eq!(to_pcm_i16(3.0), 32767);
        assert_eq!(to_pcm_i16(-3.0), -32767);
        assert_eq!(to_pcm_i16(0.5), 16384);
    }
}
