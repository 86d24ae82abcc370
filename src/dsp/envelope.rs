//! Exponential decay envelope.

/// `gain(t) = exp(-rate * t)`; a rate of 0 leaves the tone untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayEnvelope {
    /// Decay rate in 1/s.
    pub rate: f64,
}

impl DecayEnvelope {
    pub fn new(rate: f64) -> Self {
        DecayEnvelope { rate }
    }

    pub fn is_flat(&self) -> bool {
        self.rate == 0.0
    }

    pub fn gain(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }

    /// Multiply `samples` pointwise by the envelope evaluated on `time`.
    pub fn apply(&self, time: &[f64], samples: &mut [f64]) {
        if self.is_flat() {
            return;
        }
        for (s, &t) in samples.iter_mut().zip(time) {
            *s *= self.gain(t);
        }
    }
}
