use serde::{Deserialize, Serialize};

/// Confidence score clamped to [0.0, 1.0], tracking how confident the system
/// is in a memory's accuracy. Adjusted over time by the decay formula.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Default confidence assigned to a freshly created memory.
    pub const DEFAULT: f64 = 0.5;

    /// Create a new Confidence, clamping to [0.0, 1.0].
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
