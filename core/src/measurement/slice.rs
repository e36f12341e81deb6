use serde::{Deserialize, Serialize};

use crate::prelude::{PatternError, PatternResult};

/// One principal-plane pattern cut: magnitude (dB) sampled against a rotation
/// angle (degrees). The horizontal cut is azimuth-indexed, the vertical cut
/// elevation-indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngularSlice {
    pub angles: Vec<f64>,
    pub magnitude: Vec<f64>,
}

impl AngularSlice {
    /// Builds a slice, enforcing that angles and magnitudes pair up.
    pub fn new(angles: Vec<f64>, magnitude: Vec<f64>) -> PatternResult<Self> {
        if angles.len() != magnitude.len() {
            return Err(PatternError::InvalidSlice(format!(
                "angle/magnitude length mismatch: {} vs {}",
                angles.len(),
                magnitude.len()
            )));
        }
        Ok(Self { angles, magnitude })
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}
