use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Antenna gain as stated in the measurement file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gain {
    pub value: f64,
    pub unit: String,
}

/// Acquisition parameters carried alongside the pattern cuts.
///
/// The pipeline itself consumes only `frequency_hz`, and only to thread it
/// into the run summary; every other field is preserved so callers can label
/// their output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternMetadata {
    pub frequency_hz: Option<f64>,
    pub name: Option<String>,
    pub make: Option<String>,
    pub gain: Option<Gain>,
    pub h_width_deg: Option<f64>,
    pub v_width_deg: Option<f64>,
    pub front_to_back_db: Option<f64>,
    pub tilt: Option<String>,
    pub polarization: Option<String>,
    pub comment: Option<String>,
    /// Keywords the parser does not recognize, kept verbatim.
    pub extras: BTreeMap<String, String>,
}

impl PatternMetadata {
    /// Gain value in dB used to convert recorded losses into magnitudes.
    /// Files without a GAIN line are treated as peak-referenced (0 dB).
    pub fn gain_db(&self) -> f64 {
        self.gain.as_ref().map(|g| g.value).unwrap_or(0.0)
    }
}
