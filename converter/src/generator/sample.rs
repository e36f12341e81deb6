use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic measurement file: a single main
/// lobe at boresight with a configurable rolloff, usable for offline runs
/// and end-to-end tests without real measurement data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub name: String,
    pub frequency_mhz: f64,
    pub gain_dbi: f64,
    pub azimuth_step_deg: f64,
    pub elevation_step_deg: f64,
    /// Lobe sharpness: loss = -20 * exponent * log10(cos(angle)).
    pub beam_exponent: f64,
    /// Loss cap applied behind the antenna and in deep nulls.
    pub floor_db: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            name: "synthetic panel".into(),
            frequency_mhz: 1850.0,
            gain_dbi: 17.0,
            azimuth_step_deg: 10.0,
            elevation_step_deg: 10.0,
            beam_exponent: 2.0,
            floor_db: 40.0,
            noise: 0.0,
            seed: 0,
        }
    }
}

/// Builds the two cuts as (angle, loss) pairs the way an MSI file records
/// them: azimuth over [0, 360), elevation over [-90, 90]. Loss is pinned to
/// zero at boresight so the reconstruction requirements always hold.
pub fn build_sample_cuts(config: &SampleConfig) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut jitter = |at_boresight: bool| -> f64 {
        if at_boresight || config.noise <= 0.0 {
            0.0
        } else {
            rng.gen_range(0.0..config.noise)
        }
    };

    let mut horizontal = Vec::new();
    let mut azimuth = 0.0;
    while azimuth < 360.0 {
        let loss = lobe_loss(azimuth, config) + jitter(azimuth == 0.0);
        horizontal.push((azimuth, loss));
        azimuth += config.azimuth_step_deg;
    }

    let mut vertical = Vec::new();
    let mut elevation = -90.0;
    while elevation <= 90.0 {
        let loss = lobe_loss(elevation, config) + jitter(elevation == 0.0);
        vertical.push((elevation, loss));
        elevation += config.elevation_step_deg;
    }

    (horizontal, vertical)
}

/// Writes a synthetic pattern in MSI Planet format.
pub fn write_sample_msi(path: &Path, config: &SampleConfig) -> anyhow::Result<()> {
    let (horizontal, vertical) = build_sample_cuts(config);

    let mut text = String::new();
    let _ = writeln!(text, "NAME {}", config.name);
    let _ = writeln!(text, "FREQUENCY {:.2}", config.frequency_mhz);
    let _ = writeln!(text, "GAIN {:.2} dBi", config.gain_dbi);
    let _ = writeln!(text, "COMMENT synthetic pattern for offline runs");
    let _ = writeln!(text, "HORIZONTAL {}", horizontal.len());
    for (angle, loss) in &horizontal {
        let _ = writeln!(text, "{angle:.1} {loss:.2}");
    }
    let _ = writeln!(text, "VERTICAL {}", vertical.len());
    for (angle, loss) in &vertical {
        let _ = writeln!(text, "{angle:.1} {loss:.2}");
    }

    fs::write(path, text)
        .with_context(|| format!("writing synthetic measurement {}", path.display()))
}

fn lobe_loss(angle_deg: f64, config: &SampleConfig) -> f64 {
    let projection = angle_deg.to_radians().cos();
    if projection <= 0.0 {
        config.floor_db
    } else {
        (-20.0 * config.beam_exponent * projection.log10()).min(config.floor_db)
    }
}
