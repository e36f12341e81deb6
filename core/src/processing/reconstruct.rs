//! Reconstructs an approximate 3D radiation pattern from two orthogonal
//! pattern cuts (vertical cut over polar angle theta, horizontal cut over
//! azimuth phi), both in dB.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::prelude::{PatternError, PatternResult};
use crate::telemetry::log::LogManager;

/// Algorithm used to blend the two cuts into a full angular surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconstructionMethod {
    Summing,
    CrossWeighted,
}

/// Tuning knobs for the reconstruction, all in degrees / dB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructOptions {
    pub method: ReconstructionMethod,
    /// Normalization exponent `k` for the cross-weighted method.
    pub cross_weighted_normalization: f64,
    pub tol_nearest_angle_from_boresight: f64,
    pub tol_gain_max_vs_boresight: f64,
    /// (advisory, fatal) gain gap where the two cuts intersect.
    pub tol_gain_diff_at_slice_intersect: (f64, f64),
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            method: ReconstructionMethod::Summing,
            cross_weighted_normalization: 2.0,
            tol_nearest_angle_from_boresight: 10.0,
            tol_gain_max_vs_boresight: 3.0,
            tol_gain_diff_at_slice_intersect: (1.0, 3.0),
        }
    }
}

/// Reconstructed pattern: rows follow phi, columns follow the kept theta
/// samples (theta mod 360 <= 180).
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub pattern: Array2<f64>,
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
}

/// Builds the 3D pattern grid from the two cuts.
///
/// `horiz_slice` may be omitted (azimuthal symmetry at the vertical cut's
/// peak) or given as a single value broadcast over phi. `phi` defaults to
/// 0..=360 in 5 degree steps when omitted.
pub fn pattern_from_slices(
    vert_slice: &[f64],
    theta: &[f64],
    horiz_slice: Option<&[f64]>,
    phi: Option<&[f64]>,
    options: &ReconstructOptions,
) -> PatternResult<Reconstruction> {
    let logger = LogManager::new();

    if vert_slice.len() != theta.len() {
        return Err(PatternError::InvalidSlice(
            "dimensions of vertical slice and theta do not match".into(),
        ));
    }
    if vert_slice.is_empty() {
        return Err(PatternError::InvalidSlice("vertical slice is empty".into()));
    }

    let default_phi: Vec<f64>;
    let phi: &[f64] = match phi {
        Some(p) if !p.is_empty() => p,
        Some(_) => return Err(PatternError::InvalidSlice("phi is empty".into())),
        None => {
            default_phi = (0..=72).map(|i| f64::from(i) * 5.0).collect();
            &default_phi
        }
    };

    let max_vert = slice_max(vert_slice);
    let broadcast: Vec<f64>;
    let horiz: &[f64] = match horiz_slice {
        None => {
            broadcast = vec![max_vert; phi.len()];
            &broadcast
        }
        Some(h) if h.len() == 1 => {
            broadcast = vec![h[0]; phi.len()];
            &broadcast
        }
        Some(h) if h.len() == phi.len() => h,
        Some(_) => {
            return Err(PatternError::InvalidSlice(
                "dimensions of horizontal slice and phi do not match".into(),
            ))
        }
    };

    check_repeated_points(vert_slice, theta, "elevation")?;
    check_repeated_points(horiz, phi, "azimuth")?;
    check_reconstruction_requirements(vert_slice, theta, horiz, phi, options, &logger)?;

    let max_directivity = max_vert.max(slice_max(horiz));
    let vert_norm: Vec<f64> = vert_slice.iter().map(|v| v - max_directivity).collect();
    let horiz_norm: Vec<f64> = horiz.iter().map(|v| v - max_directivity).collect();

    // Keep the front half of the polar sweep only.
    let kept: Vec<usize> = (0..theta.len())
        .filter(|&i| theta[i].rem_euclid(360.0) <= 180.0)
        .collect();
    let theta_out: Vec<f64> = kept.iter().map(|&i| theta[i]).collect();
    let vert_kept: Vec<f64> = kept.iter().map(|&i| vert_norm[i]).collect();

    let rows = phi.len();
    let cols = kept.len();
    let vert_mesh = Array2::from_shape_fn((rows, cols), |(_, j)| vert_kept[j]);
    let horiz_mesh = Array2::from_shape_fn((rows, cols), |(i, _)| horiz_norm[i]);

    let mut pattern = match options.method {
        ReconstructionMethod::Summing => &vert_mesh + &horiz_mesh,
        ReconstructionMethod::CrossWeighted => {
            let k = options.cross_weighted_normalization;
            Array2::from_shape_fn((rows, cols), |(i, j)| {
                let v_log = vert_mesh[(i, j)];
                let h_log = horiz_mesh[(i, j)];
                let v_lin = 10f64.powf(v_log / 10.0);
                let h_lin = 10f64.powf(h_log / 10.0);
                let w1 = v_lin * (1.0 - h_lin);
                let w2 = h_lin * (1.0 - v_lin);
                if w1 == 0.0 && w2 == 0.0 {
                    0.0
                } else {
                    (h_log * w1 + v_log * w2) / (w1.powf(k) + w2.powf(k)).cbrt()
                }
            })
        }
    };
    pattern.mapv_inplace(|v| v + max_directivity);

    logger.record(&format!(
        "pattern reconstructed: {} x {} grid ({:?})",
        rows, cols, options.method
    ));

    Ok(Reconstruction {
        pattern,
        theta: theta_out,
        phi: phi.to_vec(),
    })
}

fn slice_max(values: &[f64]) -> f64 {
    values.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
}

/// A rounded angle sampled more than once must carry one magnitude.
fn check_repeated_points(vals: &[f64], angles: &[f64], label: &str) -> PatternResult<()> {
    let mut seen: BTreeMap<i64, f64> = BTreeMap::new();
    for (&angle, &val) in angles.iter().zip(vals.iter()) {
        let key = angle.round() as i64;
        if let Some(&prev) = seen.get(&key) {
            if prev != val {
                return Err(PatternError::InvalidSlice(format!(
                    "repeated angle {key} with unequal values in {label} slice"
                )));
            }
        } else {
            seen.insert(key, val);
        }
    }
    Ok(())
}

/// Boresight sits at theta = 90, phi = 0; both cuts must sample near it and
/// peak near it, and must roughly agree where they intersect.
fn check_reconstruction_requirements(
    vert_slice: &[f64],
    theta: &[f64],
    horiz_slice: &[f64],
    phi: &[f64],
    options: &ReconstructOptions,
    logger: &LogManager,
) -> PatternResult<()> {
    let theta_bs = 90.0;
    let phi_bs = 0.0;

    let min_theta_from_bs = theta
        .iter()
        .map(|t| (t - theta_bs).rem_euclid(360.0).abs())
        .fold(f64::INFINITY, f64::min);
    if min_theta_from_bs > options.tol_nearest_angle_from_boresight {
        return Err(PatternError::InvalidSlice(format!(
            "no angles near boresight in vertical slice (tolerance: {})",
            options.tol_nearest_angle_from_boresight
        )));
    }

    let min_phi_from_bs = phi
        .iter()
        .map(|p| (p - phi_bs).rem_euclid(360.0).abs())
        .fold(f64::INFINITY, f64::min);
    if min_phi_from_bs > options.tol_nearest_angle_from_boresight {
        return Err(PatternError::InvalidSlice(format!(
            "no angles near boresight in horizontal slice (tolerance: {})",
            options.tol_nearest_angle_from_boresight
        )));
    }

    let vert_bs = vert_slice[argmin_distance(theta, theta_bs)];
    if slice_max(vert_slice) - vert_bs > options.tol_gain_max_vs_boresight {
        return Err(PatternError::InvalidSlice(
            "vertical slice gain at boresight exceeds tolerance".into(),
        ));
    }

    let horiz_bs = horiz_slice[argmin_distance(phi, phi_bs)];
    if slice_max(horiz_slice) - horiz_bs > options.tol_gain_max_vs_boresight {
        return Err(PatternError::InvalidSlice(
            "horizontal slice gain at boresight exceeds tolerance".into(),
        ));
    }

    let (advisory, fatal) = options.tol_gain_diff_at_slice_intersect;
    let gap = (vert_bs - horiz_bs).abs();
    if gap > fatal {
        return Err(PatternError::InvalidSlice(
            "gain difference at slice intersection exceeds tolerance".into(),
        ));
    } else if gap > advisory {
        logger.advise(&format!(
            "gain difference at slice intersection is significant ({gap:.2} dB)"
        ));
    }

    Ok(())
}

fn argmin_distance(angles: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &angle) in angles.iter().enumerate() {
        let dist = (angle - target).abs();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}
