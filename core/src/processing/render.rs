//! Turns a reconstructed pattern into a renderable scene: magnitude becomes
//! radius, spherical angles become Cartesian grids. The scene is an explicit
//! value handed to the next stage, not a process-global figure.

use ndarray::Array2;

use crate::prelude::{PatternError, PatternResult, RenderOptions};
use crate::processing::reconstruct::Reconstruction;
use crate::telemetry::log::LogManager;

/// One drawable surface: three equal-shape coordinate grids plus the opacity
/// it was rendered with. Rows follow phi, columns follow theta.
#[derive(Debug, Clone)]
pub struct Surface {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
    pub alpha: f64,
}

/// Container for whatever the render stage produced.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    surfaces: Vec<Surface>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// The pipeline's one guard: a scene without a surface means the
    /// synthesizer produced nothing renderable.
    pub fn find_surface(&self) -> PatternResult<&Surface> {
        self.surfaces.first().ok_or(PatternError::NoSurfaceFound)
    }
}

/// Renders the pattern into a scene. The pattern is normalized to a [0, 1]
/// radius over its own span; a degenerate reconstruction (fewer than two
/// samples on either axis, or zero span) yields a scene with no surface.
pub fn render_pattern(
    reconstruction: &Reconstruction,
    options: &RenderOptions,
) -> PatternResult<Scene> {
    if !(0.0..=1.0).contains(&options.transparency) {
        return Err(PatternError::InvalidSlice(format!(
            "transparency {} outside [0, 1]",
            options.transparency
        )));
    }

    let logger = LogManager::new();
    let mut scene = Scene::new();

    let rows = reconstruction.phi.len();
    let cols = reconstruction.theta.len();
    if rows < 2 || cols < 2 || reconstruction.pattern.dim() != (rows, cols) {
        logger.advise("reconstruction too small to render; scene left empty");
        return Ok(scene);
    }

    let min = reconstruction
        .pattern
        .iter()
        .fold(f64::INFINITY, |a, &v| a.min(v));
    let max = reconstruction
        .pattern
        .iter()
        .fold(f64::NEG_INFINITY, |a, &v| a.max(v));
    let span = max - min;
    if !(span > 0.0) {
        logger.advise("pattern has no magnitude span; scene left empty");
        return Ok(scene);
    }

    let [dx, dy, dz] = options.offset;
    let mut x = Array2::zeros((rows, cols));
    let mut y = Array2::zeros((rows, cols));
    let mut z = Array2::zeros((rows, cols));
    for i in 0..rows {
        let phi = reconstruction.phi[i].to_radians();
        for j in 0..cols {
            let theta = reconstruction.theta[j].to_radians();
            let r = (reconstruction.pattern[(i, j)] - min) / span;
            x[(i, j)] = r * theta.sin() * phi.cos() + dx;
            y[(i, j)] = r * theta.sin() * phi.sin() + dy;
            z[(i, j)] = r * theta.cos() + dz;
        }
    }

    scene.add_surface(Surface {
        x,
        y,
        z,
        alpha: options.transparency,
    });
    logger.record(&format!("surface rendered: {rows} x {cols} grid"));
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::reconstruct::{pattern_from_slices, ReconstructOptions};

    fn sample_reconstruction() -> Reconstruction {
        let vert = vec![-10.0, 0.0, -10.0];
        let theta = vec![0.0, 90.0, 180.0];
        let horiz = vec![0.0, -3.0, -20.0, -3.0];
        let phi = vec![0.0, 90.0, 180.0, 270.0];
        pattern_from_slices(
            &vert,
            &theta,
            Some(&horiz),
            Some(&phi),
            &ReconstructOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn renders_one_surface_with_matching_grids() {
        let recon = sample_reconstruction();
        let scene = render_pattern(&recon, &RenderOptions::default()).unwrap();
        assert_eq!(scene.surface_count(), 1);
        let surface = scene.find_surface().unwrap();
        assert_eq!(surface.x.dim(), (4, 3));
        assert_eq!(surface.x.dim(), surface.y.dim());
        assert_eq!(surface.y.dim(), surface.z.dim());
        assert_eq!(surface.alpha, 1.0);
    }

    #[test]
    fn peak_sample_sits_on_the_unit_sphere() {
        let recon = sample_reconstruction();
        let scene = render_pattern(&recon, &RenderOptions::default()).unwrap();
        let surface = scene.find_surface().unwrap();
        // Boresight (phi = 0, theta = 90) is the joint peak: radius 1 along +x.
        assert!((surface.x[(0, 1)] - 1.0).abs() < 1e-9);
        assert!(surface.y[(0, 1)].abs() < 1e-9);
        assert!(surface.z[(0, 1)].abs() < 1e-9);
    }

    #[test]
    fn offset_translates_every_vertex() {
        let recon = sample_reconstruction();
        let options = RenderOptions {
            transparency: 0.4,
            offset: [10.0, -5.0, 2.0],
        };
        let scene = render_pattern(&recon, &options).unwrap();
        let surface = scene.find_surface().unwrap();
        assert!((surface.x[(0, 1)] - 11.0).abs() < 1e-9);
        assert!((surface.y[(0, 1)] + 5.0).abs() < 1e-9);
        assert!((surface.z[(0, 1)] - 2.0).abs() < 1e-9);
        assert_eq!(surface.alpha, 0.4);
    }

    #[test]
    fn flat_pattern_yields_empty_scene() {
        let recon = Reconstruction {
            pattern: Array2::from_elem((3, 3), 5.0),
            theta: vec![0.0, 90.0, 180.0],
            phi: vec![0.0, 120.0, 240.0],
        };
        let scene = render_pattern(&recon, &RenderOptions::default()).unwrap();
        assert_eq!(scene.surface_count(), 0);
        assert!(matches!(
            scene.find_surface(),
            Err(PatternError::NoSurfaceFound)
        ));
    }

    #[test]
    fn degenerate_axis_yields_empty_scene() {
        let recon = Reconstruction {
            pattern: Array2::zeros((1, 3)),
            theta: vec![0.0, 90.0, 180.0],
            phi: vec![0.0],
        };
        let scene = render_pattern(&recon, &RenderOptions::default()).unwrap();
        assert!(scene.find_surface().is_err());
    }

    #[test]
    fn out_of_range_transparency_is_rejected() {
        let recon = sample_reconstruction();
        let options = RenderOptions {
            transparency: 1.5,
            offset: [0.0; 3],
        };
        let err = render_pattern(&recon, &options).unwrap_err();
        assert!(matches!(err, PatternError::InvalidSlice(_)));
    }
}
