use std::path::{Path, PathBuf};

use anyhow::Context;
use patterncore::mesh::{triangulate_grid, write_stl};
use patterncore::msi::read_msi;
use patterncore::processing::{normalize_azimuth, pattern_from_slices, render_pattern};
use patterncore::telemetry::LogManager;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::workflow::config::ConversionConfig;

/// Summary of one completed conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub output: PathBuf,
    pub facets: usize,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub frequency_hz: Option<f64>,
}

#[derive(Clone)]
pub struct Runner {
    config: ConversionConfig,
}

impl Runner {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline on one measurement file. Every stage returns
    /// an explicit result; the first failure aborts the run, and the output
    /// file only appears once it has been written in full.
    pub fn execute(&self, input: &Path) -> anyhow::Result<ConversionResult> {
        let logger = LogManager::new();

        let mut data = read_msi(input).context("reading measurement file")?;
        if let Some(frequency) = data.metadata.frequency_hz {
            // Threaded through for labeling only; nothing downstream uses it.
            logger.record(&format!("carrier frequency {:.3} MHz", frequency / 1e6));
        }

        normalize_azimuth(&mut data.horizontal);

        // Elevation-from-horizon to polar angle-from-zenith.
        let theta: Vec<f64> = data.vertical.angles.iter().map(|el| 90.0 - el).collect();

        let reconstruction = pattern_from_slices(
            &data.vertical.magnitude,
            &theta,
            Some(&data.horizontal.magnitude),
            Some(&data.horizontal.angles),
            &self.config.to_reconstruct_options(),
        )
        .context("reconstructing 3d pattern")?;

        let scene = render_pattern(&reconstruction, &self.config.to_render_options())
            .context("rendering pattern surface")?;
        let surface = scene.find_surface().context("locating pattern surface")?;

        let triangles = triangulate_grid(surface.x.view(), surface.y.view(), surface.z.view())
            .context("triangulating surface grid")?;

        let output = self.output_path(input)?;
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir).context("creating temporary output file")?;
        write_stl(&mut temp, &triangles).context("writing stl data")?;
        temp.persist(&output)
            .with_context(|| format!("persisting {}", output.display()))?;

        let (grid_rows, grid_cols) = surface.x.dim();
        logger.record(&format!(
            "exported {} facets to {}",
            triangles.len(),
            output.display()
        ));

        Ok(ConversionResult {
            output,
            facets: triangles.len(),
            grid_rows,
            grid_cols,
            frequency_hz: data.metadata.frequency_hz,
        })
    }

    fn output_path(&self, input: &Path) -> anyhow::Result<PathBuf> {
        if let Some(output) = &self.config.output {
            return Ok(output.clone());
        }
        // Default: input base name with .stl, in the working directory.
        let stem = input
            .file_stem()
            .context("input path has no file name")?;
        Ok(PathBuf::from(stem).with_extension("stl"))
    }
}
