use anyhow::Context;
use patterncore::processing::{ReconstructOptions, ReconstructionMethod};
use patterncore::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub transparency: f64,
    pub offset: [f64; 3],
    pub method: ReconstructionMethod,
    pub cross_weighted_normalization: f64,
    pub output: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            transparency: 1.0,
            offset: [0.0, 0.0, 0.0],
            method: ReconstructionMethod::Summing,
            cross_weighted_normalization: 2.0,
            output: None,
        }
    }
}

impl ConversionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading conversion config {}", path_ref.display()))?;
        let config: ConversionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing conversion config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        transparency: f64,
        offset: [f64; 3],
        method: &str,
        output: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            transparency,
            offset,
            method: parse_method(method)?,
            output,
            ..Default::default()
        })
    }

    pub fn to_render_options(&self) -> RenderOptions {
        RenderOptions {
            transparency: self.transparency,
            offset: self.offset,
        }
    }

    pub fn to_reconstruct_options(&self) -> ReconstructOptions {
        ReconstructOptions {
            method: self.method,
            cross_weighted_normalization: self.cross_weighted_normalization,
            ..Default::default()
        }
    }
}

fn parse_method(name: &str) -> anyhow::Result<ReconstructionMethod> {
    match name.to_lowercase().as_str() {
        "summing" => Ok(ReconstructionMethod::Summing),
        "cross-weighted" | "crossweighted" => Ok(ReconstructionMethod::CrossWeighted),
        other => anyhow::bail!("unknown reconstruction method '{other}'"),
    }
}
