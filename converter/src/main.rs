use anyhow::Context;
use clap::Parser;
use generator::sample::{write_sample_msi, SampleConfig};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::ConversionConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "MSI antenna-pattern to STL mesh converter")]
struct Args {
    /// Measurement file (.msi / .pln) to convert
    #[arg(long, required_unless_present = "synthetic")]
    input: Option<PathBuf>,
    /// Output STL path (defaults to the input base name in the working directory)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Surface opacity in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    transparency: f64,
    /// Spatial translation applied to the whole pattern
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = vec![0.0, 0.0, 0.0])]
    offset: Vec<f64>,
    /// Reconstruction method: summing or cross-weighted
    #[arg(long, default_value = "summing")]
    method: String,
    /// Load a conversion config from YAML instead of the flags above
    #[arg(long)]
    config: Option<PathBuf>,
    /// Generate a synthetic measurement file and convert that
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    /// Append a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = &args.config {
        ConversionConfig::load(path)?
    } else {
        let offset = [args.offset[0], args.offset[1], args.offset[2]];
        ConversionConfig::from_args(args.transparency, offset, &args.method, args.output.clone())?
    };

    let input = if args.synthetic {
        let path = PathBuf::from("synthetic_pattern.msi");
        write_sample_msi(&path, &SampleConfig::default())?;
        path
    } else {
        args.input
            .clone()
            .context("--input is required unless --synthetic is set")?
    };

    let runner = Runner::new(config);
    let result = runner.execute(&input)?;

    println!(
        "Wrote {} ({} facets from a {} x {} grid)",
        result.output.display(),
        result.facets,
        result.grid_rows,
        result.grid_cols
    );

    if let Some(summary_path) = args.summary {
        let line = serde_json::to_string(&result).context("serializing run summary")?;
        if let Some(parent) = summary_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&summary_path)
            .with_context(|| format!("opening summary file {}", summary_path.display()))?;
        writeln!(file, "{line}")?;
    }

    Ok(())
}
