use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use impact_cli::{init_tracing, settings};
use impact_risk::assess::settings::entry_request;
use impact_risk::entry::{
    FragmentationModel, MaterialClass, TrajectoryState, simulate_entry, validate_chelyabinsk,
};
use impact_risk::export::{report, trajectory};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Integrate an atmospheric entry trajectory")]
struct Cli {
    /// Impactor diameter in metres
    #[arg(long, default_value_t = 19.0)]
    diameter: f64,

    /// Entry velocity in m/s
    #[arg(long, default_value_t = 19000.0)]
    velocity: f64,

    /// Entry angle from horizontal in degrees
    #[arg(long, default_value_t = 18.0)]
    angle: f64,

    /// stony (chondrite), iron or cometary
    #[arg(long, default_value = "stony")]
    material: MaterialClass,

    /// pancake or discrete; defaults to the settings file
    #[arg(long)]
    fragmentation: Option<FragmentationModel>,

    /// Run the Chelyabinsk reference case and compare against observation
    #[arg(long, default_value_t = false)]
    chelyabinsk: bool,

    /// Write the trajectory time series as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Settings file (defaults to configs/impact.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Summary output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.chelyabinsk {
        let mut validation = validate_chelyabinsk()?;
        info!(
            valid = validation.overall_valid(),
            altitude_error = validation.altitude_error_percent,
            energy_error = validation.energy_error_percent,
            "chelyabinsk comparison"
        );
        if let Some(path) = &cli.csv {
            let series = std::mem::take(&mut validation.outcome.time_series);
            write_series(path, &series)?;
        }
        report::write_json(&cli.output, &validation)?;
        return Ok(());
    }

    let settings = settings(cli.config.as_deref())?;
    let mut request = entry_request(
        &settings.entry,
        cli.diameter,
        cli.velocity,
        cli.angle,
        cli.material,
    )?;
    if let Some(model) = cli.fragmentation {
        request = request.with_fragmentation(model);
    }

    let mut outcome = simulate_entry(&request).context("entry simulation failed")?;
    let series = std::mem::take(&mut outcome.time_series);
    if let Some(path) = &cli.csv {
        write_series(path, &series)?;
    }
    report::write_json(&cli.output, &outcome)?;
    Ok(())
}

fn write_series(path: &Path, series: &[TrajectoryState]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    trajectory::write_csv(file, series)?;
    info!(rows = series.len(), path = %path.display(), "trajectory written");
    Ok(())
}
