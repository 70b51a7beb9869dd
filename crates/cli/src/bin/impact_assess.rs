use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use impact_cli::{init_tracing, settings, settlements};
use impact_risk::assess::settings::{apply_assessment, gazetteer};
use impact_risk::assess::{AssessmentContext, AssessmentRequest, assess_impact};
use impact_risk::export::{markdown, report, writer_for_path};

#[derive(Parser, Debug)]
#[command(author, version, about = "Grid-based casualty assessment for an asteroid impact")]
struct Cli {
    /// Impactor diameter in metres
    #[arg(long)]
    diameter: f64,

    /// Bulk density in kg/m³
    #[arg(long, default_value_t = 3000.0)]
    density: f64,

    /// Entry velocity in m/s
    #[arg(long, default_value_t = 20000.0)]
    velocity: f64,

    /// Entry angle from horizontal in degrees
    #[arg(long, default_value_t = 45.0)]
    angle: f64,

    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Water depth at the impact point in metres (ocean impacts)
    #[arg(long, default_value_t = 0.0)]
    water_depth: f64,

    /// Override the unsheltered population fraction from the settings file
    #[arg(long)]
    unsheltered: Option<f64>,

    /// Override the grid resolution (km) from the settings file
    #[arg(long)]
    grid_km: Option<f64>,

    /// Settings file (defaults to configs/impact.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settlement catalog (YAML list, TOML record or directory)
    #[arg(long)]
    settlements: Option<PathBuf>,

    /// Use the GeoNames web service for surface detection
    #[arg(long, default_value_t = false)]
    online: bool,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Format {
    Json,
    Markdown,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut settings = settings(cli.config.as_deref())?;
    let catalog = settlements(cli.settlements.as_deref(), &settings)?;
    if cli.online {
        settings.gazetteer.enabled = true;
    }
    let client = gazetteer(&settings.gazetteer)?;

    let mut request = apply_assessment(
        &settings.assessment,
        AssessmentRequest::new(
            cli.diameter,
            cli.density,
            cli.velocity,
            cli.angle,
            cli.lat,
            cli.lng,
        ),
    )
    .with_water_depth(cli.water_depth);
    if let Some(fraction) = cli.unsheltered {
        request = request.with_unsheltered_fraction(fraction);
    }
    if let Some(km) = cli.grid_km {
        request = request.with_grid_resolution(km);
    }

    let mut context = AssessmentContext::offline(&catalog)
        .with_settlement_search_km(settings.assessment.settlement_search_km);
    if let Some(client) = client.as_ref() {
        context = context.with_surface(client).with_gazetteer(client);
    }

    let assessment = assess_impact(&request, &context).context("assessment failed")?;
    match cli.format {
        Format::Json => report::write_json(&cli.output, &assessment)?,
        Format::Markdown => {
            let mut writer = writer_for_path(&cli.output)?;
            writer.write_all(markdown::render(&assessment, Utc::now()).as_bytes())?;
            writer.flush()?;
        }
    }
    Ok(())
}
