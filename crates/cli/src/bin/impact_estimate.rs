use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use impact_cli::{init_tracing, settings, settlements};
use impact_risk::assess::settings::gazetteer;
use impact_risk::assess::{AssessmentContext, EstimateRequest, estimate_impact};
use impact_risk::export::report;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Quick damage-zone estimate for an asteroid impact")]
struct Cli {
    #[arg(long, default_value_t = 100.0)]
    diameter: f64,

    #[arg(long, default_value_t = 20000.0)]
    velocity: f64,

    #[arg(long, default_value_t = 45.0)]
    angle: f64,

    #[arg(long, default_value_t = 3000.0)]
    density: f64,

    #[arg(long, default_value_t = 41.0082, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, default_value_t = 28.9784, allow_hyphen_values = true)]
    lng: f64,

    /// Settings file (defaults to configs/impact.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settlement catalog (YAML list, TOML record or directory)
    #[arg(long)]
    settlements: Option<PathBuf>,

    /// Use the GeoNames web service for surface and density lookups
    #[arg(long, default_value_t = false)]
    online: bool,

    /// Output path, `-` for stdout
    #[arg(long, default_value = "-")]
    output: PathBuf,
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

    let mut context = AssessmentContext::offline(&catalog)
        .with_settlement_search_km(settings.assessment.settlement_search_km);
    if let Some(client) = client.as_ref() {
        context = context.with_surface(client).with_gazetteer(client);
    }

    let request = EstimateRequest {
        diameter_m: cli.diameter,
        velocity_m_s: cli.velocity,
        angle_deg: cli.angle,
        density_kg_m3: cli.density,
        lat: cli.lat,
        lng: cli.lng,
    };
    let estimate = estimate_impact(&request, &context).context("estimate failed")?;
    info!(
        megatons = estimate.tnt_megatons,
        casualties = estimate.population.estimated_casualties,
        location = estimate.location.label(),
        "estimate ready"
    );
    report::write_json(&cli.output, &estimate)?;
    Ok(())
}
