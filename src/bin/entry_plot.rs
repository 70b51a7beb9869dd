use clap::{Parser, ValueEnum};
use impact_risk::entry::TrajectoryState;
use impact_risk::export::trajectory;
use plotters::prelude::*;
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot an entry trajectory CSV: altitude against time and a profile against altitude"
)]
struct Cli {
    /// Trajectory CSV written by `impact_entry --csv`
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/entry.png")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = Profile::Luminosity)]
    profile: Profile,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Profile {
    Luminosity,
    Speed,
    Mass,
    Pressure,
}

impl Profile {
    fn value(self, state: &TrajectoryState) -> f64 {
        match self {
            Profile::Luminosity => state.luminosity_w,
            Profile::Speed => state.speed_m_s / 1_000.0,
            Profile::Mass => state.mass_kg / 1_000.0,
            Profile::Pressure => state.dynamic_pressure_pa / 1.0e6,
        }
    }

    fn axis_label(self) -> &'static str {
        match self {
            Profile::Luminosity => "Luminosity (W)",
            Profile::Speed => "Speed (km/s)",
            Profile::Mass => "Mass (t)",
            Profile::Pressure => "Dynamic pressure (MPa)",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file = File::open(&cli.input)?;
    let states = trajectory::read_csv(file)?;
    if states.len() < 2 {
        return Err(anyhow::anyhow!(
            "Trajectory CSV needs at least two rows to plot"
        ));
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 22.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);
    let (left, right) = root.split_horizontally(cli.width / 2);

    let t_max = states.iter().map(|s| s.time_s).fold(0.0, f64::max).max(1e-3);
    let alt_max_km = states
        .iter()
        .map(|s| s.altitude_m / 1_000.0)
        .fold(0.0, f64::max)
        .max(1e-3);

    {
        let mut chart = ChartBuilder::on(&left)
            .margin(20)
            .caption("Altitude", caption_font.clone())
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..t_max, 0.0..alt_max_km)?;
        chart
            .configure_mesh()
            .x_desc("Time (s)")
            .y_desc("Altitude (km)")
            .label_style(label_font.clone())
            .draw()?;
        chart.draw_series(LineSeries::new(
            states.iter().map(|s| (s.time_s, s.altitude_m / 1_000.0)),
            ShapeStyle::from(&BLUE).stroke_width(2),
        ))?;

        if let Some(onset) = states.iter().find(|s| s.fragmented) {
            let altitude_km = onset.altitude_m / 1_000.0;
            let breakup_color = RGBColor(120, 40, 160);
            chart.draw_series(std::iter::once(Cross::new(
                (onset.time_s, altitude_km),
                6,
                breakup_color.stroke_width(2),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("breakup at {altitude_km:.1} km"),
                (onset.time_s + 0.03 * t_max, altitude_km),
                label_font.clone().color(&breakup_color),
            )))?;
        }
    }

    let profile = cli.profile;
    let values: Vec<f64> = states.iter().map(|s| profile.value(s)).collect();
    let v_max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
        .max(1e-9);
    let peak = states
        .iter()
        .zip(&values)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(s, v)| (*v, s.altitude_m / 1_000.0));

    {
        let mut chart = ChartBuilder::on(&right)
            .margin(20)
            .caption(profile.axis_label(), caption_font)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..v_max * 1.05, 0.0..alt_max_km)?;
        chart
            .configure_mesh()
            .x_desc(profile.axis_label())
            .y_desc("Altitude (km)")
            .label_style(label_font.clone())
            .x_label_formatter(&|v| format!("{v:.2e}"))
            .draw()?;
        chart.draw_series(LineSeries::new(
            states
                .iter()
                .zip(&values)
                .map(|(s, v)| (*v, s.altitude_m / 1_000.0)),
            ShapeStyle::from(&RED).stroke_width(2),
        ))?;

        if let Some((value, altitude_km)) = peak {
            let marker_color = RGBColor(210, 100, 20);
            chart.draw_series(std::iter::once(Circle::new(
                (value, altitude_km),
                5,
                marker_color.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("peak at {altitude_km:.1} km"),
                (value * 0.55, altitude_km + 0.03 * alt_max_km),
                label_font.clone().color(&marker_color),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}
