//! Export helpers for JSON reports, CSV trajectories and markdown summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

pub mod report {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;

    use crate::{ExportError, writer_for_path};

    /// Pretty-printed JSON with a trailing newline.
    pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
        let mut writer = writer_for_path(path)?;
        serde_json::to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

pub mod trajectory {
    use std::io::{Read, Write};

    use impact_entry::TrajectoryState;

    use crate::ExportError;

    /// Write the entry time series with a header row.
    pub fn write_csv<W: Write>(writer: W, states: &[TrajectoryState]) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for state in states {
            csv.serialize(state)?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<TrajectoryState>, ExportError> {
        let mut csv = csv::Reader::from_reader(reader);
        let states = csv.deserialize().collect::<Result<Vec<TrajectoryState>, _>>()?;
        Ok(states)
    }
}

pub mod markdown {
    use std::fmt::Write;

    use chrono::{DateTime, Utc};
    use impact_assess::ImpactAssessment;

    /// `1234567` → `1,234,567`.
    pub fn group_thousands(value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    /// Markdown summary table of an assessment.
    pub fn render(assessment: &ImpactAssessment, generated_at: DateTime<Utc>) -> String {
        let p = &assessment.parameters;
        let mut md = String::new();
        md.push_str("# Asteroid Impact Risk Assessment\n\n");
        let _ = writeln!(md, "_Generated {}_\n", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        md.push_str("| Category | Value |\n|----------|-------|\n");
        md.push_str("| **Summary** | |\n");
        let _ = writeln!(md, "| Impact type | **{}** |", assessment.impact_type);
        let _ = writeln!(md, "| Location | {} |", assessment.location.label());
        let _ = writeln!(
            md,
            "| Kinetic energy | **{:.2}** Mt TNT |",
            assessment.kinetic_energy_mt
        );
        let _ = writeln!(
            md,
            "| Expected casualties | **{}** |",
            group_thousands(assessment.total_casualties)
        );
        if assessment.global_event {
            md.push_str("| Global event | damage radius exceeds 5000 km |\n");
        }
        md.push_str("| | |\n| **Casualties by hazard** | |\n");
        for (hazard, count) in assessment.casualties_by_hazard.iter() {
            let _ = writeln!(md, "| {} | {} |", hazard.label(), group_thousands(count));
        }
        md.push_str("| | |\n| **Parameters** | |\n");
        let _ = writeln!(md, "| Diameter | {:.1} m |", p.diameter_m);
        let _ = writeln!(md, "| Density | {:.0} kg/m³ |", p.density_kg_m3);
        let _ = writeln!(md, "| Velocity | {:.0} m/s |", p.velocity_m_s);
        let _ = writeln!(md, "| Angle | {:.0}° |", p.angle_deg);
        let _ = writeln!(md, "| Impact point | {:.2}°, {:.2}° |", p.lat, p.lng);
        let _ = writeln!(md, "| Crater diameter | {:.1} m |", p.crater_diameter_m);
        let _ = writeln!(md, "| Airburst altitude | {:.1} km |", p.airburst_altitude_km);
        let _ = writeln!(md, "| Seismic magnitude | {:.2} Richter |", p.seismic_magnitude);
        let _ = writeln!(md, "| Unsheltered population | {:.0}% |", p.unsheltered_fraction * 100.0);
        let _ = writeln!(md, "| Grid cells analyzed | {} |", p.grid_cells_analyzed);
        if let Some(tsunami) = &assessment.tsunami {
            md.push_str("| | |\n| **Tsunami** | |\n");
            let _ = writeln!(md, "| Risk | {} |", tsunami.tier);
            let _ = writeln!(md, "| Source height | {:.1} m |", tsunami.source_height_m);
            let _ = writeln!(md, "| Range | {:.0} km |", tsunami.range_km);
            let _ = writeln!(md, "| Coastal height | {:.1} m |", tsunami.coastal.coastal_height_m);
            let _ = writeln!(md, "| Advisory | {} |", tsunami.advisory);
        }
        md
    }
}
