use std::fs::{self, File};

use chrono::{TimeZone, Utc};
use impact_risk::assess::{AssessmentContext, AssessmentRequest, assess_impact};
use impact_risk::entry::{chelyabinsk_request, simulate_entry};
use impact_risk::export::markdown::{group_thousands, render};
use impact_risk::export::{report, trajectory};
use impact_risk::geo::SettlementCatalog;

const SETTLEMENTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/settlements.yaml");

#[test]
fn json_report_lands_in_nested_directory() {
    let catalog = SettlementCatalog::load(SETTLEMENTS).expect("catalog");
    let context = AssessmentContext::offline(&catalog);
    let request = AssessmentRequest::new(70.0, 3_000.0, 18_000.0, 45.0, 48.8566, 2.3522)
        .with_grid_resolution(10.0);
    let assessment = assess_impact(&request, &context).expect("assessment");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out/reports/paris.json");
    report::write_json(&path, &assessment).expect("write json");

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["impact_type"], "Surface Impact");
    assert_eq!(value["total_casualties"], assessment.total_casualties);
    assert_eq!(value["data_source"]["surface"], "region_heuristic");
    assert_eq!(value["data_source"]["population"]["model"], "grid");
    assert!(value["casualties_by_hazard"]["wind_blast"].is_u64());
}

#[test]
fn trajectory_csv_reads_back() {
    let outcome = simulate_entry(&chelyabinsk_request()).expect("entry");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chelyabinsk.csv");
    trajectory::write_csv(File::create(&path).expect("create"), &outcome.time_series)
        .expect("write csv");

    let mut reader = csv::Reader::from_path(&path).expect("open csv");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "time_s");
    assert_eq!(headers.len(), 9);
    assert_eq!(&headers[8], "fragmented");

    let states = trajectory::read_csv(File::open(&path).expect("open")).expect("read csv");
    assert_eq!(states.len(), outcome.time_series.len());
    let last = states.last().expect("rows");
    let expected = outcome.time_series.last().expect("rows");
    assert!((last.altitude_m - expected.altitude_m).abs() <= expected.altitude_m.abs() * 1e-12);
    assert_eq!(
        states.iter().filter(|s| s.fragmented).count(),
        outcome.time_series.iter().filter(|s| s.fragmented).count()
    );
}

#[test]
fn markdown_summary() {
    let catalog = SettlementCatalog::load(SETTLEMENTS).expect("catalog");
    let context = AssessmentContext::offline(&catalog);
    let request = AssessmentRequest::new(150.0, 3_000.0, 18_000.0, 45.0, 41.0082, 28.9784);
    let assessment = assess_impact(&request, &context).expect("assessment");
    let generated = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).single().expect("timestamp");

    let md = render(&assessment, generated);
    assert!(md.starts_with("# Asteroid Impact Risk Assessment"));
    assert!(md.contains("_Generated 2026-10-19 12:00:00 UTC_"));
    assert!(md.contains(&group_thousands(assessment.total_casualties)));
    assert!(md.contains("| Cratering | 74,325 |"));
    assert!(!md.contains("**Tsunami**"));
}
