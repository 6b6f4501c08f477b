//! Tests for the terminal rendering helpers used by the catalog commands

use chrono::{Duration, Utc};
use vitrine::cli::output::{
    colors, display_title, format_bytes, format_duration, format_facet_value,
    format_field_values, format_page_summary, format_relative_time,
};

#[test]
fn test_index_sizes() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(48 * 1024 + 512), "48.5 KB");
    assert_eq!(format_bytes(1048576 - 1), "1024.0 KB");
    assert_eq!(format_bytes(3 * 1048576), "3.0 MB");
    assert_eq!(format_bytes(1073741824 - 1), "1024.0 MB");
    assert_eq!(format_bytes(1610612736), "1.5 GB");
}

#[test]
fn test_ingest_durations() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.0004), "0ms");
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(0.999), "999ms");
    assert_eq!(format_duration(1.0), "1.00s");
    assert_eq!(format_duration(59.99), "59.99s");
    assert_eq!(format_duration(60.0), "1m 0.0s");
    assert_eq!(format_duration(125.5), "2m 5.5s");
}

#[test]
fn test_last_ingested_age() {
    let now = Utc::now();
    assert_eq!(format_relative_time(&now), "just now");
    assert_eq!(format_relative_time(&(now - Duration::seconds(59))), "just now");
    assert_eq!(format_relative_time(&(now - Duration::minutes(5))), "5m ago");
    assert_eq!(format_relative_time(&(now - Duration::minutes(59))), "59m ago");
    assert_eq!(format_relative_time(&(now - Duration::hours(23))), "23h ago");
    assert_eq!(format_relative_time(&(now - Duration::days(30))), "30d ago");
    assert_eq!(format_relative_time(&(now + Duration::hours(1))), "in the future");
}

#[test]
fn test_record_titles() {
    assert_eq!(display_title("1", "MEG-0001"), "MEG-0001");
    // Records without an artifact id are listed by record id
    assert_eq!(display_title("77", ""), "77");
}

#[test]
fn test_multi_valued_fields_on_one_line() {
    let thumbnails = vec!["img/1a.jpg".to_string(), "img/1b.jpg".to_string()];
    assert_eq!(format_field_values(&thumbnails), "img/1a.jpg; img/1b.jpg");
    assert_eq!(format_field_values(&["Megiddo".to_string()]), "Megiddo");
}

#[test]
fn test_page_summary() {
    let summary = format_page_summary(240, 2, 3);
    for part in ["Found", "240", "page", "2", "of", "3"] {
        assert!(summary.contains(part), "{summary}");
    }
}

#[test]
fn test_facet_value_lines() {
    assert_eq!(format_facet_value("Megiddo", 3, false), "[ ] Megiddo (3)");
    assert_eq!(format_facet_value("Megiddo", 3, true), "[x] Megiddo (3)");
    assert_eq!(format_facet_value("Tel Dor", 1, false), "[ ] Tel Dor (1)");
}

// `colored` honors NO_COLOR, so only the text is checked
#[test]
fn test_colors_keep_text() {
    let styled = [
        colors::label("Site Name").to_string(),
        colors::collection_id("survey-2024").to_string(),
        colors::title("MEG-0001").to_string(),
        colors::file_path("exports/mmap.tsv").to_string(),
        colors::number("42").to_string(),
        colors::success("Ingested").to_string(),
        colors::warning("2 rows skipped").to_string(),
        colors::error("failed").to_string(),
        colors::dim("3d ago").to_string(),
        colors::selected("[x] Hazor (2)").to_string(),
        colors::rank("1").to_string(),
    ];
    let plain = [
        "Site Name",
        "survey-2024",
        "MEG-0001",
        "exports/mmap.tsv",
        "42",
        "Ingested",
        "2 rows skipped",
        "failed",
        "3d ago",
        "[x] Hazor (2)",
        "1",
    ];
    for (styled, plain) in styled.iter().zip(plain) {
        assert!(styled.contains(plain), "{styled:?} lost {plain:?}");
    }
}
