//! Terminal rendering for catalog results
//!
//! Human output only; `--format json` serializes the response types
//! directly. Colors come from `colored`, which honors NO_COLOR.

use crate::core::types::FacetField;

/// Color scheme for CLI output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Field labels and section headers
    pub fn label(s: &str) -> ColoredString {
        s.bold()
    }

    pub fn collection_id(s: &str) -> ColoredString {
        s.cyan()
    }

    /// Artifact title (the `mmap_artifact_id_s` value)
    pub fn title(s: &str) -> ColoredString {
        s.cyan().bold()
    }

    /// Export paths and thumbnail references
    pub fn file_path(s: &str) -> ColoredString {
        s.blue()
    }

    pub fn number(s: &str) -> ColoredString {
        s.yellow()
    }

    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    pub fn warning(s: &str) -> ColoredString {
        s.yellow()
    }

    pub fn error(s: &str) -> ColoredString {
        s.red().bold()
    }

    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }

    /// Facet values already applied as filters
    pub fn selected(s: &str) -> ColoredString {
        s.green().bold()
    }

    /// Result position within the whole hit list
    pub fn rank(s: &str) -> ColoredString {
        s.green()
    }
}

/// Human-readable index size, 1024-based
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Ingest wall time: `850ms`, `2.40s` or `1m 3.2s`
pub fn format_duration(secs: f64) -> String {
    match secs {
        s if s >= 60.0 => {
            let mins = (s / 60.0).floor();
            format!("{mins:.0}m {:.1}s", s - mins * 60.0)
        }
        s if s >= 1.0 => format!("{s:.2}s"),
        s => format!("{:.0}ms", s * 1000.0),
    }
}

/// Age of the last ingest, coarsest unit first
pub fn format_relative_time(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    let elapsed = chrono::Utc::now().signed_duration_since(*timestamp);
    if elapsed.num_seconds() < 0 {
        return "in the future".to_string();
    }

    match (elapsed.num_days(), elapsed.num_hours(), elapsed.num_minutes()) {
        (days, _, _) if days > 0 => format!("{days}d ago"),
        (_, hours, _) if hours > 0 => format!("{hours}h ago"),
        (_, _, mins) if mins > 0 => format!("{mins}m ago"),
        _ => "just now".to_string(),
    }
}

/// Heading for a record; falls back to the id when the title is blank
pub fn display_title<'a>(id: &'a str, title: &'a str) -> &'a str {
    if title.trim().is_empty() {
        id
    } else {
        title
    }
}

/// Multi-valued fields print on one line
pub fn format_field_values(values: &[String]) -> String {
    values.join("; ")
}

/// Result header line, e.g. `Found 12 artifact(s), page 1 of 1:`
pub fn format_page_summary(total: u64, page: usize, total_pages: u64) -> String {
    format!(
        "Found {} artifact(s), page {} of {}:",
        colors::number(&total.to_string()),
        colors::number(&page.to_string()),
        colors::number(&total_pages.max(1).to_string())
    )
}

/// One facet value line: marker, value and count
pub fn format_facet_value(value: &str, count: u64, selected: bool) -> String {
    let marker = if selected { "[x]" } else { "[ ]" };
    format!("{marker} {value} ({count})")
}

/// Print a facet block; a truncated facet points at `vitrine facet`
pub fn print_facet(facet: &FacetField) {
    println!("{}", colors::label(&facet.label));
    for value in &facet.values {
        let line = format_facet_value(&value.value, value.count, value.selected);
        match value.selected {
            true => println!("  {}", colors::selected(&line)),
            false => println!("  {line}"),
        }
    }
    if facet.has_more {
        let hint = format!("more... (vitrine facet {})", facet.name);
        println!("  {}", colors::dim(&hint));
    }
}

pub fn print_warning(message: &str) {
    eprintln!("{}: {message}", colors::warning("Warning"));
}

pub fn print_error(message: &str) {
    eprintln!("{}: {message}", colors::error("Error"));
}

pub fn print_header(title: &str) {
    println!("{}", colors::label(title));
}
