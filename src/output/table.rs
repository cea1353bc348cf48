use crate::checker::ModuleVersion;
use crate::model::{CheckReport, FileFailure, PatchReport, ReportEntry};
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct StaleRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Line")]
    line: usize,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Type")]
    update_type: String,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Error")]
    error: String,
}

pub fn print_check_table(report: &CheckReport) -> Result<()> {
    println!();
    print_header(report.generated_at, &report.registry);

    if report.stale.is_empty() {
        println!("All module references are up to date.");
    } else {
        println!("Found {} stale module references:", report.stale.len());
        println!();
        println!("{}", stale_table(&report.stale));
    }

    print_failures(&report.failures);

    println!();
    println!("Summary:");
    println!("  Granularity: {}", report.granularity);
    println!("  Files scanned: {}", report.files_scanned);
    println!("  Stale references: {}", report.stale.len());
    if report.has_failures() {
        println!("  Failures: {}", report.failures.len());
    }

    Ok(())
}

pub fn print_patch_table(report: &PatchReport) -> Result<()> {
    println!();
    print_header(report.generated_at, &report.registry);

    if report.rewritten.is_empty() {
        println!("Nothing to patch.");
    } else {
        println!("Updated {} module references:", report.rewritten.len());
        println!();
        println!("{}", stale_table(&report.rewritten));
    }

    print_failures(&report.failures);

    println!();
    println!("Summary:");
    println!("  Granularity: {}", report.granularity);
    println!("  Files scanned: {}", report.files_scanned);
    println!("  Files patched: {}", report.files_patched);
    if report.has_failures() {
        println!("  Failures: {}", report.failures.len());
    }

    Ok(())
}

fn print_header(generated_at: chrono::DateTime<chrono::Utc>, registry: &str) {
    println!(
        "Checked at: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Registry: {}", registry);
    println!();
}

fn stale_table(entries: &[ReportEntry]) -> String {
    let rows: Vec<StaleRow> = entries
        .iter()
        .map(|e| StaleRow {
            file: truncate(&e.path.display().to_string(), 60),
            line: e.line_number,
            module: e.module_name.clone(),
            current: e.referenced_version.clone(),
            latest: e.latest_version.clone(),
            update_type: classify_update(&e.referenced_version, &e.latest_version).to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn print_failures(failures: &[FileFailure]) {
    if failures.is_empty() {
        return;
    }

    println!();
    println!("{} files could not be processed:", failures.len());
    println!();

    let rows: Vec<FailureRow> = failures
        .iter()
        .map(|f| FailureRow {
            file: f
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string()),
            error: truncate(&f.message, 80),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()).to_string());
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Classify a version bump as major or minor
fn classify_update(current: &str, latest: &str) -> &'static str {
    let current = ModuleVersion::parse(current);
    let latest = ModuleVersion::parse(latest);

    if latest.major > current.major {
        "MAJOR"
    } else {
        "minor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_update() {
        assert_eq!(classify_update("1.9", "2.0"), "MAJOR");
        assert_eq!(classify_update("2.0", "2.3"), "minor");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("main.tf", 60), "main.tf");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
