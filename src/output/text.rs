use crate::model::{CheckReport, PatchReport};
use std::fmt::Write;

/// One `<path>:<line> `<module>` version <ref> (latest <latest>)` line per entry.
pub fn format_check_text(report: &CheckReport) -> String {
    let mut out = String::new();
    for entry in &report.stale {
        let _ = writeln!(out, "{}", entry);
    }
    out
}

pub fn format_patch_text(report: &PatchReport) -> String {
    let mut out = String::new();
    for entry in &report.rewritten {
        let _ = writeln!(
            out,
            "{}:{} `{}` version {} -> {}",
            entry.path.display(),
            entry.line_number,
            entry.module_name,
            entry.referenced_version,
            entry.latest_version
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Granularity;
    use crate::model::ReportEntry;
    use std::path::PathBuf;

    fn entry(line_number: usize, name: &str, referenced: &str, latest: &str) -> ReportEntry {
        ReportEntry {
            path: PathBuf::from("main.tf"),
            line_number,
            module_name: name.to_string(),
            referenced_version: referenced.to_string(),
            latest_version: latest.to_string(),
        }
    }

    #[test]
    fn test_format_check_text() {
        let mut report = CheckReport::new("https://example/", Granularity::Any);
        report.stale.push(entry(2, "vpc", "2.0", "2.3"));
        report.stale.push(entry(9, "rds", "1.4", "2.0"));

        assert_eq!(
            format_check_text(&report),
            "main.tf:2 `vpc` version 2.0 (latest 2.3)\nmain.tf:9 `rds` version 1.4 (latest 2.0)\n"
        );
    }

    #[test]
    fn test_format_check_text_empty() {
        let report = CheckReport::new("https://example/", Granularity::Any);
        assert_eq!(format_check_text(&report), "");
    }

    #[test]
    fn test_format_patch_text() {
        let mut report = PatchReport::new("https://example/", Granularity::Major);
        report.rewritten.push(entry(7, "rds", "1.4", "2.0"));

        assert_eq!(
            format_patch_text(&report),
            "main.tf:7 `rds` version 1.4 -> 2.0\n"
        );
    }
}
