use crate::model::{CheckReport, PatchReport};
use anyhow::Result;

pub fn print_check_json(report: &CheckReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

pub fn print_patch_json(report: &PatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}
