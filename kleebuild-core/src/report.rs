//! Build report types and output helpers.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One finished release artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltFont {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub weight_class: Option<u16>,
}

/// Everything a build run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    pub fonts: Vec<BuiltFont>,
}

/// Write the report as prettified JSON.
pub fn write_json_pretty(report: &BuildReport, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write one line per artifact.
pub fn write_plain(report: &BuildReport, mut w: impl Write) -> Result<()> {
    for font in &report.fonts {
        writeln!(w, "{}", font.path.display())?;
    }
    Ok(())
}
