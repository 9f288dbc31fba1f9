use anyhow::Result;
use std::path::Path;

use crate::extract::{extract_from_file, Extracted};
use crate::issue::{Issue, Metrics, Skip};
use crate::output::{to_json, Destination};
use crate::sarif_report::build_sarif;

/// Build the SARIF document for the given findings and serialize it.
///
/// The serialized document is returned, and is also written to `destination` if one is given.
pub fn report(
    tool_name: &str,
    tool_args: Option<&str>,
    metrics: &Metrics,
    skips: &[Skip],
    issues: &[Issue],
    destination: Option<&Destination>,
) -> Result<String> {
    let sarif = build_sarif(tool_name, tool_args, metrics, skips, issues);
    let serialized = to_json(&sarif)?;

    if let Some(destination) = destination {
        destination.write_document(&serialized)?;
    }
    Ok(serialized)
}

/// Convert a native report file into SARIF.
pub fn convert_file(
    tool_name: &str,
    tool_args: Option<&str>,
    report_file: &Path,
    destination: Option<&Destination>,
) -> Result<String> {
    let Extracted {
        issues,
        metrics,
        skips,
    } = extract_from_file(tool_name, report_file)?;
    report(tool_name, tool_args, &metrics, &skips, &issues, destination)
}
