use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, debug_span};

use crate::defaults::REPORT_SUFFIX;
use crate::issue::{Issue, Metrics, Skip};

/// Top-level report fields that are copied into the run metrics
const METRIC_KEYS: &[&str] = &["total_count", "vuln_count"];

// -------------------------------------------------------------------------------------------------
// Extracted
// -------------------------------------------------------------------------------------------------
/// Everything pulled out of a native scanner report
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extracted {
    pub issues: Vec<Issue>,
    pub metrics: Metrics,
    pub skips: Vec<Skip>,
}

/// Extract issues and metrics from a native report file.
///
/// The file is always opened, so a missing or unreadable report is an error regardless of its
/// name. Only `.json` reports are parsed; any other suffix produces an empty `Extracted`.
///
/// Issues are taken from the NodeJsScan-style `sec_issues` object, whose values are either a list
/// of issue records or a single record. The `total_count` and `vuln_count` fields are recorded as
/// metrics. Skips are never produced from a report file.
pub fn extract_from_file(tool_name: &str, report_file: &Path) -> Result<Extracted> {
    let _span = debug_span!("extract", tool = tool_name, report = %report_file.display()).entered();

    let file = File::open(report_file)
        .with_context(|| format!("Failed to open report file {}", report_file.display()))?;

    if report_file.extension().and_then(|e| e.to_str()) != Some(REPORT_SUFFIX) {
        debug!("Unrecognized report suffix; nothing extracted");
        return Ok(Extracted::default());
    }

    let extracted = extract_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read report file {}", report_file.display()))?;
    debug!(
        "Extracted {} issues and {} metrics",
        extracted.issues.len(),
        extracted.metrics.len()
    );
    Ok(extracted)
}

/// Extract issues and metrics from JSON report content.
pub fn extract_from_reader<R: Read>(reader: R) -> Result<Extracted> {
    let report: Value = serde_json::from_reader(reader).context("Failed to parse report as JSON")?;
    extract_from_value(&report)
}

/// Extract issues and metrics from an already-parsed JSON report.
pub fn extract_from_value(report: &Value) -> Result<Extracted> {
    let mut extracted = Extracted::default();

    let report = match report.as_object() {
        Some(report) => report,
        None => return Ok(extracted),
    };

    if let Some(sec_issues) = report.get("sec_issues") {
        let sec_issues = match sec_issues.as_object() {
            Some(s) => s,
            None => bail!("Expected `sec_issues` to be an object"),
        };
        for (category, value) in sec_issues {
            match value {
                Value::Array(records) => {
                    for record in records {
                        let issue = Issue::from_value(record).with_context(|| {
                            format!("Failed to read issue in category {category:?}")
                        })?;
                        extracted.issues.push(issue);
                    }
                }
                record => {
                    let issue = Issue::from_value(record).with_context(|| {
                        format!("Failed to read issue in category {category:?}")
                    })?;
                    extracted.issues.push(issue);
                }
            }
        }
    }

    for key in METRIC_KEYS {
        if let Some(v) = report.get(*key) {
            extracted.metrics.insert(key.to_string(), v.clone());
        }
    }

    Ok(extracted)
}
