use chrono::{DateTime, Utc};
use serde_json::Value;
use serde_sarif::sarif;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::defaults::{END_TIME_FORMAT, SARIF_SCHEMA_URI};
use crate::issue::{Issue, Metrics, Skip};
use crate::uri::to_uri;

// -------------------------------------------------------------------------------------------------
// Level
// -------------------------------------------------------------------------------------------------
/// Map a scanner severity to a SARIF level.
///
/// Only the exact spellings `HIGH`, `MEDIUM`, and `LOW` are recognized; anything else, including a
/// missing severity, is reported as a warning.
pub fn level_from_severity(severity: Option<&str>) -> sarif::ResultLevel {
    match severity {
        Some("HIGH") => sarif::ResultLevel::Error,
        Some("MEDIUM") => sarif::ResultLevel::Warning,
        Some("LOW") => sarif::ResultLevel::Note,
        _ => sarif::ResultLevel::Warning,
    }
}

// -------------------------------------------------------------------------------------------------
// RuleTable
// -------------------------------------------------------------------------------------------------
/// The deduplicated rules referenced by a run, in first-seen order.
///
/// A rule's index is its position in `rules`, so the index handed out when a rule is first seen
/// is the same as its position in the `runs.tool.driver.rules` array property.
#[derive(Default)]
pub struct RuleTable {
    rules: Vec<sarif::ReportingDescriptor>,
    indices: HashMap<String, usize>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the index of the rule for the given issue, creating the rule if this is the first
    /// issue with its `test_id`.
    pub fn find_or_create(&mut self, issue: &Issue) -> usize {
        if let Some(&index) = self.indices.get(&issue.test_id) {
            return index;
        }

        let rule = sarif::ReportingDescriptor::builder()
            .id(&issue.test_id)
            .name(&issue.test_name)
            .help_uri(help_uri(&issue.test_id))
            .build();

        let index = self.rules.len();
        self.rules.push(rule);
        self.indices.insert(issue.test_id.clone(), index);
        index
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_rules(self) -> Vec<sarif::ReportingDescriptor> {
        self.rules
    }
}

// FIXME: scanners do not give us documentation links, so the rule id stands in for one
fn help_uri(rule_id: &str) -> String {
    rule_id.to_string()
}

// -------------------------------------------------------------------------------------------------
// document building
// -------------------------------------------------------------------------------------------------
/// Build a SARIF document for the given issues, stamping the invocation with the current time.
pub fn build_sarif(
    tool_name: &str,
    tool_args: Option<&str>,
    metrics: &Metrics,
    skips: &[Skip],
    issues: &[Issue],
) -> sarif::Sarif {
    build_sarif_at(tool_name, tool_args, metrics, skips, issues, Utc::now())
}

/// Build a SARIF document for the given issues, with an explicit invocation end time.
///
/// The result has exactly one run. The run's invocation is always marked as successful, whether
/// or not the upstream tool actually was.
pub fn build_sarif_at(
    tool_name: &str,
    tool_args: Option<&str>,
    metrics: &Metrics,
    skips: &[Skip],
    issues: &[Issue],
    end_time: DateTime<Utc>,
) -> sarif::Sarif {
    // FIXME: derive this from the upstream tool's exit status once callers can supply it
    let mut invocation = sarif::Invocation::builder()
        .end_time_utc(end_time.format(END_TIME_FORMAT).to_string())
        .execution_successful(true)
        .build();
    add_skipped_file_notifications(skips, &mut invocation);

    let mut rule_table = RuleTable::new();
    let results: Vec<sarif::Result> = issues
        .iter()
        .map(|issue| make_sarif_result(issue, &mut rule_table))
        .collect();
    debug!(
        "Mapped {} issues onto {} distinct rules",
        results.len(),
        rule_table.len()
    );

    let mut driver = sarif::ToolComponent::builder().name(tool_name).build();
    if !rule_table.is_empty() {
        driver.rules = Some(rule_table.into_rules());
    }

    let conversion = sarif::Conversion::builder()
        .tool(converter_sarif_tool())
        .invocation(
            sarif::Invocation::builder()
                .command_line(tool_args.unwrap_or_default())
                .execution_successful(true)
                .build(),
        )
        .build();

    let properties = sarif::PropertyBag::builder()
        .additional_properties(BTreeMap::from_iter([(
            String::from("metrics"),
            Value::Object(metrics.clone()),
        )]))
        .build();

    let run = sarif::Run::builder()
        .tool(sarif::Tool::builder().driver(driver).build())
        .invocations([invocation])
        .conversion(conversion)
        .properties(properties)
        .results(results)
        .build();

    sarif::Sarif::builder()
        .version(sarif::Version::V2_1_0.to_string())
        .schema(SARIF_SCHEMA_URI)
        .runs([run])
        .build()
}

/// Record each skipped file as a tool configuration notification on the invocation
fn add_skipped_file_notifications(skips: &[Skip], invocation: &mut sarif::Invocation) {
    if skips.is_empty() {
        return;
    }

    let notifications = invocation
        .tool_configuration_notifications
        .get_or_insert_with(Vec::new);

    for skip in skips {
        let notification = sarif::Notification::builder()
            .level(sarif::NotificationLevel::Error.to_string())
            .message(sarif::Message::builder().text(&skip.reason).build())
            .locations([artifact_only_location(&skip.file_name)])
            .build();
        notifications.push(notification);
    }
}

fn artifact_only_location(file_name: &str) -> sarif::Location {
    sarif::Location::builder()
        .physical_location(
            sarif::PhysicalLocation::builder()
                .artifact_location(sarif::ArtifactLocation::builder().uri(to_uri(file_name)).build())
                .build(),
        )
        .build()
}

fn make_sarif_result(issue: &Issue, rule_table: &mut RuleTable) -> sarif::Result {
    let rule_index = rule_table.find_or_create(issue);

    let (region, context_region) = make_regions(issue.line_number, &issue.code_lines());

    let location = sarif::Location::builder()
        .physical_location(
            sarif::PhysicalLocation::builder()
                .artifact_location(
                    sarif::ArtifactLocation::builder()
                        .uri(to_uri(&issue.filename))
                        .build(),
                )
                .region(region)
                .context_region(context_region)
                .build(),
        )
        .build();

    let properties = sarif::PropertyBag::builder()
        .additional_properties(BTreeMap::from_iter([
            (String::from("issue_confidence"), Value::from(issue.issue_confidence.clone())),
            (String::from("issue_severity"), Value::from(issue.issue_severity.clone())),
        ]))
        .build();

    sarif::Result::builder()
        .rule_id(&issue.test_id)
        .rule_index(rule_index as i64)
        .message(sarif::Message::builder().text(&issue.issue_text).build())
        .level(level_from_severity(issue.issue_severity.as_deref()).to_string())
        .locations([location])
        .properties(properties)
        .build()
}

/// Build the primary region, covering only the first snippet line, and the context region,
/// covering every snippet line.
fn make_regions(line_number: u64, snippet_lines: &[&str]) -> (sarif::Region, sarif::Region) {
    // `Issue` keeps line numbers within `i64`, but its fields are public
    let start_line = i64::try_from(line_number).unwrap_or(i64::MAX);
    let first_line = snippet_lines.first().copied().unwrap_or_default();
    let num_lines = i64::try_from(snippet_lines.len().max(1)).unwrap_or(i64::MAX);

    let region = sarif::Region::builder()
        .start_line(start_line)
        .snippet(sarif::ArtifactContent::builder().text(first_line).build())
        .build();

    let context_region = sarif::Region::builder()
        .start_line(start_line)
        .end_line(start_line.saturating_add(num_lines - 1))
        .snippet(
            sarif::ArtifactContent::builder()
                .text(snippet_lines.concat())
                .build(),
        )
        .build();

    (region, context_region)
}

/// The tool that performed the conversion, for the runs.conversion.tool property
fn converter_sarif_tool() -> sarif::Tool {
    sarif::Tool::builder()
        .driver(
            sarif::ToolComponent::builder()
                .name(env!("CARGO_PKG_NAME").to_string())
                .semantic_version(env!("CARGO_PKG_VERSION").to_string())
                .short_description(
                    sarif::MultiformatMessageString::builder()
                        .text(env!("CARGO_PKG_DESCRIPTION"))
                        .build(),
                )
                .build(),
        )
        .build()
}
