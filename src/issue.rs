use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scalar run metrics, copied opaquely into `runs[0].properties.metrics`
pub type Metrics = Map<String, Value>;

// -------------------------------------------------------------------------------------------------
// Issue
// -------------------------------------------------------------------------------------------------
/// A single finding reported by an upstream scanning tool.
///
/// Scanners spell their fields in different ways; every representation is funneled through
/// [`Issue::from_mapping`], including `Deserialize`, so the rest of the crate sees one shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Issue {
    /// Path of the file the finding is in
    pub filename: String,

    /// 1-based line number where the finding starts, at most `i64::MAX`
    pub line_number: u64,

    /// The offending source lines, separated by `\n`
    pub code: String,

    /// Human-readable description of the finding
    pub issue_text: String,

    /// Usually one of `HIGH`, `MEDIUM`, or `LOW`, but kept verbatim
    pub issue_severity: Option<String>,

    /// The scanner's confidence in the finding, kept verbatim
    pub issue_confidence: Option<String>,

    /// Identifier of the rule that produced the finding
    pub test_id: String,

    /// Display name of the rule that produced the finding
    pub test_name: String,
}

const FILENAME_KEYS: &[&str] = &["filename", "path", "fname", "file"];
const LINE_NUMBER_KEYS: &[&str] = &["line_number", "line", "lineno"];
const CODE_KEYS: &[&str] = &["code", "lines", "snippet"];
const ISSUE_TEXT_KEYS: &[&str] = &["issue_text", "description", "message"];
const SEVERITY_KEYS: &[&str] = &["issue_severity", "severity"];
const CONFIDENCE_KEYS: &[&str] = &["issue_confidence", "confidence"];
const TEST_ID_KEYS: &[&str] = &["test_id", "rule_id"];
const TEST_NAME_KEYS: &[&str] = &["test_name", "title", "rule_name"];

impl Issue {
    /// Normalize a raw issue mapping into an `Issue`.
    ///
    /// The canonical keys (those produced by [`Issue::as_dict`]) are looked up first, followed by
    /// the spellings NodeJsScan uses, e.g. `path`, `line`, `lines`, `title`, and `description`.
    /// Missing text fields become empty strings, a missing line number becomes 1, and a missing
    /// `test_id` falls back to the test name.
    pub fn from_mapping(data: &Map<String, Value>) -> Result<Self> {
        let test_name = lookup_string(data, TEST_NAME_KEYS).unwrap_or_default();
        let test_id = lookup_string(data, TEST_ID_KEYS).unwrap_or_else(|| test_name.clone());

        Ok(Issue {
            filename: lookup_string(data, FILENAME_KEYS).unwrap_or_default(),
            line_number: lookup_line_number(data)?.unwrap_or(1),
            code: lookup_string(data, CODE_KEYS).unwrap_or_default(),
            issue_text: lookup_string(data, ISSUE_TEXT_KEYS).unwrap_or_default(),
            issue_severity: lookup_string(data, SEVERITY_KEYS),
            issue_confidence: lookup_string(data, CONFIDENCE_KEYS),
            test_id,
            test_name,
        })
    }

    /// Normalize an arbitrary JSON value, which must be an object.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(data) => Self::from_mapping(data),
            other => bail!("Expected an issue object, found {}", json_type_name(other)),
        }
    }

    /// The canonical mapping representation of this issue.
    pub fn as_dict(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("filename".into(), self.filename.clone().into());
        m.insert("line_number".into(), self.line_number.into());
        m.insert("code".into(), self.code.clone().into());
        m.insert("issue_text".into(), self.issue_text.clone().into());
        m.insert("issue_severity".into(), self.issue_severity.clone().into());
        m.insert("issue_confidence".into(), self.issue_confidence.clone().into());
        m.insert("test_id".into(), self.test_id.clone().into());
        m.insert("test_name".into(), self.test_name.clone().into());
        m
    }

    /// The lines of `code`, split on `\n`.
    ///
    /// A trailing newline yields a trailing empty line, so this always has at least one element.
    pub fn code_lines(&self) -> Vec<&str> {
        self.code.split('\n').collect()
    }
}

impl TryFrom<Map<String, Value>> for Issue {
    type Error = anyhow::Error;

    fn try_from(data: Map<String, Value>) -> Result<Self> {
        Self::from_mapping(&data)
    }
}

fn lookup<'a>(data: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| data.get(*k))
        .find(|v| !v.is_null())
}

/// Look up the first present key, rendering non-string scalars as text.
fn lookup_string(data: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    lookup(data, keys).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn lookup_line_number(data: &Map<String, Value>) -> Result<Option<u64>> {
    let v = match lookup(data, LINE_NUMBER_KEYS) {
        None => return Ok(None),
        Some(v) => v,
    };
    let n = match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n >= 1 && i64::try_from(n).is_ok() => Ok(Some(n)),
        _ => bail!(
            "Invalid line number {v}: expected a positive integer no larger than {}",
            i64::MAX
        ),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// -------------------------------------------------------------------------------------------------
// Skip
// -------------------------------------------------------------------------------------------------
/// A file the upstream tool declined to scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Skip {
    pub file_name: String,
    pub reason: String,
}

impl Skip {
    pub fn new<S1: Into<String>, S2: Into<String>>(file_name: S1, reason: S2) -> Self {
        Skip {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }
}

impl<S1: Into<String>, S2: Into<String>> From<(S1, S2)> for Skip {
    fn from((file_name, reason): (S1, S2)) -> Self {
        Skip::new(file_name, reason)
    }
}
