//! Fixed values shared by the extractor and the SARIF builder

/// The SARIF 2.1.0 schema URI recorded in the `$schema` field of every generated document
pub static SARIF_SCHEMA_URI: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// `strftime`-style format of the invocation end time, e.g. `2023-04-01T12:30:00Z`
pub static END_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The only report file suffix the extractor parses
pub static REPORT_SUFFIX: &str = "json";
