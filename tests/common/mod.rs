//! Integration Test Utilities and Common Code

#![allow(dead_code)]

use indoc::indoc;

pub use assert_cmd::prelude::*;
pub use assert_fs::prelude::*;
pub use assert_fs::{fixture::ChildPath, TempDir};
pub use insta::assert_snapshot;
pub use predicates::prelude::*;
pub use predicates::str::{contains, is_empty, RegexPredicate};
pub use serde_json::{json, Value};
pub use std::path::Path;
pub use std::process::Command;

/// Build a `Command` for the `sarif-convert` crate binary with variadic command-line arguments.
///
/// The arguments can be anything that is allowed by `Command::arg`.
#[macro_export]
macro_rules! sarif_convert {
    ( $( $arg:expr ),* ) => {
        {
            let mut cmd = sarif_convert_cmd();
            $(
                cmd.arg($arg);
            )*
            cmd
        }
    }
}

/// Build an `assert_cmd::assert::Assert` by calling `sarif_convert!(args).assert().success()`.
#[macro_export]
macro_rules! sarif_convert_success {
    ( $( $arg:expr ),* ) => { sarif_convert!($( $arg ),*).assert().success() }
}

/// Build an `assert_cmd::assert::Assert` by calling `sarif_convert!(args).assert().failure()`.
#[macro_export]
macro_rules! sarif_convert_failure {
    ( $( $arg:expr ),* ) => { sarif_convert!($( $arg ),*).assert().failure() }
}

// make macros easily visible to other modules
pub use {sarif_convert, sarif_convert_failure, sarif_convert_success};

/// Build a `Command` for the `sarif-convert` crate binary.
pub fn sarif_convert_cmd() -> Command {
    let mut cmd = Command::cargo_bin("sarif-convert").expect("sarif-convert should be executable");
    cmd.env_remove("SARIF_CONVERT_TOOL")
        .env_remove("SARIF_CONVERT_TOOL_ARGS")
        .env_remove("SARIF_CONVERT_LOG");
    cmd
}

/// Create a `RegexPredicate` from the given pattern.
pub fn is_match(pat: &str) -> RegexPredicate {
    predicates::str::is_match(pat).expect("pattern should compile")
}

/// Parse command output as JSON.
pub fn parse_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("output should be valid JSON")
}

/// A type to represent a mock conversion environment for testing `sarif-convert`.
pub struct ConvertEnv {
    pub root: TempDir,
}

impl ConvertEnv {
    /// Create a new mock conversion environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("should be able to create tempdir");
        Self { root }
    }

    /// Create a report file within this environment with the given name and contents.
    pub fn report_file(&self, name: &str, contents: &str) -> ChildPath {
        let report = self.root.child(name);
        report
            .write_str(contents)
            .expect("should be able to write report file");
        assert!(report.is_file());
        report
    }

    /// Create a NodeJsScan-style JSON report with three issues from two rules.
    pub fn nodejsscan_report(&self, name: &str) -> ChildPath {
        let contents = indoc! {r#"
            {
              "sec_issues": {
                "Weak Hash": [
                  {
                    "title": "Weak Hash used - MD5",
                    "description": "MD5 is a a weak hash which is known to have collision.",
                    "line": 10,
                    "lines": "const a = 1;\nconst h = md5(a);\nconsole.log(h);",
                    "path": "src\\lib\\hash one.js",
                    "issue_severity": "MEDIUM",
                    "issue_confidence": "HIGH"
                  },
                  {
                    "title": "Weak Hash used - MD5",
                    "description": "MD5 is a a weak hash which is known to have collision.",
                    "line": 3,
                    "lines": "md5(b)",
                    "path": "src/other.js",
                    "issue_severity": "MEDIUM",
                    "issue_confidence": "HIGH"
                  }
                ],
                "Eval": {
                  "title": "eval() with user input",
                  "description": "User controlled data in eval() can result in Server Side Injection.",
                  "line": 7,
                  "lines": "eval(req.query.x)",
                  "path": "src/server.js",
                  "issue_severity": "HIGH",
                  "issue_confidence": "LOW"
                }
              },
              "total_count": {"sec": 3, "good": 0},
              "vuln_count": {"Weak Hash": 2, "Eval": 1},
              "files": []
            }
        "#};
        self.report_file(name, contents)
    }

    /// Create a name for a child entry within this mock environment.
    ///
    /// The filesystem is not touched by this function; this merely produces a `ChildPath`.
    pub fn child(&self, name: &str) -> ChildPath {
        self.root.child(name)
    }
}
