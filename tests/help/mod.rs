//! Tests for `sarif-convert` `help` functionality

use super::*;

#[test]
fn no_args() {
    sarif_convert_failure!().code(2).stdout(is_empty());
}

#[test]
fn help() {
    sarif_convert_success!("help")
        .stdout(contains("convert").and(contains("Convert a scanner report into SARIF")));
}

#[test]
fn help_convert() {
    sarif_convert_success!("help", "convert")
        .stdout(contains("--tool <NAME>").and(contains("--output <PATH>")));
}

#[test]
fn version() {
    let assert = sarif_convert_success!("--version");
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_snapshot!(stdout.trim().replace(env!("CARGO_PKG_VERSION"), "VERSION"), @"sarif-convert VERSION");
}
