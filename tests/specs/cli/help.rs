//! CLI help and argument handling specs.

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    let out = wmctl().args(&["--help"]).passes();
    for command in ["run", "raw", "tree", "views", "focused", "monitor"] {
        assert!(out.stdout.contains(command), "help is missing `{command}`:\n{}", out.stdout);
    }
}

#[test]
fn no_args_shows_usage_and_fails() {
    wmctl().exits_with(2).stderr_has("Usage:");
}

#[test]
fn version_shows_version() {
    wmctl().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn monitor_help_names_categories_flag() {
    wmctl().args(&["monitor", "--help"]).passes().stdout_has("--event");
}

#[test]
fn unknown_event_category_is_rejected() {
    wmctl().args(&["monitor", "--event", "weather"]).exits_with(2).stderr_has("weather");
}

#[test]
fn missing_socket_variables_exit_3() {
    wmctl()
        .args(&["tree"])
        .exits_with(3)
        .stderr_has("SWAYSOCK");
}

#[test]
fn unreachable_socket_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.sock");
    wmctl()
        .args(&["--socket", path.to_str().unwrap(), "tree"])
        .exits_with(3)
        .stderr_has("cannot connect");
}
