/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn domainmap(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_domainmap"))
        .args(args)
        .env("NAMEDOTCOM_AUTH", "")
        .output()
        .expect("Failed to execute domainmap")
}

#[test]
fn binary_shows_help() {
    let output = domainmap(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("domainmap"), "Help output should mention domainmap");
    for command in ["map", "serve", "search", "register"] {
        assert!(stdout.contains(command), "Help output should list {command}");
    }
}

#[test]
fn binary_shows_version() {
    let output = domainmap(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = domainmap(&["nonexistent-command"]);

    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn empty_search_term_is_skipped_silently() {
    // Nothing listens on port 1; an empty term must not even try to connect
    let output = domainmap(&["search", " .com", "--proxy", "http://127.0.0.1:1"]);

    assert!(
        output.status.success(),
        "Empty search should be a no-op: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn unreachable_proxy_reports_failure() {
    let output = domainmap(&["search", "example", "--proxy", "http://127.0.0.1:1"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to check domain availability."));
    assert!(!stderr.contains("panicked at"));
}
