//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and
//! verify outputs.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config: &TempDir, env: &[(&str, &str)], args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cmdtime"))
        .args(args)
        .env("CMDTIME_CONFIG_DIR", config.path())
        .env_remove("CMDTIME_THRESHOLD")
        .env_remove("CMDTIME_PRECISION")
        .env_remove("CMDTIME_LOOPS")
        .env_remove("CMDTIME_BYPASS")
        .env_remove("CMDTIME_LOG")
        .envs(env.iter().copied())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(config: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(config, &[], args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

#[test]
fn test_format_scenarios() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_ok(&dir, &["format", "0"]).trim(), "0.000");
    assert_eq!(run_ok(&dir, &["format", "10934.1"]).trim(), "3:02:14.100");
    assert_eq!(
        run_ok(&dir, &["format", "90061.5", "--precision", "1"]).trim(),
        "1day, 01:01:01.5"
    );
    assert_eq!(run_ok(&dir, &["format", "4.9999"]).trim(), "4.999");
    assert_eq!(run_ok(&dir, &["format", "-2"]).trim(), "0.000");
}

#[test]
fn test_format_json_fields() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(&dir, &["format", "90061.5", "-p", "1", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["days"], 1);
    assert_eq!(json["hours"], 1);
    assert_eq!(json["minutes"], 1);
    assert_eq!(json["seconds"], 1);
    assert_eq!(json["fraction"], 5);
    assert_eq!(json["pretty"], "1day, 01:01:01.5");
}

#[test]
fn test_now_prints_timestamp() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(&dir, &["now"]);
    let (secs, nanos) = out.trim().split_once('.').unwrap();
    assert!(secs.parse::<u64>().unwrap() > 1_600_000_000);
    assert_eq!(nanos.len(), 9);
}

#[test]
fn test_calibrate_prints_seconds() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(&dir, &["calibrate", "--loops", "0"]);
    assert!(out.trim().parse::<f64>().unwrap() >= 0.0);
    let out = run_ok(&dir, &["calibrate", "--spawn", "--loops", "2"]);
    assert!(out.trim().parse::<f64>().unwrap() > 0.0);
}

#[test]
fn test_finish_threshold_boundary() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(
        &dir,
        &[],
        &["finish", "--start", "100", "--stop", "105"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("CMDTIME_STRING='5.000'"));
    assert!(!stderr.contains("real"));

    let (stdout, stderr, _) = run_cli(
        &dir,
        &[],
        &["finish", "--start", "100", "--stop", "105.001"],
    );
    assert!(stdout.contains("CMDTIME_SECONDS='5.001'"));
    assert!(stdout.contains("CMDTIME_TOTAL='5.001000000'"));
    assert_eq!(stderr.trim(), "real 5.001s");
}

#[test]
fn test_finish_overhead_and_never() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, _) = run_cli(
        &dir,
        &[("CMDTIME_THRESHOLD", "never")],
        &["finish", "--start", "0.5", "--stop", "100", "--overhead", "0.5"],
    );
    assert!(stdout.contains("CMDTIME_STRING='1:39.000'"));
    assert!(stderr.is_empty());
}

#[test]
fn test_finish_bypass_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(&dir, &[], &["finish", "--start", "0"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.is_empty());
    let (stdout, _, code) = run_cli(&dir, &[], &["finish"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn test_finish_json_event() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, _) = run_cli(
        &dir,
        &[("CMDTIME_THRESHOLD", "always")],
        &["finish", "--start", "1", "--stop", "3", "--json"],
    );
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["type"], "command_finished");
    assert_eq!(json["elapsed_ns"], 2_000_000_000u64);
    assert_eq!(json["reported"], true);
}

#[test]
fn test_finish_rejects_bad_timestamp() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &[], &["finish", "--start", "yesterday"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("malformed timestamp"));
}

#[test]
fn test_config_set_get_reset() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_ok(&dir, &["config", "get", "precision"]).trim(), "3");
    assert_eq!(run_ok(&dir, &["config", "set", "precision", "1"]).trim(), "ok");
    assert_eq!(run_ok(&dir, &["config", "get", "precision"]).trim(), "1");
    assert_eq!(run_ok(&dir, &["format", "2.75"]).trim(), "2.7");

    let (_, stderr, code) = run_cli(&dir, &[], &["config", "set", "threshold", "later"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("threshold"));

    let (_, _, code) = run_cli(&dir, &[], &["config", "get", "nope"]);
    assert_ne!(code, 0);

    run_ok(&dir, &["config", "reset"]);
    assert_eq!(run_ok(&dir, &["config", "get", "precision"]).trim(), "3");
    assert!(run_ok(&dir, &["config", "path"]).trim().ends_with("config.toml"));
}

#[test]
fn test_init_scripts() {
    let dir = TempDir::new().unwrap();
    let bash = run_ok(&dir, &["init", "bash"]);
    assert!(bash.contains("PROMPT_COMMAND="));
    assert!(bash.contains("timelast() {"));
    let zsh = run_ok(&dir, &["init", "zsh"]);
    assert!(zsh.contains("add-zsh-hook preexec __cmdtime_preexec"));
}

#[cfg(unix)]
#[test]
fn test_shell_session() {
    let dir = TempDir::new().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_cmdtime"))
        .args(["shell", "--program", "sh", "--prompt", ""])
        .env("CMDTIME_CONFIG_DIR", dir.path())
        .env("CMDTIME_THRESHOLD", "always")
        .env("CMDTIME_PRECISION", "0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start shell session");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"echo hello\ntimelast\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["hello", "real 0s", "real 0s"]);
}

/// Pipe `script` into an interactive bash with the given CMDTIME_* settings.
/// Returns `None` when bash is not installed.
#[cfg(unix)]
fn run_interactive_bash(
    config: &TempDir,
    env: &[(&str, &str)],
    script: &str,
) -> Option<(String, String)> {
    if Command::new("bash").arg("--version").output().is_err() {
        return None;
    }
    let mut child = Command::new("bash")
        .args(["--norc", "--noprofile", "-i"])
        .env("CMDTIME_CONFIG_DIR", config.path())
        .env("HISTFILE", config.path().join("history"))
        .env_remove("PROMPT_COMMAND")
        .env_remove("CMDTIME_STRING")
        .env_remove("CMDTIME_THRESHOLD")
        .env_remove("CMDTIME_PRECISION")
        .env_remove("CMDTIME_BYPASS")
        .env_remove("CMDTIME_LOG")
        .envs(env.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start bash");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    Some((
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    ))
}

/// `real ...s` lines the hook wrote to stderr, with the prompts stripped.
#[cfg(unix)]
fn reports(stderr: &str) -> Vec<String> {
    stderr
        .match_indices("real ")
        .map(|(at, _)| stderr[at..].lines().next().unwrap_or_default().to_string())
        .collect()
}

#[cfg(unix)]
#[test]
fn test_bash_hook_session() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "PROMPT_COMMAND='echo status=$?'\n\
         eval \"$('{}' init bash)\"\n\
         sleep 1.2\n\
         \n\
         timelast\n\
         false\n\
         exit\n",
        env!("CARGO_BIN_EXE_cmdtime")
    );
    let Some((stdout, stderr)) = run_interactive_bash(
        &dir,
        &[("CMDTIME_THRESHOLD", "always"), ("CMDTIME_LOOPS", "2")],
        &script,
    ) else {
        return;
    };

    // One report for `sleep`, none for the empty line, one for `false`.
    let reports = reports(&stderr);
    assert_eq!(reports.len(), 2, "stderr: {stderr}");
    let slow = &reports[0];
    let secs: f64 = slow
        .trim_start_matches("real ")
        .trim_end_matches('s')
        .parse()
        .unwrap();
    assert!(secs >= 1.0, "{slow}");

    // `timelast` still shows the sleep after the empty line, and the user's
    // PROMPT_COMMAND sees the exit status of `false`.
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "status=0",
            "status=0",
            "status=0",
            slow.as_str(),
            "status=0",
            "status=1",
        ],
        "stderr: {stderr}"
    );
}

#[cfg(unix)]
#[test]
fn test_bash_hook_keeps_exit_status() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "PROMPT_COMMAND='echo status=$?'\n\
         eval \"$('{}' init bash)\"\n\
         false\n\
         (exit 3)\n\
         true\n\
         exit\n",
        env!("CARGO_BIN_EXE_cmdtime")
    );
    let Some((stdout, stderr)) = run_interactive_bash(
        &dir,
        &[("CMDTIME_THRESHOLD", "never"), ("CMDTIME_LOOPS", "1")],
        &script,
    ) else {
        return;
    };
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["status=0", "status=1", "status=3", "status=0"],
        "stderr: {stderr}"
    );
    assert!(reports(&stderr).is_empty());
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(&dir, &["completions", "bash"]);
    assert!(out.contains("cmdtime"));
}
