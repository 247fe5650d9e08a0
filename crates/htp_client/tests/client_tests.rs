//! Tests for the protocol client against scripted child programs
//!
//! Each test program is a short `/bin/sh` script that plays the role of a
//! Hex bot: it reads commands from stdin and prints canned answers.

#![cfg(unix)]

use htp_client::{LaunchCommand, ProtocolClient, ProgramDied, Reply, Side, SpawnError, SEED_LIMIT};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn sh(script: &str) -> LaunchCommand {
    LaunchCommand::new("/bin/sh", ["-c", script])
}

fn log_in(dir: &TempDir) -> PathBuf {
    dir.path().join("program.log")
}

fn open(script: &str, log: &Path) -> ProtocolClient {
    ProtocolClient::open(&sh(script), log, Side::Black, false).expect("spawn /bin/sh")
}

/// Answers every command it understands, denies everything else
const BOT: &str = r#"while read -r cmd rest; do case "$cmd" in name) printf '= scripted\n\n' ;; version) printf '= 1.0\n\n' ;; final_score) printf '= B+\n\n' ;; time_left) printf '= 12.5\n\n' ;; showboard) printf '= \n a . .\n  . b .\n\n' ;; quit) printf '= \n\n'; exit 0 ;; *) printf '? unknown command\n\n' ;; esac; done"#;

/// Denies every command
const DENY_ALL: &str = r#"while read -r cmd; do printf '? unknown command\n\n'; done"#;

// =============================================================================
// Framing
// =============================================================================

#[test]
fn test_single_line_success() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open("read -r _; printf '=id text\\n\\n'; read -r _", &log_in(&dir));

    assert_eq!(client.send_command("name"), Reply::Ok("id text".into()));
    assert!(!client.is_dead());
}

#[test]
fn test_multi_line_success() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open(BOT, &log_in(&dir));

    assert_eq!(
        client.send_command("showboard"),
        Reply::Ok(" a . .\n  . b .\n".into())
    );
}

#[test]
fn test_denial_keeps_client_alive() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open(BOT, &log_in(&dir));

    assert_eq!(
        client.send_command("frobnicate"),
        Reply::Denied("unknown command".into())
    );
    assert_eq!(client.deny_reason(), Some("unknown command"));
    assert!(!client.is_dead());

    // Still usable after a denial
    assert_eq!(client.send_command("name"), Reply::Ok("scripted".into()));
}

// =============================================================================
// Death
// =============================================================================

#[test]
fn test_output_closed_before_terminator_is_death() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open("read -r _; printf '= partial\\n'", &log_in(&dir));

    assert_eq!(client.send_command("genmove black"), Reply::Died);
    assert!(client.is_dead());

    // Dead stays dead
    assert_eq!(client.send_command("name"), Reply::Died);
    assert_eq!(client.send_command("name"), Reply::Died);
    assert!(client.is_dead());
}

#[test]
fn test_program_that_exits_immediately_dies_on_first_command() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open("exit 0", &log_in(&dir));
    thread::sleep(Duration::from_millis(100));

    assert_eq!(client.send_command("name"), Reply::Died);
    assert!(client.is_dead());
}

#[test]
fn test_check_alive_notices_exit() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open("exit 3", &log_in(&dir));

    let deadline = Instant::now() + Duration::from_secs(5);
    while client.check_alive() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(client.is_dead());
    assert_eq!(client.send_command("name"), Reply::Died);
}

// =============================================================================
// Convenience queries
// =============================================================================

#[test]
fn test_name_joins_name_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open(BOT, &log_in(&dir));

    assert_eq!(client.name(), Ok("scripted 1.0".to_string()));
    assert_eq!(client.final_score(), Ok("B+".to_string()));
    assert_eq!(client.time_remaining(), Ok("12.5".to_string()));
}

#[test]
fn test_denied_queries_give_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open(DENY_ALL, &log_in(&dir));

    assert_eq!(client.name(), Ok("?".to_string()));
    assert_eq!(client.final_score(), Ok("?".to_string()));
    assert_eq!(client.time_remaining(), Ok("?".to_string()));
    assert!(!client.is_dead());
}

#[test]
fn test_denied_version_keeps_name() {
    let dir = tempfile::tempdir().unwrap();
    let script = r#"read -r _; printf '= solo\n\n'; read -r _; printf '? no version\n\n'; read -r _"#;
    let mut client = open(script, &log_in(&dir));

    assert_eq!(client.name(), Ok("solo".to_string()));
}

#[test]
fn test_queries_surface_death() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open("read -r _", &log_in(&dir));

    assert_eq!(client.final_score(), Err(ProgramDied { side: Side::Black }));
    assert_eq!(client.name(), Err(ProgramDied { side: Side::Black }));
}

// =============================================================================
// Launch and transcript
// =============================================================================

#[test]
fn test_seed_is_substituted_before_launch() {
    let dir = tempfile::tempdir().unwrap();
    let launch = sh("read -r _; printf '= %SRAND\\n\\n'; read -r _");

    let mut client =
        ProtocolClient::open_with_seed(&launch, &log_in(&dir), Side::White, false, 4242).unwrap();
    assert_eq!(client.send_command("seed"), Reply::Ok("4242".into()));

    let mut client = ProtocolClient::open(&launch, &log_in(&dir), Side::White, false).unwrap();
    let seed: u32 = client.send_command("seed").ok().unwrap().parse().unwrap();
    assert!(seed < SEED_LIMIT);
    assert_eq!(seed, client.seed());
    assert!(!client.command().has_seed_placeholder());
}

#[test]
fn test_transcript_records_traffic() {
    let dir = tempfile::tempdir().unwrap();
    let log = log_in(&dir);
    {
        let mut client = open(BOT, &log);
        let _ = client.send_command("name");
        let _ = client.send_command("bogus");
    }

    let text = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("# /bin/sh -c "));
    assert_eq!(
        &lines[1..],
        [">name", "<= scripted", "<", ">bogus", "<? unknown command", "<"]
    );
}

#[test]
fn test_stderr_is_copied_into_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let log = log_in(&dir);
    {
        let script = "read -r _; echo 'thinking hard' >&2; sleep 0.2; printf '= ok\\n\\n'; read -r _";
        let mut client = open(script, &log);
        assert_eq!(client.send_command("genmove black"), Reply::Ok("ok".into()));
    }

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains("thinking hard\n"));
}

#[test]
fn test_stderr_drain_does_not_block() {
    let dir = tempfile::tempdir().unwrap();
    let log = log_in(&dir);
    let mut client = open("echo noise >&2; exec sleep 5", &log);
    thread::sleep(Duration::from_millis(200));

    let start = Instant::now();
    client.drain_stderr();
    client.drain_stderr();
    assert!(start.elapsed() < Duration::from_secs(1));

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains("noise"));
}

#[test]
fn test_shutdown_ends_the_program() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = open(BOT, &log_in(&dir));

    client.shutdown();
    assert!(client.is_dead());
    assert!(!client.check_alive());
}

#[test]
fn test_shutdown_kills_program_ignoring_quit() {
    let dir = tempfile::tempdir().unwrap();
    // Acknowledges quit but keeps running
    let mut client = open("read -r _; printf '= \\n\\n'; exec sleep 30", &log_in(&dir));

    let start = Instant::now();
    client.shutdown();
    assert!(client.is_dead());
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_shutdown_does_not_wait_for_quit_answer() {
    let dir = tempfile::tempdir().unwrap();
    let log = log_in(&dir);
    // Reads quit, never answers and never exits on its own
    let mut client = open("read -r _; exec sleep 30", &log);

    let start = Instant::now();
    client.shutdown();
    assert!(client.is_dead());
    assert!(!client.check_alive());
    assert!(start.elapsed() < Duration::from_secs(2));

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.lines().any(|line| line == ">quit"));
}

#[test]
fn test_missing_program_is_a_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let launch = LaunchCommand::new("/nonexistent/hex-bot", ["--quiet"]);

    let err = ProtocolClient::open(&launch, &log_in(&dir), Side::Black, false).err();
    assert!(matches!(err, Some(SpawnError::Spawn { .. })));
}

#[test]
fn test_unwritable_log_is_a_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("missing-dir").join("program.log");

    let err = ProtocolClient::open(&sh("exit 0"), &log, Side::Black, false).err();
    assert!(matches!(err, Some(SpawnError::Log { .. })));
}
