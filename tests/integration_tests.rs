//! Integration tests for fwsim
//!
//! These tests drive the public session API end to end: rule files on disk,
//! batch replay, interactive input and policy export.
//!
//! ```bash
//! cargo test --test integration_tests
//! ```

#![allow(clippy::uninlined_format_args)]

use fwsim::command::Flow;
use fwsim::session::{export_policy, load_rules, run_batch, run_interactive};
use fwsim::{Action, Error, Policy};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes `contents` to a rule file inside a fresh temp directory
fn rule_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.txt");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn batch(policy: &mut Policy, script: &str) -> String {
    let mut out = Vec::new();
    run_batch(policy, script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_load_rule_file_then_query() {
    let (_dir, path) = rule_file(
        "default deny\n\
         append allow tcp 10.0.0.5:* 10.0.0.9:443\n\
         append deny udp 10.0.0.5:53 10.0.0.9:53\n",
    );
    let mut policy = Policy::new();
    let mut out = Vec::new();

    let flow = load_rules(&mut policy, &path, &mut out).unwrap();
    assert_eq!(flow, Flow::Continue);
    assert!(out.is_empty(), "loading produced output: {:?}", out);
    assert_eq!(policy.len(), 2);

    let text = batch(
        &mut policy,
        "test tcp 10.0.0.5:5000 10.0.0.9:443\n\
         test tcp 10.0.0.5:5000 10.0.0.9:80\n\
         test udp 10.0.0.5:53 10.0.0.9:53\n",
    );
    assert_eq!(
        text,
        "Allowed via [1] allow tcp 10.0.0.5:* 10.0.0.9:443\n\
         Denied via default policy.\n\
         Denied via [2] deny udp 10.0.0.5:53 10.0.0.9:53\n"
    );
}

#[test]
fn test_first_match_wins_across_overlapping_rules() {
    let mut policy = Policy::new();
    let text = batch(
        &mut policy,
        "append deny tcp 1.1.1.1:1000 2.2.2.2:22\n\
         append allow tcp 1.1.1.1:* 2.2.2.2:22\n\
         test tcp 1.1.1.1:1000 2.2.2.2:22\n\
         test tcp 1.1.1.1:1001 2.2.2.2:22\n",
    );
    assert_eq!(
        text,
        "Denied via [1] deny tcp 1.1.1.1:1000 2.2.2.2:22\n\
         Allowed via [2] allow tcp 1.1.1.1:* 2.2.2.2:22\n"
    );
}

#[test]
fn test_insert_delete_print_session() {
    let mut policy = Policy::new();
    let text = batch(
        &mut policy,
        "append allow tcp 1.1.1.1:* 2.2.2.2:1\n\
         append deny tcp 1.1.1.1:* 2.2.2.2:2\n\
         insert 1 allow tcp 9.9.9.9:9 8.8.8.8:8\n\
         delete 2\n\
         print\n\
         print 2\n\
         print 3\n",
    );
    assert_eq!(
        text,
        "default deny\n\
         [1] allow tcp 9.9.9.9:9 8.8.8.8:8\n\
         [2] deny tcp 1.1.1.1:* 2.2.2.2:2\n\
         [2] deny tcp 1.1.1.1:* 2.2.2.2:2\n\
         [3] \n\
         Error: Rule 3 does not exist.\n"
    );
}

#[test]
fn test_bad_lines_do_not_stop_a_rule_file() {
    let (_dir, path) = rule_file(
        "# office network\n\
         append allow tcp 10.0.0.1:* 10.0.0.2:22\n\
         append allow tcp 10.0.0.256:* 10.0.0.2:22\n\
         delete 7\n\
         \n\
         frobnicate\n\
         append allow udp 10.0.0.1:* 10.0.0.2:53\n",
    );
    let mut policy = Policy::new();
    let mut out = Vec::new();

    load_rules(&mut policy, &path, &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Error: Could not parse command.\n\
         Error: Could not delete rule.\n\
         Error: Could not parse command.\n"
    );
    assert_eq!(policy.len(), 2);
}

#[test]
fn test_quit_in_rule_file_stops_loading() {
    let (_dir, path) = rule_file(
        "default allow\n\
         quit\n\
         default deny\n",
    );
    let mut policy = Policy::new();
    let mut out = Vec::new();

    let flow = load_rules(&mut policy, &path, &mut out).unwrap();
    assert_eq!(flow, Flow::Quit);
    assert_eq!(policy.default_action(), Action::Allow);
}

#[test]
fn test_missing_rule_file_cannot_be_opened() {
    let dir = TempDir::new().unwrap();
    let mut policy = Policy::new();
    let mut out = Vec::new();

    let err = load_rules(&mut policy, &dir.path().join("absent.txt"), &mut out).unwrap_err();
    assert!(matches!(err, Error::OpenRules { .. }));
    assert_eq!(err.to_string(), "Could not open file.");
    assert!(out.is_empty());
    assert!(policy.is_empty());
}

#[test]
fn test_non_utf8_line_in_rule_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.txt");
    let mut contents = b"# caf\xe9 rules\nappend allow tcp 1.1.1.1:* 2.2.2.2:80\n".to_vec();
    contents.extend_from_slice(b"append \xff\xfe\n");
    contents.extend_from_slice(b"append deny udp 3.3.3.3:1 4.4.4.4:2\n");
    fs::write(&path, contents).unwrap();

    let mut policy = Policy::new();
    let mut out = Vec::new();
    let flow = load_rules(&mut policy, &path, &mut out).unwrap();

    assert_eq!(flow, Flow::Continue);
    assert_eq!(String::from_utf8(out).unwrap(), "Error: Could not parse command.\n");
    assert_eq!(
        policy.render_policy(),
        "default deny\n\
         [1] allow tcp 1.1.1.1:* 2.2.2.2:80\n\
         [2] deny udp 3.3.3.3:1 4.4.4.4:2\n"
    );
}

#[test]
fn test_export_replays_to_same_policy() {
    let mut policy = Policy::new();
    batch(
        &mut policy,
        "default allow\n\
         append deny tcp 192.168.1.10:* 192.168.1.1:23\n\
         append allow udp 0.0.0.0:68 255.255.255.255:67\n\
         insert 1 deny tcp 192.168.1.66:4444 192.168.1.1:22\n",
    );

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.txt");
    export_policy(&policy, &path).unwrap();

    let exported = fs::read_to_string(&path).unwrap();
    assert_eq!(
        exported,
        "default allow\n\
         append deny tcp 192.168.1.66:4444 192.168.1.1:22\n\
         append deny tcp 192.168.1.10:* 192.168.1.1:23\n\
         append allow udp 0.0.0.0:68 255.255.255.255:67\n"
    );

    let mut replayed = Policy::new();
    let mut out = Vec::new();
    load_rules(&mut replayed, &path, &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(replayed, policy);
}

#[test]
fn test_export_overwrites_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.txt");
    fs::write(&path, "stale contents\n").unwrap();

    let policy = Policy::with_default(Action::Allow);
    export_policy(&policy, &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "default allow\n");
}

#[test]
fn test_interactive_session_after_rule_file() {
    let (_dir, path) = rule_file("append allow tcp 1.1.1.1:* 2.2.2.2:80\n");
    let mut policy = Policy::new();
    let mut out = Vec::new();
    load_rules(&mut policy, &path, &mut out).unwrap();

    let flow = run_interactive(
        &mut policy,
        "test tcp 1.1.1.1:5 2.2.2.2:80\nquit\ntest tcp 1.1.1.1:5 2.2.2.2:80\n".as_bytes(),
        &mut out,
        "> ",
    )
    .unwrap();

    assert_eq!(flow, Flow::Quit);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "> Allowed via [1] allow tcp 1.1.1.1:* 2.2.2.2:80\n> "
    );
}
