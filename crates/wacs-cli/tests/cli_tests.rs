//! End-to-end tests for the `wacs` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wacs_test_utils::mock_host::MockHost;

fn wacs(session_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wacs"));
    cmd.arg("--session")
        .arg(session_dir.path().join("session.json"))
        .env_remove("WACS_ENDPOINT")
        .env_remove("WACS_USERNAME")
        .env_remove("WACS_PASSWORD")
        .env_remove("WACS_SESSION");
    cmd
}

fn login_args(cmd: &mut Command, host: &MockHost, password: &str) {
    cmd.args(["login", "--endpoint"])
        .arg(host.endpoint())
        .args(["-u", host.username(), "-p", password, "--token-name", "cli-test"]);
}

#[test]
fn test_help_lists_commands() {
    let session = TempDir::new().unwrap();
    wacs(&session)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("push"));
}

#[test]
fn test_no_command_prints_hint() {
    let session = TempDir::new().unwrap();
    wacs(&session)
        .assert()
        .success()
        .stdout(predicate::str::contains("wacs --help"));
}

#[test]
fn test_list_without_session_fails() {
    let session = TempDir::new().unwrap();
    wacs(&session)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_push_requires_message() {
    let session = TempDir::new().unwrap();
    wacs(&session).arg("push").assert().failure();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_with_bad_password_fails() {
    let host = MockHost::start("alice", "correct horse").await;
    host.mount_login("cli-test").await;
    let session = TempDir::new().unwrap();

    let mut cmd = wacs(&session);
    login_args(&mut cmd, &host, "wrong");
    cmd.assert().failure().stderr(predicate::str::contains("error"));

    assert!(!session.path().join("session.json").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_create_list() {
    let host = MockHost::start("alice", "correct horse").await;
    host.mount_login("cli-test").await;
    host.mount_repo("notes").await;
    let session = TempDir::new().unwrap();

    let mut cmd = wacs(&session);
    login_args(&mut cmd, &host, "correct horse");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Logged in as"));
    assert!(session.path().join("session.json").exists());

    wacs(&session)
        .args(["create", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice/notes"));

    wacs(&session)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"notes\""));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clone_and_push() {
    let host = MockHost::start("alice", "correct horse").await;
    host.mount_login("cli-test").await;
    let remote = host.mount_repo("notes").await;
    let session = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let clone_dir = work.path().join("notes");

    let mut cmd = wacs(&session);
    login_args(&mut cmd, &host, "correct horse");
    cmd.assert().success();

    wacs(&session)
        .arg("clone")
        .arg(remote.to_string_lossy().as_ref())
        .arg(&clone_dir)
        .assert()
        .success();
    assert!(clone_dir.join(".git").is_dir());

    std::fs::write(clone_dir.join("1.txt"), "hello\n").unwrap();
    wacs(&session)
        .arg("push")
        .arg(&clone_dir)
        .args(["-m", "First"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushed"));

    let pushed = wacs_test_utils::git::read_head_file(&remote, "1.txt");
    assert_eq!(pushed.as_deref(), Some("hello\n"));
}

#[test]
fn test_push_outside_a_repository_fails() {
    let session = TempDir::new().unwrap();
    let session_file = session.path().join("session.json");
    std::fs::write(
        &session_file,
        r#"{
            "endpoint": "http://127.0.0.1:9/api/v1",
            "user": {
                "id": 1, "login": "alice", "full_name": "", "email": "", "avatar_url": "",
                "token": { "id": 1, "name": "cli-test", "sha1": "abc" }
            }
        }"#,
    )
    .unwrap();
    let not_a_repo = TempDir::new().unwrap();

    wacs(&session)
        .arg("push")
        .arg(not_a_repo.path())
        .args(["-m", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
