//! End-to-end run of the whole client against a hosting service
//!
//! One scenario, executed step by step: log in, create a repository, list
//! it, clone it twice, push from both clones, then push a conflicting edit
//! that must win. By default the service is a mock API with a local bare
//! remote; `live_service_round_trip` talks to a real server instead.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use wacs_client::{Repo, TestConfig, User};
use wacs_fs::{NormalizedPath, append_file_text};
use wacs_test_utils::contributor::ContributorDir;
use wacs_test_utils::git::{head_history, head_parent_count, read_head_file};
use wacs_test_utils::mock_host::MockHost;

const LONG_RUN: Duration = Duration::from_secs(15);
const FILENAME1: &str = "1.txt";
const FILENAME2: &str = "2.txt";

const INITIAL: &str = "Initial file contents\n";
const OTHER: &str = "Other contributor file update\n";
const CONFLICT: &str = "Conflicting file update\n";

fn repo_name() -> String {
    format!("wacs-client-test{}", chrono::Utc::now().timestamp_millis())
}

async fn step<T>(name: &str, fut: impl Future<Output = T>) -> T {
    match tokio::time::timeout(LONG_RUN, fut).await {
        Ok(value) => value,
        Err(_) => panic!("step '{name}' exceeded {LONG_RUN:?}"),
    }
}

fn append(dir: &ContributorDir, filename: &str, text: &str) {
    append_file_text(&NormalizedPath::new(dir.root()), filename, text).unwrap();
}

/// Everything the scenario leaves behind for further inspection.
struct Outcome {
    repo: Repo,
    dir2: ContributorDir,
}

async fn run_scenario(config: &TestConfig, repo_name: &str) -> Outcome {
    let dir1 = ContributorDir::new();
    let dir2 = ContributorDir::new();

    // login
    let user: User = step(
        "login",
        wacs_client::login(&config.good_login, &config.endpoint, &config.token_name),
    )
    .await
    .expect("login with good credentials");
    assert!(!user.token.sha1.is_empty(), "user should carry a token");

    let bad = step(
        "bad login",
        wacs_client::login(&config.bad_login, &config.endpoint, &config.token_name),
    )
    .await;
    assert!(bad.is_err(), "bad credentials should not log in: {bad:?}");

    // create
    let repo = step(
        "create",
        wacs_client::create(&user, repo_name, &config.endpoint),
    )
    .await
    .expect("create repository");
    assert!(
        repo.clone_url.contains(repo_name),
        "clone URL {} should name {repo_name}",
        repo.clone_url
    );

    // list
    let repos = step("list", wacs_client::list_my_repos(&user, &config.endpoint))
        .await
        .expect("list repositories");
    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&repo_name), "{names:?} should include {repo_name}");

    // clone
    assert!(!dir1.git_dir().exists(), "Exists: {}", dir1.git_dir().display());
    step(
        "clone",
        wacs_client::clone(&user, dir1.root(), &repo.clone_url),
    )
    .await
    .expect("clone into first directory");
    dir1.assert_is_clone();

    // initial commit
    append(&dir1, FILENAME1, INITIAL);
    step(
        "initial push",
        wacs_client::commit_and_push(
            &user,
            dir1.root(),
            "Initial commit, wacs-client e2e test.",
        ),
    )
    .await
    .expect("initial commit and push");

    // update from a second contributor
    step(
        "second clone",
        wacs_client::clone(&user, dir2.root(), &repo.clone_url),
    )
    .await
    .expect("clone into second directory");
    dir2.assert_file_contains(FILENAME1, INITIAL);

    for filename in [FILENAME1, FILENAME2] {
        append(&dir2, filename, OTHER);
    }
    step(
        "update push",
        wacs_client::commit_and_push(
            &user,
            dir2.root(),
            "Update, other contrib, wacs-client e2e test.",
        ),
    )
    .await
    .expect("push update from second contributor");

    // conflict
    append(&dir1, FILENAME1, CONFLICT);
    step(
        "conflicting push",
        wacs_client::commit_and_push(
            &user,
            dir1.root(),
            "Conflicting push, wacs-client e2e test.",
        ),
    )
    .await
    .expect("conflicting push keeps our version");

    assert_eq!(dir1.read(FILENAME1), format!("{INITIAL}{CONFLICT}"));
    assert_eq!(dir1.read(FILENAME2), OTHER);

    Outcome { repo, dir2 }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mock_service_round_trip() {
    let host = MockHost::start("alice", "correct horse").await;
    let config = TestConfig {
        good_login: wacs_client::Credentials::new("alice", "correct horse"),
        bad_login: wacs_client::Credentials::new("alice", "wrong"),
        endpoint: host.endpoint(),
        token_name: "wacs-client-test".into(),
    };
    let name = repo_name();
    host.mount_login(&config.token_name).await;
    let remote = host.mount_repo(&name).await;

    let outcome = run_scenario(&config, &name).await;
    assert_eq!(PathBuf::from(&outcome.repo.clone_url), remote);

    // The remote holds our side of the conflict plus the other file.
    assert_eq!(
        read_head_file(&remote, FILENAME1).as_deref(),
        Some(format!("{INITIAL}{CONFLICT}").as_str())
    );
    assert_eq!(read_head_file(&remote, FILENAME2).as_deref(), Some(OTHER));
    assert_eq!(head_parent_count(&remote), 2, "conflict push is a merge");
    let history = head_history(&remote);
    for summary in [
        "Initial commit, wacs-client e2e test.",
        "Update, other contrib, wacs-client e2e test.",
        "Conflicting push, wacs-client e2e test.",
    ] {
        assert!(history.iter().any(|s| s == summary), "{summary} missing from {history:?}");
    }

    // The second contributor never saw the conflicting edit.
    assert_eq!(outcome.dir2.read(FILENAME1), format!("{INITIAL}{OTHER}"));
}

/// Runs against the server named in `$WACS_TEST_CONFIG` (or `test.json`
/// next to this crate). Creates a real repository on each run.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "needs a live hosting service and test.json"]
async fn live_service_round_trip() {
    let path = std::env::var(wacs_client::config::CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test.json"));
    let config = TestConfig::load(path).expect("load live test configuration");

    let name = repo_name();
    let outcome = run_scenario(&config, &name).await;
    assert_eq!(outcome.repo.name, name);
}
