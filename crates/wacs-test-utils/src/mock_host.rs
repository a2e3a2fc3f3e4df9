//! [`MockHost`]: a fake hosting service API backed by `wiremock`.
//!
//! Only the endpoints the client calls are mounted. Repositories created
//! through the mock are real bare repositories on disk, so the returned
//! clone URLs work with git.

use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{basic_auth, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::git::bare_remote;

/// Secret the mock hands out when a token is created.
pub const MOCK_TOKEN: &str = "0f3c2e5d9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d";

/// Fake Gitea-style API for a single account.
pub struct MockHost {
    server: MockServer,
    remotes: TempDir,
    username: String,
    password: String,
}

impl MockHost {
    /// Start a server that accepts `username` / `password`.
    pub async fn start(username: &str, password: &str) -> Self {
        Self {
            server: MockServer::start().await,
            remotes: TempDir::new().expect("MockHost: failed to create remotes dir"),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// API base URL, including the `/api/v1` prefix.
    pub fn endpoint(&self) -> String {
        format!("{}/api/v1", self.server.uri())
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn api(&self, suffix: &str) -> String {
        format!("/api/v1/{suffix}")
    }

    fn token_header(&self) -> String {
        format!("token {MOCK_TOKEN}")
    }

    /// Mount the login flow.
    ///
    /// Good credentials get an empty token list, a new token named
    /// `token_name` (only when write scopes are requested), and the account
    /// on `GET /user`. Anything else on the token endpoints gets a 401.
    pub async fn mount_login(&self, token_name: &str) {
        let tokens_path = self.api(&format!("users/{}/tokens", self.username));

        Mock::given(method("GET"))
            .and(path(tokens_path.as_str()))
            .and(basic_auth(&self.username, &self.password))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(tokens_path.as_str()))
            .and(basic_auth(&self.username, &self.password))
            .and(body_partial_json(json!({
                "name": token_name,
                "scopes": ["write:user", "write:repository"],
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 1,
                "name": token_name,
                "sha1": MOCK_TOKEN,
                "token_last_eight": &MOCK_TOKEN[MOCK_TOKEN.len() - 8..],
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(self.api("user").as_str()))
            .and(header("Authorization", self.token_header().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.account_json()))
            .mount(&self.server)
            .await;

        Mock::given(path(tokens_path.as_str()))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "user's password is invalid",
                "url": "https://docs.gitea.io/en-us/api-usage/",
            })))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Create a bare remote for `name` and mount `POST /user/repos` and
    /// `GET /user/repos` so the repository can be created and listed.
    ///
    /// Returns the bare repository path, which is also its clone URL.
    pub async fn mount_repo(&self, name: &str) -> PathBuf {
        let remote = bare_remote(self.remotes.path(), name);
        let repo = self.repo_json(1, name, &remote.to_string_lossy());

        Mock::given(method("POST"))
            .and(path(self.api("user/repos").as_str()))
            .and(header("Authorization", self.token_header().as_str()))
            .and(body_partial_json(json!({ "name": name })))
            .respond_with(ResponseTemplate::new(201).set_body_json(repo.clone()))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(self.api("user/repos").as_str()))
            .and(header("Authorization", self.token_header().as_str()))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo])))
            .mount(&self.server)
            .await;

        self.mount_empty_repo_pages().await;

        remote
    }

    /// Answer any `GET /user/repos` page not mounted otherwise with `[]`,
    /// which is how the service ends a listing.
    pub async fn mount_empty_repo_pages(&self) {
        Mock::given(method("GET"))
            .and(path(self.api("user/repos").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Account payload as returned by `GET /user`.
    pub fn account_json(&self) -> Value {
        json!({
            "id": 1,
            "login": self.username,
            "full_name": "",
            "email": format!("{}@example.org", self.username),
            "avatar_url": "",
        })
    }

    /// Repository payload as returned by `POST /user/repos`.
    pub fn repo_json(&self, id: i64, name: &str, clone_url: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "full_name": format!("{}/{}", self.username, name),
            "clone_url": clone_url,
            "html_url": format!("{}/{}/{}", self.server.uri(), self.username, name),
            "private": false,
            "empty": true,
            "owner": { "id": 1, "login": self.username },
            "created_at": "2018-06-01T12:00:00Z",
            "updated_at": "2018-06-01T12:00:00Z",
        })
    }
}
