//! Wire types for the hosting service API

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wacs_git::Auth;

/// Login name and password for an account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A personal access token. The secret (`sha1`) is only revealed by the
/// service when the token is created.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sha1: String,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("sha1", &"<redacted>")
            .finish()
    }
}

/// Account details as reported by `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// An authenticated session: the account plus the token issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: String,
    pub token: AccessToken,
}

impl User {
    pub fn new(account: Account, token: AccessToken) -> Self {
        Self {
            id: account.id,
            login: account.login,
            full_name: account.full_name,
            email: account.email,
            avatar_url: account.avatar_url,
            token,
        }
    }

    /// Git transport credentials: the login with the token as password.
    pub fn git_auth(&self) -> Auth {
        Auth::token(&self.login, &self.token.sha1)
    }

    /// Author name for commits made on this user's behalf.
    pub fn author_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.login
        } else {
            &self.full_name
        }
    }

    /// Author email for commits; falls back to a no-reply address.
    pub fn author_email(&self) -> String {
        if self.email.trim().is_empty() {
            format!("{}@noreply.localhost", self.login)
        } else {
            self.email.clone()
        }
    }
}

/// Owner summary embedded in repository descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: i64,
    pub login: String,
}

/// A hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub clone_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /user/repos`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateRepoRequest<'a> {
    pub name: &'a str,
    pub private: bool,
    pub auto_init: bool,
}

/// Body of `POST /users/{name}/tokens`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateTokenRequest<'a> {
    pub name: &'a str,
    pub scopes: &'a [&'a str],
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    pub message: String,
}
