//! Hosting-service abstraction

use async_trait::async_trait;

use crate::{Credentials, Repo, Result, User, WacsClient};

/// Remote operations a hosting service must provide.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Authenticate and issue an access token named `token_name`.
    async fn login(&self, credentials: &Credentials, token_name: &str) -> Result<User>;

    /// Create a repository owned by `user`.
    async fn create_repo(&self, user: &User, name: &str) -> Result<Repo>;

    /// List repositories visible to `user`.
    async fn list_my_repos(&self, user: &User) -> Result<Vec<Repo>>;
}

#[async_trait]
impl RepoHost for WacsClient {
    async fn login(&self, credentials: &Credentials, token_name: &str) -> Result<User> {
        WacsClient::login(self, credentials, token_name).await
    }

    async fn create_repo(&self, user: &User, name: &str) -> Result<Repo> {
        WacsClient::create_repo(self, user, name).await
    }

    async fn list_my_repos(&self, user: &User) -> Result<Vec<Repo>> {
        WacsClient::list_my_repos(self, user).await
    }
}
