//! HTTP client for the hosting service REST API

use std::time::Duration;

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::error::{Error, Result};
use crate::models::{
    AccessToken, Account, ApiMessage, CreateRepoRequest, CreateTokenRequest, Credentials, Repo,
    User,
};

/// Repositories requested per page when listing.
pub const PAGE_LIMIT: usize = 50;

const USER_AGENT: &str = concat!("wacs-client/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Scopes requested for the login token: account lookup plus repository
/// create and push.
pub const TOKEN_SCOPES: &[&str] = &["write:user", "write:repository"];

/// How a request authenticates.
#[derive(Clone, Copy)]
enum RequestAuth<'a> {
    Basic(&'a Credentials),
    Token(&'a str),
}

/// Client for a Gitea-compatible API rooted at an endpoint such as
/// `https://git.example.org/api/v1`.
#[derive(Debug, Clone)]
pub struct WacsClient {
    http_client: HttpClient,
    base_url: Url,
}

impl WacsClient {
    /// Create a client for `endpoint`.
    pub fn new(endpoint: &str) -> Result<Self> {
        let mut base_url = Url::parse(endpoint)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint {
                endpoint: endpoint.to_string(),
            });
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Authenticate and obtain a fresh access token named `token_name`.
    ///
    /// The service only reveals a token's secret when it is created, so an
    /// existing token with the same name is deleted and re-issued.
    pub async fn login(&self, credentials: &Credentials, token_name: &str) -> Result<User> {
        let auth = RequestAuth::Basic(credentials);
        let tokens_url = self.url(&["users", &credentials.username, "tokens"])?;

        let existing: Vec<AccessToken> = self.get_json(tokens_url.clone(), auth).await?;
        if let Some(stale) = existing.iter().find(|t| t.name == token_name) {
            let token_id = stale.id.to_string();
            let url = self.url(&["users", &credentials.username, "tokens", &token_id])?;
            self.send(Method::DELETE, url, auth, None::<&()>).await?;
            tracing::debug!(token = %token_name, "Deleted previous token");
        }

        let token: AccessToken = self
            .send_json(
                Method::POST,
                tokens_url,
                auth,
                Some(&CreateTokenRequest {
                    name: token_name,
                    scopes: TOKEN_SCOPES,
                }),
            )
            .await?;

        let account: Account = self
            .get_json(self.url(&["user"])?, RequestAuth::Token(&token.sha1))
            .await?;

        tracing::info!(login = %account.login, token = %token.name, "Logged in");
        Ok(User::new(account, token))
    }

    /// Create a public, empty repository owned by `user`.
    pub async fn create_repo(&self, user: &User, name: &str) -> Result<Repo> {
        let body = CreateRepoRequest {
            name,
            private: false,
            auto_init: false,
        };
        let result: Result<Repo> = self
            .send_json(
                Method::POST,
                self.url(&["user", "repos"])?,
                RequestAuth::Token(&user.token.sha1),
                Some(&body),
            )
            .await;

        match result {
            Ok(repo) => {
                tracing::info!(repo = %repo.full_name, clone_url = %repo.clone_url, "Created repository");
                Ok(repo)
            }
            Err(Error::Api { status, .. }) if status == StatusCode::CONFLICT => {
                Err(Error::RepoExists {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// List every repository `user` can access, in service order.
    ///
    /// The service may cap the page size below [`PAGE_LIMIT`] without
    /// saying so, so a short page does not end the listing. Paging stops at
    /// an empty page, or once `X-Total-Count` items have arrived.
    pub async fn list_my_repos(&self, user: &User) -> Result<Vec<Repo>> {
        let auth = RequestAuth::Token(&user.token.sha1);
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let mut url = self.url(&["user", "repos"])?;
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("limit", &PAGE_LIMIT.to_string());

            let response = self.send(Method::GET, url, auth, None::<&()>).await?;
            let total = total_count(&response);
            let batch: Vec<Repo> = serde_json::from_str(&response.text().await?)?;

            if batch.is_empty() {
                break;
            }
            repos.extend(batch);
            if total.is_some_and(|total| repos.len() >= total) {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = repos.len(), pages = page, "Listed repositories");
        Ok(repos)
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidEndpoint {
                endpoint: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, auth: RequestAuth<'_>) -> Result<T> {
        self.send_json(Method::GET, url, auth, None::<&()>).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        auth: RequestAuth<'_>,
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.send(method, url, auth, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(Error::from)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        auth: RequestAuth<'_>,
        body: Option<&B>,
    ) -> Result<Response> {
        tracing::trace!(method = method.as_str(), url = url.as_str(), "Sending request");
        let mut request = self.http_client.request(method, url);
        request = authorize(request, auth);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        check_status(response).await
    }
}

fn authorize(request: RequestBuilder, auth: RequestAuth<'_>) -> RequestBuilder {
    match auth {
        RequestAuth::Basic(credentials) => {
            request.basic_auth(&credentials.username, Some(&credentials.password))
        }
        RequestAuth::Token(token) => request.header("Authorization", format!("token {token}")),
    }
}

/// `X-Total-Count` header, when the service sends one.
fn total_count(response: &Response) -> Option<usize> {
    response
        .headers()
        .get("x-total-count")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&text)
        .map(|m| m.message)
        .unwrap_or(text);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized { message });
    }
    Err(Error::Api { status, message })
}
