//! Credentials for talking to authenticated remotes

use std::fmt;

use git2::{Cred, CredentialType, RemoteCallbacks};

/// Credential prompts answered before giving up.
///
/// libgit2 keeps asking while the server rejects credentials, so a bad
/// token would otherwise loop forever.
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// HTTP credentials for a remote: an account name plus an access token
/// used as the password.
#[derive(Clone, Default)]
pub struct Auth {
    username: String,
    token: String,
}

impl Auth {
    pub fn token(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Build remote callbacks that answer credential requests with this auth.
    pub(crate) fn remote_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        let mut attempts = 0;

        callbacks.credentials(move |url, username_from_url, allowed| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str(&format!(
                    "authentication failed for {url} after {MAX_CREDENTIAL_ATTEMPTS} attempts"
                )));
            }

            let user = if self.username.is_empty() {
                username_from_url.unwrap_or("git")
            } else {
                self.username.as_str()
            };

            if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                tracing::debug!(url, user, "Supplying token credentials");
                Cred::userpass_plaintext(user, &self.token)
            } else if allowed.contains(CredentialType::USERNAME) {
                Cred::username(user)
            } else {
                Cred::default()
            }
        });

        callbacks
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}
