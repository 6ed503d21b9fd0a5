//! Login and repository enumeration.
//!
//! Logging in and listing an organization's repositories are separate
//! capabilities on the hub: a token that logs in fine may still be refused by
//! the listing endpoint under one authorization scheme and accepted under
//! another. [`Authenticator::login`] makes exactly one attempt;
//! [`Authenticator::list_repositories`] walks [`ListingTransport::ORDER`] until a
//! transport returns repositories.

use crate::auth::{Credential, Credentials, IdentityKind};
use crate::client::Client;
use crate::engine::Engine;
use crate::error::{DockhandError, Result};
use crate::session::Session;
use std::fmt;
use tracing::{debug, info, warn};

/// One way of authenticating against the repository listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingTransport {
    /// HTTP Basic with identity and token
    Basic,
    /// Token exchanged for a hub session token, sent as `JWT`
    SessionToken,
    /// Raw token as bearer
    Bearer,
}

impl ListingTransport {
    /// The order transports are tried in.
    pub const ORDER: [ListingTransport; 3] = [
        ListingTransport::Basic,
        ListingTransport::SessionToken,
        ListingTransport::Bearer,
    ];

    /// Whether this transport can work for the given kind of identity.
    /// Organization tokens cannot be exchanged for a session token.
    pub fn supports(&self, kind: IdentityKind) -> bool {
        !(*self == ListingTransport::SessionToken && kind == IdentityKind::Organization)
    }

    async fn fetch(&self, client: &Client, credential: &Credential) -> Result<Vec<String>> {
        let namespace = credential.identity();
        match self {
            Self::Basic => client.list_repositories(namespace, &credential.as_basic()).await,
            Self::SessionToken => {
                let session_token = client
                    .exchange_session_token(credential.identity(), credential.token())
                    .await?;
                client
                    .list_repositories(namespace, &Credentials::session(session_token))
                    .await
            }
            Self::Bearer => client.list_repositories(namespace, &credential.as_bearer()).await,
        }
    }
}

impl fmt::Display for ListingTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic auth"),
            Self::SessionToken => write!(f, "session token"),
            Self::Bearer => write!(f, "bearer token"),
        }
    }
}

/// Establishes the session and enumerates repositories.
#[derive(Debug)]
pub struct Authenticator<E: Engine> {
    engine: E,
    client: Client,
}

impl<E: Engine> Authenticator<E> {
    /// Creates an authenticator that logs in through `engine` and lists
    /// repositories through `client`.
    pub fn new(engine: E, client: Client) -> Self {
        Self { engine, client }
    }

    /// The engine used for login.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Logs in with `credential`.
    ///
    /// Only the engine's exit status decides the outcome. Anything the engine
    /// prints on stderr (credential helpers warn even on success) is logged at
    /// debug level and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Authentication`] if the login was rejected and
    /// [`DockhandError::Engine`] if the engine could not be run. The same
    /// credential is never retried.
    pub fn login(&self, credential: &Credential) -> Result<Session> {
        let output = self.engine.login(credential.identity(), credential.token())?;

        if !output.stderr.trim().is_empty() {
            debug!(stderr = %output.stderr.trim(), "login stderr not used for the outcome");
        }

        if output.success {
            info!(identity = credential.identity(), kind = %credential.kind(), "logged in");
            return Ok(Session::authenticated(credential.clone()));
        }

        let reason = output
            .stderr
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .unwrap_or("login was rejected");
        Err(DockhandError::authentication(
            format!("Login as '{}' failed: {}", credential.identity(), reason),
            None,
        ))
    }

    /// Lists the repositories in the credential's namespace.
    ///
    /// Transports are tried in [`ListingTransport::ORDER`], skipping those that
    /// do not support the credential's kind, until one returns at least one
    /// repository. A transport that errors counts as returning nothing. When
    /// every transport comes back empty the result is empty, and the caller
    /// should let the user type a repository name instead.
    pub async fn list_repositories(&self, credential: &Credential) -> Vec<String> {
        for transport in ListingTransport::ORDER {
            if !transport.supports(credential.kind()) {
                debug!(%transport, kind = %credential.kind(), "skipping listing transport");
                continue;
            }

            match transport.fetch(&self.client, credential).await {
                Ok(repositories) if !repositories.is_empty() => {
                    debug!(%transport, count = repositories.len(), "repositories listed");
                    return repositories;
                }
                Ok(_) => debug!(%transport, "listing transport returned no repositories"),
                Err(e) => warn!(%transport, error = %e, "listing transport failed"),
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
#[path = "strategist_tests.rs"]
mod tests;
