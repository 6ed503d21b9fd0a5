//! Per-run session state.
//!
//! A [`Session`] starts out unauthenticated in public-search mode. The only way
//! to get an authenticated one is a successful login through
//! [`Authenticator::login`](crate::auth::Authenticator::login); everything else
//! only reads it.

use crate::auth::{Credential, Credentials, IdentityKind};
use crate::reference::RegistryReference;


/// How repository input is interpreted for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Repositories belong to the logged-in organization
    OrganizationScoped,
    /// Repositories are found through the public search
    #[default]
    PublicSearch,
}

/// Authentication outcome for the current run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Option<Credential>,
    mode: SessionMode,
}

impl Session {
    /// An unauthenticated session in public-search mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session produced by a successful login.
    pub(crate) fn authenticated(credential: Credential) -> Self {
        let mode = match credential.kind() {
            IdentityKind::Organization => SessionMode::OrganizationScoped,
            IdentityKind::Personal => SessionMode::PublicSearch,
        };
        Self {
            credential: Some(credential),
            mode,
        }
    }

    /// Returns true after a successful login.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// The logged-in organization name or username.
    pub fn identity(&self) -> Option<&str> {
        self.credential.as_ref().map(Credential::identity)
    }

    /// The access token used to log in.
    pub fn token(&self) -> Option<&str> {
        self.credential.as_ref().map(Credential::token)
    }

    /// The credential used to log in.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// The working mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Credentials to send with tag lookups for `reference`.
    ///
    /// Official images are always fetched anonymously; anything else carries
    /// the token as bearer when logged in.
    pub fn request_credentials(&self, reference: &RegistryReference) -> Credentials {
        match &self.credential {
            Some(credential) if !reference.is_official() => credential.as_bearer(),
            _ => Credentials::Anonymous,
        }
    }
}
