//! Authentication handling for the hub.
//!
//! Two shapes of credential live here. [`Credential`] is the user's identity and
//! access token as loaded from the credential file or typed at the prompt.
//! [`Credentials`] is what actually goes on the wire for one HTTP request, since
//! the hub accepts the same token under several authorization schemes.

use std::fmt;
use std::str::FromStr;

use crate::error::{DockhandError, Result};

pub mod store;
pub mod strategist;

pub use store::{CredentialFile, CredentialStore, FileCredentialStore, TOKEN_PLACEHOLDER};
pub use strategist::{Authenticator, ListingTransport};


/// Which kind of account a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// Organization access token (OAT), scoped to an organization namespace
    Organization,
    /// Personal access token (PAT), scoped to a user account
    Personal,
}

impl IdentityKind {
    /// The `TOKEN_TYPE` value stored in the credential file.
    pub fn as_token_type(&self) -> &'static str {
        match self {
            Self::Organization => "oat",
            Self::Personal => "pat",
        }
    }
}

impl FromStr for IdentityKind {
    type Err = DockhandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oat" | "org" | "organization" => Ok(Self::Organization),
            "pat" | "personal" => Ok(Self::Personal),
            other => Err(DockhandError::validation(format!(
                "Unknown token type '{}'. Expected 'oat' or 'pat'",
                other
            ))),
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => write!(f, "organization"),
            Self::Personal => write!(f, "personal"),
        }
    }
}

/// A usable identity and token pair.
///
/// The only way to get one is [`Credential::new`], which rejects empty values
/// and the template placeholder, so holding a `Credential` means it is worth
/// trying against the hub.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    identity: String,
    token: String,
    kind: IdentityKind,
}

impl Credential {
    /// Builds a credential, or `None` if it would be unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdockhand::auth::{Credential, IdentityKind};
    ///
    /// assert!(Credential::new("acme", "dckr_oat_x", IdentityKind::Organization).is_some());
    /// assert!(Credential::new("", "dckr_oat_x", IdentityKind::Organization).is_none());
    /// ```
    pub fn new(
        identity: impl Into<String>,
        token: impl Into<String>,
        kind: IdentityKind,
    ) -> Option<Self> {
        let identity = identity.into().trim().to_string();
        let token = token.into().trim().to_string();

        if identity.is_empty() || token.is_empty() || token == TOKEN_PLACEHOLDER {
            return None;
        }

        Some(Self {
            identity,
            token,
            kind,
        })
    }

    /// The organization name or username.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The kind of account the token belongs to.
    pub fn kind(&self) -> IdentityKind {
        self.kind
    }

    /// Returns true for organization access tokens.
    pub fn is_organization(&self) -> bool {
        self.kind == IdentityKind::Organization
    }

    /// HTTP Basic credentials with the identity as user and token as password.
    pub fn as_basic(&self) -> Credentials {
        Credentials::basic(&self.identity, &self.token)
    }

    /// The raw token as a bearer credential.
    pub fn as_bearer(&self) -> Credentials {
        Credentials::bearer(&self.token)
    }
}

// Keep tokens out of debug output and logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identity", &self.identity)
            .field("token", &mask_secret(&self.token))
            .field("kind", &self.kind)
            .finish()
    }
}

/// Authorization scheme and secret for a single hub request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication (public endpoints)
    Anonymous,

    /// HTTP Basic authentication
    Basic {
        /// Username for authentication
        username: String,
        /// Password or access token
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Session token issued by the hub login endpoint, sent with the `JWT` scheme
    Session {
        /// The session token
        token: String,
    },
}

impl Credentials {
    /// Creates anonymous credentials.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates Bearer token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates session token credentials.
    pub fn session(token: impl Into<String>) -> Self {
        Self::Session {
            token: token.into(),
        }
    }

    /// Returns the Authorization header value for these credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdockhand::auth::Credentials;
    ///
    /// let creds = Credentials::session("abc");
    /// assert_eq!(creds.to_header_value().unwrap(), "JWT abc");
    /// ```
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
            Self::Session { token } => Some(format!("JWT {}", token)),
        }
    }

    /// Short name of the scheme, for log lines.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
            Self::Session { .. } => "jwt",
        }
    }
}

/// Masks all but the first four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}
