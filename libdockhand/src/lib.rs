//! dockhand - Hub Reference Resolution and Authentication Library
//!
//! libdockhand turns loosely specified image requests ("pull 3", "nginx",
//! "my-service" inside an organization) into complete hub references, and
//! establishes an authenticated session against a hub-style container registry.
//!
//! # Quick Start
//!
//! ```no_run
//! use libdockhand::auth::{Authenticator, CredentialStore, FileCredentialStore};
//! use libdockhand::engine::DockerCli;
//! use libdockhand::prompt::ScriptedPrompt;
//! use libdockhand::resolver::{Resolver, mode_for};
//! use libdockhand::selection::SelectionList;
//! use libdockhand::{Client, Session};
//!
//! # async fn example() -> libdockhand::Result<()> {
//! let client = Client::new("https://hub.docker.com")?;
//! let store = FileCredentialStore::new("credentials.env".into());
//!
//! // Log in if a credential was saved, otherwise stay public
//! let auth = Authenticator::new(DockerCli::new(), client.clone());
//! let (session, repositories) = match store.load() {
//!     Some(credential) => {
//!         let session = auth.login(&credential)?;
//!         let repositories = auth.list_repositories(&credential).await;
//!         (session, repositories)
//!     }
//!     None => (Session::new(), Vec::new()),
//! };
//!
//! let mode = mode_for(&session, SelectionList::build(repositories));
//! let mut prompt = ScriptedPrompt::new([""]);
//! let mut resolver = Resolver::new(&client, &session, &mut prompt);
//! if let Some(reference) = resolver.resolve(&mode, "nginx").await? {
//!     println!("{}", reference);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Main Types
//!
//! - [`Credential`] - Identity and access token
//! - [`Session`] - Outcome of the login for this run
//! - [`RegistryReference`] - `[namespace/]repository[:tag]`
//! - [`SelectionList`] - Numbered choices shown to the user
//! - [`Resolver`] - Turns input into a reference
//! - [`DockhandError`] - Error type for every operation

#![warn(clippy::all)]

/// Returns the libdockhand crate version.
///
/// # Examples
///
/// ```
/// let version = libdockhand::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// Re-export commonly used types for convenience
pub use auth::{Credential, Credentials, IdentityKind};
pub use client::Client;
pub use error::{DockhandError, Result};
pub use reference::RegistryReference;
pub use resolver::{ResolveMode, Resolver};
pub use selection::SelectionList;
pub use session::{Session, SessionMode};

pub mod auth;
pub mod client;
pub mod engine;
pub mod error;
pub mod format;
pub mod prompt;
pub mod reference;
pub mod resolver;
pub mod selection;
pub mod session;
