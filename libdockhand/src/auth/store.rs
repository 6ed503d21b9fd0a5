//! Credential file storage.
//!
//! The credential file is a plain `KEY="value"` text file that users are
//! expected to edit by hand:
//!
//! ```text
//! TOKEN_TYPE="oat"
//! DOCKER_ORG="futuresecureai"
//! DOCKER_USERNAME=""
//! DOCKER_TOKEN="dckr_oat_..."
//! DEBUG="false"
//! ```
//!
//! A file that is missing, unreadable, malformed or still holds the template
//! placeholder yields no credential; the caller then asks the user instead.

use crate::auth::{Credential, IdentityKind};
use crate::error::{DockhandError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Token value written by the template. A file still holding it has no credential.
pub const TOKEN_PLACEHOLDER: &str = "your_access_token_here";

const KEY_TOKEN_TYPE: &str = "TOKEN_TYPE";
const KEY_ORG: &str = "DOCKER_ORG";
const KEY_USERNAME: &str = "DOCKER_USERNAME";
const KEY_TOKEN: &str = "DOCKER_TOKEN";
const KEY_DEBUG: &str = "DEBUG";

const FILE_HEADER: &str = "# dockhand credentials\n\
# TOKEN_TYPE is \"oat\" (organization access token) or \"pat\" (personal access token).\n\
# DOCKER_ORG is used with oat tokens, DOCKER_USERNAME with pat tokens.\n";

/// Trait for loading and saving the user's hub credential.
pub trait CredentialStore {
    /// Loads the stored credential.
    ///
    /// Returns `None` rather than an error when nothing usable is stored.
    fn load(&self) -> Option<Credential>;

    /// Stores a credential, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be written. A failed save
    /// leaves the previous credential in place.
    fn save(&mut self, credential: &Credential) -> Result<()>;
}

/// Parsed contents of a credential file.
///
/// Each field is `None` when its key does not appear in the file, which is
/// different from a key that is present with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFile {
    pub token_type: Option<String>,
    pub org: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub debug: bool,
}

impl CredentialFile {
    /// Parses credential file contents.
    ///
    /// Blank lines and `#` comments are skipped, an `export ` prefix is allowed
    /// and values may be wrapped in single or double quotes. Unknown keys are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-comment line without `=`.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut file = Self::default();

        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);

            let (key, value) = line.split_once('=').ok_or_else(|| {
                DockhandError::validation(format!(
                    "Line {} is not a KEY=value pair",
                    number + 1
                ))
            })?;
            let value = unquote(value.trim());

            match key.trim() {
                KEY_TOKEN_TYPE => file.token_type = Some(value),
                KEY_ORG => file.org = Some(value),
                KEY_USERNAME => file.username = Some(value),
                KEY_TOKEN => file.token = Some(value),
                KEY_DEBUG => file.debug = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        Ok(file)
    }

    /// Renders the file in its fixed key order.
    pub fn render(&self) -> String {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        let mut out = String::from(FILE_HEADER);
        for (key, value) in [
            (KEY_TOKEN_TYPE, field(&self.token_type)),
            (KEY_ORG, field(&self.org)),
            (KEY_USERNAME, field(&self.username)),
            (KEY_TOKEN, field(&self.token)),
            (KEY_DEBUG, self.debug.to_string()),
        ] {
            out.push_str(&format!("{}=\"{}\"\n", key, value));
        }
        out
    }

    /// Resolves the effective credential.
    ///
    /// All four credential keys must be present. An `oat` token type with an
    /// organization name selects the organization; otherwise a username selects
    /// a personal identity. An unrecognized token type makes the file unusable.
    pub fn credential(&self) -> Option<Credential> {
        let (Some(token_type), Some(org), Some(username), Some(token)) =
            (&self.token_type, &self.org, &self.username, &self.token)
        else {
            return None;
        };

        let kind = if token_type.trim().is_empty() {
            None
        } else {
            Some(token_type.parse::<IdentityKind>().ok()?)
        };

        if kind == Some(IdentityKind::Organization) && !org.trim().is_empty() {
            return Credential::new(org.as_str(), token.as_str(), IdentityKind::Organization);
        }
        if !username.trim().is_empty() {
            return Credential::new(username.as_str(), token.as_str(), IdentityKind::Personal);
        }
        None
    }

    /// Records `credential` in the key for its kind, keeping the other fields.
    pub fn merge(&mut self, credential: &Credential) {
        self.token_type = Some(credential.kind().as_token_type().to_string());
        self.token = Some(credential.token().to_string());
        match credential.kind() {
            IdentityKind::Organization => {
                self.org = Some(credential.identity().to_string());
                self.username.get_or_insert_with(String::new);
            }
            IdentityKind::Personal => {
                self.username = Some(credential.identity().to_string());
                self.org.get_or_insert_with(String::new);
            }
        }
    }

    /// A template with every key present and the placeholder token.
    pub fn template() -> Self {
        Self {
            token_type: Some(IdentityKind::Organization.as_token_type().to_string()),
            org: Some(String::new()),
            username: Some(String::new()),
            token: Some(TOKEN_PLACEHOLDER.to_string()),
            debug: false,
        }
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

/// Credential store backed by a key-value file.
///
/// Saves write a temporary file next to the target and rename it into place,
/// so the file on disk is always either the old or the new content. On Unix
/// the file is restricted to the owner (0600).
///
/// # Examples
///
/// ```no_run
/// use libdockhand::auth::{Credential, CredentialStore, FileCredentialStore, IdentityKind};
/// use std::path::PathBuf;
///
/// # fn example() -> libdockhand::error::Result<()> {
/// let mut store = FileCredentialStore::new(PathBuf::from("/home/user/.config/dockhand/credentials.env"));
///
/// if store.load().is_none() {
///     let cred = Credential::new("acme", "dckr_oat_x", IdentityKind::Organization).unwrap();
///     store.save(&cred)?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store for the file at `path`. Nothing is read until [`load`].
    ///
    /// [`load`]: CredentialStore::load
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the credential file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file, or `None` if it is missing or malformed.
    pub fn read_file(&self) -> Option<CredentialFile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "credential file not readable");
                return None;
            }
        };

        match CredentialFile::parse(&contents) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed credential file");
                None
            }
        }
    }

    /// Returns the `DEBUG` flag from the file, false if unset or unreadable.
    pub fn debug_enabled(&self) -> bool {
        self.read_file().map(|file| file.debug).unwrap_or(false)
    }

    /// Writes a template for the user to fill in.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file already exists or cannot be
    /// written.
    pub fn write_template(&self) -> Result<()> {
        if self.path.exists() {
            return Err(DockhandError::config(
                "Credential file already exists".to_string(),
                Some(self.path.display().to_string()),
            ));
        }
        self.write_atomic(&CredentialFile::template().render())
    }

    fn write_atomic(&self, contents: &str) -> Result<()> {
        let path_str = || Some(self.path.display().to_string());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| {
            DockhandError::config_with_source(
                "Failed to create credentials directory".to_string(),
                path_str(),
                e,
            )
        })?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| {
            DockhandError::config_with_source(
                "Failed to create temporary credentials file".to_string(),
                path_str(),
                e,
            )
        })?;

        temp.write_all(contents.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| {
                DockhandError::config_with_source(
                    "Failed to write credentials file".to_string(),
                    path_str(),
                    e,
                )
            })?;

        // Set file permissions to 0600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(temp.path(), permissions).map_err(|e| {
                DockhandError::config_with_source(
                    "Failed to set credentials file permissions".to_string(),
                    path_str(),
                    e,
                )
            })?;
        }

        temp.persist(&self.path).map_err(|e| {
            DockhandError::config_with_source(
                "Failed to replace credentials file".to_string(),
                path_str(),
                e.error,
            )
        })?;

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credential> {
        self.read_file()?.credential()
    }

    fn save(&mut self, credential: &Credential) -> Result<()> {
        let mut file = self.read_file().unwrap_or_default();
        file.merge(credential);
        self.write_atomic(&file.render())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
