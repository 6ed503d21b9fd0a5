//! Credential file location and its user-facing summary.

use crate::format::Formattable;
use libdockhand::auth::{CredentialFile, mask_secret};
use serde::Serialize;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the credential file location
pub const CONFIG_ENV: &str = "DOCKHAND_CONFIG";

/// Get the credential file path: `$DOCKHAND_CONFIG`, else
/// `<config_dir>/dockhand/credentials.env`
pub fn get_credentials_path() -> PathBuf {
    credentials_path_from(env::var_os(CONFIG_ENV), dirs::config_dir())
}

fn credentials_path_from(override_path: Option<OsString>, config_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    match config_dir {
        Some(dir) => dir.join("dockhand").join("credentials.env"),
        // Fallback to current directory
        None => PathBuf::from("credentials.env"),
    }
}

/// What `config show` prints. The token is masked.
#[derive(Debug, Serialize)]
pub struct CredentialSummary {
    pub path: String,
    pub exists: bool,
    pub token_type: String,
    pub org: String,
    pub username: String,
    pub token: String,
    pub debug: bool,
    /// Whether the file yields a usable credential
    pub usable: bool,
}

impl CredentialSummary {
    /// Summarize the parsed file at `path` (`None` when missing or malformed)
    pub fn new(path: &Path, file: Option<&CredentialFile>) -> Self {
        let value = |v: Option<&Option<String>>| v.and_then(|v| v.clone()).unwrap_or_default();
        Self {
            path: path.display().to_string(),
            exists: path.exists(),
            token_type: value(file.map(|f| &f.token_type)),
            org: value(file.map(|f| &f.org)),
            username: value(file.map(|f| &f.username)),
            token: file
                .and_then(|f| f.token.as_deref())
                .filter(|t| !t.is_empty())
                .map(mask_secret)
                .unwrap_or_default(),
            debug: file.is_some_and(|f| f.debug),
            usable: file.and_then(CredentialFile::credential).is_some(),
        }
    }
}

impl Formattable for CredentialSummary {
    fn format_pretty(&self) -> String {
        let or_unset = |s: &str| {
            if s.is_empty() {
                "(unset)".to_string()
            } else {
                s.to_string()
            }
        };
        format!(
            "{:16} {}\n{:16} {}\n{:16} {}\n{:16} {}\n{:16} {}\n{:16} {}\n{:16} {}\n{:16} {}",
            "path",
            self.path,
            "exists",
            self.exists,
            "TOKEN_TYPE",
            or_unset(&self.token_type),
            "DOCKER_ORG",
            or_unset(&self.org),
            "DOCKER_USERNAME",
            or_unset(&self.username),
            "DOCKER_TOKEN",
            or_unset(&self.token),
            "DEBUG",
            self.debug,
            "usable",
            self.usable
        )
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
