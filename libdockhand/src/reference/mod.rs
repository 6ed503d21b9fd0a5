//! Hub image reference parsing and rendering.
//!
//! A reference is `[namespace/]repository[:tag]`. Without a namespace the hub's
//! default namespace is implied, and without a tag `latest` is implied when the
//! reference is rendered.

use crate::error::{DockhandError, Result};
use std::fmt;
use std::str::FromStr;


/// Tag used when none is given.
pub const DEFAULT_TAG: &str = "latest";

/// Namespace the hub uses for official images.
pub const DEFAULT_NAMESPACE: &str = "library";

/// A hub repository reference with optional namespace and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryReference {
    namespace: Option<String>,
    repository: String,
    tag: Option<String>,
}

/// Checks a tag typed on its own: non-empty, no whitespace, `:` or `/`.
///
/// # Errors
///
/// Returns a `Validation` error naming the offending tag.
pub fn validate_tag(tag: &str) -> Result<&str> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(DockhandError::validation("Tag cannot be empty"));
    }
    if tag
        .chars()
        .any(|c| c.is_whitespace() || c == ':' || c == '/')
    {
        return Err(DockhandError::validation(format!(
            "Invalid tag '{}': whitespace, ':' and '/' are not allowed",
            tag
        )));
    }
    Ok(tag)
}

impl FromStr for RegistryReference {
    type Err = DockhandError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DockhandError::validation("Image reference cannot be empty"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(DockhandError::validation(format!(
                "Invalid image reference '{}': contains whitespace",
                s
            )));
        }

        // The tag separator is the last ':' after the last '/'
        let last_slash = s.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (name, tag) = match s[last_slash..].rfind(':') {
            Some(i) => {
                let split = last_slash + i;
                (&s[..split], Some(&s[split + 1..]))
            }
            None => (s, None),
        };

        if let Some(tag) = tag
            && tag.is_empty()
        {
            return Err(DockhandError::validation(format!(
                "Invalid image reference '{}': empty tag",
                s
            )));
        }

        let (namespace, repository) = match name.split_once('/') {
            Some((namespace, repository)) => {
                if namespace.is_empty() {
                    return Err(DockhandError::validation(format!(
                        "Invalid image reference '{}': empty namespace",
                        s
                    )));
                }
                (Some(namespace), repository)
            }
            None => (None, name),
        };

        if repository.is_empty() {
            return Err(DockhandError::validation(format!(
                "Invalid image reference '{}': empty repository",
                s
            )));
        }

        Ok(Self {
            namespace: namespace.map(str::to_string),
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
        })
    }
}

impl fmt::Display for RegistryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path(), self.tag_or_default())
    }
}

impl RegistryReference {
    /// Returns the namespace, if one was given.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the repository name without namespace.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the tag, if one was given.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Returns the tag, or `latest` when none was given.
    pub fn tag_or_default(&self) -> &str {
        self.tag.as_deref().unwrap_or(DEFAULT_TAG)
    }

    /// Returns true if the reference already carries a tag.
    pub fn has_tag(&self) -> bool {
        self.tag.is_some()
    }

    /// Returns `namespace/repository`, or just the repository when no
    /// namespace was given.
    pub fn path(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}/{}", namespace, self.repository),
            None => self.repository.clone(),
        }
    }

    /// Namespace to use in hub API paths (`library` for official images).
    pub fn api_namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    /// True for official images in the `library` namespace.
    pub fn is_official(&self) -> bool {
        self.api_namespace() == DEFAULT_NAMESPACE
    }

    /// Returns a copy qualified with `namespace` when none is present.
    pub fn qualified_with(self, namespace: &str) -> Self {
        if self.namespace.is_some() {
            return self;
        }
        Self {
            namespace: Some(namespace.to_string()),
            ..self
        }
    }

    /// Returns a copy with `tag` set. A reference that already has a tag keeps it.
    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        if self.tag.is_some() {
            return self;
        }
        Self {
            tag: Some(tag.into()),
            ..self
        }
    }
}
