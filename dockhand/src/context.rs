//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Credential file values (`DEBUG`)
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::config;
use crate::format::ColorChoice;
use libdockhand::auth::FileCredentialStore;
use libdockhand::client::DEFAULT_HUB_URL;
use std::env;
use std::path::PathBuf;

/// How much the CLI prints, from the `-v` count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    /// Results and errors only
    #[default]
    Normal,
    /// Progress messages (-v)
    Verbose,
    /// Debug logging of every hub and engine call (-vv)
    Debug,
    /// Everything (-vvv)
    Trace,
}

impl VerbosityLevel {
    /// Map the number of `-v` flags to a level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }

    /// Default `tracing` filter directive for this level
    pub fn log_directive(&self) -> &'static str {
        match self {
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::Debug => "debug",
            VerbosityLevel::Trace => "trace",
        }
    }
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Whether to color output
    pub color: ColorChoice,
    /// Requested verbosity
    pub verbosity: VerbosityLevel,
    /// `DEBUG=true` in the credential file
    pub debug: bool,
    /// Hub API base URL
    pub hub_url: String,
    /// Credential file location
    pub credentials_path: PathBuf,
}

impl AppContext {
    /// Build context with precedence: defaults > credential file > env vars > CLI flags
    ///
    /// `cli_hub_url` already includes `DOCKHAND_HUB_URL`, which clap reads as the
    /// flag's environment fallback.
    pub fn build(
        cli_color: ColorChoice,
        verbosity: VerbosityLevel,
        cli_hub_url: Option<&str>,
    ) -> Self {
        // 1. Start with defaults
        let credentials_path = config::get_credentials_path();
        let mut ctx = Self {
            color: ColorChoice::Auto,
            verbosity,
            debug: false,
            hub_url: DEFAULT_HUB_URL.to_string(),
            credentials_path: credentials_path.clone(),
        };

        // 2. The credential file may switch on debug echo
        ctx.debug = FileCredentialStore::new(credentials_path).debug_enabled();

        // 3. Environment
        if let Ok(color) = env::var("DOCKHAND_COLOR") {
            ctx.color = ColorChoice::from(color.as_str());
        }

        // 4. CLI flags. `--color auto` is clap's default, so it only wins when
        // the environment did not pick something
        if cli_color != ColorChoice::Auto || env::var("DOCKHAND_COLOR").is_err() {
            ctx.color = cli_color;
        }
        if let Some(url) = cli_hub_url.map(str::trim).filter(|url| !url.is_empty()) {
            ctx.hub_url = url.to_string();
        }

        ctx
    }

    /// Log filter directive: `-v` count, raised to debug by `DEBUG=true`
    pub fn log_directive(&self) -> &'static str {
        if self.debug && self.verbosity < VerbosityLevel::Debug {
            VerbosityLevel::Debug.log_directive()
        } else {
            self.verbosity.log_directive()
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
