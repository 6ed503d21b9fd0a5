//! Local container engine interface.
//!
//! dockhand hands resolved references to the local engine for login, pull and
//! scan, and uses it to inspect and prune the local image inventory. The
//! [`Engine`] trait is the seam; [`DockerCli`] drives the `docker` binary.
//!
//! Only a failure to start the engine is an `Err`. A command that ran and
//! exited non-zero comes back as an [`EngineOutput`] with `success == false`,
//! so callers decide from the exit status alone.

use crate::client::{DEBUG_BODY_LIMIT, truncate};
use crate::error::{DockhandError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

#[cfg(test)]
mod tests;

/// Result of one engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Whether the process exited successfully
    pub success: bool,
    /// Captured standard output (empty when streamed to the terminal)
    pub stdout: String,
    /// Captured standard error (empty when streamed to the terminal)
    pub stderr: String,
}

/// One row of the local image inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub repository: String,
    pub tag: String,
    pub id: String,
    pub size: String,
    pub created: String,
}

impl ImageSummary {
    /// `repository:tag`, or the image ID for dangling images.
    pub fn reference(&self) -> String {
        if self.repository == "<none>" || self.tag == "<none>" {
            self.id.clone()
        } else {
            format!("{}:{}", self.repository, self.tag)
        }
    }
}

/// Operations dockhand needs from the local container engine.
pub trait Engine {
    /// Logs in to the hub. The token is passed on stdin, never as an argument.
    fn login(&self, identity: &str, token: &str) -> Result<EngineOutput>;

    /// Pulls `reference`, streaming progress to the terminal.
    fn pull(&self, reference: &str) -> Result<EngineOutput>;

    /// Runs a vulnerability scan of `reference`, streaming the report.
    fn scan(&self, reference: &str) -> Result<EngineOutput>;

    /// Lists local images.
    fn list_images(&self) -> Result<Vec<ImageSummary>>;

    /// Removes a local image. With `force`, containers created from it are
    /// removed first.
    fn remove_image(&self, reference: &str, force: bool) -> Result<EngineOutput>;

    /// Checks that the engine daemon answers.
    fn health(&self) -> Result<EngineOutput>;
}

const IMAGE_FORMAT: &str = "{{.Repository}}\t{{.Tag}}\t{{.ID}}\t{{.Size}}\t{{.CreatedSince}}";

/// [`Engine`] implementation that shells out to the docker CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: PathBuf,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("docker"),
        }
    }
}

impl DockerCli {
    /// Uses `docker` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given executable instead of `docker`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        debug!(program = %self.program.display(), args = ?args, "engine invocation");
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> DockhandError {
        DockhandError::engine_with_source(
            format!("Failed to run {}", self.program.display()),
            e,
        )
    }

    /// Runs with captured output, optionally feeding `stdin`.
    fn run_captured(&self, args: &[&str], stdin: Option<&str>) -> Result<EngineOutput> {
        let mut cmd = self.command(args);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        if let Some(input) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(input.as_bytes())
                .map_err(|e| self.spawn_error(e))?;
        }

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        let result = EngineOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            success = result.success,
            stdout = %truncate(&result.stdout, DEBUG_BODY_LIMIT),
            stderr = %truncate(&result.stderr, DEBUG_BODY_LIMIT),
            "engine output"
        );
        Ok(result)
    }

    /// Runs with output going straight to the terminal.
    fn run_inherited(&self, args: &[&str]) -> Result<EngineOutput> {
        let status = self
            .command(args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;

        debug!(success = status.success(), "engine exit");
        Ok(EngineOutput {
            success: status.success(),
            ..Default::default()
        })
    }
}

impl Engine for DockerCli {
    fn login(&self, identity: &str, token: &str) -> Result<EngineOutput> {
        self.run_captured(
            &["login", "--username", identity, "--password-stdin"],
            Some(token),
        )
    }

    fn pull(&self, reference: &str) -> Result<EngineOutput> {
        self.run_inherited(&["pull", reference])
    }

    fn scan(&self, reference: &str) -> Result<EngineOutput> {
        self.run_inherited(&["scout", "cves", reference])
    }

    fn list_images(&self) -> Result<Vec<ImageSummary>> {
        let output = self.run_captured(&["images", "--format", IMAGE_FORMAT], None)?;
        if !output.success {
            return Err(DockhandError::engine(format!(
                "Listing images failed: {}",
                output.stderr.trim()
            )));
        }
        Ok(parse_image_table(&output.stdout))
    }

    fn remove_image(&self, reference: &str, force: bool) -> Result<EngineOutput> {
        if force {
            let filter = format!("ancestor={}", reference);
            let containers = self.run_captured(&["ps", "-a", "-q", "--filter", &filter], None)?;
            let ids: Vec<&str> = containers.stdout.split_whitespace().collect();
            if containers.success && !ids.is_empty() {
                let mut args = vec!["rm", "-f"];
                args.extend(ids);
                let removed = self.run_captured(&args, None)?;
                if !removed.success {
                    return Ok(removed);
                }
            }
            return self.run_captured(&["rmi", "-f", reference], None);
        }
        self.run_captured(&["rmi", reference], None)
    }

    fn health(&self) -> Result<EngineOutput> {
        self.run_captured(&["info", "--format", "{{.ServerVersion}}"], None)
    }
}

/// Parses tab-separated `docker images --format` output. Short lines are skipped.
pub fn parse_image_table(output: &str) -> Vec<ImageSummary> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t').map(str::trim);
            Some(ImageSummary {
                repository: fields.next().filter(|f| !f.is_empty())?.to_string(),
                tag: fields.next()?.to_string(),
                id: fields.next()?.to_string(),
                size: fields.next()?.to_string(),
                created: fields.next().unwrap_or_default().to_string(),
            })
        })
        .collect()
}
