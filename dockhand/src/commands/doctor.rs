use crate::commands::{fail, hub_client};
use crate::context::AppContext;
use crate::format::{self, Formattable, OutputFormat};
use libdockhand::auth::{CredentialStore, FileCredentialStore};
use libdockhand::client::Client;
use libdockhand::engine::{DockerCli, Engine};
use serde::Serialize;

/// Result of `dockhand doctor`
#[derive(Debug, Serialize)]
pub struct DoctorReport {
    /// Whether the engine daemon answered
    pub engine_running: bool,
    /// Daemon version if it answered
    pub engine_version: Option<String>,
    /// Why the engine check failed
    pub engine_error: Option<String>,
    /// Credential file location
    pub credentials_path: String,
    /// Whether the credential file yields a usable credential
    pub credentials_usable: bool,
    /// Hub API base URL
    pub hub_url: String,
    /// Whether the hub answered a search
    pub hub_online: bool,
    /// Why the hub check failed
    pub hub_error: Option<String>,
}

impl DoctorReport {
    /// Whether everything needed for a pull works. Missing credentials are fine.
    pub fn healthy(&self) -> bool {
        self.engine_running && self.hub_online
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✓" } else { "✗" }
}

impl Formattable for DoctorReport {
    fn format_pretty(&self) -> String {
        let mut output = String::new();

        match (&self.engine_version, &self.engine_error) {
            (Some(version), _) => output.push_str(&format!(
                "Engine:      {} running (server {})\n",
                status(true),
                version
            )),
            (None, Some(error)) => output.push_str(&format!(
                "Engine:      {} not available\n  Reason: {}\n",
                status(false),
                error
            )),
            (None, None) => output.push_str(&format!(
                "Engine:      {}\n",
                status(self.engine_running)
            )),
        }

        if self.credentials_usable {
            output.push_str(&format!(
                "Credentials: {} {}\n",
                status(true),
                self.credentials_path
            ));
        } else {
            output.push_str(&format!(
                "Credentials: ○ none usable in {} (run 'dockhand config init')\n",
                self.credentials_path
            ));
        }

        output.push_str(&format!(
            "Hub:         {} {}\n",
            status(self.hub_online),
            self.hub_url
        ));
        if let Some(error) = &self.hub_error {
            output.push_str(&format!("  Reason: {}\n", error));
        }

        output
    }
}

/// Check the engine, the credential file and the hub
pub async fn check<E: Engine>(
    engine: &E,
    client: &Client,
    store: &FileCredentialStore,
) -> DoctorReport {
    let (engine_running, engine_version, engine_error) = match engine.health() {
        Ok(output) if output.success => {
            let version = output.stdout.trim().to_string();
            (true, Some(version).filter(|v| !v.is_empty()), None)
        }
        Ok(output) => {
            let reason = output
                .stderr
                .lines()
                .rfind(|line| !line.trim().is_empty())
                .unwrap_or("the daemon did not answer")
                .trim()
                .to_string();
            (false, None, Some(reason))
        }
        Err(e) => (false, None, Some(e.to_string())),
    };

    let (hub_online, hub_error) = match client.search_repositories("nginx", 1).await {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    DoctorReport {
        engine_running,
        engine_version,
        engine_error,
        credentials_path: store.path().display().to_string(),
        credentials_usable: store.load().is_some(),
        hub_url: client.hub_url().to_string(),
        hub_online,
        hub_error,
    }
}

/// Handle the doctor subcommand. Exits 1 when the engine or the hub is down.
pub async fn handle_doctor(ctx: &AppContext, format: OutputFormat) {
    let client = hub_client(ctx);
    let store = FileCredentialStore::new(ctx.credentials_path.clone());

    let spinner = format::spinner(ctx, "Checking engine and hub...");
    let report = check(&DockerCli::new(), &client, &store).await;
    spinner.finish_and_clear();

    match format::format_output(&report, format) {
        Ok(output) => println!("{}", output),
        Err(e) => fail(ctx, &e),
    }

    if !report.healthy() {
        std::process::exit(1);
    }
}

#[cfg(test)]
#[path = "doctor_tests.rs"]
mod tests;
