use crate::commands::fail;
use crate::config::CredentialSummary;
use crate::context::AppContext;
use crate::format::{self, OutputFormat};
use libdockhand::auth::FileCredentialStore;

/// Summary of the store's file, masked for display
pub fn summarize(store: &FileCredentialStore) -> CredentialSummary {
    CredentialSummary::new(store.path(), store.read_file().as_ref())
}

/// Handle the config init subcommand
pub fn handle_init(ctx: &AppContext) {
    let store = FileCredentialStore::new(ctx.credentials_path.clone());
    match store.write_template() {
        Ok(()) => {
            format::success(
                ctx,
                &format!("Initialized credential file at: {}", store.path().display()),
            );
            println!("Fill in DOCKER_TOKEN and either DOCKER_ORG (oat) or DOCKER_USERNAME (pat).");
        }
        Err(e) => fail(ctx, &e.to_string()),
    }
}

/// Handle the config show subcommand
pub fn handle_show(ctx: &AppContext, format: OutputFormat) {
    let store = FileCredentialStore::new(ctx.credentials_path.clone());
    let summary = summarize(&store);

    match format::format_output(&summary, format) {
        Ok(output) => println!("{}", output),
        Err(e) => fail(ctx, &format!("formatting output: {}", e)),
    }
}

/// Handle the config path subcommand
pub fn handle_path(ctx: &AppContext) {
    println!("{}", ctx.credentials_path.display());
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
