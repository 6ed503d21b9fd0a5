use crate::context::AppContext;
use crate::format;
use libdockhand::Client;

/// Credential file commands
pub mod config;

/// Local engine health check
pub mod doctor;

/// Local image inventory wrappers
pub mod images;

/// Interactive login
pub mod login;

/// The interactive pull round
pub mod pull;

/// Public repository search
pub mod search;

/// Tag listing
pub mod tags;

/// Print `message` as an error and exit with status 1
pub fn fail(ctx: &AppContext, message: &str) -> ! {
    format::error(ctx, message);
    std::process::exit(1);
}

/// Hub client for the context's hub URL, exiting on a bad URL
pub fn hub_client(ctx: &AppContext) -> Client {
    match Client::new(&ctx.hub_url) {
        Ok(client) => client,
        Err(e) => fail(ctx, &e.to_string()),
    }
}
