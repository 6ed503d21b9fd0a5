use crate::commands::{fail, hub_client};
use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use crate::prompt::TerminalPrompt;
use libdockhand::auth::{
    Authenticator, Credential, CredentialStore, FileCredentialStore, IdentityKind,
};
use libdockhand::engine::{DockerCli, Engine};
use libdockhand::error::Result;
use libdockhand::prompt::Prompt;
use libdockhand::session::Session;

/// Ask for an identity and token on the prompt.
///
/// Returns `None` when the user leaves the identity or the token empty, or
/// types the template placeholder.
pub fn ask_credential<P: Prompt + ?Sized>(prompt: &mut P) -> Result<Option<Credential>> {
    let kind = if prompt.confirm("Is this an organization access token (OAT)?", true)? {
        IdentityKind::Organization
    } else {
        IdentityKind::Personal
    };

    let identity_question = match kind {
        IdentityKind::Organization => "Organization name",
        IdentityKind::Personal => "Docker Hub username",
    };
    let Some(identity) = prompt.ask(identity_question)? else {
        return Ok(None);
    };
    let Some(token) = prompt.ask_secret("Access token")? else {
        return Ok(None);
    };

    Ok(Credential::new(identity, token, kind))
}

fn describe(credential: &Credential) -> String {
    format!("{} ({})", credential.identity(), credential.kind())
}

/// Log in with the saved credential, then with one typed at the prompt.
///
/// Every failure is reported and the run continues unauthenticated: a
/// rejected login is never fatal. A typed credential that works is saved
/// after confirmation when `offer_save` is set.
pub fn establish_session<E: Engine, P: Prompt + ?Sized>(
    ctx: &AppContext,
    auth: &Authenticator<E>,
    store: &mut FileCredentialStore,
    prompt: &mut P,
    offer_save: bool,
) -> (Session, Option<Credential>) {
    match store.load() {
        Some(saved) => {
            format::print(
                ctx,
                VerbosityLevel::Verbose,
                &format!("Using saved credentials for {}", describe(&saved)),
            );
            match auth.login(&saved) {
                Ok(session) => {
                    format::success(ctx, &format!("Logged in as {}", describe(&saved)));
                    return (session, Some(saved));
                }
                Err(e) => {
                    format::error(ctx, &e.to_string());
                    format::warning(
                        ctx,
                        &format!(
                            "Saved credentials in {} were rejected. Enter different ones or leave blank to continue without logging in.",
                            store.path().display()
                        ),
                    );
                }
            }
        }
        None => format::print(
            ctx,
            VerbosityLevel::Verbose,
            &format!("No usable credentials in {}", store.path().display()),
        ),
    }

    let typed = match ask_credential(prompt) {
        Ok(Some(credential)) => credential,
        Ok(None) => {
            format::print(
                ctx,
                VerbosityLevel::Normal,
                "Continuing without logging in (public search only).",
            );
            return (Session::new(), None);
        }
        Err(e) => {
            format::error(ctx, &e.to_string());
            return (Session::new(), None);
        }
    };

    match auth.login(&typed) {
        Ok(session) => {
            format::success(ctx, &format!("Logged in as {}", describe(&typed)));
            if offer_save {
                offer_to_save(ctx, store, prompt, &typed);
            }
            (session, Some(typed))
        }
        Err(e) => {
            format::error(ctx, &e.to_string());
            format::warning(ctx, "Continuing without logging in (public search only).");
            (Session::new(), None)
        }
    }
}

fn offer_to_save<P: Prompt + ?Sized>(
    ctx: &AppContext,
    store: &mut FileCredentialStore,
    prompt: &mut P,
    credential: &Credential,
) {
    let question = format!("Save these credentials to {}?", store.path().display());
    match prompt.confirm(&question, false) {
        Ok(true) => save(ctx, store, credential),
        Ok(false) => {}
        Err(e) => format::error(ctx, &e.to_string()),
    }
}

fn save(ctx: &AppContext, store: &mut FileCredentialStore, credential: &Credential) {
    match store.save(credential) {
        Ok(()) => format::success(
            ctx,
            &format!("Saved credentials to {}", store.path().display()),
        ),
        Err(e) => format::error(ctx, &e.to_string()),
    }
}

/// Handle the login subcommand
pub fn handle_login(ctx: &AppContext, save_without_asking: bool) {
    let auth = Authenticator::new(DockerCli::new(), hub_client(ctx));
    let mut store = FileCredentialStore::new(ctx.credentials_path.clone());
    let mut prompt = TerminalPrompt::new(ctx.color.enabled());

    let credential = match ask_credential(&mut prompt) {
        Ok(Some(credential)) => credential,
        Ok(None) => fail(ctx, "An identity and an access token are required to log in."),
        Err(e) => fail(ctx, &e.to_string()),
    };

    if let Err(e) = auth.login(&credential) {
        fail(ctx, &e.to_string());
    }
    format::success(ctx, &format!("Logged in as {}", describe(&credential)));

    if save_without_asking {
        save(ctx, &mut store, &credential);
    } else {
        offer_to_save(ctx, &mut store, &mut prompt, &credential);
    }
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
