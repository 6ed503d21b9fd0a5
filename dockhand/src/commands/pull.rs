use crate::commands::{fail, hub_client, login};
use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use crate::prompt::TerminalPrompt;
use libdockhand::auth::{Authenticator, Credential, FileCredentialStore};
use libdockhand::engine::{DockerCli, Engine};
use libdockhand::error::Result;
use libdockhand::prompt::Prompt;
use libdockhand::resolver::{ResolveMode, Resolver, mode_for};
use libdockhand::selection::SelectionList;
use libdockhand::{Client, RegistryReference, Session, SessionMode};

/// How the session is established for a pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPolicy {
    /// Saved credentials, then the prompt; public search if neither works
    Auto,
    /// Like `Auto`, but the run fails unless an organization logged in
    RequireOrganization,
    /// Skip login
    Public,
}

impl LoginPolicy {
    pub fn from_flags(org: bool, public: bool) -> Self {
        match (org, public) {
            (true, _) => LoginPolicy::RequireOrganization,
            (false, true) => LoginPolicy::Public,
            (false, false) => LoginPolicy::Auto,
        }
    }
}

/// The question asked for the repository in each mode
pub fn repository_question(mode: &ResolveMode, session: &Session) -> String {
    match mode {
        ResolveMode::OrganizationScoped => format!(
            "Repository in {} (name or name:tag)",
            session.identity().unwrap_or("your organization")
        ),
        ResolveMode::ListSelection(_) => "Number from the list, or an image reference".to_string(),
        ResolveMode::FreeEntry => "Image reference (e.g. nginx or bitnami/redis:7.2)".to_string(),
    }
}

/// Handle the pull subcommand: log in, pick an image, pull it, optionally scan it
pub async fn handle_pull(ctx: &AppContext, policy: LoginPolicy, scan: bool, input: Option<&str>) {
    let client = hub_client(ctx);
    let auth = Authenticator::new(DockerCli::new(), client.clone());
    let mut store = FileCredentialStore::new(ctx.credentials_path.clone());
    let mut prompt = TerminalPrompt::new(ctx.color.enabled());

    let (session, credential) = match policy {
        LoginPolicy::Public => (Session::new(), None),
        LoginPolicy::Auto | LoginPolicy::RequireOrganization => {
            login::establish_session(ctx, &auth, &mut store, &mut prompt, true)
        }
    };
    if policy == LoginPolicy::RequireOrganization
        && session.mode() != SessionMode::OrganizationScoped
    {
        fail(
            ctx,
            "--org needs a successful login with an organization access token (TOKEN_TYPE=\"oat\").",
        );
    }

    let round = Round {
        client: &client,
        session: &session,
        credential: credential.as_ref(),
    };
    let reference = match round.resolve(ctx, &auth, &mut prompt, input).await {
        Ok(Some(reference)) => reference,
        Ok(None) => {
            format::print(ctx, VerbosityLevel::Normal, "Nothing selected.");
            return;
        }
        Err(e) => fail(ctx, &e.to_string()),
    };

    pull_and_scan(ctx, auth.engine(), &mut prompt, &reference, scan);
}

/// One resolution round over an established session
pub struct Round<'a> {
    pub client: &'a Client,
    pub session: &'a Session,
    pub credential: Option<&'a Credential>,
}

impl Round<'_> {
    /// Offer repositories (organization listing or search hits), ask for
    /// one and resolve it. `Ok(None)` means the user skipped.
    pub async fn resolve<E: Engine, P: Prompt + ?Sized>(
        &self,
        ctx: &AppContext,
        auth: &Authenticator<E>,
        prompt: &mut P,
        input: Option<&str>,
    ) -> Result<Option<RegistryReference>> {
        // A reference given on the command line skips listing and search
        let enumerated = match (input, self.session.mode(), self.credential) {
            (None, SessionMode::OrganizationScoped, Some(credential)) => {
                list_organization(ctx, auth, credential, prompt).await?
            }
            _ => SelectionList::default(),
        };

        let search_term = if input.is_none() && self.session.mode() == SessionMode::PublicSearch {
            prompt.ask("Search Docker Hub (leave empty to type a reference)")?
        } else {
            None
        };

        let mut resolver = Resolver::new(self.client, self.session, prompt);
        let candidates = match search_term {
            Some(term) => search(ctx, &mut resolver, &term).await,
            None => enumerated,
        };

        let mode = mode_for(self.session, candidates);
        let input = match input {
            Some(input) => Some(input.to_string()),
            None => resolver
                .prompt()
                .ask(&repository_question(&mode, self.session))?,
        };
        let Some(input) = input else {
            return Ok(None);
        };

        resolver.resolve(&mode, &input).await
    }
}

async fn search<P: Prompt + ?Sized>(
    ctx: &AppContext,
    resolver: &mut Resolver<'_, P>,
    term: &str,
) -> SelectionList {
    let spinner = format::spinner(ctx, &format!("Searching for '{}'...", term));
    let result = resolver.search(term).await;
    spinner.finish_and_clear();

    match result {
        Ok(hits) => {
            if hits.is_empty() {
                format::warning(ctx, &format!("No repositories match '{}'.", term));
            }
            hits
        }
        Err(e) => {
            format::error(ctx, &e.to_string());
            format::warning(ctx, "Search is unavailable; type an image reference instead.");
            SelectionList::default()
        }
    }
}

async fn list_organization<E: Engine, P: Prompt + ?Sized>(
    ctx: &AppContext,
    auth: &Authenticator<E>,
    credential: &Credential,
    prompt: &mut P,
) -> Result<SelectionList> {
    let spinner = format::spinner(
        ctx,
        &format!("Listing repositories for {}...", credential.identity()),
    );
    let repositories = auth.list_repositories(credential).await;
    spinner.finish_and_clear();

    if repositories.is_empty() {
        format::warning(
            ctx,
            &format!(
                "Could not list repositories for {}; type a repository name instead.",
                credential.identity()
            ),
        );
        return Ok(SelectionList::default());
    }

    let list = SelectionList::build(repositories);
    prompt.present(&format!("Repositories in {}", credential.identity()), &list)?;
    Ok(list)
}

fn pull_and_scan<E: Engine, P: Prompt + ?Sized>(
    ctx: &AppContext,
    engine: &E,
    prompt: &mut P,
    reference: &RegistryReference,
    scan: bool,
) {
    let reference = reference.to_string();
    format::print(ctx, VerbosityLevel::Normal, &format!("Pulling {}", reference));

    match engine.pull(&reference) {
        Ok(output) if output.success => format::success(ctx, &format!("Pulled {}", reference)),
        Ok(_) => fail(ctx, &format!("docker pull {} failed", reference)),
        Err(e) => fail(ctx, &e.to_string()),
    }

    if !scan {
        match prompt.confirm(&format!("Scan {} for vulnerabilities?", reference), false) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                format::error(ctx, &e.to_string());
                return;
            }
        }
    }

    match engine.scan(&reference) {
        Ok(output) if output.success => format::success(ctx, "Scan finished"),
        Ok(_) => format::warning(
            ctx,
            "The scan did not complete. Is the docker scout plugin installed?",
        ),
        Err(e) => format::error(ctx, &e.to_string()),
    }
}

#[cfg(test)]
#[path = "pull_tests.rs"]
mod tests;
