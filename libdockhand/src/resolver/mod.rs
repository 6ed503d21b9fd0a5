//! Reference resolution.
//!
//! Turns what the user typed into a complete [`RegistryReference`]. How the
//! repository part is read depends on the [`ResolveMode`]:
//!
//! - [`ResolveMode::OrganizationScoped`]: a bare name is qualified with the
//!   logged-in organization.
//! - [`ResolveMode::ListSelection`]: a number picks from the presented list
//!   (organization listings are qualified), anything else is taken literally.
//! - [`ResolveMode::FreeEntry`]: the input is taken literally.
//!
//! Numeric input in list selection is always an index, even when the list is
//! empty or a repository really is named with digits only.
//!
//! When the input carries no tag, the repository's tags are fetched (one page)
//! and offered as a second list. An empty answer means `latest`. If no tags
//! come back, for whatever reason, the user is asked for a tag directly with
//! the same default.

use crate::client::Client;
use crate::error::Result;
use crate::prompt::Prompt;
use crate::reference::{DEFAULT_TAG, RegistryReference, validate_tag};
use crate::selection::{SelectionList, parse_index};
use crate::session::{Session, SessionMode};
use tracing::{debug, warn};


/// Number of tags fetched for the tag list.
pub const DEFAULT_TAG_PAGE_SIZE: usize = 25;

/// Number of hits requested from the public search.
pub const DEFAULT_SEARCH_LIMIT: usize = 25;

/// How repository input is interpreted in one resolution round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveMode {
    /// Bare names belong to the session's organization
    OrganizationScoped,
    /// Numbers index into the presented list
    ListSelection(SelectionList),
    /// Input is a literal reference
    FreeEntry,
}

impl ResolveMode {
    /// Short name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrganizationScoped => "organization",
            Self::ListSelection(_) => "list",
            Self::FreeEntry => "free-entry",
        }
    }
}

/// Picks the mode for a round.
///
/// A non-empty `candidates` list (enumerated organization repositories or
/// search hits) always means list selection. Otherwise an organization session
/// types bare names and everyone else types full references.
pub fn mode_for(session: &Session, candidates: SelectionList) -> ResolveMode {
    if !candidates.is_empty() {
        return ResolveMode::ListSelection(candidates);
    }
    match session.mode() {
        SessionMode::OrganizationScoped => ResolveMode::OrganizationScoped,
        SessionMode::PublicSearch => ResolveMode::FreeEntry,
    }
}

/// Resolves user input against the hub for one session.
pub struct Resolver<'a, P: Prompt + ?Sized> {
    client: &'a Client,
    session: &'a Session,
    prompt: &'a mut P,
    tag_page_size: usize,
    search_limit: usize,
}

impl<'a, P: Prompt + ?Sized> Resolver<'a, P> {
    /// Creates a resolver reading `session` and asking through `prompt`.
    pub fn new(client: &'a Client, session: &'a Session, prompt: &'a mut P) -> Self {
        Self {
            client,
            session,
            prompt,
            tag_page_size: DEFAULT_TAG_PAGE_SIZE,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Sets how many tags are fetched for the tag list.
    pub fn with_tag_page_size(mut self, size: usize) -> Self {
        self.tag_page_size = size;
        self
    }

    /// Sets how many search hits are requested.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// The prompt this resolver asks through.
    pub fn prompt(&mut self) -> &mut P {
        &mut *self.prompt
    }

    /// Runs the public search for `term` and presents the hits.
    ///
    /// # Errors
    ///
    /// Returns the client error if the search request fails.
    pub async fn search(&mut self, term: &str) -> Result<SelectionList> {
        let hits = self
            .client
            .search_repositories(term.trim(), self.search_limit)
            .await?;
        let list = SelectionList::build(hits.into_iter().map(|hit| hit.name));
        debug!(term, hits = list.len(), "search finished");

        if !list.is_empty() {
            self.prompt
                .present(&format!("Search results for '{}'", term.trim()), &list)?;
        }
        Ok(list)
    }

    /// Resolves the repository part of `input`.
    ///
    /// Bare names typed in organization mode get the session identity as their
    /// namespace, and so do labels picked by number from an organization's
    /// listing. Literal input in list or free entry mode is kept as typed.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionOutOfRange` error for a number outside the list and
    /// a `Validation` error for input that is not a valid reference.
    pub fn resolve_repository(&self, mode: &ResolveMode, input: &str) -> Result<RegistryReference> {
        let input = input.trim();

        let reference: RegistryReference = match mode {
            ResolveMode::OrganizationScoped => {
                let reference: RegistryReference = input.parse()?;
                match self.session.identity() {
                    Some(identity) => reference.qualified_with(identity),
                    None => reference,
                }
            }
            ResolveMode::ListSelection(list) => match parse_index(input) {
                Some(index) => {
                    let picked: RegistryReference = list.resolve(index)?.parse()?;
                    // Organization listings carry bare repository names
                    match (self.session.mode(), self.session.identity()) {
                        (SessionMode::OrganizationScoped, Some(org)) => picked.qualified_with(org),
                        _ => picked,
                    }
                }
                None => input.parse()?,
            },
            ResolveMode::FreeEntry => input.parse()?,
        };

        debug!(
            mode = mode.name(),
            input,
            reference = %reference.path(),
            "repository resolved"
        );
        Ok(reference)
    }

    /// Asks for the tag of `reference`, offering its tags when any are found.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionOutOfRange` error when a number outside the tag
    /// list is entered, a `Validation` error for a typed tag containing
    /// whitespace, `:` or `/`, or the prompt's error.
    pub async fn resolve_tag(&mut self, reference: &RegistryReference) -> Result<String> {
        let tags = self.available_tags(reference).await;

        if tags.is_empty() {
            let answer = self
                .prompt
                .ask(&format!("Tag for {} [{}]", reference.path(), DEFAULT_TAG))?;
            return match answer {
                Some(answer) => Ok(validate_tag(&answer)?.to_string()),
                None => Ok(DEFAULT_TAG.to_string()),
            };
        }

        let list = SelectionList::build(tags);
        self.prompt
            .present(&format!("Tags for {}", reference.path()), &list)?;
        let answer = self
            .prompt
            .ask(&format!("Tag number or name [{}]", DEFAULT_TAG))?;

        match answer {
            None => Ok(DEFAULT_TAG.to_string()),
            Some(answer) => match parse_index(&answer) {
                Some(index) => Ok(list.resolve(index)?.to_string()),
                None => Ok(validate_tag(&answer)?.to_string()),
            },
        }
    }

    /// Runs a full round: repository, then tag unless one was typed.
    ///
    /// Returns `Ok(None)` when `input` is empty.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libdockhand::client::Client;
    /// use libdockhand::prompt::ScriptedPrompt;
    /// use libdockhand::resolver::{ResolveMode, Resolver};
    /// use libdockhand::session::Session;
    ///
    /// # async fn example() -> libdockhand::error::Result<()> {
    /// let client = Client::new("https://hub.docker.com")?;
    /// let session = Session::new();
    /// let mut prompt = ScriptedPrompt::new([""]);
    /// let mut resolver = Resolver::new(&client, &session, &mut prompt);
    ///
    /// let reference = resolver.resolve(&ResolveMode::FreeEntry, "nginx").await?;
    /// assert_eq!(reference.unwrap().to_string(), "nginx:latest");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn resolve(
        &mut self,
        mode: &ResolveMode,
        input: &str,
    ) -> Result<Option<RegistryReference>> {
        if input.trim().is_empty() {
            debug!("empty repository input, skipping");
            return Ok(None);
        }

        let reference = self.resolve_repository(mode, input)?;
        if reference.has_tag() {
            return Ok(Some(reference));
        }

        let tag = self.resolve_tag(&reference).await?;
        Ok(Some(reference.with_tag(tag)))
    }

    async fn available_tags(&self, reference: &RegistryReference) -> Vec<String> {
        match self
            .client
            .fetch_tags(
                reference.api_namespace(),
                reference.repository(),
                self.tag_page_size,
                &self.session.request_credentials(reference),
            )
            .await
        {
            Ok(tags) => tags.into_iter().map(|tag| tag.name).collect(),
            Err(e) => {
                warn!(repository = %reference.path(), error = %e, "tag listing failed");
                Vec::new()
            }
        }
    }
}

impl<P: Prompt + ?Sized> std::fmt::Debug for Resolver<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("hub_url", &self.client.hub_url())
            .field("session", &self.session)
            .field("tag_page_size", &self.tag_page_size)
            .field("search_limit", &self.search_limit)
            .finish()
    }
}
