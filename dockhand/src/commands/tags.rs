use crate::commands::{fail, hub_client};
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, OutputFormat};
use libdockhand::auth::{CredentialStore, Credentials, FileCredentialStore};
use libdockhand::client::{Client, TagInfo};
use libdockhand::error::Result;
use libdockhand::format::{age_or_dash, size_or_dash};
use libdockhand::reference::RegistryReference;
use libdockhand::resolver::DEFAULT_TAG_PAGE_SIZE;
use serde::Serialize;
use tabled::Tabled;

/// One row of `dockhand tags`
#[derive(Debug, Serialize, Tabled)]
pub struct TagRow {
    #[tabled(rename = "TAG")]
    pub tag: String,
    #[tabled(rename = "SIZE")]
    pub size: String,
    #[tabled(rename = "UPDATED")]
    pub updated: String,
}

impl From<TagInfo> for TagRow {
    fn from(tag: TagInfo) -> Self {
        Self {
            size: size_or_dash(tag.full_size),
            updated: age_or_dash(tag.last_updated.as_ref()),
            tag: tag.name,
        }
    }
}

/// Credentials for listing tags of `reference`
///
/// Official images are fetched anonymously; otherwise the saved token is sent
/// as a bearer when there is one.
pub fn request_credentials(
    store: &FileCredentialStore,
    reference: &RegistryReference,
) -> Credentials {
    if reference.is_official() {
        return Credentials::Anonymous;
    }
    store
        .load()
        .map(|credential| credential.as_bearer())
        .unwrap_or_else(Credentials::anonymous)
}

/// Fetch one page of tags for `reference` as rows
pub async fn tag_rows(
    client: &Client,
    reference: &RegistryReference,
    limit: usize,
    credentials: &Credentials,
) -> Result<Vec<TagRow>> {
    let tags = client
        .fetch_tags(
            reference.api_namespace(),
            reference.repository(),
            limit,
            credentials,
        )
        .await?;
    Ok(tags.into_iter().map(TagRow::from).collect())
}

/// Handle the tags subcommand
pub async fn handle_tags(
    ctx: &AppContext,
    repository: &str,
    format: OutputFormat,
    limit: Option<usize>,
) {
    let reference: RegistryReference = match repository.parse() {
        Ok(reference) => reference,
        Err(e) => fail(ctx, &e.to_string()),
    };
    if let Some(tag) = reference.tag() {
        format::warning(ctx, &format!("Ignoring tag '{}'; listing all tags", tag));
    }

    let store = FileCredentialStore::new(ctx.credentials_path.clone());
    let credentials = request_credentials(&store, &reference);
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!(
            "Listing tags for {} ({} request)",
            reference.path(),
            credentials.scheme()
        ),
    );

    let client = hub_client(ctx);
    let spinner = format::spinner(ctx, &format!("Fetching tags for {}...", reference.path()));
    let result = tag_rows(
        &client,
        &reference,
        limit.unwrap_or(DEFAULT_TAG_PAGE_SIZE),
        &credentials,
    )
    .await;
    spinner.finish_and_clear();

    let rows = match result {
        Ok(rows) => rows,
        Err(e) => fail(ctx, &e.to_string()),
    };

    if rows.is_empty() && format == OutputFormat::Pretty {
        println!("No tags found for '{}'.", reference.path());
        return;
    }

    match format::format_table(&rows, format) {
        Ok(output) => println!("{}", output),
        Err(e) => fail(ctx, &e),
    }
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
