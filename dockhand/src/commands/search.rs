use crate::commands::{fail, hub_client};
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, OutputFormat};
use libdockhand::client::{Client, SearchHit, truncate};
use libdockhand::error::Result;
use libdockhand::resolver::DEFAULT_SEARCH_LIMIT;
use serde::Serialize;
use tabled::Tabled;

/// Description width in the pretty table
const DESCRIPTION_WIDTH: usize = 60;

/// One row of `dockhand search`
#[derive(Debug, Serialize, Tabled)]
pub struct SearchRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "OFFICIAL")]
    pub official: String,
    #[tabled(rename = "STARS")]
    pub stars: u64,
    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
}

impl From<SearchHit> for SearchRow {
    fn from(hit: SearchHit) -> Self {
        Self {
            name: hit.name,
            official: if hit.is_official { "[OK]" } else { "" }.to_string(),
            stars: hit.stars,
            description: truncate(hit.description.trim(), DESCRIPTION_WIDTH),
        }
    }
}

/// Run the search and convert the hits to rows
pub async fn search_rows(client: &Client, term: &str, limit: usize) -> Result<Vec<SearchRow>> {
    let hits = client.search_repositories(term.trim(), limit).await?;
    Ok(hits.into_iter().map(SearchRow::from).collect())
}

/// Handle the search subcommand
pub async fn handle_search(
    ctx: &AppContext,
    term: &str,
    format: OutputFormat,
    limit: Option<usize>,
) {
    if term.trim().is_empty() {
        fail(ctx, "Search term cannot be empty");
    }
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Searching {} for '{}'", ctx.hub_url, term),
    );

    let client = hub_client(ctx);
    let spinner = format::spinner(ctx, &format!("Searching for '{}'...", term));
    let result = search_rows(&client, term, limit.unwrap_or(DEFAULT_SEARCH_LIMIT)).await;
    spinner.finish_and_clear();

    let rows = match result {
        Ok(rows) => rows,
        Err(e) => fail(ctx, &e.to_string()),
    };

    if rows.is_empty() && format == OutputFormat::Pretty {
        println!("No repositories match '{}'.", term);
        return;
    }

    match format::format_table(&rows, format) {
        Ok(output) => println!("{}", output),
        Err(e) => fail(ctx, &e),
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
