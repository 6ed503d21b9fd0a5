use crate::commands::fail;
use crate::context::{AppContext, VerbosityLevel};
use crate::format::{self, OutputFormat};
use crate::prompt::TerminalPrompt;
use libdockhand::engine::{DockerCli, Engine, ImageSummary};
use libdockhand::error::{DockhandError, Result};
use libdockhand::prompt::Prompt;
use serde::Serialize;
use tabled::Tabled;

/// One row of `dockhand images`
#[derive(Debug, Serialize, Tabled)]
pub struct ImageRow {
    #[tabled(rename = "REPOSITORY")]
    pub repository: String,
    #[tabled(rename = "TAG")]
    pub tag: String,
    #[tabled(rename = "IMAGE ID")]
    pub id: String,
    #[tabled(rename = "SIZE")]
    pub size: String,
    #[tabled(rename = "CREATED")]
    pub created: String,
}

impl From<ImageSummary> for ImageRow {
    fn from(image: ImageSummary) -> Self {
        Self {
            repository: image.repository,
            tag: image.tag,
            id: image.id,
            size: image.size,
            created: image.created,
        }
    }
}

/// Local images as rows
pub fn image_rows<E: Engine>(engine: &E) -> Result<Vec<ImageRow>> {
    Ok(engine
        .list_images()?
        .into_iter()
        .map(ImageRow::from)
        .collect())
}

/// Remove `reference`, asking first unless `force` is set.
///
/// Returns `Ok(false)` when the user declined.
pub fn remove_image<E: Engine, P: Prompt + ?Sized>(
    engine: &E,
    prompt: &mut P,
    reference: &str,
    force: bool,
) -> Result<bool> {
    if !force && !prompt.confirm(&format!("Remove image '{}'?", reference), false)? {
        return Ok(false);
    }

    let output = engine.remove_image(reference, force)?;
    if !output.success {
        let detail = output
            .stderr
            .lines()
            .rfind(|line| !line.trim().is_empty())
            .unwrap_or("the engine refused");
        return Err(DockhandError::engine(format!(
            "Removing {} failed: {}",
            reference,
            detail.trim()
        )));
    }
    Ok(true)
}

/// Handle the images subcommand
pub fn handle_images(ctx: &AppContext, format: OutputFormat) {
    let rows = match image_rows(&DockerCli::new()) {
        Ok(rows) => rows,
        Err(e) => fail(ctx, &e.to_string()),
    };

    if rows.is_empty() && format == OutputFormat::Pretty {
        println!("No local images.");
        return;
    }

    match format::format_table(&rows, format) {
        Ok(output) => println!("{}", output),
        Err(e) => fail(ctx, &e),
    }
}

/// Handle the rmi subcommand. `--force` skips the question and removes
/// containers created from the image first.
pub fn handle_rmi(ctx: &AppContext, reference: &str, force: bool) {
    let mut prompt = TerminalPrompt::new(ctx.color.enabled());
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Removing image '{}'...", reference),
    );

    match remove_image(&DockerCli::new(), &mut prompt, reference, force) {
        Ok(true) => format::success(ctx, &format!("Removed image '{}'", reference)),
        Ok(false) => println!("Aborted."),
        Err(e) => fail(ctx, &e.to_string()),
    }
}

#[cfg(test)]
#[path = "images_tests.rs"]
mod tests;
