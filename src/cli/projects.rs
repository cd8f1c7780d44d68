//! Project listing command

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::{ProjectDisplay, format_json, format_table};

/// List the profile's projects
pub async fn list(ctx: &CommandContext, max: Option<usize>, refresh: bool) -> Result<()> {
    let listing = ctx.service.resolve_projects(None, max, refresh).await;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ProjectDisplay> =
                listing.projects.iter().map(ProjectDisplay::from).collect();
            println!("{}", format_table(&rows));
            eprintln!(
                "{} {} projects from {}",
                "✓".green(),
                listing.projects.len(),
                listing.source.label().cyan()
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                format_json(&listing.projects, Some(listing.source.label()))?
            );
        }
    }

    Ok(())
}
