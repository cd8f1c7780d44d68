//! Snapshot maintenance commands

use colored::Colorize;

use crate::cache::{rebuild_snapshot, storage};
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::models::CacheSnapshot;
use crate::output::{ProjectDisplay, format_json, format_table};
use crate::text::normalize_profile_url;

fn report_saved(ctx: &CommandContext, snapshot: &CacheSnapshot) -> Result<()> {
    match ctx.format {
        OutputFormat::Table => {
            println!(
                "{} Saved {} projects to {}",
                "✓".green(),
                snapshot.projects.len(),
                ctx.config().snapshot_path().display().to_string().cyan()
            );
        }
        OutputFormat::Json => println!("{}", format_json(snapshot, None)?),
    }
    Ok(())
}

/// Scrape afresh and write the snapshot
pub async fn build(ctx: &CommandContext, max: Option<usize>) -> Result<()> {
    let snapshot = ctx.service.generate_snapshot(None, max).await?;
    report_saved(ctx, &snapshot)
}

/// Rewrite the snapshot from downloaded `meta.json` files
pub fn rebuild(ctx: &CommandContext) -> Result<()> {
    let config = ctx.config();
    let snapshot = rebuild_snapshot(
        &config.projects_dir(),
        &normalize_profile_url(&config.profile_url),
    )?;
    storage::write_snapshot(&config.snapshot_path(), &snapshot)?;
    report_saved(ctx, &snapshot)
}

/// Print the current snapshot
pub fn show(ctx: &CommandContext) -> Result<()> {
    let path = ctx.config().snapshot_path();
    let snapshot = storage::read_snapshot(&path)?
        .ok_or_else(|| Error::Other(format!("No snapshot at {}", path.display())))?;

    match ctx.format {
        OutputFormat::Table => {
            println!("{} {}", "Profile:".bold(), snapshot.profile_url);
            println!(
                "{} {}\n",
                "Generated:".bold(),
                snapshot.generated_at.to_rfc3339()
            );
            let rows: Vec<ProjectDisplay> =
                snapshot.projects.iter().map(ProjectDisplay::from).collect();
            println!("{}", format_table(&rows));
        }
        OutputFormat::Json => println!("{}", format_json(&snapshot, None)?),
    }

    Ok(())
}
