//! Image download command

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::download::{DownloadOptions, download_images};
use crate::error::Result;
use crate::output::format_json;

/// Mirror covers and gallery images, then rewrite the snapshot
pub async fn run(ctx: &CommandContext) -> Result<()> {
    let options = DownloadOptions {
        show_progress: ctx.format == OutputFormat::Table,
        ..DownloadOptions::default()
    };

    let report = download_images(&ctx.service, &options).await?;

    match (ctx.format, &report.snapshot) {
        (OutputFormat::Json, snapshot) => println!("{}", format_json(snapshot, None)?),
        (OutputFormat::Table, None) => {
            println!("{} No projects found, nothing downloaded", "⚠".yellow());
        }
        (OutputFormat::Table, Some(snapshot)) => {
            println!(
                "{} Downloaded {} covers and {} gallery images for {} projects",
                "✓".green(),
                report.covers,
                report.gallery_images,
                snapshot.projects.len()
            );
            println!(
                "Images: {}",
                ctx.config().projects_dir().display().to_string().cyan()
            );
            println!(
                "Snapshot: {}",
                ctx.config().snapshot_path().display().to_string().cyan()
            );
            println!("{}", "Serve them with --static-cache".dimmed());
        }
    }

    Ok(())
}
