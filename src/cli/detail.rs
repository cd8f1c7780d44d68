//! Project detail command

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::models::ProjectDetail;
use crate::output::{detail_rows, format_json, format_record};

/// Show one project's detail.
///
/// An unavailable project is reported, not treated as a failure.
pub async fn show(
    ctx: &CommandContext,
    url: &str,
    slug: Option<&str>,
    refresh: bool,
) -> Result<()> {
    let resolved = ctx.service.resolve_detail(url, refresh, slug).await;

    match (ctx.format, resolved) {
        (OutputFormat::Table, Some(resolved)) => {
            println!("{}", format_record(&detail_rows(&resolved.detail)));
            eprintln!("{} from {}", "✓".green(), resolved.source.label().cyan());
        }
        (OutputFormat::Table, None) => {
            println!("{} Project detail unavailable: {}", "✗".red(), url);
        }
        (OutputFormat::Json, Some(resolved)) => {
            println!(
                "{}",
                format_json(&resolved.detail, Some(resolved.source.label()))?
            );
        }
        (OutputFormat::Json, None) => {
            println!("{}", format_json(&None::<ProjectDetail>, None)?);
        }
    }

    Ok(())
}
