//! folio - mirror a Behance portfolio with snapshot and in-memory caching

use clap::{CommandFactory, Parser};

mod cache;
mod cli;
mod client;
mod config;
mod download;
mod error;
mod extract;
mod fallback;
mod models;
mod output;
mod scrape;
mod text;

use cli::{Cli, CommandContext, Commands, GlobalOptions, SnapshotCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Commands::Completion { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "folio", &mut std::io::stdout());
        return Ok(());
    }

    let opts = GlobalOptions::from_cli(&cli);
    let ctx = CommandContext::new(&opts)?;

    match cli.command {
        Commands::Projects { max, refresh } => cli::projects::list(&ctx, max, refresh).await,
        Commands::Detail { url, slug, refresh } => {
            cli::detail::show(&ctx, &url, slug.as_deref(), refresh).await
        }
        Commands::Snapshot(snapshot_cmd) => match snapshot_cmd {
            SnapshotCommands::Build { max } => cli::snapshot::build(&ctx, max).await,
            SnapshotCommands::Rebuild => cli::snapshot::rebuild(&ctx),
            SnapshotCommands::Show => cli::snapshot::show(&ctx),
        },
        Commands::Download => cli::download::run(&ctx).await,
        Commands::Completion { .. } => Ok(()),
    }
}
