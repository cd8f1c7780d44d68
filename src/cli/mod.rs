//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod context;
pub mod detail;
pub mod download;
pub mod projects;
pub mod snapshot;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// folio - mirror a Behance portfolio with a two-tier cache
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "FOLIO_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "FOLIO_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Behance profile to mirror
    #[arg(long, global = true, env = "FOLIO_PROFILE_URL", hide_env = true)]
    pub profile_url: Option<String>,

    /// Serve from the snapshot and downloaded metadata when present
    #[arg(
        long,
        global = true,
        env = "FOLIO_STATIC_CACHE",
        hide_env = true,
        value_parser = BoolishValueParser::new()
    )]
    pub static_cache: bool,

    /// Directory holding the snapshot and project folders
    #[arg(long, global = true, env = "FOLIO_PUBLIC_DIR", hide_env = true)]
    pub public_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(
        long,
        global = true,
        env = "FOLIO_DEBUG",
        hide_env = true,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the profile's projects
    #[command(visible_alias = "ls")]
    Projects {
        /// Stop after this many projects
        #[arg(long, short = 'n')]
        max: Option<usize>,

        /// Skip the snapshot and in-memory cache
        #[arg(long)]
        refresh: bool,
    },

    /// Show one project's title, tags and images
    Detail {
        /// Project page URL
        url: String,

        /// Project slug, used to find downloaded metadata
        #[arg(long)]
        slug: Option<String>,

        /// Skip local metadata and the in-memory cache
        #[arg(long)]
        refresh: bool,
    },

    /// Manage the on-disk snapshot
    #[command(subcommand)]
    Snapshot(SnapshotCommands),

    /// Download covers and gallery images for static serving
    Download,

    /// Generate shell completions (static)
    #[command(after_help = "\
Static completions (subcommands/flags only):
  bash:   folio completion bash > /etc/bash_completion.d/folio
  zsh:    folio completion zsh > \"${fpath[1]}/_folio\"
  fish:   folio completion fish > ~/.config/fish/completions/folio.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Snapshot subcommands
#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Scrape the profile and replace the snapshot
    Build {
        /// Stop after this many projects
        #[arg(long, short = 'n')]
        max: Option<usize>,
    },

    /// Rebuild the snapshot from downloaded meta.json files
    Rebuild,

    /// Print the current snapshot
    Show,
}
