//! Command execution context
//!
//! Loads configuration once and builds the service every command talks to.

use crate::cache::PortfolioService;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::HttpFetcher;
use crate::config::Config;
use crate::error::Result;

/// Context for command execution containing config, service and output format.
pub struct CommandContext {
    /// Project access with its caches
    pub service: PortfolioService<HttpFetcher>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Load config (file, then env/CLI overrides) and build the service.
    ///
    /// # Errors
    /// Returns error if the config file exists but cannot be parsed, or the
    /// HTTP client cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?.with_overrides(opts.overrides());
        log::debug!(
            "Profile {} (static cache: {}, public dir: {})",
            config.profile_url,
            config.static_cache,
            config.public_dir.display()
        );

        let fetcher = HttpFetcher::new()?;

        Ok(Self {
            service: PortfolioService::new(fetcher, config),
            format: opts.format,
        })
    }

    pub fn config(&self) -> &Config {
        self.service.config()
    }
}
