//! Global CLI options shared across all commands

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::config::ConfigOverrides;

/// Global CLI options passed to all command handlers.
///
/// Precedence is CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; the config file is merged in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.folio/config.yaml)
    pub config: Option<String>,

    /// Profile URL override
    pub profile_url: Option<String>,

    /// Serve from the snapshot and local metadata
    pub static_cache: bool,

    /// Public directory override
    pub public_dir: Option<PathBuf>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            profile_url: cli.profile_url.clone(),
            static_cache: cli.static_cache,
            public_dir: cli.public_dir.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Overrides to layer on top of the config file.
    ///
    /// An unset `--static-cache` leaves the file's value alone.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            profile_url: self.profile_url.clone(),
            static_cache: self.static_cache.then_some(true),
            public_dir: self.public_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_from_flags() {
        let opts = GlobalOptions {
            format: OutputFormat::Json,
            config: Some("/custom/path".to_string()),
            profile_url: Some("https://www.behance.net/other".to_string()),
            static_cache: true,
            public_dir: Some(PathBuf::from("/srv/public")),
        };

        assert_eq!(opts.config_ref(), Some("/custom/path"));
        let overrides = opts.overrides();
        assert_eq!(
            overrides.profile_url.as_deref(),
            Some("https://www.behance.net/other")
        );
        assert_eq!(overrides.static_cache, Some(true));
        assert_eq!(overrides.public_dir, Some(PathBuf::from("/srv/public")));
    }

    #[test]
    fn test_unset_flags_leave_config_alone() {
        let opts = GlobalOptions {
            format: OutputFormat::Table,
            config: None,
            profile_url: None,
            static_cache: false,
            public_dir: None,
        };

        assert_eq!(opts.config_ref(), None);
        let overrides = opts.overrides();
        assert!(overrides.profile_url.is_none());
        assert!(overrides.static_cache.is_none());
        assert!(overrides.public_dir.is_none());
    }
}
