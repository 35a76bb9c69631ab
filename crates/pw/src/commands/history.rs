//! `pw history` command implementation.

use std::path::PathBuf;

use clap::Args;
use pw_config::{CliSettings, Config};
use pw_store::RevisionStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the history command.
#[derive(Args)]
pub(crate) struct HistoryArgs {
    /// Path to configuration file (default: auto-discover pagewright.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,
}

impl HistoryArgs {
    /// Execute the history command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let store = RevisionStore::open(&config.site_resolved.dir)?;
        let versions = store.list()?;

        if versions.is_empty() {
            output.info("No snapshots yet");
            return Ok(());
        }
        for version in versions {
            output.info(version.as_str());
        }
        Ok(())
    }
}
