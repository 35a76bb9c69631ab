//! `pw rollback` command implementation.

use std::path::PathBuf;

use clap::Args;
use pw_config::{CliSettings, Config};
use pw_store::{RevisionStore, VersionId};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the rollback command.
#[derive(Args)]
pub(crate) struct RollbackArgs {
    /// Snapshot version to restore.
    version: String,

    /// Path to configuration file (default: auto-discover pagewright.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,
}

impl RollbackArgs {
    /// Execute the rollback command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let version = VersionId::parse(&self.version)?;
        let store = RevisionStore::open(&config.site_resolved.dir)?;
        store.restore(&version)?;

        output.success(&format!("Restored snapshot {version}"));
        Ok(())
    }
}
