//! `pw serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use pw_config::{CliSettings, Config};
use pw_generate::{ContentGenerator, GroqGenerator};
use pw_mirror::{GitHubMirror, Mirror, NullMirror};
use pw_pipeline::{Pipeline, RateLimiter};
use pw_server::{ServerConfig, run_server};
use pw_store::RevisionStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover pagewright.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            site_dir: self.site_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Site directory: {}",
            config.site_resolved.dir.display()
        ));

        if config.generator.api_key.is_empty() {
            output.warning("Generator API key not set; generation requests will fail");
        }
        if config.mirror().is_some() {
            output.info("Mirror: enabled");
        } else {
            output.info("Mirror: disabled (no credentials in config)");
        }

        let pipeline = Arc::new(build_pipeline(&config)?);

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
        };
        run_server(server_config, pipeline)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Wire the pipeline from config: store, collaborators, rate limiter.
fn build_pipeline(config: &Config) -> Result<Pipeline, CliError> {
    let store = RevisionStore::open(&config.site_resolved.dir)?;

    let generator: Arc<dyn ContentGenerator> = Arc::new(GroqGenerator::new(
        &config.generator.api_url,
        &config.generator.api_key,
        &config.generator.model,
    ));

    let mirror: Arc<dyn Mirror> = match config.mirror() {
        Some(m) => Arc::new(GitHubMirror::new(
            &m.api_url,
            &m.token,
            &m.owner,
            &m.repo,
            &m.path_prefix,
        )),
        None => Arc::new(NullMirror),
    };

    let limiter = RateLimiter::new(Duration::from_secs(config.generator.min_interval_secs));

    Ok(Pipeline::new(store, generator, mirror, limiter))
}
