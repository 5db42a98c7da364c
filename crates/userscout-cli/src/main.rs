//! Userscout command-line entry point.
//!
//! Binary name: `userscout`
//!
//! Loads configuration and the service catalog, then dispatches to the
//! requested command.

mod cli;
mod logging;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use userscout_catalog::{CatalogLoader, ServiceRegistry};
use userscout_core::AppConfig;
use userscout_probe::ProbeEngine;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let registry = load_registry(&config)?;

    match &cli.command {
        Commands::Check { username } => {
            let engine = build_engine(registry, &config)?;
            let cancel = cancel_on_ctrl_c();
            let results = engine.check_one_with_cancel(username, &cancel).await?;

            if cli.json {
                println!("{}", output::render_json(&results)?);
            } else {
                print!("{}", output::render_results_text(username, &results));
            }
        }

        Commands::CheckMany { usernames } => {
            let engine = build_engine(registry, &config)?;
            let cancel = cancel_on_ctrl_c();
            let summaries = engine
                .check_many_summaries_with_cancel(usernames, &cancel)
                .await?;

            if cli.json {
                println!("{}", output::render_summaries_json(&summaries)?);
            } else {
                print!("{}", output::render_summaries_text(&summaries));
            }
        }

        Commands::ListSites { category } => {
            let include_nsfw = config.probe.include_nsfw;
            let names: Vec<String> = match category {
                Some(category) => registry
                    .get_by_category(category, include_nsfw)
                    .values()
                    .map(|def| def.name.to_string())
                    .collect(),
                None => registry.list_names(include_nsfw),
            };

            if cli.json {
                println!("{}", output::render_json(&names)?);
            } else {
                println!("{}", output::render_names_text(&names));
            }
        }

        Commands::Categories => {
            let categories = registry.categories(config.probe.include_nsfw);

            if cli.json {
                println!("{}", output::render_json(&categories)?);
            } else {
                println!("{}", output::render_categories_text(&categories));
            }
        }
    }

    Ok(())
}

/// File (or defaults), then environment, then command-line flags.
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => AppConfig::load_with_env().context("failed to load config")?,
    };

    cli.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;

    debug!(?config, "effective configuration");
    Ok(config)
}

fn load_registry(config: &AppConfig) -> anyhow::Result<ServiceRegistry> {
    let loader = match &config.catalog.directory {
        Some(dir) => CatalogLoader::from_dir(dir)?,
        None => CatalogLoader::bundled(),
    };

    let registry = ServiceRegistry::load_from(&loader).context("failed to load service catalog")?;
    info!(services = registry.len(), "catalog loaded");
    Ok(registry)
}

fn build_engine(registry: ServiceRegistry, config: &AppConfig) -> anyhow::Result<ProbeEngine> {
    Ok(ProbeEngine::builder(registry)
        .with_config(&config.probe)
        .build()?)
}

/// Token cancelled on the first Ctrl-C; in-flight probes then report timeouts.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, abandoning in-flight probes");
            trigger.cancel();
        }
    });

    token
}
