use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rapi::cli::{Cli, Commands};
use rapi::config::Config;
use rapi::services::{DiscoveryService, ExportService, SiteService};
use rapi::sources::ReqwestClient;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    Config::load_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            destination,
            dry_run,
        } => cmd_run(config, destination, dry_run),
        Commands::Discover { url } => cmd_discover(&url),
    }
}

fn cmd_run(config_path: PathBuf, destination: Option<PathBuf>, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!(path = %config_path.display(), "Configuring Rapi");
    let config = Config::from_file(&config_path)
        .with_context(|| format!("Unable to load {}", config_path.display()))?
        .with_destination(destination);

    if config.websites.is_empty() {
        println!("No websites configured.");
        return Ok(());
    }

    let site_service = SiteService::new(ReqwestClient::new());
    let export_service = ExportService::new(&config.destination_folder).with_dry_run(dry_run);

    let mut generated = 0;
    for outcome in site_service.acquire_all(&config.websites) {
        // Acquisition failures are already logged by the site service.
        let Ok(site) = outcome.result else {
            continue;
        };

        match export_service.export(&site) {
            Ok(report) => {
                for path in &report.written {
                    if dry_run {
                        println!("  [DRY RUN] {}", path.display());
                    } else {
                        println!("  {}", path.display());
                    }
                }
                if report.is_complete() {
                    generated += 1;
                }
            }
            Err(e) => {
                tracing::error!(site = %site.url(), error = %e, "Unable to generate feeds");
            }
        }
    }

    println!(
        "Generated feeds for {} of {} websites.",
        generated,
        config.websites.len()
    );

    Ok(())
}

fn cmd_discover(url: &str) -> anyhow::Result<()> {
    let client = ReqwestClient::new();
    let mut discovery = DiscoveryService::new(&client, url);

    let api_url = discovery.resolve_api_url()?;
    println!("API: {}", api_url);

    match discovery.discover_favicon() {
        Some(favicon) => println!("Favicon: {}", favicon),
        None => println!("Favicon: none"),
    }

    Ok(())
}
