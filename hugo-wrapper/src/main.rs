use anyhow::{Context, Result};
use clap::Parser;
use std::process::{Command, ExitCode};
use tracing_subscriber::EnvFilter;

use hugo_resolver::{GitHubRegistry, Platform, Resolver};
use hugo_wrapper::cli::Args;
use hugo_wrapper::config::Config;
use hugo_wrapper::download::Downloader;
use hugo_wrapper::installer::Installer;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.wrapper_verbose {
        EnvFilter::new("hugo_wrapper=debug,hugo_resolver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = args
        .wrapper_config
        .clone()
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path).context("Failed to load configuration")?;
    let settings = config.merge_with_args(&args);

    let registry = GitHubRegistry::new(&settings.owner, &settings.repo)?
        .with_per_page(settings.per_page);
    let mut resolver = Resolver::new(registry, Platform::current());

    let version = resolver
        .resolve(&settings.hugo_version)
        .await
        .with_context(|| format!("Failed to resolve Hugo version '{}'", settings.hugo_version))?;

    let downloader = Downloader::new(settings.timeout, settings.retry.clone())?;
    let installer = Installer::new(settings.install_dir.clone(), downloader, settings.skip_checksum);
    let hugo = installer
        .ensure_installed(&mut resolver, &version)
        .await
        .with_context(|| format!("Failed to install Hugo {version}"))?;

    tracing::debug!("Running {} {:?}", hugo.display(), args.hugo_args);
    let status = Command::new(&hugo)
        .args(&args.hugo_args)
        .status()
        .with_context(|| format!("Failed to run {}", hugo.display()))?;

    // A child killed by a signal has no exit code
    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
