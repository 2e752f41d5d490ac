//! SSR Router - `ssr-route` entry point

use std::path::PathBuf;

use clap::Parser;
use ssr_router::{load_manifest, resolve_urls};
use tracing_subscriber::EnvFilter;

/// Resolve URLs against a page manifest and print the result as JSON
#[derive(Parser)]
#[command(name = "ssr-route")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Page manifest (JSON)
    manifest: PathBuf,

    /// URLs to resolve
    #[arg(required = true)]
    urls: Vec<String>,

    /// Override the manifest's base URL (also read from SSR_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Print the page routes before resolving
    #[arg(long)]
    page_routes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut manifest = load_manifest(&cli.manifest)?;

    // Environment, then command line, over the manifest
    manifest.config = manifest.config.with_env_overrides();
    if let Some(base_url) = cli.base_url {
        manifest.config.base_url = Some(base_url);
    }
    manifest.config.validate()?;

    if cli.page_routes {
        let summaries: Vec<_> = manifest.page_routes()?.iter().map(|route| route.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }

    let resolutions = resolve_urls(&manifest, &cli.urls).await?;
    println!("{}", serde_json::to_string_pretty(&resolutions)?);

    Ok(())
}
