//! rdf-serve: serve a directory of RDF files with content negotiation

use anyhow::Context;
use clap::Parser;
use rdf_serve::{HttpServer, Pipeline, RdfEngine, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rdf-serve", version, about = "Serve RDF files with content negotiation")]
struct Cli {
    /// Directory holding the RDF files
    base_dir: PathBuf,

    /// Answer folder paths ending in `/` with ldp:contains listings
    #[arg(short = 'l', long)]
    containment: bool,

    /// Port to listen on (default: any free port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rdf_serve=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };

    config.base_dir = cli.base_dir;
    config.containment |= cli.containment;
    if cli.port.is_some() {
        config.port = cli.port;
    }
    if let Some(host) = cli.host {
        config.address = host;
    }
    config.validate()?;

    let base_dir = config
        .base_dir
        .canonicalize()
        .with_context(|| format!("base directory {}", config.base_dir.display()))?;
    anyhow::ensure!(base_dir.is_dir(), "{} is not a directory", base_dir.display());

    let engine = RdfEngine::new(config.format_registry(), config.transform.clone());
    let pipeline = Pipeline::new(&base_dir, config.containment, Arc::new(engine));
    let server = HttpServer::new(config, pipeline);

    let listener = server.listen().await.context("binding listener")?;
    let port = listener.local_addr()?.port();
    info!("Serving {} on port {}", base_dir.display(), port);
    println!(
        "RDF Serve available at http://localhost:{}/ {} containment triples",
        port,
        if server.containment() { "with" } else { "without" }
    );

    server.serve(listener).await.context("server failed")?;
    Ok(())
}
