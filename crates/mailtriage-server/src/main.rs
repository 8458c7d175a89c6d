// src/main.rs
// mailtriage - support email triage service

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use mailtriage::{
    analysis::Analyzer,
    config::{EnvConfig, env::load_dotenv_files},
    llm::CompletionClient,
    web,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "mailtriage")]
#[command(about = "Support email triage: LLM classification with keyword fallback")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Host to bind (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check the completion API credential and connectivity
    Check,

    /// Classify one email and print the record
    Analyze {
        #[arg(short, long, default_value = "")]
        subject: String,

        #[arg(short, long)]
        body: String,
    },
}

async fn run_server(config: EnvConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let validation = config.validate();
    if !validation.warnings.is_empty() {
        warn!("{}", validation.report());
    }
    validation.into_result()?;

    let host = host.unwrap_or_else(|| config.host.clone());
    let port = port.unwrap_or(config.port);

    let mut state = web::state::AppState::from_config(&config);
    state.public_url = format!("http://localhost:{}", port);
    let app = web::create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        model = %config.llm.model,
        classifier = config.api_keys.has_classifier(),
        "mailtriage listening on http://{}",
        addr
    );
    println!("Dashboard: http://localhost:{}/dashboard", port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_check(config: EnvConfig) -> Result<()> {
    match config.api_keys.masked() {
        Some(masked) => println!("GROQ_API_KEY: {}", masked),
        None => {
            println!("GROQ_API_KEY: not configured (keyword fallback only)");
            return Ok(());
        }
    }
    println!("Endpoint: {} (model {})", config.llm.completions_url(), config.llm.model);

    let client = CompletionClient::from_config(&config);
    let report = client.probe().await?;

    println!("Status code: {}", report.status_code);
    println!("{}", serde_json::to_string_pretty(&report.response)?);

    if !report.is_success() {
        bail!("Completion API probe returned HTTP {}", report.status_code);
    }
    Ok(())
}

async fn run_analyze(config: EnvConfig, subject: String, body: String) -> Result<()> {
    let analyzer = Analyzer::new(Arc::new(CompletionClient::from_config(&config)));
    let record = analyzer.analyze(&subject, &body).await;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Project .env overrides the global ~/.mailtriage/.env
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for path in load_dotenv_files(&cwd, dirs::home_dir().as_deref()) {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let config = EnvConfig::load();

    match cli.command {
        None => run_server(config, None, None).await?,
        Some(Commands::Serve { host, port }) => run_server(config, host, port).await?,
        Some(Commands::Check) => run_check(config).await?,
        Some(Commands::Analyze { subject, body }) => run_analyze(config, subject, body).await?,
    }

    Ok(())
}
