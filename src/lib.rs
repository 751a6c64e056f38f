// Modules
pub mod ai;
pub mod config;
pub mod error;
pub mod genie;
pub mod server;
pub mod vocab;

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai::CredentialManager;
use config::{Cli, Command, GenerateArgs, KeyAction, ServeArgs};
use genie::{SynthesisMode, Synthesizer};
use server::{AppState, RequestLimits};

const DEFAULT_LOG_FILTER: &str = "seedgenie_lib=info,tower_http=info";

/// Entry point for the `seedgenie` binary
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Generate(args) => generate(args).await,
        Command::Key { action } => key(action),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let vocab = vocab::vocabulary();
    let provider = ai::build_provider(&args.provider);
    let state = Arc::new(AppState {
        synthesizer: Synthesizer::new(vocab, provider, args.provider.timeout()),
        vocab,
        limits: RequestLimits::new(args.max_prompt_chars),
    });

    let running = server::start_server(state, args.listen, Some(&args.static_dir))
        .await
        .with_context(|| format!("Failed to start server on {}", args.listen))?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");
    running.shutdown().await;
    Ok(())
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let vocab = vocab::vocabulary();
    let synthesizer = Synthesizer::new(
        vocab,
        ai::build_provider(&args.provider),
        args.provider.timeout(),
    );
    let mode = if args.local {
        SynthesisMode::Local
    } else {
        SynthesisMode::Auto
    };

    let result = synthesizer.generate(&args.prompt, mode).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn key(action: KeyAction) -> anyhow::Result<()> {
    match action {
        KeyAction::Set { key } => {
            CredentialManager::store_api_key(&key)?;
            println!("API key stored");
        }
        KeyAction::Delete => {
            CredentialManager::delete_api_key()?;
            println!("API key deleted");
        }
        KeyAction::Status => {
            if CredentialManager::has_api_key()? {
                println!("API key is configured");
            } else {
                println!("No API key configured");
            }
        }
    }
    Ok(())
}
