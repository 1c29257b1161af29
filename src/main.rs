// src/main.rs
// Sophia relay - persona-flavored chat completions over HTTP

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use sophia::api::create_router;
use sophia::config::RelayConfig;
use sophia::persona::Persona;
use sophia::state::AppState;

#[derive(Parser)]
#[command(name = "sophia")]
#[command(about = "Persona relay for chat completions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP relay (default)
    Serve {
        /// Interface to bind
        #[arg(long, env = "SOPHIA_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "SOPHIA_PORT")]
        port: Option<u16>,
    },

    /// Validate configuration and exit
    Check,

    /// List known personas
    Personas {
        /// Show only this persona (professor, sophia)
        name: Option<Persona>,
    },
}

fn load_env_files() {
    // .env.local wins over .env; neither is required
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
}

async fn run_server(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = RelayConfig::load().with_listen_overrides(host, port);

    // Refuse to start with a missing or placeholder key
    let config = config.into_validated()?;

    let state = AppState::from_config(&config)?;
    let app = create_router(state, &config.allowed_origins)?;

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!(
        model = %config.model,
        max_tokens = config.max_tokens,
        origins = ?config.allowed_origins,
        "Relay listening on http://{}",
        bind_address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

fn run_check() -> Result<()> {
    let config = RelayConfig::load();
    let validation = config.validate();
    println!("{}", validation.report());
    if !validation.is_valid() {
        anyhow::bail!("configuration invalid");
    }
    let personas = config.personas()?;
    for persona in Persona::ALL {
        println!("persona {:<10} {} chars", persona, personas.prompt_for(persona).len());
    }
    Ok(())
}

fn run_personas(only: Option<Persona>) -> Result<()> {
    let personas = RelayConfig::load().personas()?;
    for persona in Persona::ALL.into_iter().filter(|p| only.is_none_or(|o| o == *p)) {
        let voice = persona.voice_id().unwrap_or("(default)");
        let prompt = personas.prompt_for(persona);
        let preview: String = prompt.chars().take(60).collect();
        println!("{:<10} {:<22} {}...", persona, voice, preview);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_files();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => run_server(host, port).await,
        Commands::Check => run_check(),
        Commands::Personas { name } => run_personas(name),
    }
}
