use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use orrery::config::Config;
use orrery::db::{Storage, seed};
use orrery::router::{OrreryState, orrery_router};
use orrery::service::{Mailer, TokenKeys};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "orrery", about = "Planets catalog REST service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database schema
    DbCreate,
    /// Drop all tables
    DbDrop,
    /// Create the schema and load the fixture planets and user
    DbSeed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let storage = Storage::connect(&cfg.database_url).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::DbCreate => {
            storage.init_schema().await?;
            info!(database_url = %cfg.database_url, "database created");
        }
        Command::DbDrop => {
            storage.drop_schema().await?;
            info!(database_url = %cfg.database_url, "database dropped");
        }
        Command::DbSeed => {
            storage.init_schema().await?;
            seed::run(&storage).await?;
            info!(database_url = %cfg.database_url, "database seeded");
        }
        Command::Serve => {
            cfg.require_token_secret()?;
            storage.init_schema().await?;

            info!(
                database_url = %cfg.database_url,
                bind_addr = %cfg.bind_addr,
                loglevel = %cfg.loglevel,
                smtp = cfg.smtp_host.as_deref().unwrap_or("<log-only>"),
            );

            let tokens = TokenKeys::new(&cfg.token_secret, cfg.token_ttl_hours);
            let mailer = Mailer::from_config(&cfg)?;
            let state = OrreryState::new(storage, tokens, mailer, cfg.reset_ttl_minutes);
            let app = orrery_router(state);

            let listener = TcpListener::bind(&cfg.bind_addr).await?;
            info!("HTTP server listening on {}", cfg.bind_addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install ctrl-c handler");
    }
}
