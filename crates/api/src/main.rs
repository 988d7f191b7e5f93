//! Account management API server
//!
//! Binds the HTTP surface to the business services over SQLite. The
//! database file is created and migrated on startup.

mod context;
mod error;
mod gateway;
mod handlers;
mod routes;
mod state;
mod validators;

use anyhow::Result;
use clap::Parser;
use contabank_persistence::Database;
use state::AppState;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contabank-api")]
#[command(author, version, about = "Account management backend", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "CONTABANK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "CONTABANK_PORT", default_value_t = 3000)]
    port: u16,

    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:contabank.db?mode=rwc")]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let db = Database::init_with_migrations(&cli.database_url).await?;
    tracing::info!(event = "startup.database_ready", database_url = %cli.database_url);

    let app = routes::create_router(AppState::new(&db));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    tracing::info!(event = "startup.listening", %addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
