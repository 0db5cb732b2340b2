//! Meshboard - Main entry point
//!
//! Admin web dashboard for a mesh VPN coordination service. Talks to the
//! coordination API with a static key and serves server-rendered pages for
//! machines, users, and namespaces.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meshboard::admin::AdminState;
use meshboard::auth::{AccountStore, ApiCredentialStore, CredentialStore};
use meshboard::config::{self, AuthBackend, Config};
use meshboard::db::Database;
use meshboard::server::run_server;
use meshboard::session;

/// Admin dashboard for a mesh VPN coordination service
#[derive(Parser)]
#[command(name = "meshboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value_os_t = Config::default_path())]
    config: PathBuf,

    /// Data directory for the account database and logs
    #[arg(short, long, default_value_os_t = Config::default_data_dir())]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard server
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Dashboard account management
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Generate a default configuration file
    InitConfig {
        /// Output path (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Create a dashboard account
    Create {
        /// Login email
        email: String,
        /// Password (will be hashed with Argon2)
        password: String,
    },

    /// List dashboard accounts
    List,

    /// Delete a dashboard account
    Delete {
        /// Login email
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    match cli.command {
        Commands::Serve { listen } => {
            // For daemon mode: log to both stdout and file with rotation
            init_daemon_logging(&cli.data_dir, filter)?;
            serve(&cli.config, &cli.data_dir, listen).await
        }
        Commands::Account { command } => {
            init_cli_logging(filter);
            handle_account_command(command, &cli.config, &cli.data_dir).await
        }
        Commands::InitConfig { output } => {
            init_cli_logging(filter);
            generate_config(output)
        }
    }
}

/// Initialize logging for CLI commands (stdout only).
fn init_cli_logging(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

/// Initialize logging for daemon mode (stdout + rotating file).
fn init_daemon_logging(data_dir: &PathBuf, filter: EnvFilter) -> Result<()> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    // Daily rotating file appender (e.g., meshboard.2026-08-27.log)
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("meshboard")
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| "Failed to create log file appender")?;

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Leak the guard to keep the writer alive for the lifetime of the program
    std::mem::forget(_guard);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false)) // stdout
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking),
        ) // file
        .init();

    info!("Logging to: {}", log_dir.display());
    Ok(())
}

/// Run the dashboard server
async fn serve(
    config_path: &PathBuf,
    data_dir: &PathBuf,
    listen_override: Option<SocketAddr>,
) -> Result<()> {
    ensure_data_dir(data_dir)?;

    let config = Config::load(config_path)?;

    let listen_addr: SocketAddr = match listen_override {
        Some(addr) => addr,
        None => config
            .http
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", config.http.listen_addr))?,
    };

    let session_key = session::session_key(&config.session.secret);

    let api = Arc::new(
        coordinator_api::Client::new(&config.api.url, &config.api.key)
            .context("Failed to create coordination API client")?,
    );

    let credentials: Arc<dyn CredentialStore> = match config.auth.backend {
        AuthBackend::Database => {
            let db = Database::new(&config.auth.database, data_dir).await?;
            Arc::new(AccountStore::new(db.pool()))
        }
        AuthBackend::ApiKey => Arc::new(ApiCredentialStore::new(&config.api.url)),
    };

    info!("Meshboard starting...");
    info!("Coordination API: {}", config.api.url);
    info!("Login backend: {}", config.auth.backend.as_str());
    info!("Mode: {}", config.mode.as_str());

    let state = AdminState {
        config: Arc::new(config),
        api,
        credentials,
        session_key,
    };

    run_server(listen_addr, state).await
}

/// Ensure data directory exists
fn ensure_data_dir(data_dir: &PathBuf) -> Result<()> {
    if !data_dir.exists() {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        info!("Created data directory: {}", data_dir.display());
    }
    Ok(())
}

/// Handle account subcommands
async fn handle_account_command(
    command: AccountCommands,
    config_path: &PathBuf,
    data_dir: &PathBuf,
) -> Result<()> {
    ensure_data_dir(data_dir)?;

    // Account commands only need the database section; fall back to
    // defaults when no config file exists yet.
    let database = match Config::load(config_path) {
        Ok(config) => config.auth.database,
        Err(_) => Default::default(),
    };

    let db = Database::new(&database, data_dir).await?;
    let store = AccountStore::new(db.pool());

    match command {
        AccountCommands::Create { email, password } => {
            let account = store.create_account(&email, &password).await?;
            println!("Account created:");
            println!("  Email: {}", account.email);
            println!("  Id:    {}", account.id);
            Ok(())
        }

        AccountCommands::List => {
            let accounts = store.list_accounts().await?;

            if accounts.is_empty() {
                println!("No accounts.");
                return Ok(());
            }

            println!("{:<30} {:<20} {:<20}", "EMAIL", "CREATED", "LAST LOGIN");
            println!("{}", "-".repeat(70));

            for account in accounts {
                let created = account.created_at.format("%Y-%m-%d %H:%M");
                let last_login = account
                    .last_login
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!("{:<30} {:<20} {:<20}", account.email, created, last_login);
            }

            Ok(())
        }

        AccountCommands::Delete { email } => {
            store.delete_account(&email).await?;
            println!("Account deleted.");
            Ok(())
        }
    }
}

/// Generate a default configuration file
fn generate_config(output: Option<PathBuf>) -> Result<()> {
    let config = config::default_config_template();

    match output {
        Some(path) => {
            std::fs::write(&path, &config)?;
            println!("Configuration written to: {}", path.display());
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}
