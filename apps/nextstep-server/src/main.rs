use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use api_core::BroadcastPublisher;
use connections::contract::events::ConnectionEvent;
use directory::contract::DirectoryApi;
use gateway::{build_router, GatewayConfig, ModuleServices};
use messaging::contract::events::MessageEvent;
use runtime::{AppConfig, CliArgs, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) => {
            out.push('?');
            out.push_str(q);
            if !q.contains("mode=") {
                out.push_str("&mode=rwc");
            }
        }
        // Create the database file on first start.
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// NextStep Connect - connections, messaging and notifications backend
#[derive(Parser)]
#[command(name = "nextstep-server")]
#[command(about = "NextStep Connect - connections, messaging and notifications backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and database connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref() {
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
    }

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("NextStep server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config).await,
    }
}

async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config: &DatabaseConfig = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database configuration is required"))?;

    let mut dsn = db_config.url.trim().to_owned();
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    // Absolutize sqlite DSNs to avoid cwd issues
    if dsn.starts_with("sqlite:") {
        dsn = absolutize_sqlite_dsn(&dsn, Path::new(&config.server.home_dir), true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(db_config.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {}", dsn))?;

    if dsn.starts_with("sqlite:") {
        if let Some(ms) = db_config.busy_timeout_ms {
            db.execute_unprepared(&format!("PRAGMA busy_timeout = {}", ms))
                .await
                .context("Failed to set sqlite busy timeout")?;
        }
    }
    Ok(db)
}

/// Migrations share one history table, so the order only matters for the
/// foreign keys: users before everything, connections and messages before
/// notifications.
async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    directory::Migrator::up(db, None)
        .await
        .context("directory migrations")?;
    connections::Migrator::up(db, None)
        .await
        .context("connections migrations")?;
    messaging::Migrator::up(db, None)
        .await
        .context("messaging migrations")?;
    notifications::Migrator::up(db, None)
        .await
        .context("notifications migrations")?;
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    let db = connect_database(&config).await?;
    run_migrations(&db).await?;

    let gateway_config: GatewayConfig = config.module_config("gateway")?;
    let directory_config: directory::config::DirectoryConfig = config.module_config("directory")?;

    let directory_service = Arc::new(directory::domain::service::Service::new(Arc::new(
        directory::infra::storage::repository::SeaOrmUsersRepository::new(db.clone()),
    )));
    let directory_client: Arc<dyn DirectoryApi> = Arc::new(
        directory::gateways::local::DirectoryLocalClient::new(directory_service.clone()),
    );

    let conn_events = BroadcastPublisher::<ConnectionEvent>::new(256);
    let msg_events = BroadcastPublisher::<MessageEvent>::new(256);
    let conn_rx = conn_events.subscribe();
    let msg_rx = msg_events.subscribe();

    let connections_service = Arc::new(connections::domain::service::Service::new(
        Arc::new(connections::infra::storage::repository::SeaOrmConnectionsRepository::new(
            db.clone(),
        )),
        directory_client.clone(),
        Arc::new(conn_events),
    ));
    let messaging_service = Arc::new(messaging::domain::service::Service::new(
        Arc::new(messaging::infra::storage::repository::SeaOrmMessagesRepository::new(
            db.clone(),
        )),
        directory_client.clone(),
        Arc::new(msg_events),
    ));
    let notifications_service = Arc::new(notifications::domain::service::Service::new(
        Arc::new(
            notifications::infra::storage::repository::SeaOrmNotificationsRepository::new(
                db.clone(),
            ),
        ),
        directory_client.clone(),
    ));

    let writer = notifications::writer::spawn(
        notifications_service.clone(),
        directory_client.clone(),
        conn_rx,
        msg_rx,
    );

    let router = build_router(
        &gateway_config,
        ModuleServices {
            directory: directory_service,
            directory_config: Arc::new(directory_config),
            directory_client,
            connections: connections_service,
            messaging: messaging_service,
            notifications: notifications_service,
        },
    )?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Services dropped with the router; once the event channels close the
    // writer drains and stops.
    tracing::info!("Shutting down");
    let _ = tokio::time::timeout(Duration::from_secs(5), writer).await;
    Ok(())
}

async fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let _gateway_config: GatewayConfig = config.module_config("gateway")?;
    let _directory_config: directory::config::DirectoryConfig =
        config.module_config("directory")?;

    let db = connect_database(&config).await?;
    let pending = directory::Migrator::get_pending_migrations(&db).await?.len()
        + connections::Migrator::get_pending_migrations(&db).await?.len()
        + messaging::Migrator::get_pending_migrations(&db).await?.len()
        + notifications::Migrator::get_pending_migrations(&db)
            .await?
            .len();

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Pending migrations: {}", pending);
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
