use clap::{Parser, Subcommand};
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pushcast::db;
use pushcast::notifications::senders::load_gateway;
use pushcast::notifications::service::NotificationService;
use pushcast::server::config::ServerConfig;
use pushcast::services::auth_service::issue_session_token;
use pushcast::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(version, about = "Push notification broadcast server")]
struct Args {
    /// Path to a TOML config file. Environment variables override its values.
    #[arg(short, long, default_value = "server_config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print a session token for the admin routes.
    IssueToken {
        #[arg(short, long, default_value = "admin")]
        subject: String,
    },
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config = match ServerConfig::load(Some(&args.config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    if let Some(Command::IssueToken { subject }) = &args.command {
        let ttl = chrono::Duration::seconds(config.session_ttl_secs);
        println!("{}", issue_session_token(subject, &config.jwt_secret, ttl)?);
        return Ok(());
    }

    init_logging(&config.log_dir);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting server...");

    let db_pool = match db::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, database_url = %config.database_url, "Failed to open database.");
            return Err(e.into());
        }
    };
    info!("Database ready.");

    let gateway = load_gateway(config.fcm_service_account.as_deref())?;
    let notification_service = Arc::new(NotificationService::new(db_pool.clone(), gateway));

    let listen_addr = config.listen_addr();
    let app_router = create_axum_router(db_pool, notification_service, Arc::new(config));

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(address = %listen_addr, "HTTP server listening.");
    axum::serve(listener, app_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal. Graceful shutdown is disabled.");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
