//! Blog server binary

mod config;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use blog_service::BlogServiceModule;
use clap::Parser;
use config::{AppConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Blog content-management server
#[derive(Debug, Parser)]
#[command(name = "blog-server", version, about)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_tracing(&config.logging)?;

    let db = connect(&config.database).await?;
    if config.database.run_migrations {
        BlogServiceModule::migrate(&db).await?;
    }

    let module = BlogServiceModule::init(config.blog.clone(), Arc::new(db)).await?;
    let app = module.router().layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(config.server.request_timeout))
            .map_response(|res: axum::http::Response<_>| res.map(axum::body::Body::new))
            .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
            .layer(cors_layer(&config.server)?),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "Blog server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Blog server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
        LogFormat::Pretty => registry.with(fmt::layer()).try_init()?,
    }
    Ok(())
}

async fn connect(database: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database.url.clone());
    options
        .max_connections(database.max_connections)
        .connect_timeout(database.connect_timeout)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("connecting to database")?;
    tracing::info!(backend = ?db.get_database_backend(), "Database connected");
    Ok(db)
}

fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    let origins = server
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
