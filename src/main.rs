mod cli;

use anyhow::Context;
use booking::{
    create_app, AppState, BookingConfig, DatabaseProvider, PasswordHasher, TokenService,
};
use cli::Cli;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    let config_found = cli.config.exists();
    let config = if config_found {
        BookingConfig::load(&cli.config)
            .with_context(|| format!("Failed to load {}", cli.config.display()))?
    } else {
        let config = BookingConfig::default();
        config.validate().context("Default configuration is not usable")?;
        config
    };

    init_tracing(&config, cli.verbose);
    if !config_found {
        tracing::warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    // Read once; only the derived signing keys outlive this scope.
    let token_service = {
        let secret = config.jwt_secret()?;
        Arc::new(TokenService::new(&secret).context("Invalid JWT secret")?)
    };
    let password_hasher = Arc::new(PasswordHasher::new()?);

    let provider = DatabaseProvider::from_url(&config.database.url);
    if let DatabaseProvider::SQLite { path } = &provider {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
    }
    let db = provider.create_client().await?;
    tracing::info!(database = ?provider, "database ready");

    let app = create_app(AppState {
        db,
        password_hasher,
        token_service,
    });

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(%address, "booking server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &BookingConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = config.server.json_logs;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
