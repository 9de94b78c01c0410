use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use recipio_api::ApiServer;
use recipio_config::{AppConfig, BasePath, LogSettings};
use recipio_data::SupabaseClient;
use recipio_recipes::{AccountSource, RecipeSource};
use recipio_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Dependencies required to serve the site.
pub(crate) struct BootstrapDependencies {
    addr: SocketAddr,
    base_path: BasePath,
    telemetry: Metrics,
    recipes: Arc<dyn RecipeSource>,
    accounts: Arc<dyn AccountSource>,
}

impl BootstrapDependencies {
    /// Build production dependencies backed by the hosted backend.
    pub(crate) fn from_config(config: &AppConfig) -> AppResult<Self> {
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        let client = Arc::new(
            SupabaseClient::new(&config.backend, telemetry.clone())
                .map_err(|err| AppError::backend("supabase_client.new", err))?,
        );
        let recipes: Arc<dyn RecipeSource> = client.clone();
        let accounts: Arc<dyn AccountSource> = client;

        Ok(Self {
            addr: SocketAddr::new(config.bind_addr, config.http_port),
            base_path: config.base_path.clone(),
            telemetry,
            recipes,
            accounts,
        })
    }
}

/// Entry point for the Recipio boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, logging, backend wiring, or the HTTP server fails.
pub async fn run_app() -> AppResult<()> {
    let config =
        AppConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
    recipio_telemetry::init_logging(&logging_config(&config.logging))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("recipio");

    info!(
        base_path = config.base_path.as_str(),
        backend = %config.backend.url,
        "Recipio bootstrap starting"
    );

    let dependencies = BootstrapDependencies::from_config(&config)?;
    run_app_with(dependencies, shutdown_signal()).await
}

/// Boot sequence that relies entirely on injected dependencies.
pub(crate) async fn run_app_with<F>(dependencies: BootstrapDependencies, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let BootstrapDependencies {
        addr,
        base_path,
        telemetry,
        recipes,
        accounts,
    } = dependencies;

    let api = ApiServer::new(recipes, accounts, telemetry, base_path);
    info!(addr = %addr, "Launching HTTP listener");
    api.serve(addr, shutdown)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("HTTP server shutdown complete");
    Ok(())
}

fn logging_config(settings: &LogSettings) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &settings.level,
        format: LogFormat::from_setting(settings.format.as_deref()),
        ..LoggingConfig::default()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipio_test_support::mocks::{InMemoryAccounts, InMemoryRecipes};
    use std::collections::HashMap;
    use std::net::IpAddr;

    fn in_memory(addr: SocketAddr) -> BootstrapDependencies {
        BootstrapDependencies {
            addr,
            base_path: BasePath::root(),
            telemetry: Metrics::new().expect("metrics"),
            recipes: Arc::new(InMemoryRecipes::seeded()),
            accounts: Arc::new(InMemoryAccounts::seeded()),
        }
    }

    #[test]
    fn production_dependencies_follow_config() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon-key"),
            ("RECIPIO_BIND_ADDR", "127.0.0.1"),
            ("RECIPIO_HTTP_PORT", "8080"),
            ("RECIPIO_BASE_PATH", "/tarifler"),
        ]);
        let config = AppConfig::from_lookup(|name| env.get(name).map(ToString::to_string))
            .expect("config");
        let dependencies = BootstrapDependencies::from_config(&config).expect("dependencies");
        assert_eq!(
            dependencies.addr,
            SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080)
        );
        assert_eq!(dependencies.base_path.as_str(), "/tarifler");
    }

    #[test]
    fn logging_config_uses_configured_format() {
        let settings = LogSettings {
            level: "debug".to_string(),
            format: Some("json".to_string()),
        };
        let logging = logging_config(&settings);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);

        let unset = LogSettings {
            level: "info".to_string(),
            format: None,
        };
        let inferred = logging_config(&unset);
        assert_eq!(inferred.format, LogFormat::infer());
    }

    #[tokio::test]
    async fn run_app_with_stops_on_shutdown() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let result = run_app_with(in_memory(addr), async {}).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn run_app_with_reports_bind_failures() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let result = run_app_with(in_memory(addr), async {}).await;
        assert!(matches!(
            result,
            Err(AppError::ApiServer {
                operation: "api_server.serve",
                ..
            })
        ));
    }
}
