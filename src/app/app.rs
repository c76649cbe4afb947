use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::app_conf::AppConfig;
use crate::config::database_conf::DatabaseConfig;
use crate::repository::user_repo::SqliteUserRepository;
use crate::router::user_router::user_router;
use crate::service::user_service::UserServiceImpl;

pub struct App {
    config: AppConfig,
    router: Router,
    user_repo: Arc<SqliteUserRepository>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let database_config = DatabaseConfig::from_env().expect("Database config error");

        let user_repo = Arc::new(
            SqliteUserRepository::new(&database_config)
                .await
                .expect("Failed to connect to SQLite database"),
        );
        info!("✅ Connected to SQLite database at {}", database_config.path.display());

        // Startup stays permissive on schema failure: the error is logged and
        // requests are still served.
        if let Err(e) = user_repo.init_schema().await {
            error!("❌ Failed to initialize database schema: {e}");
        }

        let user_service = Arc::new(UserServiceImpl::new(user_repo.clone()));
        let router = Self::create_router(user_service);

        App { config, router, user_repo }
    }

    fn create_router(user_service: Arc<UserServiceImpl>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(user_router(user_service))
            .route("/health", get(|| async { "OK" }))
            .layer(cors)
    }

    pub async fn start(self) {
        let App { config, router, user_repo } = self;
        let addr: SocketAddr = config.bind_addr().parse().expect("Invalid bind address");
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .expect("Failed to start server");

        // In-flight statements finish before the handle is released.
        user_repo.close().await;
        info!("🔒 Database connection closed");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received, draining in-flight requests");
}
