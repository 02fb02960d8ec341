//! Minimart Order Service - order placement and lifecycle.
//!
//! Serves on port 5003 by default, runs its own migrations at startup, and
//! announces itself to the service registry once the listener is bound.

#![cfg_attr(not(test), forbid(unsafe_code))]

use minimart_discovery::{
    AuthClient, CartClient, ProductClient, Registration, RegistryClient, register_on_startup,
};
use minimart_order::config::OrderConfig;
use minimart_order::db;
use minimart_order::routes;
use minimart_order::state::AppState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &OrderConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

#[tokio::main]
async fn main() {
    let config = OrderConfig::from_env().expect("Failed to load configuration");

    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "minimart_order=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let registry =
        RegistryClient::new(&config.registry_url).expect("Invalid registry URL");
    let registration = Registration {
        name: "order".to_owned(),
        url: config.public_url.clone(),
        endpoints: vec![
            "/api/orders".to_owned(),
            "/api/orders/{id}".to_owned(),
            "/api/orders/{id}/status".to_owned(),
            "/api/orders/{id}/payment".to_owned(),
            "/api/orders/{id}/cancel".to_owned(),
        ],
    };

    let state = AppState::new(
        config.clone(),
        pool,
        ProductClient::new(registry.clone()),
        AuthClient::new(registry.clone()),
        CartClient::new(registry.clone()),
    );

    let app = routes::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(sentry_tower::NewSentryLayer::new_from_top());

    let addr = config.socket_addr();
    tracing::info!("order service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    register_on_startup(&registry, &registration).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
