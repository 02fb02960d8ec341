//! Minimart Cart Service - one cart per user.
//!
//! Serves on port 5002 by default, runs its own migrations at startup, and
//! announces itself to the service registry once the listener is bound.

#![cfg_attr(not(test), forbid(unsafe_code))]

use minimart_cart::config::CartConfig;
use minimart_cart::db;
use minimart_cart::routes;
use minimart_cart::state::AppState;
use minimart_discovery::{
    AuthClient, ProductClient, Registration, RegistryClient, register_on_startup,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
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
    let config = CartConfig::from_env().expect("Failed to load configuration");

    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "minimart_cart=info,tower_http=debug".into());

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
        name: "cart".to_owned(),
        url: config.public_url.clone(),
        endpoints: vec![
            "/api/cart/get".to_owned(),
            "/api/cart/items".to_owned(),
            "/api/cart/items/{item_id}".to_owned(),
            "/api/cart/items/{item_id}/remove".to_owned(),
            "/api/cart/clear".to_owned(),
        ],
    };

    let state = AppState::new(
        config.clone(),
        pool,
        ProductClient::new(registry.clone()),
        AuthClient::new(registry.clone()),
    );

    let app = routes::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(sentry_tower::NewSentryLayer::new_from_top());

    let addr = config.socket_addr();
    tracing::info!("cart service listening on {}", addr);

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
