use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::controllers::{
    compile::CompileController, download::DownloadController,
    entitlement::EntitlementController, health, keys::KeysController,
    payments::PaymentsController, podcasts::PodcastsController, voices::VoicesController,
};
use crate::domain::auth::JwtManager;
use crate::infrastructure::auth::{
    admin_middleware, auth_middleware, request_id_middleware, AdminToken,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::ReadinessCheck;

/// Everything the router needs, wired once at startup
pub struct HttpDependencies {
    pub readiness: Arc<dyn ReadinessCheck>,
    pub jwt_manager: Arc<JwtManager>,
    pub admin_token: Arc<AdminToken>,
    pub keys_controller: Arc<KeysController>,
    pub compile_controller: Arc<CompileController>,
    pub podcasts_controller: Arc<PodcastsController>,
    pub entitlement_controller: Arc<EntitlementController>,
    pub payments_controller: Arc<PaymentsController>,
    pub download_controller: Arc<DownloadController>,
    pub voices_controller: Arc<VoicesController>,
    /// Directory served under `/audio` when audio is stored locally
    pub local_audio_dir: Option<PathBuf>,
}

/// Build the application router with all routes configured
pub fn build_router(deps: HttpDependencies) -> Router {
    // Key pool administration (admin token)
    let key_routes = Router::new()
        .route(
            "/keys",
            post(KeysController::register)
                .get(KeysController::available)
                .patch(KeysController::record_usage),
        )
        .route("/keys/all", get(KeysController::list))
        .route("/keys/reset", post(KeysController::reset))
        .with_state(deps.keys_controller.clone())
        .layer(middleware::from_fn_with_state(
            deps.admin_token.clone(),
            admin_middleware,
        ));

    // Compilation (bearer identity)
    let compile_routes = Router::new()
        .route("/compile", post(CompileController::compile))
        .with_state(deps.compile_controller.clone())
        .layer(middleware::from_fn_with_state(
            deps.jwt_manager.clone(),
            auth_middleware,
        ));

    // Owner actions on BootCasts (bearer identity)
    let podcast_owner_routes = Router::new()
        .route(
            "/podcasts/:id/publish",
            patch(PodcastsController::set_published),
        )
        .route(
            "/podcasts/:id",
            axum::routing::delete(PodcastsController::delete),
        )
        .with_state(deps.podcasts_controller.clone())
        .layer(middleware::from_fn_with_state(
            deps.jwt_manager.clone(),
            auth_middleware,
        ));

    // Public listings
    let podcast_public_routes = Router::new()
        .route("/podcasts", get(PodcastsController::list_for_owner))
        .route("/explore", get(PodcastsController::explore))
        .with_state(deps.podcasts_controller.clone());

    let entitlement_routes = Router::new()
        .route(
            "/newUser",
            get(EntitlementController::find).post(EntitlementController::register),
        )
        .with_state(deps.entitlement_controller.clone());

    // Authenticated by the webhook signature, not by a bearer token
    let payment_routes = Router::new()
        .route("/payments", post(PaymentsController::webhook))
        .with_state(deps.payments_controller.clone());

    let download_routes = Router::new()
        .route("/download", post(DownloadController::download))
        .with_state(deps.download_controller.clone());

    let voice_public_routes = Router::new()
        .route("/voices", get(VoicesController::list))
        .with_state(deps.voices_controller.clone());

    let voice_admin_routes = Router::new()
        .route("/voices", post(VoicesController::add))
        .with_state(deps.voices_controller.clone())
        .layer(middleware::from_fn_with_state(
            deps.admin_token.clone(),
            admin_middleware,
        ));

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(deps.readiness.clone())
        .merge(key_routes)
        .merge(compile_routes)
        .merge(podcast_owner_routes)
        .merge(podcast_public_routes)
        .merge(entitlement_routes)
        .merge(payment_routes)
        .merge(download_routes)
        .merge(voice_public_routes)
        .merge(voice_admin_routes);

    if let Some(dir) = deps.local_audio_dir {
        app = app.nest_service("/audio", ServeDir::new(dir));
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Serve until SIGINT/SIGTERM, then cancel `shutdown` so background tasks stop too
pub async fn start_http_server(
    config: &Config,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = shutdown.cancelled() => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
