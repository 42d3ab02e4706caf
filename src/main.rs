use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bootcaster::controllers::{
    compile::CompileController, download::DownloadController,
    entitlement::EntitlementController, keys::KeysController, payments::PaymentsController,
    podcasts::PodcastsController, voices::VoicesController,
};
use bootcaster::domain::{
    auth::JwtManager,
    bootcast::BootCastService,
    compile::CompilationPipeline,
    entitlement::{EntitlementTracker, PlanCatalog},
    payment::PaymentService,
    quota::QuotaLedger,
    voice::VoiceCatalog,
};
use bootcaster::infrastructure::auth::AdminToken;
use bootcaster::infrastructure::config::{Config, LogFormat, StorageBackend};
use bootcaster::infrastructure::db::{check_connection, create_pool, run_migrations};
use bootcaster::infrastructure::http::{build_router, start_http_server, HttpDependencies};
use bootcaster::infrastructure::repositories::{
    GeminiSpeechRepository, PostgresApiKeyRepository, PostgresBootCastRepository,
    PostgresEntitlementRepository, PostgresVoiceRepository,
};
use bootcaster::infrastructure::scheduler::KeyResetScheduler;
use bootcaster::infrastructure::storage::{AudioStorage, LocalAudioStorage, S3AudioStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting BootCaster backend on {}:{}",
        config.host,
        config.port
    );
    if config.is_development() {
        tracing::warn!("Running in development mode");
    }

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let pool = Arc::new(pool);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories and provider clients
    let key_repo = Arc::new(PostgresApiKeyRepository::new(pool.clone()));
    let entitlement_repo = Arc::new(PostgresEntitlementRepository::new(pool.clone()));
    let bootcast_repo = Arc::new(PostgresBootCastRepository::new(pool.clone()));
    let voice_repo = Arc::new(PostgresVoiceRepository::new(pool.clone()));
    let speech_repo = Arc::new(GeminiSpeechRepository::new(
        config.gemini_base_url.clone(),
        config.gemini_script_model.clone(),
        config.gemini_tts_model.clone(),
        config.gemini_timeout_secs,
    )?);

    let (storage, local_audio_dir) = init_storage(&config).await?;

    // 2. Services
    let quota_ledger = Arc::new(QuotaLedger::new(key_repo, config.key_max_usage));
    let entitlement_tracker = Arc::new(EntitlementTracker::new(entitlement_repo));
    let bootcast_service = Arc::new(BootCastService::new(bootcast_repo));
    let voice_catalog = Arc::new(VoiceCatalog::new(voice_repo, config.voice_cache_ttl_secs));
    let pipeline = Arc::new(CompilationPipeline::new(
        quota_ledger.clone(),
        entitlement_tracker.clone(),
        bootcast_service.clone(),
        speech_repo,
        storage.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(
        entitlement_tracker.clone(),
        PlanCatalog::from_config(&config),
        config.stripe_webhook_secret.clone(),
    ));

    // 3. Controllers
    let deps = HttpDependencies {
        readiness: pool.clone(),
        jwt_manager: Arc::new(JwtManager::new(&config.auth_jwt_secret)),
        admin_token: Arc::new(AdminToken::new(config.admin_token.clone())),
        keys_controller: Arc::new(KeysController::new(quota_ledger.clone())),
        compile_controller: Arc::new(CompileController::new(pipeline)),
        podcasts_controller: Arc::new(PodcastsController::new(bootcast_service)),
        entitlement_controller: Arc::new(EntitlementController::new(entitlement_tracker)),
        payments_controller: Arc::new(PaymentsController::new(payment_service)),
        download_controller: Arc::new(DownloadController::new(storage)),
        voices_controller: Arc::new(VoicesController::new(voice_catalog)),
        local_audio_dir,
    };

    // 4. Background jobs
    let shutdown = CancellationToken::new();
    let scheduler_handle = if config.key_reset_enabled {
        let scheduler = KeyResetScheduler::new(quota_ledger, shutdown.child_token());
        Some(tokio::spawn(scheduler.run()))
    } else {
        tracing::info!("Daily key reset disabled");
        None
    };

    let result = start_http_server(&config, build_router(deps), shutdown.clone()).await;

    shutdown.cancel();
    if let Some(handle) = scheduler_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Key reset scheduler task failed");
        }
    }

    pool.close().await;
    tracing::info!("Database pool closed");

    result
}

async fn init_storage(
    config: &Config,
) -> Result<(Arc<dyn AudioStorage>, Option<PathBuf>), Box<dyn std::error::Error>> {
    match config.storage_backend {
        StorageBackend::Local => {
            let dir = PathBuf::from(&config.audio_dir);
            tokio::fs::create_dir_all(&dir).await?;
            tracing::info!(audio_dir = %dir.display(), "Using local audio storage");

            let storage = LocalAudioStorage::new(dir.clone(), &config.public_base_url);
            Ok((Arc::new(storage), Some(dir)))
        }
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or("S3_BUCKET must be set when STORAGE_BACKEND=s3")?;

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            tracing::info!(
                region = ?aws_config.region(),
                bucket = %bucket,
                "Using S3 audio storage"
            );

            let storage = S3AudioStorage::new(
                Arc::new(aws_sdk_s3::Client::new(&aws_config)),
                bucket,
                config.aws_region.clone(),
                config.s3_key_prefix.clone(),
            );
            Ok((Arc::new(storage), None))
        }
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bootcaster=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
