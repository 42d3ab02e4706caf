use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub auth_jwt_secret: String,
    pub admin_token: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Generative AI provider
    pub gemini_base_url: String,
    pub gemini_script_model: String,
    pub gemini_tts_model: String,
    pub gemini_timeout_secs: u64,
    // Key pool
    pub key_max_usage: i32,
    pub key_reset_enabled: bool,
    // Audio storage
    pub storage_backend: StorageBackend,
    pub audio_dir: String,
    pub public_base_url: String,
    pub s3_bucket: Option<String>,
    pub s3_key_prefix: String,
    pub aws_region: String,
    // Payments
    pub stripe_webhook_secret: String,
    pub plan_pro_price: i64,
    pub plan_pro_casts: i32,
    pub plan_enterprise_price: i64,
    pub plan_enterprise_casts: i32,
    // Voice catalogue cache
    pub voice_cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            _ => StorageBackend::Local,
        };

        let s3_bucket = env::var("S3_BUCKET").ok().filter(|b| !b.is_empty());
        if storage_backend == StorageBackend::S3 && s3_bucket.is_none() {
            return Err("S3_BUCKET must be set when STORAGE_BACKEND=s3".into());
        }

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            auth_jwt_secret: env::var("AUTH_JWT_SECRET")?,
            admin_token: env::var("ADMIN_TOKEN")?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_script_model: env::var("GEMINI_SCRIPT_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            gemini_tts_model: env::var("GEMINI_TTS_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-preview-tts".to_string()),
            gemini_timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()?,
            key_max_usage: env::var("KEY_MAX_USAGE")
                .unwrap_or_else(|_| "16".to_string())
                .parse()?,
            key_reset_enabled: parse_flag("KEY_RESET_ENABLED", true),
            storage_backend,
            audio_dir: env::var("AUDIO_DIR").unwrap_or_else(|_| "./public/audio".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            s3_bucket,
            s3_key_prefix: env::var("S3_KEY_PREFIX").unwrap_or_else(|_| "bootcastes".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")?,
            plan_pro_price: env::var("PLAN_PRO_PRICE")
                .unwrap_or_else(|_| "2900".to_string())
                .parse()?,
            plan_pro_casts: env::var("PLAN_PRO_CASTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            plan_enterprise_price: env::var("PLAN_ENTERPRISE_PRICE")
                .unwrap_or_else(|_| "9900".to_string())
                .parse()?,
            plan_enterprise_casts: env::var("PLAN_ENTERPRISE_CASTS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            voice_cache_ttl_secs: env::var("VOICE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| s.to_lowercase() == "true")
        .unwrap_or(default)
}
