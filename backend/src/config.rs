use crate::presets::DashboardPreset;
use crate::services::cache::ChannelCache;
use crate::services::channel_source::{ChannelSource, MongoChannelSource};
use crate::AppState;
use anyhow::Result;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, warn, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    pub static ref MONGODB_URI: Option<String> = env::var("MONGODB_URI").ok();
    pub static ref MONGODB_DATABASE: String =
        env::var("MONGODB_DATABASE").unwrap_or_else(|_| "secondary-nexlev-extension".to_string());
    pub static ref MONGODB_COLLECTION: String =
        env::var("MONGODB_COLLECTION").unwrap_or_else(|_| "gpt_classified_channels".to_string());
    pub static ref MONGODB_TIMEOUT_MS: u64 = env::var("MONGODB_TIMEOUT_MS")
        .unwrap_or_else(|_| "1000000".to_string())
        .parse::<u64>()
        .unwrap_or(1_000_000);
    pub static ref CACHE_TTL_SECS: u64 = env::var("CACHE_TTL_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse::<u64>()
        .unwrap_or(60);
    pub static ref REFRESH_INTERVAL_SECS: u64 = env::var("REFRESH_INTERVAL_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse::<u64>()
        .unwrap_or(60);
    pub static ref PAGE_SIZE: usize = env::var("PAGE_SIZE")
        .unwrap_or_else(|_| "20".to_string())
        .parse::<usize>()
        .ok()
        .filter(|size| *size > 0)
        .unwrap_or(20);
    pub static ref FRONTEND_ORIGIN: String =
        env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());
    pub static ref APP_TITLE: String = env::var("APP_TITLE")
        .unwrap_or_else(|_| "Tracking gpt classified channels in real-time".to_string());
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting channel tracker backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

/// Settings the store adapter needs, read once from the environment.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub uri: Option<String>,
    pub database: String,
    pub collection: String,
    pub timeout: Duration,
}

impl StoreSettings {
    pub fn from_env() -> Self {
        Self {
            uri: MONGODB_URI.clone(),
            database: MONGODB_DATABASE.clone(),
            collection: MONGODB_COLLECTION.clone(),
            timeout: Duration::from_millis(*MONGODB_TIMEOUT_MS),
        }
    }
}

pub fn create_channel_source() -> Arc<dyn ChannelSource> {
    let settings = StoreSettings::from_env();
    if settings.uri.is_none() {
        warn!("MONGODB_URI is not set, every fetch will report a failure.");
    }
    info!(
        "Reading channels from {}.{}",
        settings.database, settings.collection
    );
    Arc::new(MongoChannelSource::new(settings))
}

pub fn create_app_state(source: Arc<dyn ChannelSource>) -> AppState {
    AppState {
        source,
        cache: ChannelCache::new(Duration::from_secs(*CACHE_TTL_SECS)),
        presets: DashboardPreset::builtin(*PAGE_SIZE),
        app_title: APP_TITLE.clone(),
        refresh_interval_secs: *REFRESH_INTERVAL_SECS,
    }
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[FRONTEND_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .allow_credentials(false)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
