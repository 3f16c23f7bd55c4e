pub mod cache;
pub mod channel_service;
pub mod channel_source;
pub mod dashboard_service;
pub mod view_pipeline;
