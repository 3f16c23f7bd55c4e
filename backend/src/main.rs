mod api;
mod config;
mod models;
mod presets;
mod services;
mod utils;

use crate::presets::DashboardPreset;
use crate::services::cache::ChannelCache;
use crate::services::channel_source::ChannelSource;
use log::info;
use rocket::{routes, Build, Rocket};
use std::sync::Arc;

pub struct AppState {
    pub source: Arc<dyn ChannelSource>,
    pub cache: ChannelCache,
    pub presets: Vec<DashboardPreset>,
    pub app_title: String,
    pub refresh_interval_secs: u64,
}

pub fn build_rocket(state: AppState) -> anyhow::Result<Rocket<Build>> {
    let cors = config::create_cors()?;

    Ok(rocket::build()
        .manage(state)
        .mount("/dashboard", routes![api::get_dashboard])
        .mount("/channels", routes![api::get_channels])
        .mount("/health", routes![api::health])
        .attach(cors))
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    config::load_environment();
    config::init_logger();

    let state = config::create_app_state(config::create_channel_source());
    info!(
        "Caching channel fetches for {}s, clients reload every {}s.",
        state.cache.ttl().as_secs(),
        state.refresh_interval_secs
    );

    build_rocket(state)?.launch().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, ChannelPageResponse, DashboardResponse, FetchStatus};
    use crate::services::channel_service::FetchError;
    use crate::services::channel_source::testing::StaticChannelSource;
    use bson::{doc, Document};
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;
    use std::time::Duration;

    fn state_with(source: Arc<StaticChannelSource>) -> AppState {
        AppState {
            source,
            cache: ChannelCache::new(Duration::from_secs(60)),
            presets: DashboardPreset::builtin(20),
            app_title: "Tracking gpt classified channels in real-time".to_string(),
            refresh_interval_secs: 60,
        }
    }

    fn channel_docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| {
                doc! {
                    "yt_channel_id": format!("UC{i:03}"),
                    "title": format!("Channel {i}"),
                    "subscriber_count": (1000_i64 + i as i64),
                    "video_count": (i as i32),
                    "channel_url": format!("https://www.youtube.com/channel/UC{i:03}"),
                    "final_category": "Education",
                    "format": "long",
                    "is_faceless": (i % 3 == 0),
                    "is_bad_channel": false,
                }
            })
            .collect()
    }

    async fn client_with(source: Arc<StaticChannelSource>) -> Client {
        let rocket = build_rocket(state_with(source)).expect("rocket builds");
        Client::tracked(rocket).await.expect("valid rocket instance")
    }

    async fn get_page(client: &Client, uri: &str) -> ChannelPageResponse {
        let response = client.get(uri).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        response.into_json().await.expect("channel page json")
    }

    #[tokio::test]
    async fn channels_are_paginated_and_navigated() {
        let source = Arc::new(StaticChannelSource::new(channel_docs(45)));
        let client = client_with(source).await;

        let first = get_page(&client, "/channels").await;
        assert_eq!(first.status, FetchStatus::Ok);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.rows.len(), 20);

        let next = get_page(&client, "/channels?page=1&action=next").await;
        assert_eq!(next.page, 2);
        assert_eq!(next.rows.len(), 5);

        let stuck = get_page(&client, "/channels?page=2&action=next").await;
        assert_eq!(stuck.page, 2);

        let back = get_page(&client, "/channels?page=0&action=previous").await;
        assert_eq!(back.page, 0);
    }

    #[tokio::test]
    async fn out_of_range_page_is_clamped_before_navigation() {
        let source = Arc::new(StaticChannelSource::new(channel_docs(45)));
        let client = client_with(source).await;

        let back = get_page(&client, "/channels?page=5&action=previous").await;
        assert_eq!(back.total_pages, 3);
        assert_eq!(back.page, 1);

        let uri = format!("/channels?page={}&action=next", usize::MAX);
        let forward = get_page(&client, &uri).await;
        assert_eq!(forward.page, 2);
        assert_eq!(forward.rows.len(), 5);
    }

    #[tokio::test]
    async fn filtering_clamps_the_requested_page() {
        let source = Arc::new(StaticChannelSource::new(channel_docs(45)));
        let client = client_with(source).await;

        let page = get_page(&client, "/channels?is_faceless=true&page=2").await;

        assert_eq!(page.total_rows, 15);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 0);
        let faceless_at = page
            .columns
            .iter()
            .position(|c| c.key == "is_faceless")
            .unwrap();
        assert!(page.rows.iter().all(|r| r.cells[faceless_at] == Cell::Flag(true)));
    }

    #[tokio::test]
    async fn fetch_failures_are_distinguishable_from_empty_tables() {
        let failing = Arc::new(StaticChannelSource::failing(FetchError::Connection(
            "server selection timeout".to_string(),
        )));
        let client = client_with(failing).await;
        let failed = get_page(&client, "/channels").await;

        assert!(matches!(failed.status, FetchStatus::Failed { .. }));
        assert!(failed.rows.is_empty());
        assert_eq!(failed.total_pages, 1);

        let empty = Arc::new(StaticChannelSource::new(vec![]));
        let client = client_with(empty).await;
        let no_rows = get_page(&client, "/channels").await;

        assert_eq!(no_rows.status, FetchStatus::Ok);
        assert!(no_rows.rows.is_empty());
        assert_eq!(no_rows.total_pages, 1);
    }

    #[tokio::test]
    async fn store_is_read_once_per_ttl_window() {
        let source = Arc::new(StaticChannelSource::new(channel_docs(5)));
        let client = client_with(source.clone()).await;

        get_page(&client, "/channels").await;
        source.set_documents(channel_docs(50));
        let page = get_page(&client, "/channels?is_bad_channel=false").await;

        assert_eq!(page.total_rows, 5);
        assert_eq!(source.loads(), 1);
    }

    #[tokio::test]
    async fn unknown_preset_is_not_found() {
        let source = Arc::new(StaticChannelSource::new(channel_docs(1)));
        let client = client_with(source).await;

        let response = client.get("/channels?preset=missing").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[tokio::test]
    async fn dashboard_lists_presets_and_refresh_interval() {
        let source = Arc::new(StaticChannelSource::new(vec![]));
        let client = client_with(source).await;

        let response = client.get("/dashboard").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let dashboard: DashboardResponse = response.into_json().await.unwrap();

        assert_eq!(dashboard.refresh_interval_secs, 60);
        assert_eq!(dashboard.default_preset, "gpt-classified");
        assert!(dashboard.presets.iter().any(|p| p.name == "raw"));
    }
}
