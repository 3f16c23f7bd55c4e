use log::{info, warn};
use rocket::serde::json::Json;
use rocket::{get, State};

use crate::models::{ChannelPageResponse, ErrorResponse, FetchStatus, FilterChoice, FlagFilter, PageAction};
use crate::presets::{find_preset, DEFAULT_PRESET};
use crate::services::dashboard_service;
use crate::services::view_pipeline::ViewFilters;
use crate::AppState;

#[get("/?<preset>&<is_faceless>&<is_bad_channel>&<page>&<action>")]
pub async fn get_channels(
    state: &State<AppState>,
    preset: Option<&str>,
    is_faceless: Option<FilterChoice>,
    is_bad_channel: Option<FilterChoice>,
    page: Option<usize>,
    action: Option<PageAction>,
) -> Result<Json<ChannelPageResponse>, ErrorResponse> {
    let preset_name = preset.unwrap_or(DEFAULT_PRESET);
    let preset = find_preset(&state.presets, preset_name).ok_or_else(|| {
        warn!("Requested unknown preset: {preset_name}");
        ErrorResponse::not_found(format!("Unknown dashboard preset '{preset_name}'"))
    })?;

    let filters = ViewFilters::new()
        .with(FlagFilter::IsFaceless, is_faceless.unwrap_or_default())
        .with(FlagFilter::IsBadChannel, is_bad_channel.unwrap_or_default());

    let response =
        dashboard_service::get_channel_page(state, preset, &filters, page.unwrap_or(0), action)
            .await;

    match &response.status {
        FetchStatus::Ok => info!(
            "Serving page {}/{} of '{}' ({} rows)",
            response.page + 1,
            response.total_pages,
            response.preset,
            response.total_rows
        ),
        FetchStatus::Failed { reason } => warn!("Serving empty '{}' page: {reason}", response.preset),
    }

    Ok(Json(response))
}
