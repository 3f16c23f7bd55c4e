use crate::models::{
    ChannelPageResponse, ChannelTable, ColumnInfo, DashboardResponse, FetchStatus, PageAction,
};
use crate::presets::{DashboardPreset, DEFAULT_PRESET};
use crate::services::channel_service::fetch_channels;
use crate::services::view_pipeline::{paginate, prepare_view, total_pages, PageState, ViewFilters};
use crate::AppState;

pub fn get_dashboard(state: &AppState) -> DashboardResponse {
    DashboardResponse {
        app_title: state.app_title.clone(),
        refresh_interval_secs: state.refresh_interval_secs,
        default_preset: DEFAULT_PRESET.to_string(),
        presets: state.presets.iter().map(DashboardPreset::summary).collect(),
    }
}

/// One fetch-or-memo read followed by one pipeline pass.
pub async fn get_channel_page(
    state: &AppState,
    preset: &DashboardPreset,
    filters: &ViewFilters,
    page: usize,
    action: Option<PageAction>,
) -> ChannelPageResponse {
    let source = state.source.clone();
    let cached = state
        .cache
        .get_or_fetch(preset.fetch, || async move {
            fetch_channels(source.as_ref(), preset.fetch).await
        })
        .await;

    let empty = ChannelTable::default();
    let (table, status) = match &cached.result {
        Ok(table) => (table.as_ref(), FetchStatus::Ok),
        Err(e) => (
            &empty,
            FetchStatus::Failed {
                reason: e.to_string(),
            },
        ),
    };

    let view = prepare_view(table, preset, filters);

    // Clamp first: navigation is relative to a page the client can see.
    let pages = total_pages(view.rows.len(), preset.page_size);
    let mut page_state = PageState::at(page);
    page_state.clamp(pages);
    match action {
        Some(PageAction::Previous) => page_state.previous(),
        Some(PageAction::Next) => page_state.next(pages),
        None => {}
    }

    let page = paginate(&view, page_state.current(), preset.page_size);

    ChannelPageResponse {
        preset: preset.name.to_string(),
        title: preset.title.to_string(),
        columns: view.columns.iter().copied().map(ColumnInfo::from).collect(),
        rows: page.rows,
        filters: view.filters,
        page: page.page,
        total_pages: page.total_pages,
        total_rows: page.total_rows,
        page_size: preset.page_size,
        fetched_at: cached.result.is_ok().then_some(cached.fetched_at),
        status,
    }
}
