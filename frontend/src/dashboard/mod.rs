pub mod api;
pub mod components;

use crate::dashboard::api::{load_channel_page, load_dashboard};
use crate::dashboard::components::{ChannelTable, ErrorMessage, FilterSelect, Pagination, PresetNav};
use crate::models::{ChannelPage, Dashboard, FetchStatus, FilterChoice, FlagFilter, PageAction};
use crate::utils::format_timestamp;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

/// What the next `/channels` call should ask for. Page index and filters live
/// here, so they belong to this tab and reset on reload.
///
/// `serial` grows with every user change, so two identical clicks still make
/// two distinct requests.
#[derive(Debug, Clone, Default, PartialEq)]
struct PageRequest {
    preset: Option<String>,
    filters: Vec<(FlagFilter, FilterChoice)>,
    page: usize,
    action: Option<PageAction>,
    serial: u64,
}

impl PageRequest {
    /// A different preset starts over at its first page with no filters.
    fn for_preset(&self, preset: Option<&String>) -> Self {
        if self.preset.as_ref() == preset {
            return self.clone();
        }
        Self {
            preset: preset.cloned(),
            serial: self.serial + 1,
            ..Self::default()
        }
    }

    fn with_filter(&self, filter: FlagFilter, choice: FilterChoice) -> Self {
        let mut filters: Vec<_> = self
            .filters
            .iter()
            .copied()
            .filter(|(f, _)| *f != filter)
            .collect();
        filters.push((filter, choice));
        Self {
            preset: self.preset.clone(),
            filters,
            page: 0,
            action: None,
            serial: self.serial + 1,
        }
    }

    fn navigate(&self, page: usize, action: PageAction) -> Self {
        Self {
            preset: self.preset.clone(),
            filters: self.filters.clone(),
            page,
            action: Some(action),
            serial: self.serial + 1,
        }
    }
}

fn schedule_reload(interval_secs: u64) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let reload = Closure::once_into_js(move || {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().reload() {
                web_sys::console::error_1(&e);
            }
        }
    });

    let timeout_ms = interval_secs.saturating_mul(1000).min(i32::MAX as u64) as i32;
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(reload.unchecked_ref(), timeout_ms)
    {
        web_sys::console::error_1(&e);
    }
}

#[derive(Properties, PartialEq)]
pub struct DashboardPageProps {
    #[prop_or_default]
    pub preset: Option<String>,
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &DashboardPageProps) -> Html {
    let dashboard = use_state(|| None::<Dashboard>);
    let channel_page = use_state(|| None::<ChannelPage>);
    let request = use_state(PageRequest::default);
    let loading = use_state(|| false);
    let error_message = use_state(|| None::<String>);
    let latest_request = use_mut_ref(|| 0_u64);

    // Load dashboard settings once and arm the full-page reload
    {
        let dashboard = dashboard.clone();
        let error_message = error_message.clone();

        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match load_dashboard().await {
                    Ok(settings) => {
                        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                            document.set_title(&settings.app_title);
                        }
                        schedule_reload(settings.refresh_interval_secs);
                        dashboard.set(Some(settings));
                    }
                    Err(e) => {
                        error_message.set(Some(format!("Failed to load dashboard: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    let preset_name = props
        .preset
        .clone()
        .or_else(|| dashboard.as_ref().map(|d| d.default_preset.clone()));
    let active_request = request.for_preset(preset_name.as_ref());

    // Route changes reuse this component, so drop the old preset's request
    {
        let request = request.clone();
        use_effect_with(preset_name.clone(), move |preset_name| {
            let reset = request.for_preset(preset_name.as_ref());
            if *request != reset {
                request.set(reset);
            }
            || ()
        });
    }

    // Fetch the requested page whenever the request changes. Only the
    // response to the latest request is applied.
    {
        let channel_page = channel_page.clone();
        let loading = loading.clone();
        let error_message = error_message.clone();
        let latest = latest_request.clone();

        use_effect_with(active_request.clone(), move |request| {
            if let Some(preset_name) = request.preset.clone() {
                let request = request.clone();
                let ticket = {
                    let mut latest = latest.borrow_mut();
                    *latest += 1;
                    *latest
                };
                loading.set(true);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = load_channel_page(
                        &preset_name,
                        &request.filters,
                        request.page,
                        request.action,
                    )
                    .await;
                    if *latest.borrow() != ticket {
                        return;
                    }
                    match result {
                        Ok(page) => {
                            channel_page.set(Some(page));
                            error_message.set(None);
                        }
                        Err(e) => {
                            error_message.set(Some(format!("Failed to load channels: {}", e)));
                        }
                    }
                    loading.set(false);
                });
            }
            || ()
        });
    }

    let on_filter_change = {
        let request = request.clone();
        let active_request = active_request.clone();
        Callback::from(move |(filter, choice): (FlagFilter, FilterChoice)| {
            request.set(active_request.with_filter(filter, choice));
        })
    };

    let current_page = channel_page.as_ref().map(|p| p.page).unwrap_or(0);

    let on_previous = {
        let request = request.clone();
        let active_request = active_request.clone();
        Callback::from(move |_: MouseEvent| {
            request.set(active_request.navigate(current_page, PageAction::Previous));
        })
    };

    let on_next = {
        let request = request.clone();
        let active_request = active_request.clone();
        Callback::from(move |_: MouseEvent| {
            request.set(active_request.navigate(current_page, PageAction::Next));
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
        })
    };

    let title = channel_page
        .as_ref()
        .map(|p| p.title.clone())
        .unwrap_or_else(|| "GPT Classified Channels".to_string());

    let fetch_failure = channel_page.as_ref().and_then(|p| match &p.status {
        FetchStatus::Failed { reason } => Some(format!("Unable to fetch channels: {}", reason)),
        FetchStatus::Ok => None,
    });

    html! {
        <div class="min-h-screen bg-gray-700 p-4">
            <div class="max-w-7xl mx-auto">
                <div class="bg-white rounded-lg shadow-lg p-8">
                    {
                        if let (Some(settings), Some(active)) = (&*dashboard, &preset_name) {
                            html! { <PresetNav presets={settings.presets.clone()} active={active.clone()} /> }
                        } else {
                            html! {}
                        }
                    }

                    <div class="flex justify-between items-center mb-6">
                        <h1 class="text-3xl font-bold text-gray-800">{ title }</h1>
                        {
                            if let Some(fetched_at) = channel_page.as_ref().and_then(|p| p.fetched_at) {
                                html! {
                                    <span class="text-sm text-gray-500">
                                        { format!("Updated {}", format_timestamp(&fetched_at)) }
                                    </span>
                                }
                            } else {
                                html! {}
                            }
                        }
                    </div>

                    <ErrorMessage error_message={(*error_message).clone()} />
                    <ErrorMessage error_message={fetch_failure} />

                    {
                        if let Some(page) = &*channel_page {
                            html! {
                                <>
                                    <div class="flex flex-wrap gap-6 mb-4">
                                        {
                                            for page.filters.iter().map(|state| html! {
                                                <FilterSelect state={state.clone()} on_change={on_filter_change.clone()} />
                                            })
                                        }
                                        <span class="text-sm text-gray-500 self-center">
                                            { format!("{} channels", page.total_rows) }
                                        </span>
                                    </div>
                                    <ChannelTable columns={page.columns.clone()} rows={page.rows.clone()} />
                                    <Pagination
                                        page={page.page}
                                        total_pages={page.total_pages}
                                        on_previous={on_previous.clone()}
                                        on_next={on_next.clone()}
                                        busy={*loading}
                                    />
                                </>
                            }
                        } else if *loading {
                            html! {
                                <div class="text-center py-8">
                                    <p>{"Loading channels..."}</p>
                                </div>
                            }
                        } else {
                            html! {}
                        }
                    }
                </div>
            </div>
        </div>
    }
}
