use crate::models::{Cell, ColumnInfo, FilterChoice, FilterState, FlagFilter, PresetSummary, ViewRow};
use crate::router::Route;
use crate::utils::{format_number, format_timestamp};
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::Event;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorMessageProps {
    pub error_message: Option<String>,
}

#[function_component(ErrorMessage)]
pub fn error_message(props: &ErrorMessageProps) -> Html {
    if let Some(msg) = &props.error_message {
        html! {
            <div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded mb-4">
                { msg }
            </div>
        }
    } else {
        html! {}
    }
}

// Reads "value" from any event target without HtmlSelectElement.
fn event_value(e: &Event) -> Option<String> {
    let target = e.target()?;
    let js_value = Reflect::get(target.as_ref(), &JsValue::from_str("value")).ok()?;
    js_value.as_string()
}

#[derive(Properties, PartialEq)]
pub struct FilterSelectProps {
    pub state: FilterState,
    pub on_change: Callback<(FlagFilter, FilterChoice)>,
}

#[function_component(FilterSelect)]
pub fn filter_select(props: &FilterSelectProps) -> Html {
    let filter = props.state.filter;
    let on_change_cb = props.on_change.clone();
    let on_change = Callback::from(move |e: Event| {
        if let Some(choice) = event_value(&e).as_deref().and_then(FilterChoice::from_key) {
            on_change_cb.emit((filter, choice));
        }
    });

    html! {
        <label class="flex items-center gap-2 text-sm text-gray-700">
            { &props.state.label }
            <select
                class="p-2 border border-gray-300 rounded"
                value={props.state.choice.key()}
                onchange={on_change}
            >
                {
                    for FilterChoice::all_variants().into_iter().map(|choice| html! {
                        <option value={choice.key()} selected={choice == props.state.choice}>
                            { choice.display_name() }
                        </option>
                    })
                }
            </select>
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub page: usize,
    pub total_pages: usize,
    pub on_previous: Callback<MouseEvent>,
    pub on_next: Callback<MouseEvent>,
    /// Disables both buttons while a page is loading.
    #[prop_or_default]
    pub busy: bool,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let total_pages = props.total_pages.max(1);

    html! {
        <div class="mt-6 flex justify-center items-center gap-2">
            <button
                onclick={props.on_previous.clone()}
                disabled={props.busy || props.page == 0}
                class="px-4 py-2 text-sm bg-blue-600 text-white rounded hover:bg-blue-700 disabled:opacity-50"
            >
                {"Previous"}
            </button>
            <span class="px-4 py-2 text-sm">
                {format!("Page {} of {}", props.page + 1, total_pages)}
            </span>
            <button
                onclick={props.on_next.clone()}
                disabled={props.busy || props.page + 1 >= total_pages}
                class="px-4 py-2 text-sm bg-blue-600 text-white rounded hover:bg-blue-700 disabled:opacity-50"
            >
                {"Next"}
            </button>
        </div>
    }
}

fn render_cell(cell: &Cell) -> Html {
    match cell {
        Cell::Empty => html! {},
        Cell::Text(text) => html! { <div class="max-w-xs truncate">{ text }</div> },
        Cell::Integer(n) => html! { { format_number(*n) } },
        Cell::Flag(flag) => html! { { if *flag { "True" } else { "False" } } },
        Cell::Timestamp(dt) => html! { { format_timestamp(dt) } },
        Cell::Link { text, href: Some(href) } => html! {
            <a href={href.clone()} target="_blank" rel="noopener noreferrer" class="text-blue-600 hover:underline">
                { text }
            </a>
        },
        Cell::Link { text, href: None } => html! { { text } },
    }
}

#[derive(Properties, PartialEq)]
pub struct ChannelTableProps {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<ViewRow>,
}

#[function_component(ChannelTable)]
pub fn channel_table(props: &ChannelTableProps) -> Html {
    if props.rows.is_empty() {
        return html! {
            <p class="text-center text-gray-500 py-8">{"No channels match the current filters."}</p>
        };
    }

    html! {
        <div class="overflow-x-auto">
            <table class="min-w-full bg-white border border-gray-300">
                <thead class="bg-gray-50">
                    <tr>
                        {
                            for props.columns.iter().map(|column| html! {
                                <th key={column.key.clone()} class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">
                                    { &column.header }
                                </th>
                            })
                        }
                    </tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {
                        for props.rows.iter().map(|row| html! {
                            <tr>
                                {
                                    for row.cells.iter().map(|cell| html! {
                                        <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">
                                            { render_cell(cell) }
                                        </td>
                                    })
                                }
                            </tr>
                        })
                    }
                </tbody>
            </table>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PresetNavProps {
    pub presets: Vec<PresetSummary>,
    pub active: String,
}

#[function_component(PresetNav)]
pub fn preset_nav(props: &PresetNavProps) -> Html {
    html! {
        <nav class="flex gap-4 mb-4 text-sm">
            {
                for props.presets.iter().map(|preset| {
                    let classes = if preset.name == props.active {
                        "font-bold text-gray-800"
                    } else {
                        "text-blue-600 hover:underline"
                    };
                    html! {
                        <Link<Route> to={Route::Preset { name: preset.name.clone() }} classes={classes}>
                            { &preset.title }
                        </Link<Route>>
                    }
                })
            }
        </nav>
    }
}
