use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagFilter {
    IsFaceless,
    IsBadChannel,
}

impl FlagFilter {
    pub fn query_key(&self) -> &'static str {
        match self {
            FlagFilter::IsFaceless => "is_faceless",
            FlagFilter::IsBadChannel => "is_bad_channel",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterChoice {
    #[default]
    All,
    True,
    False,
}

impl FilterChoice {
    pub fn all_variants() -> Vec<Self> {
        vec![FilterChoice::All, FilterChoice::True, FilterChoice::False]
    }

    pub fn key(&self) -> &'static str {
        match self {
            FilterChoice::All => "all",
            FilterChoice::True => "true",
            FilterChoice::False => "false",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "all" => Some(FilterChoice::All),
            "true" => Some(FilterChoice::True),
            "false" => Some(FilterChoice::False),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterChoice::All => "All",
            FilterChoice::True => "True",
            FilterChoice::False => "False",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Previous,
    Next,
}

impl PageAction {
    pub fn key(&self) -> &'static str {
        match self {
            PageAction::Previous => "previous",
            PageAction::Next => "next",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text(String),
    Integer(i64),
    Flag(bool),
    Timestamp(DateTime<Utc>),
    Link { text: String, href: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub key: String,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub filter: FlagFilter,
    pub label: String,
    pub choice: FilterChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchStatus {
    Ok,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPage {
    pub preset: String,
    pub title: String,
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<ViewRow>,
    pub filters: Vec<FilterState>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub page_size: usize,
    pub status: FetchStatus,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSummary {
    pub name: String,
    pub title: String,
    pub filters: Vec<FlagFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub app_title: String,
    pub refresh_interval_secs: u64,
    pub default_preset: String,
    pub presets: Vec<PresetSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
