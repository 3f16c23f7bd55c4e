use chrono::{DateTime, Utc};
use rocket::form::FromFormField;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::{response, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Cursor;

/// One classified channel as stored in the `gpt_classified_channels` collection.
///
/// Every attribute is optional: documents are written by an upstream classifier
/// and older documents miss fields that newer ones carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub yt_channel_id: Option<String>,
    pub title: Option<String>,
    pub subscriber_count: Option<i64>,
    pub video_count: Option<i64>,
    pub channel_url: Option<String>,
    pub final_category: Option<String>,
    pub channel_language: Option<String>,
    pub format: Option<String>,
    pub is_faceless: Option<bool>,
    pub is_bad_channel: Option<bool>,
    pub marked_as_bad_by_gpt: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ChannelRecord {
    pub fn flag(&self, filter: FlagFilter) -> Option<bool> {
        match filter {
            FlagFilter::IsFaceless => self.is_faceless,
            FlagFilter::IsBadChannel => self.is_bad_channel,
        }
    }

    pub fn has(&self, column: Column) -> bool {
        match column {
            Column::YtChannelId => self.yt_channel_id.is_some(),
            Column::Title => self.title.is_some(),
            Column::SubscriberCount => self.subscriber_count.is_some(),
            Column::VideoCount => self.video_count.is_some(),
            Column::ChannelUrl | Column::ChannelLink => self.channel_url.is_some(),
            Column::FinalCategory => self.final_category.is_some(),
            Column::ChannelLanguage => self.channel_language.is_some(),
            Column::Format => self.format.is_some(),
            Column::IsFaceless => self.is_faceless.is_some(),
            Column::IsBadChannel => self.is_bad_channel.is_some(),
            Column::MarkedAsBadByGpt => self.marked_as_bad_by_gpt.is_some(),
            Column::CreatedAt => self.created_at.is_some(),
        }
    }
}

/// Deduplicated channels in store order, plus the columns that at least one
/// stored document carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelTable {
    pub records: Vec<ChannelRecord>,
    pub columns: BTreeSet<Column>,
}

impl ChannelTable {
    pub fn new(records: Vec<ChannelRecord>) -> Self {
        let columns = Column::stored()
            .iter()
            .copied()
            .filter(|column| records.iter().any(|record| record.has(*column)))
            .collect();
        Self { records, columns }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        match column {
            Column::ChannelLink => self.columns.contains(&Column::ChannelUrl),
            other => self.columns.contains(&other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    YtChannelId,
    Title,
    SubscriberCount,
    VideoCount,
    ChannelUrl,
    FinalCategory,
    ChannelLanguage,
    Format,
    IsFaceless,
    IsBadChannel,
    MarkedAsBadByGpt,
    CreatedAt,
    /// Derived from `channel_url`, never stored.
    ChannelLink,
}

impl Column {
    /// Columns that come straight from the stored documents, in field order.
    pub fn stored() -> &'static [Column] {
        &[
            Column::YtChannelId,
            Column::Title,
            Column::SubscriberCount,
            Column::VideoCount,
            Column::ChannelUrl,
            Column::FinalCategory,
            Column::ChannelLanguage,
            Column::Format,
            Column::IsFaceless,
            Column::IsBadChannel,
            Column::MarkedAsBadByGpt,
            Column::CreatedAt,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Column::YtChannelId => "yt_channel_id",
            Column::Title => "title",
            Column::SubscriberCount => "subscriber_count",
            Column::VideoCount => "video_count",
            Column::ChannelUrl => "channel_url",
            Column::FinalCategory => "final_category",
            Column::ChannelLanguage => "channel_language",
            Column::Format => "format",
            Column::IsFaceless => "is_faceless",
            Column::IsBadChannel => "is_bad_channel",
            Column::MarkedAsBadByGpt => "marked_as_bad_by_gpt",
            Column::CreatedAt => "created_at",
            Column::ChannelLink => "channel_link",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Column::YtChannelId => "Channel ID",
            Column::Title => "Title",
            Column::SubscriberCount => "Subscribers",
            Column::VideoCount => "Videos",
            Column::ChannelUrl => "Channel URL",
            Column::FinalCategory => "Category",
            Column::ChannelLanguage => "Language",
            Column::Format => "Format",
            Column::IsFaceless => "Faceless",
            Column::IsBadChannel => "Bad Channel",
            Column::MarkedAsBadByGpt => "Marked Bad by GPT",
            Column::CreatedAt => "Created At",
            Column::ChannelLink => "Channel",
        }
    }
}

/// Boolean moderation flags that can be narrowed from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagFilter {
    IsFaceless,
    IsBadChannel,
}

impl FlagFilter {
    pub fn column(&self) -> Column {
        match self {
            FlagFilter::IsFaceless => Column::IsFaceless,
            FlagFilter::IsBadChannel => Column::IsBadChannel,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlagFilter::IsFaceless => "Faceless",
            FlagFilter::IsBadChannel => "Bad Channel",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, FromFormField)]
#[serde(rename_all = "snake_case")]
pub enum FilterChoice {
    #[default]
    #[field(value = "all")]
    All,
    #[field(value = "true")]
    True,
    #[field(value = "false")]
    False,
}

impl FilterChoice {
    pub fn matches(&self, value: Option<bool>) -> bool {
        match self {
            FilterChoice::All => true,
            FilterChoice::True => value == Some(true),
            FilterChoice::False => value == Some(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromFormField)]
#[serde(rename_all = "snake_case")]
pub enum PageAction {
    #[field(value = "previous")]
    Previous,
    #[field(value = "next")]
    Next,
}

/// A rendered table cell.
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

impl From<Column> for ColumnInfo {
    fn from(column: Column) -> Self {
        Self {
            key: column.key().to_string(),
            header: column.header().to_string(),
        }
    }
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

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelPageResponse {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetSummary {
    pub name: String,
    pub title: String,
    pub filters: Vec<FlagFilter>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub app_title: String,
    pub refresh_interval_secs: u64,
    pub default_preset: String,
    pub presets: Vec<PresetSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: "not_found".to_string(),
            message: message.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        let status = if self.error == "not_found" {
            Status::NotFound
        } else {
            Status::BadRequest
        };
        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
