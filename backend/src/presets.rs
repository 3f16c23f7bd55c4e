use crate::models::{Column, FlagFilter, PresetSummary};
use crate::services::channel_service::FetchOptions;

pub const DEFAULT_PRESET: &str = "gpt-classified";

/// A named configuration of the view pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPreset {
    pub name: &'static str,
    pub title: &'static str,
    pub columns: Vec<Column>,
    pub filters: Vec<FlagFilter>,
    /// Latest `created_at` first instead of store order.
    pub sort_desc_by_created_at: bool,
    pub fetch: FetchOptions,
    pub page_size: usize,
}

impl DashboardPreset {
    pub fn builtin(page_size: usize) -> Vec<DashboardPreset> {
        vec![
            DashboardPreset {
                name: DEFAULT_PRESET,
                title: "GPT Classified Channels",
                columns: vec![
                    Column::YtChannelId,
                    Column::Title,
                    Column::SubscriberCount,
                    Column::VideoCount,
                    Column::ChannelLink,
                    Column::FinalCategory,
                    Column::Format,
                    Column::IsFaceless,
                    Column::IsBadChannel,
                    Column::CreatedAt,
                ],
                filters: vec![FlagFilter::IsFaceless, FlagFilter::IsBadChannel],
                sort_desc_by_created_at: true,
                fetch: FetchOptions::default(),
                page_size,
            },
            DashboardPreset {
                name: "faceless",
                title: "Faceless Channels",
                columns: vec![
                    Column::YtChannelId,
                    Column::Title,
                    Column::SubscriberCount,
                    Column::VideoCount,
                    Column::ChannelLink,
                    Column::FinalCategory,
                    Column::ChannelLanguage,
                    Column::Format,
                    Column::IsFaceless,
                    Column::CreatedAt,
                ],
                filters: vec![FlagFilter::IsFaceless],
                sort_desc_by_created_at: true,
                fetch: FetchOptions::default(),
                page_size,
            },
            DashboardPreset {
                name: "moderation",
                title: "Channel Moderation",
                columns: vec![
                    Column::YtChannelId,
                    Column::Title,
                    Column::ChannelLink,
                    Column::FinalCategory,
                    Column::IsBadChannel,
                    Column::MarkedAsBadByGpt,
                    Column::CreatedAt,
                ],
                filters: vec![FlagFilter::IsBadChannel],
                sort_desc_by_created_at: false,
                fetch: FetchOptions {
                    sort_ascending: true,
                },
                page_size,
            },
            DashboardPreset {
                name: "raw",
                title: "All Stored Channels",
                columns: Column::stored().to_vec(),
                filters: vec![],
                sort_desc_by_created_at: false,
                fetch: FetchOptions::default(),
                page_size,
            },
        ]
    }

    pub fn summary(&self) -> PresetSummary {
        PresetSummary {
            name: self.name.to_string(),
            title: self.title.to_string(),
            filters: self.filters.clone(),
        }
    }
}

pub fn find_preset<'a>(presets: &'a [DashboardPreset], name: &str) -> Option<&'a DashboardPreset> {
    presets.iter().find(|preset| preset.name == name)
}
