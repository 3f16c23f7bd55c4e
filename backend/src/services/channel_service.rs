use crate::models::{ChannelRecord, ChannelTable};
use crate::services::channel_source::ChannelSource;
use crate::utils::{compare_optional, get_datetime, get_flag, get_integer, get_string};
use bson::Document;
use log::{error, info};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("MONGODB_URI is not configured")]
    MissingConnectionString,

    #[error("Unable to connect to the channel store: {0}")]
    Connection(String),

    #[error("Unable to read channels: {0}")]
    Query(String),

    #[error("Stored documents have no '{0}' field")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FetchOptions {
    /// Sort by (created_at, is_bad_channel, marked_as_bad_by_gpt, title) after deduplication.
    pub sort_ascending: bool,
}

pub async fn fetch_channels(
    source: &dyn ChannelSource,
    options: FetchOptions,
) -> Result<ChannelTable, FetchError> {
    info!("Fetching channels...");

    let result = source
        .load_documents()
        .await
        .and_then(|documents| build_channel_table(documents, options));

    match &result {
        Ok(table) => info!("Fetched {} unique channels.", table.len()),
        Err(e) => error!("Unable to fetch classified channels: {e}"),
    }
    result
}

pub fn build_channel_table(
    documents: Vec<Document>,
    options: FetchOptions,
) -> Result<ChannelTable, FetchError> {
    let records: Vec<ChannelRecord> = documents.iter().map(decode_channel).collect();

    if !records.is_empty() && records.iter().all(|r| r.yt_channel_id.is_none()) {
        return Err(FetchError::MissingColumn("yt_channel_id"));
    }

    let mut records = dedup_by_channel_id(records);
    if options.sort_ascending {
        sort_ascending(&mut records);
    }

    Ok(ChannelTable::new(records))
}

pub fn decode_channel(doc: &Document) -> ChannelRecord {
    ChannelRecord {
        yt_channel_id: get_string(doc, "yt_channel_id"),
        title: get_string(doc, "title"),
        subscriber_count: get_integer(doc, "subscriber_count"),
        video_count: get_integer(doc, "video_count"),
        channel_url: get_string(doc, "channel_url"),
        final_category: get_string(doc, "final_category"),
        channel_language: get_string(doc, "channel_language"),
        format: get_string(doc, "format"),
        is_faceless: get_flag(doc, "is_faceless"),
        is_bad_channel: get_flag(doc, "is_bad_channel"),
        marked_as_bad_by_gpt: get_flag(doc, "marked_as_bad_by_gpt"),
        created_at: get_datetime(doc, "created_at"),
    }
}

/// Keeps the first record of every `yt_channel_id`, in store order.
/// Records without an id share a single key.
pub fn dedup_by_channel_id(records: Vec<ChannelRecord>) -> Vec<ChannelRecord> {
    let mut seen: HashSet<Option<String>> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.yt_channel_id.clone()))
        .collect()
}

pub fn sort_ascending(records: &mut [ChannelRecord]) {
    records.sort_by(|a, b| {
        compare_optional(&a.created_at, &b.created_at)
            .then_with(|| compare_optional(&a.is_bad_channel, &b.is_bad_channel))
            .then_with(|| compare_optional(&a.marked_as_bad_by_gpt, &b.marked_as_bad_by_gpt))
            .then_with(|| compare_optional(&a.title, &b.title))
    });
}
