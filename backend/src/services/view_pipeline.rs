use crate::models::{Cell, ChannelRecord, ChannelTable, Column, FilterChoice, FilterState, FlagFilter, ViewRow};
use crate::presets::DashboardPreset;
use crate::utils::compare_recency;
use url::Url;

/// Filter choices requested by one client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewFilters {
    choices: Vec<(FlagFilter, FilterChoice)>,
}

impl ViewFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: FlagFilter, choice: FilterChoice) -> Self {
        self.choices.retain(|(f, _)| *f != filter);
        self.choices.push((filter, choice));
        self
    }

    pub fn choice(&self, filter: FlagFilter) -> FilterChoice {
        self.choices
            .iter()
            .find(|(f, _)| *f == filter)
            .map(|(_, choice)| *choice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewTable {
    pub columns: Vec<Column>,
    pub rows: Vec<ViewRow>,
    /// Filters the preset declares and the data can serve, with the active choice.
    pub filters: Vec<FilterState>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub rows: Vec<ViewRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// Current page index of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    current: usize,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(current: usize) -> Self {
        Self { current }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn previous(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    pub fn next(&mut self, total_pages: usize) {
        if self.current + 1 < total_pages {
            self.current += 1;
        }
    }

    /// Pulls the index back onto the last page when the result set shrank.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current = self.current.min(total_pages.saturating_sub(1));
    }
}

pub fn total_pages(total_rows: usize, page_size: usize) -> usize {
    total_rows.div_ceil(page_size.max(1)).max(1)
}

pub fn prepare_view(table: &ChannelTable, preset: &DashboardPreset, filters: &ViewFilters) -> ViewTable {
    let columns: Vec<Column> = preset
        .columns
        .iter()
        .copied()
        .filter(|column| table.has_column(*column))
        .collect();

    let active_filters: Vec<FilterState> = preset
        .filters
        .iter()
        .filter(|filter| table.has_column(filter.column()))
        .map(|filter| FilterState {
            filter: *filter,
            label: filter.label().to_string(),
            choice: filters.choice(*filter),
        })
        .collect();

    let mut records: Vec<&ChannelRecord> = table.records.iter().collect();

    if preset.sort_desc_by_created_at && table.has_column(Column::CreatedAt) {
        records.sort_by(|a, b| compare_recency(&a.created_at, &b.created_at));
    }

    for state in &active_filters {
        records = apply_filter(records, state.filter, state.choice);
    }

    let rows = records
        .into_iter()
        .map(|record| ViewRow {
            cells: columns.iter().map(|column| project_cell(record, *column)).collect(),
        })
        .collect();

    ViewTable {
        columns,
        rows,
        filters: active_filters,
    }
}

pub fn apply_filter<'a>(
    records: Vec<&'a ChannelRecord>,
    filter: FlagFilter,
    choice: FilterChoice,
) -> Vec<&'a ChannelRecord> {
    if choice == FilterChoice::All {
        return records;
    }
    records
        .into_iter()
        .filter(|record| choice.matches(record.flag(filter)))
        .collect()
}

pub fn paginate(view: &ViewTable, page_index: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total_rows = view.rows.len();
    let total_pages = total_pages(total_rows, page_size);

    let mut state = PageState::at(page_index);
    state.clamp(total_pages);

    let start = (state.current() * page_size).min(total_rows);
    let end = (start + page_size).min(total_rows);

    Page {
        rows: view.rows[start..end].to_vec(),
        page: state.current(),
        total_pages,
        total_rows,
    }
}

pub fn project_cell(record: &ChannelRecord, column: Column) -> Cell {
    fn text(value: &Option<String>) -> Cell {
        value.clone().map(Cell::Text).unwrap_or(Cell::Empty)
    }
    fn integer(value: Option<i64>) -> Cell {
        value.map(Cell::Integer).unwrap_or(Cell::Empty)
    }
    fn flag(value: Option<bool>) -> Cell {
        value.map(Cell::Flag).unwrap_or(Cell::Empty)
    }

    match column {
        Column::YtChannelId => text(&record.yt_channel_id),
        Column::Title => text(&record.title),
        Column::SubscriberCount => integer(record.subscriber_count),
        Column::VideoCount => integer(record.video_count),
        Column::ChannelUrl => text(&record.channel_url),
        Column::FinalCategory => text(&record.final_category),
        Column::ChannelLanguage => text(&record.channel_language),
        Column::Format => text(&record.format),
        Column::IsFaceless => flag(record.is_faceless),
        Column::IsBadChannel => flag(record.is_bad_channel),
        Column::MarkedAsBadByGpt => flag(record.marked_as_bad_by_gpt),
        Column::CreatedAt => record.created_at.map(Cell::Timestamp).unwrap_or(Cell::Empty),
        Column::ChannelLink => channel_link(record.channel_url.as_deref(), record.title.as_deref()),
    }
}

/// Clickable link for a channel URL. A missing URL gives an empty link; one that
/// does not parse is shown as plain text.
pub fn channel_link(channel_url: Option<&str>, title: Option<&str>) -> Cell {
    let raw = channel_url.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Cell::Link {
            text: String::new(),
            href: None,
        };
    }

    let href = Url::parse(raw)
        .or_else(|_| Url::parse(&format!("https://{raw}")))
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .map(|url| url.to_string());

    let text = match (&href, title) {
        (Some(_), Some(title)) if !title.trim().is_empty() => title.to_string(),
        _ => raw.to_string(),
    };

    Cell::Link { text, href }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{find_preset, DEFAULT_PRESET};
    use chrono::{TimeZone, Utc};

    fn preset() -> DashboardPreset {
        find_preset(&DashboardPreset::builtin(20), DEFAULT_PRESET)
            .unwrap()
            .clone()
    }

    fn channel(i: usize) -> ChannelRecord {
        ChannelRecord {
            yt_channel_id: Some(format!("UC{i:03}")),
            title: Some(format!("Channel {i}")),
            subscriber_count: Some(1000 + i as i64),
            video_count: Some(i as i64),
            channel_url: Some(format!("https://www.youtube.com/channel/UC{i:03}")),
            final_category: Some("Gaming".to_string()),
            format: Some("long".to_string()),
            is_faceless: Some(false),
            is_bad_channel: Some(false),
            created_at: Some(Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap()),
            ..Default::default()
        }
    }

    fn table(n: usize) -> ChannelTable {
        ChannelTable::new((0..n).map(channel).collect())
    }

    fn ids(view: &ViewTable) -> Vec<Cell> {
        view.rows.iter().map(|row| row.cells[0].clone()).collect()
    }

    #[test]
    fn forty_five_rows_make_three_pages() {
        let view = prepare_view(&table(45), &preset(), &ViewFilters::new());

        let first = paginate(&view, 0, 20);
        let last = paginate(&view, 2, 20);

        assert_eq!(first.total_pages, 3);
        assert_eq!(first.rows.len(), 20);
        assert_eq!(last.rows.len(), 5);
        assert_eq!(last.page, 2);
    }

    #[test]
    fn total_pages_is_at_least_one() {
        for rows in [0usize, 1, 19, 20, 21, 40, 41, 100, 1001] {
            let expected = std::cmp::max(1, (rows + 19) / 20);
            assert_eq!(total_pages(rows, 20), expected, "rows = {rows}");
        }
    }

    #[test]
    fn every_valid_page_is_non_empty_and_bounded() {
        for n in [1usize, 7, 20, 21, 45, 60] {
            let view = prepare_view(&table(n), &preset(), &ViewFilters::new());
            let pages = total_pages(n, 20);
            let mut seen = 0;
            for page in 0..pages {
                let slice = paginate(&view, page, 20);
                assert!(!slice.rows.is_empty());
                assert!(slice.rows.len() <= 20);
                seen += slice.rows.len();
            }
            assert_eq!(seen, n);
        }
    }

    #[test]
    fn out_of_range_page_is_clamped_to_last_page() {
        let records: Vec<_> = (0..10)
            .map(|i| ChannelRecord {
                is_faceless: Some(i < 3),
                ..channel(i)
            })
            .collect();
        let filters = ViewFilters::new().with(FlagFilter::IsFaceless, FilterChoice::True);
        let view = prepare_view(&ChannelTable::new(records), &preset(), &filters);

        let page = paginate(&view, 2, 20);

        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 0);
        assert_eq!(page.rows.len(), 3);
    }

    #[test]
    fn empty_result_is_one_empty_page() {
        let filters = ViewFilters::new().with(FlagFilter::IsBadChannel, FilterChoice::True);
        let view = prepare_view(&table(5), &preset(), &filters);

        let page = paginate(&view, 4, 20);

        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 0);
        assert_eq!(page.total_rows, 0);
    }

    #[test]
    fn faceless_filter_keeps_exactly_matching_rows() {
        let records: Vec<_> = (0..10)
            .map(|i| ChannelRecord {
                is_faceless: Some(matches!(i, 2 | 5 | 7)),
                ..channel(i)
            })
            .collect();
        let table = ChannelTable::new(records);
        let filters = ViewFilters::new().with(FlagFilter::IsFaceless, FilterChoice::True);

        let view = prepare_view(&table, &preset(), &filters);
        let faceless_at = view
            .columns
            .iter()
            .position(|c| *c == Column::IsFaceless)
            .unwrap();

        assert_eq!(view.rows.len(), 3);
        assert!(view.rows.iter().all(|row| row.cells[faceless_at] == Cell::Flag(true)));
    }

    #[test]
    fn filters_are_idempotent_and_commute() {
        let records: Vec<ChannelRecord> = (0..12)
            .map(|i| ChannelRecord {
                is_faceless: Some(i % 2 == 0),
                is_bad_channel: Some(i % 3 == 0),
                ..channel(i)
            })
            .collect();
        let all: Vec<&ChannelRecord> = records.iter().collect();

        let once = apply_filter(all.clone(), FlagFilter::IsFaceless, FilterChoice::True);
        let twice = apply_filter(once.clone(), FlagFilter::IsFaceless, FilterChoice::True);
        assert_eq!(once, twice);

        let a_then_b = apply_filter(
            apply_filter(all.clone(), FlagFilter::IsFaceless, FilterChoice::True),
            FlagFilter::IsBadChannel,
            FilterChoice::False,
        );
        let b_then_a = apply_filter(
            apply_filter(all, FlagFilter::IsBadChannel, FilterChoice::False),
            FlagFilter::IsFaceless,
            FilterChoice::True,
        );
        assert_eq!(a_then_b, b_then_a);
        assert_eq!(a_then_b.len(), 4);
    }

    #[test]
    fn rows_are_latest_first() {
        let view = prepare_view(&table(3), &preset(), &ViewFilters::new());
        assert_eq!(
            ids(&view),
            vec![
                Cell::Text("UC002".to_string()),
                Cell::Text("UC001".to_string()),
                Cell::Text("UC000".to_string()),
            ]
        );
    }

    #[test]
    fn store_order_is_kept_without_recency_sort() {
        let mut raw = preset();
        raw.sort_desc_by_created_at = false;
        let view = prepare_view(&table(3), &raw, &ViewFilters::new());
        assert_eq!(view.rows[0].cells[0], Cell::Text("UC000".to_string()));
    }

    #[test]
    fn missing_url_renders_an_empty_link() {
        let record = ChannelRecord {
            channel_url: None,
            ..channel(1)
        };
        assert_eq!(
            project_cell(&record, Column::ChannelLink),
            Cell::Link {
                text: String::new(),
                href: None
            }
        );
    }

    #[test]
    fn urls_become_links_titled_by_channel() {
        let cell = channel_link(Some("https://www.youtube.com/@example"), Some("Example"));
        assert_eq!(
            cell,
            Cell::Link {
                text: "Example".to_string(),
                href: Some("https://www.youtube.com/@example".to_string()),
            }
        );

        let bare = channel_link(Some("youtube.com/@example"), None);
        assert_eq!(
            bare,
            Cell::Link {
                text: "youtube.com/@example".to_string(),
                href: Some("https://youtube.com/@example".to_string()),
            }
        );
    }

    #[test]
    fn absent_columns_hide_their_filters_and_cells() {
        let records: Vec<_> = (0..4)
            .map(|i| ChannelRecord {
                is_bad_channel: None,
                channel_url: None,
                ..channel(i)
            })
            .collect();
        let filters = ViewFilters::new().with(FlagFilter::IsBadChannel, FilterChoice::True);

        let view = prepare_view(&ChannelTable::new(records), &preset(), &filters);

        assert!(!view.columns.contains(&Column::IsBadChannel));
        assert!(!view.columns.contains(&Column::ChannelLink));
        assert_eq!(view.filters.len(), 1);
        assert_eq!(view.filters[0].filter, FlagFilter::IsFaceless);
        assert_eq!(view.rows.len(), 4);
    }

    #[test]
    fn page_state_navigation_is_bounded() {
        let mut state = PageState::new();
        state.previous();
        assert_eq!(state.current(), 0);

        state.next(3);
        state.next(3);
        state.next(3);
        assert_eq!(state.current(), 2);

        state.clamp(1);
        assert_eq!(state.current(), 0);
    }
}
