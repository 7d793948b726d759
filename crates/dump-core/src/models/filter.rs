//! List filters and their translation to `pull_notes` query parameters.

use chrono::{Datelike, Duration, NaiveDate};

use super::note::PageCursor;

pub const DATE_GROUP_TODAY: &str = "Today";
pub const DATE_GROUP_YESTERDAY: &str = "Yesterday";
pub const DATE_GROUP_THIS_WEEK: &str = "This Week";
pub const DATE_GROUP_THIS_MONTH: &str = "This Month";
pub const DATE_GROUP_THIS_YEAR: &str = "This Year";
pub const DATE_GROUP_ALL_TIME: &str = "All Time";

/// Display order for date-group facets.
pub const DATE_GROUP_ORDER: [&str; 6] = [
    DATE_GROUP_TODAY,
    DATE_GROUP_YESTERDAY,
    DATE_GROUP_THIS_WEEK,
    DATE_GROUP_THIS_MONTH,
    DATE_GROUP_THIS_YEAR,
    DATE_GROUP_ALL_TIME,
];

/// Which notes a list view shows. Fixed for the lifetime of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    ByCategory {
        name: String,
        sub_category: Option<String>,
    },
    ByMimeGroup(String),
    /// Bounds are `yyyy-MM-dd`; an empty bound means "all time".
    ByDateRange {
        name: String,
        start: String,
        end: String,
    },
    /// Fixed-size "latest notes" view; never pages.
    Recent { limit: u32 },
}

impl Filter {
    pub fn category(name: impl Into<String>) -> Self {
        Self::ByCategory {
            name: name.into(),
            sub_category: None,
        }
    }

    /// Date-range filter for a named date group relative to `today`.
    pub fn date_group(name: impl Into<String>, today: NaiveDate) -> Self {
        let name = name.into();
        let (start, end) = date_group_range(&name, today);
        Self::ByDateRange { name, start, end }
    }

    pub const fn paginates(&self) -> bool {
        !matches!(self, Self::Recent { .. })
    }

    pub fn category_name(&self) -> Option<&str> {
        match self {
            Self::ByCategory { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn initial_sub_category(&self) -> Option<&str> {
        match self {
            Self::ByCategory { sub_category, .. } => sub_category.as_deref(),
            _ => None,
        }
    }

    /// Builds the query for one page.
    ///
    /// The search term applies to every variant. `Recent` ignores the cursor
    /// and uses its own limit.
    pub fn note_query(&self, context: &QueryContext<'_>) -> NoteQuery {
        let mut query = NoteQuery {
            limit: context.page_size,
            q: trimmed(context.search),
            ..Default::default()
        };
        if let Some(cursor) = context.cursor {
            query.cursor_time.clone_from(&cursor.time);
            query.cursor_id.clone_from(&cursor.id);
        }

        match self {
            Self::All => {}
            Self::ByCategory { name, .. } => {
                query.category_name = trimmed(name);
                query.sub_cat_name = context.sub_category.and_then(trimmed);
            }
            Self::ByMimeGroup(group) => {
                query.mime_group = trimmed(group);
            }
            Self::ByDateRange { start, end, .. } => {
                if let (Some(start), Some(end)) = (trimmed(start), trimmed(end)) {
                    query.start_time = Some(start);
                    query.end_time = Some(end);
                    query.tz = trimmed(context.time_zone);
                }
            }
            Self::Recent { limit } => {
                query.limit = *limit;
                query.cursor_time = None;
                query.cursor_id = None;
            }
        }
        query
    }
}

/// Per-request inputs that are not part of the filter itself.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    pub page_size: u32,
    pub cursor: Option<&'a PageCursor>,
    pub search: &'a str,
    pub sub_category: Option<&'a str>,
    pub time_zone: &'a str,
}

/// Query parameters of `GET /api/pull_notes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub limit: u32,
    pub cursor_time: Option<String>,
    pub cursor_id: Option<String>,
    pub category_name: Option<String>,
    pub mime_type: Option<String>,
    pub mime_group: Option<String>,
    pub sub_cat_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub tz: Option<String>,
    pub q: Option<String>,
    pub note_type: Option<String>,
}

impl NoteQuery {
    /// Query-string pairs; blank values are left out entirely.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        let optional = [
            ("cursor_time", &self.cursor_time),
            ("cursor_id", &self.cursor_id),
            ("category_name", &self.category_name),
            ("mime_type", &self.mime_type),
            ("mime_group", &self.mime_group),
            ("sub_cat_name", &self.sub_cat_name),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
            ("tz", &self.tz),
            ("q", &self.q),
            ("note_type", &self.note_type),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().and_then(trimmed) {
                pairs.push((name, value));
            }
        }
        pairs
    }
}

/// `yyyy-MM-dd` bounds for a date group. Weeks start on Monday.
///
/// "All Time" and unknown names return empty bounds.
pub fn date_group_range(name: &str, today: NaiveDate) -> (String, String) {
    let format = |date: NaiveDate| date.format("%Y-%m-%d").to_string();
    let start = match name {
        DATE_GROUP_TODAY => today,
        DATE_GROUP_YESTERDAY => {
            let yesterday = today - Duration::days(1);
            return (format(yesterday), format(yesterday));
        }
        DATE_GROUP_THIS_WEEK => {
            today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
        }
        DATE_GROUP_THIS_MONTH => today.with_day(1).unwrap_or(today),
        DATE_GROUP_THIS_YEAR => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        _ => return (String::new(), String::new()),
    };
    (format(start), format(today))
}

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
