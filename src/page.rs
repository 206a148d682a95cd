use std::collections::HashMap;

use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

use crate::column::Column;
use crate::types::{
    CheckState, MergeStateStatus, MergeableState, PrState, PullRequest, ReviewDecision,
};
use crate::util::{expand_emoji, format_relative_time};

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// Rendered cells for one pull request, independent of which columns are
/// currently displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: HashMap<Column, String>,
    url: String,
}

impl Row {
    /// An empty row navigating to `url`; cells are added with [`Row::with_cell`].
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            cells: HashMap::new(),
            url: url.into(),
        }
    }

    pub fn with_cell(mut self, column: Column, text: impl Into<String>) -> Self {
        self.cells.insert(column, text.into());
        self
    }

    pub fn cell(&self, column: Column) -> Option<&str> {
        self.cells.get(&column).map(String::as_str)
    }

    /// Navigation target, kept even when the URL column is hidden.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Render every column for `pr`.
    pub fn from_pull_request(pr: &PullRequest, now: &DateTime<Utc>) -> Self {
        let author = pr.author.as_deref().unwrap_or("unknown");
        let updated = pr
            .updated_at
            .as_ref()
            .map_or_else(String::new, |t| format_relative_time(t, now));

        Self::new(pr.url.clone())
            .with_cell(Column::Checks, checks_glyph(pr.check_state))
            .with_cell(
                Column::Mergeable,
                mergeable_glyph(pr.mergeable, pr.merge_state_status),
            )
            .with_cell(Column::Approved, approved_glyph(pr.review_decision))
            .with_cell(Column::Draft, draft_glyph(pr.is_draft))
            .with_cell(Column::Title, expand_emoji(&pr.title).into_owned())
            .with_cell(Column::Url, pr.url.clone())
            .with_cell(Column::Author, author)
            .with_cell(Column::Repository, short_repository(&pr.repository))
            .with_cell(
                Column::Change,
                format!(
                    "{} (+{}/-{})",
                    pr.changed_files, pr.additions, pr.deletions
                ),
            )
            .with_cell(Column::State, state_glyph(pr.state))
            .with_cell(Column::Comments, pr.comment_count.to_string())
            .with_cell(Column::UpdatedAt, updated)
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Immutable result of one successful fetch: rows in fetch order plus the
/// widest observed cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    column_widths: HashMap<Column, usize>,
    rows: Vec<Row>,
}

impl Page {
    pub fn new(rows: Vec<Row>) -> Self {
        let mut column_widths: HashMap<Column, usize> = HashMap::new();
        for row in &rows {
            for (column, text) in &row.cells {
                let w = column_widths.entry(*column).or_default();
                *w = (*w).max(text.width());
            }
        }
        Self {
            column_widths,
            rows,
        }
    }

    pub fn from_pull_requests(prs: &[PullRequest], now: &DateTime<Utc>) -> Self {
        Self::new(
            prs.iter()
                .map(|pr| Row::from_pull_request(pr, now))
                .collect(),
        )
    }

    /// Widest observed cell for `column`, 0 when no row has one.
    pub fn column_width(&self, column: Column) -> usize {
        self.column_widths.get(&column).copied().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Cell renderers
// ---------------------------------------------------------------------------

const BLANK: &str = " ";

pub(crate) fn checks_glyph(state: Option<CheckState>) -> &'static str {
    match state {
        Some(CheckState::Success) => "✅",
        Some(CheckState::Failure) => "❌",
        Some(CheckState::Pending) => "⏳",
        _ => BLANK,
    }
}

pub(crate) fn approved_glyph(decision: Option<ReviewDecision>) -> &'static str {
    match decision {
        Some(ReviewDecision::Approved) => "✅",
        _ => BLANK,
    }
}

pub(crate) fn mergeable_glyph(
    mergeable: Option<MergeableState>,
    status: Option<MergeStateStatus>,
) -> &'static str {
    match mergeable {
        Some(MergeableState::Conflicting) => "❌",
        Some(MergeableState::Mergeable) if status == Some(MergeStateStatus::Behind) => "⬆️",
        Some(MergeableState::Mergeable) => "✅",
        _ => BLANK,
    }
}

pub(crate) fn draft_glyph(is_draft: bool) -> &'static str {
    if is_draft { "📝" } else { BLANK }
}

pub(crate) fn state_glyph(state: PrState) -> &'static str {
    match state {
        PrState::Merged => "🚀",
        PrState::Closed => "🗑️",
        _ => BLANK,
    }
}

/// Drop the owner segment: `"octo-org/octo-repo"` → `"octo-repo"`.
pub(crate) fn short_repository(full_name: &str) -> &str {
    full_name
        .split_once('/')
        .map_or(full_name, |(_, rest)| rest)
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    pub(crate) fn sample_pr(title: &str, url: &str) -> PullRequest {
        PullRequest {
            title: title.to_owned(),
            url: url.to_owned(),
            author: Some("octocat".to_owned()),
            repository: "octo-org/octo-repo".to_owned(),
            changed_files: 3,
            additions: 10,
            deletions: 2,
            review_decision: Some(ReviewDecision::Approved),
            check_state: Some(CheckState::Pending),
            mergeable: Some(MergeableState::Mergeable),
            merge_state_status: Some(MergeStateStatus::Clean),
            is_draft: false,
            state: PrState::Open,
            comment_count: 4,
            updated_at: None,
        }
    }

    #[test]
    fn repository_drops_owner() {
        assert_eq!(short_repository("octo-org/octo-repo"), "octo-repo");
        assert_eq!(short_repository("octo-repo"), "octo-repo");
        assert_eq!(short_repository("a/b/c"), "b/c");
    }

    #[test]
    fn glyph_encodings() {
        assert_eq!(checks_glyph(Some(CheckState::Success)), "✅");
        assert_eq!(checks_glyph(Some(CheckState::Failure)), "❌");
        assert_eq!(checks_glyph(Some(CheckState::Error)), " ");
        assert_eq!(checks_glyph(None), " ");
        assert_eq!(approved_glyph(Some(ReviewDecision::ChangesRequested)), " ");
        assert_eq!(
            mergeable_glyph(Some(MergeableState::Mergeable), Some(MergeStateStatus::Behind)),
            "⬆️"
        );
        assert_eq!(
            mergeable_glyph(Some(MergeableState::Conflicting), Some(MergeStateStatus::Behind)),
            "❌"
        );
        assert_eq!(mergeable_glyph(Some(MergeableState::Unknown), None), " ");
        assert_eq!(draft_glyph(true), "📝");
        assert_eq!(state_glyph(PrState::Merged), "🚀");
        assert_eq!(state_glyph(PrState::Closed), "🗑️");
        assert_eq!(state_glyph(PrState::Open), " ");
    }

    #[test]
    fn row_renders_every_column() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut pr = sample_pr("Add :sparkles: to docs", "https://github.com/o/r/pull/1");
        pr.updated_at = Some(now - Duration::days(10));
        let row = Row::from_pull_request(&pr, &now);

        for col in Column::ALL {
            assert!(row.cell(col).is_some(), "missing {col}");
        }
        assert_eq!(row.cell(Column::Title), Some("Add ✨ to docs"));
        assert_eq!(row.cell(Column::Change), Some("3 (+10/-2)"));
        assert_eq!(row.cell(Column::Repository), Some("octo-repo"));
        assert_eq!(row.cell(Column::Comments), Some("4"));
        assert_eq!(row.cell(Column::UpdatedAt), Some("10 days ago"));
        assert_eq!(row.url(), "https://github.com/o/r/pull/1");
    }

    #[test]
    fn missing_author_and_timestamp() {
        let now = Utc::now();
        let mut pr = sample_pr("t", "u");
        pr.author = None;
        let row = Row::from_pull_request(&pr, &now);
        assert_eq!(row.cell(Column::Author), Some("unknown"));
        assert_eq!(row.cell(Column::UpdatedAt), Some(""));
    }

    #[test]
    fn page_tracks_widest_cell() {
        let now = Utc::now();
        let prs = vec![
            sample_pr("short", "u1"),
            sample_pr("a considerably longer title", "u2"),
        ];
        let page = Page::from_pull_requests(&prs, &now);
        assert_eq!(page.len(), 2);
        assert_eq!(page.column_width(Column::Title), 27);
        assert_eq!(page.rows()[1].url(), "u2");
    }

    #[test]
    fn empty_page_has_zero_widths() {
        let page = Page::default();
        assert!(page.is_empty());
        assert_eq!(page.column_width(Column::Title), 0);
    }
}
