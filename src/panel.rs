use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::column::{ColumnSets, ViewMode};
use crate::layout::TableLayout;
use crate::page::Page;
use crate::types::{FetchError, FetchTicket, PanelKind, PullRequest};

/// Rows shown before the first resize event arrives.
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Fetch lifecycle of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Data is stale; the next focus issues a fetch.
    NeedsReload,
    Loading,
    Ready,
    /// The last fetch failed; the previous page is still displayed.
    Errored(String),
}

/// One tabbed view of pull requests.
#[derive(Debug, Clone)]
pub struct Panel {
    kind: PanelKind,
    columns: Arc<ColumnSets>,
    view: ViewMode,
    focused: bool,
    state: LoadState,
    page: Option<Arc<Page>>,
    layout: TableLayout,
    last_refreshed: Option<DateTime<Utc>>,
    // Single-flight bookkeeping.
    next_seq: u64,
    in_flight: Option<u64>,
    reload_queued: bool,
    // Navigation.
    cursor: usize,
    scroll_offset: usize,
    viewport_height: usize,
}

impl Panel {
    pub fn new(kind: PanelKind, columns: Arc<ColumnSets>) -> Self {
        let layout = TableLayout::empty(columns.columns_of(ViewMode::Default));
        Self {
            kind,
            columns,
            view: ViewMode::Default,
            focused: false,
            state: LoadState::NeedsReload,
            page: None,
            layout,
            last_refreshed: None,
            next_seq: 0,
            in_flight: None,
            reload_queued: false,
            cursor: 0,
            scroll_offset: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_deref()
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Text for the status line.
    pub fn status(&self) -> String {
        match &self.state {
            LoadState::NeedsReload | LoadState::Loading => "Loading ...".to_owned(),
            LoadState::Errored(message) => message.clone(),
            LoadState::Ready => format!("{} issues", self.layout.row_count()),
        }
    }

    /// URL of the row under the cursor.
    pub fn selected_url(&self) -> Option<&str> {
        self.layout.url_at(self.cursor)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Give this panel focus. Returns the fetch to issue when the panel's
    /// data was stale.
    pub fn focus(&mut self) -> Option<FetchTicket> {
        self.focused = true;
        if self.state == LoadState::NeedsReload {
            self.issue_fetch()
        } else {
            None
        }
    }

    /// Remove focus. An in-flight fetch keeps running and is applied when it
    /// completes.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Explicit reload: fetch now when focused, otherwise drop the displayed
    /// rows and defer the fetch to the next focus.
    pub fn request_reload(&mut self) -> Option<FetchTicket> {
        if self.focused {
            return self.issue_fetch();
        }
        tracing::debug!("panel {}: deferring reload until focused", self.kind);
        self.state = LoadState::NeedsReload;
        self.clear_rows();
        None
    }

    /// Apply the outcome of a fetch. Returns a follow-up fetch when a reload
    /// was queued behind the one that just completed.
    pub fn receive(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<PullRequest>, FetchError>,
        now: DateTime<Utc>,
    ) -> Option<FetchTicket> {
        if ticket.kind != self.kind || self.in_flight != Some(ticket.seq) {
            tracing::debug!("panel {}: dropping stale result #{}", self.kind, ticket.seq);
            return None;
        }
        self.in_flight = None;

        if self.reload_queued {
            self.reload_queued = false;
            tracing::debug!("panel {}: result #{} superseded", self.kind, ticket.seq);
            if self.focused {
                return self.issue_fetch();
            }
            self.state = LoadState::NeedsReload;
            return None;
        }
        if self.state == LoadState::NeedsReload {
            tracing::debug!(
                "panel {}: result #{} arrived after invalidation",
                self.kind,
                ticket.seq
            );
            return None;
        }

        match result {
            Ok(prs) => {
                tracing::debug!("panel {}: received {} pull requests", self.kind, prs.len());
                self.page = Some(Arc::new(Page::from_pull_requests(&prs, &now)));
                self.state = LoadState::Ready;
                self.last_refreshed = Some(now);
                self.relayout();
            }
            Err(e) => {
                tracing::warn!("panel {}: fetch failed: {e}", self.kind);
                self.state = LoadState::Errored(e.to_string());
            }
        }
        None
    }

    /// Switch between the default and wide column sets, re-laying out the
    /// current page without fetching.
    pub fn toggle_wide(&mut self) {
        self.view = self.view.toggled();
        self.relayout();
    }

    fn issue_fetch(&mut self) -> Option<FetchTicket> {
        self.state = LoadState::Loading;
        if self.in_flight.is_some() {
            tracing::debug!("panel {}: fetch in flight, queueing reload", self.kind);
            self.reload_queued = true;
            return None;
        }
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        tracing::debug!("panel {}: issuing fetch #{}", self.kind, self.next_seq);
        Some(FetchTicket {
            kind: self.kind,
            seq: self.next_seq,
        })
    }

    fn clear_rows(&mut self) {
        self.page = None;
        self.relayout();
    }

    fn relayout(&mut self) {
        let columns = self.columns.columns_of(self.view);
        self.layout = match self.page.as_deref() {
            None => TableLayout::empty(columns),
            Some(page) => match TableLayout::compute(page, columns) {
                Ok(layout) => layout,
                Err(e) => {
                    tracing::warn!("panel {}: {e}", self.kind);
                    self.state = LoadState::Errored(e.to_string());
                    TableLayout::empty(columns)
                }
            },
        };
        self.clamp_cursor();
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.clamp_cursor();
    }

    /// Handle a navigation key. Returns `false` when the key is not a
    /// navigation key.
    pub fn handle_nav_key(&mut self, key: &str) -> bool {
        let last = self.layout.row_count().saturating_sub(1);
        let page = self.viewport_height;
        self.cursor = match key {
            "up" | "k" => self.cursor.saturating_sub(1),
            "down" | "j" => (self.cursor + 1).min(last),
            "pageup" => self.cursor.saturating_sub(page),
            "pagedown" | "space" => (self.cursor + page).min(last),
            "home" | "g" => 0,
            "end" | "G" => last,
            _ => return false,
        };
        self.scroll_to_cursor();
        true
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.layout.row_count().saturating_sub(1));
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + self.viewport_height {
            self.scroll_offset = self.cursor + 1 - self.viewport_height;
        }
        let max_offset = self
            .layout
            .row_count()
            .saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}
