use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};

use crate::column::ColumnSets;
use crate::panel::Panel;
use crate::types::{FetchError, FetchTicket, PanelKind, PullRequest, Query, QueryFilters};
use crate::util::format_interval;

/// Terminal rows taken by the tab bar (2), table header (1) and footer (2).
const CHROME_ROWS: usize = 5;

/// Everything the dashboard reacts to, delivered one at a time.
#[derive(Debug)]
pub enum Message {
    /// A canonical key string, see [`crate::keys`].
    Key(String),
    ActivateTab(PanelKind),
    Resize { width: u16, height: u16 },
    /// The auto-refresh timer fired.
    Tick,
    Fetched {
        ticket: FetchTicket,
        result: Result<Vec<PullRequest>, FetchError>,
    },
}

/// Side effects requested by the dashboard, executed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(Query),
    OpenUrl(String),
    Quit,
    /// Arm the single-shot refresh timer.
    ScheduleTick(Duration),
}

/// Startup settings for a [`Dashboard`].
#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub filters: QueryFilters,
    pub interval: Option<Duration>,
    pub start_tab: Option<PanelKind>,
    pub columns: ColumnSets,
}

/// The three panels plus the process-wide filters.
///
/// A pure state machine: [`Dashboard::handle`] applies one [`Message`] and
/// returns the effects the host must run.
#[derive(Debug, Clone)]
pub struct Dashboard {
    panels: [Panel; 3],
    active: PanelKind,
    filters: QueryFilters,
    interval: Option<Duration>,
    error: Option<String>,
}

impl Dashboard {
    pub fn new(options: DashboardOptions) -> Self {
        let columns = Arc::new(options.columns);
        Self {
            panels: PanelKind::ALL.map(|kind| Panel::new(kind, Arc::clone(&columns))),
            active: options.start_tab.unwrap_or(PanelKind::MyPrs),
            filters: options.filters,
            interval: options.interval.filter(|i| !i.is_zero()),
            error: None,
        }
    }

    /// Focus the start tab and arm the first tick.
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.activate(self.active, &mut effects);
        if let Some(interval) = self.interval {
            effects.push(Effect::ScheduleTick(interval));
        }
        effects
    }

    pub fn handle(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            Message::Key(key) => self.handle_key(&key, &mut effects),
            Message::ActivateTab(kind) => self.activate(kind, &mut effects),
            Message::Resize { height, .. } => {
                let rows = usize::from(height).saturating_sub(CHROME_ROWS);
                for panel in &mut self.panels {
                    panel.set_viewport_height(rows);
                }
            }
            Message::Tick => {
                tracing::debug!("dashboard: tick, reloading {}", self.active);
                if let Some(ticket) = self.active_panel_mut().request_reload() {
                    effects.push(self.fetch(ticket));
                }
                if let Some(interval) = self.interval {
                    effects.push(Effect::ScheduleTick(interval));
                }
            }
            Message::Fetched { ticket, result } => {
                if result.is_ok() {
                    self.error = None;
                }
                if let Some(next) = self.panel_mut(ticket.kind).receive(ticket, result, Utc::now())
                {
                    effects.push(self.fetch(next));
                }
            }
        }
        effects
    }

    /// Record a failed attempt to open a URL.
    pub fn record_open_failure(&mut self, error: impl ToString) {
        let message = error.to_string();
        tracing::warn!("dashboard: {message}");
        self.error = Some(message);
    }

    fn handle_key(&mut self, key: &str, effects: &mut Vec<Effect>) {
        match key {
            "enter" => {
                if let Some(url) = self.active_panel().selected_url() {
                    effects.push(Effect::OpenUrl(url.to_owned()));
                }
            }
            "q" | "esc" | "ctrl+c" => effects.push(Effect::Quit),
            "d" => {
                self.filters.include_drafts = !self.filters.include_drafts;
                self.reload_all(effects);
            }
            "c" => {
                self.filters.include_closed = !self.filters.include_closed;
                self.reload_all(effects);
            }
            "u" | "w" => self.active_panel_mut().toggle_wide(),
            "r" => {
                if let Some(ticket) = self.active_panel_mut().request_reload() {
                    effects.push(self.fetch(ticket));
                }
            }
            "tab" | "right" | "l" => self.activate(self.active.next(), effects),
            "left" | "h" | "backtab" => self.activate(self.active.prev(), effects),
            "1" | "2" | "3" => {
                let idx = usize::from(key.as_bytes()[0] - b'1');
                if let Some(kind) = PanelKind::from_index(idx) {
                    self.activate(kind, effects);
                }
            }
            _ => {
                self.active_panel_mut().handle_nav_key(key);
            }
        }
    }

    fn activate(&mut self, kind: PanelKind, effects: &mut Vec<Effect>) {
        for panel in &mut self.panels {
            if panel.kind() != kind {
                panel.blur();
            }
        }
        self.active = kind;
        if let Some(ticket) = self.panel_mut(kind).focus() {
            effects.push(self.fetch(ticket));
        }
    }

    fn reload_all(&mut self, effects: &mut Vec<Effect>) {
        tracing::debug!(
            "dashboard: filters changed (drafts={}, closed={})",
            self.filters.include_drafts,
            self.filters.include_closed
        );
        let tickets: Vec<FetchTicket> = self
            .panels
            .iter_mut()
            .filter_map(Panel::request_reload)
            .collect();
        effects.extend(tickets.into_iter().map(|t| self.fetch(t)));
    }

    fn fetch(&self, ticket: FetchTicket) -> Effect {
        Effect::Fetch(Query {
            ticket,
            filters: self.filters.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn active(&self) -> PanelKind {
        self.active
    }

    pub fn panel(&self, kind: PanelKind) -> &Panel {
        &self.panels[kind.index()]
    }

    fn panel_mut(&mut self, kind: PanelKind) -> &mut Panel {
        &mut self.panels[kind.index()]
    }

    pub fn active_panel(&self) -> &Panel {
        self.panel(self.active)
    }

    fn active_panel_mut(&mut self) -> &mut Panel {
        self.panel_mut(self.active)
    }

    pub fn filters(&self) -> &QueryFilters {
        &self.filters
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Left side of the footer: panel status, active filters, last error.
    pub fn footer_status(&self) -> String {
        let mut text = self.active_panel().status();
        if self.filters.include_closed {
            text.push_str(" [including closed]");
        }
        if self.filters.include_drafts {
            text.push_str(" [including drafts]");
        }
        if let Some(err) = &self.error {
            text.push_str("  ");
            text.push_str(err);
        }
        text
    }

    /// Right side of the footer: last refresh time and the tick interval.
    pub fn footer_refresh(&self) -> String {
        let mut text = self
            .active_panel()
            .last_refreshed()
            .map(|t| t.with_timezone(&Local).format("%I:%M:%S %p").to_string())
            .unwrap_or_default();
        if let Some(interval) = self.interval {
            text.push_str(&format!(" (🔄{})", format_interval(interval)));
        }
        text
    }
}
