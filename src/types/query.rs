use std::fmt;

/// The three dashboard panels, one per search kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    MyPrs,
    Requested,
    All,
}

impl PanelKind {
    pub const ALL: [PanelKind; 3] = [PanelKind::MyPrs, PanelKind::Requested, PanelKind::All];

    pub fn index(self) -> usize {
        match self {
            Self::MyPrs => 0,
            Self::Requested => 1,
            Self::All => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Tab title.
    pub fn title(self) -> &'static str {
        match self {
            Self::MyPrs => "My PRs",
            Self::Requested => "My Requests",
            Self::All => "All PRs",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Process-wide search filters shared by every panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilters {
    pub include_drafts: bool,
    pub include_closed: bool,
    /// Repositories (`owner/name`) searched by the "All" panel.
    pub repositories: Vec<String>,
}

/// Identifies one issued fetch so its result can be matched back to the
/// panel and checked for staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: PanelKind,
    pub seq: u64,
}

/// A fetch request handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub ticket: FetchTicket,
    pub filters: QueryFilters,
}
