use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Column identity
// ---------------------------------------------------------------------------

/// One column of the pull request table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Checks,
    Mergeable,
    Approved,
    Draft,
    Title,
    Url,
    Author,
    Repository,
    Change,
    State,
    Comments,
    UpdatedAt,
}

/// Static metadata for a column.
struct ColumnSpec {
    name: &'static str,
    header: &'static str,
    min_width: usize,
    max_width: usize,
}

const UNBOUNDED: usize = usize::MAX;

// Indexed by `Column as usize`; order must follow the enum declaration.
#[rustfmt::skip]
const SPECS: [ColumnSpec; 12] = [
    ColumnSpec { name: "checks", header: "C", min_width: 2, max_width: 2 },
    ColumnSpec { name: "mergeable", header: "M", min_width: 2, max_width: 2 },
    ColumnSpec { name: "approved", header: "A", min_width: 2, max_width: 2 },
    ColumnSpec { name: "draft", header: "D", min_width: 2, max_width: 2 },
    ColumnSpec { name: "title", header: "Title", min_width: 5, max_width: UNBOUNDED },
    ColumnSpec { name: "url", header: "Url", min_width: 5, max_width: UNBOUNDED },
    ColumnSpec { name: "author", header: "Author", min_width: 6, max_width: UNBOUNDED },
    ColumnSpec { name: "repository", header: "Repository", min_width: 10, max_width: UNBOUNDED },
    ColumnSpec { name: "change", header: "Change", min_width: 6, max_width: UNBOUNDED },
    ColumnSpec { name: "state", header: "State", min_width: 5, max_width: 5 },
    ColumnSpec { name: "comments", header: "Comments", min_width: 5, max_width: UNBOUNDED },
    ColumnSpec { name: "updatedAt", header: "UpdatedAt", min_width: 10, max_width: UNBOUNDED },
];

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Checks,
        Column::Mergeable,
        Column::Approved,
        Column::Draft,
        Column::Title,
        Column::Url,
        Column::Author,
        Column::Repository,
        Column::Change,
        Column::State,
        Column::Comments,
        Column::UpdatedAt,
    ];

    fn spec(self) -> &'static ColumnSpec {
        &SPECS[self as usize]
    }

    /// Stable name used in configuration files.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Table header text.
    pub fn header(self) -> &'static str {
        self.spec().header
    }

    pub fn min_width(self) -> usize {
        self.spec().min_width
    }

    /// Upper width bound; `usize::MAX` for free-text columns.
    pub fn max_width(self) -> usize {
        self.spec().max_width
    }

    /// Whether the column renders a single status glyph rather than text.
    pub fn is_glyph(self) -> bool {
        matches!(
            self,
            Self::Checks | Self::Mergeable | Self::Approved | Self::Draft | Self::State
        )
    }

    /// Clamp an observed content width into this column's bounds.
    pub fn clamp_width(self, observed: usize) -> usize {
        observed.clamp(self.min_width(), self.max_width())
    }

    /// Every valid column name, sorted.
    pub fn valid_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown column: {name} (must be one of {})", Column::valid_names().join(", "))]
pub struct UnknownColumn {
    pub name: String,
}

/// Resolve a column from its configured name.
///
/// Surrounding whitespace is ignored and the comparison is case-insensitive.
pub fn resolve(name: &str) -> Result<Column, UnknownColumn> {
    let trimmed = name.trim();
    Column::ALL
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| UnknownColumn {
            name: trimmed.to_owned(),
        })
}

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Column {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        resolve(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Column sets
// ---------------------------------------------------------------------------

/// Which of the two column sets a panel displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Default,
    Wide,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Default => Self::Wide,
            Self::Wide => Self::Default,
        }
    }
}

pub const DEFAULT_COLUMNS: [Column; 8] = [
    Column::Checks,
    Column::Mergeable,
    Column::Approved,
    Column::Title,
    Column::Author,
    Column::Repository,
    Column::Change,
    Column::UpdatedAt,
];

pub const WIDE_COLUMNS: [Column; 12] = Column::ALL;

/// The ordered column lists for both view modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSets {
    pub default: Vec<Column>,
    pub wide: Vec<Column>,
}

impl Default for ColumnSets {
    fn default() -> Self {
        Self {
            default: DEFAULT_COLUMNS.to_vec(),
            wide: WIDE_COLUMNS.to_vec(),
        }
    }
}

impl ColumnSets {
    /// Build from optional configured lists; a missing or empty list keeps
    /// the built-in one.
    pub fn from_config(default: Option<&[Column]>, wide: Option<&[Column]>) -> Self {
        let builtin = Self::default();
        Self {
            default: default
                .filter(|cols| !cols.is_empty())
                .map_or(builtin.default, <[Column]>::to_vec),
            wide: wide
                .filter(|cols| !cols.is_empty())
                .map_or(builtin.wide, <[Column]>::to_vec),
        }
    }

    /// Columns shown in the given mode, in rendering order.
    pub fn columns_of(&self, mode: ViewMode) -> &[Column] {
        match mode {
            ViewMode::Default => &self.default,
            ViewMode::Wide => &self.wide,
        }
    }
}
