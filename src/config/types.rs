use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::column::{Column, ColumnSets};
use crate::dashboard::DashboardOptions;
use crate::types::{PanelKind, QueryFilters};

// ---------------------------------------------------------------------------
// Duration parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration \"{value}\" (expected e.g. \"90s\", \"5m\" or \"1h30m\")")]
pub struct DurationParseError {
    pub value: String,
}

/// Parse a duration such as `"90s"`, `"5m"`, `"1h30m"` or `"500ms"`.
///
/// A bare `"0"` is accepted and disables auto-refresh.
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let err = || DurationParseError {
        value: s.to_owned(),
    };
    let mut rest = s.trim();
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(err());
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return Err(err());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| err())?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_len);
        rest = tail;

        let part = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(err)?),
            "h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(err)?),
            _ => return Err(err()),
        };
        total = total.checked_add(part).ok_or_else(err)?;
    }
    Ok(total)
}

/// Deserialize an `Option<Duration>` from either a duration string or an
/// integer number of nanoseconds (the format older JSON configs use).
pub(crate) mod duration_de {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer};

    use super::parse_duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Text(String),
        Nanos(u64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawDuration>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawDuration::Nanos(n)) => Ok(Some(Duration::from_nanos(n))),
            Some(RawDuration::Text(s)) => parse_duration(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(alias = "includeDrafts")]
    pub include_drafts: bool,
    #[serde(alias = "includeClosed")]
    pub include_closed: bool,
    /// Auto-refresh interval for the active panel; `None` or zero disables it.
    #[serde(deserialize_with = "duration_de::deserialize")]
    pub interval: Option<Duration>,
    /// Repositories (`owner/name`) searched by the "All" panel.
    pub repositories: Vec<String>,
    /// Column names for the default view; built-in list when absent.
    #[serde(alias = "defaultView")]
    pub default_view: Option<Vec<Column>>,
    /// Column names for the wide view; built-in list when absent.
    #[serde(alias = "wideView")]
    pub wide_view: Option<Vec<Column>>,
}

impl AppConfig {
    pub fn filters(&self) -> QueryFilters {
        QueryFilters {
            include_drafts: self.include_drafts,
            include_closed: self.include_closed,
            repositories: self.repositories.clone(),
        }
    }

    pub fn column_sets(&self) -> ColumnSets {
        ColumnSets::from_config(self.default_view.as_deref(), self.wide_view.as_deref())
    }

    /// Everything the dashboard needs at startup.
    pub fn dashboard_options(&self, start_tab: Option<PanelKind>) -> DashboardOptions {
        DashboardOptions {
            filters: self.filters(),
            interval: self.interval,
            start_tab,
            columns: self.column_sets(),
        }
    }
}
