use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Faction, RaidFactionKey, Region};

pub const IDLE_MESSAGE: &str = "Select a faction and raid.";

/// Highlight applied to the first three rows of the leaderboard table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Podium {
    Gold,
    Silver,
    Bronze,
}

impl Podium {
    /// Emphasis for a row by its position in the table, not by its rank.
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(Podium::Gold),
            1 => Some(Podium::Silver),
            2 => Some(Podium::Bronze),
            _ => None,
        }
    }
}

/// Header artwork the front end shows for the current tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    Alliance,
    Horde,
    Default,
}

impl Banner {
    pub fn for_tab(tab: Option<Faction>) -> Self {
        match tab {
            Some(Faction::Alliance) => Banner::Alliance,
            Some(Faction::Horde) => Banner::Horde,
            None => Banner::Default,
        }
    }
}

/// A row of the leaderboard table as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub guild: String,
    pub region: Region,
    pub realm: String,
    pub faction: Faction,
    pub date: DateTime<Utc>,
    pub rank: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Podium>,
}

/// Number of guilds sharing one category value (a region or a realm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// One point of the date-vs-rank series, grouped by region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub recorded_at: DateTime<Utc>,
    pub rank: u32,
    pub region: Region,
}

/// Chart-ready series with the labels the dashboard shows around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart<T> {
    pub title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub data: Vec<T>,
}

/// Everything the dashboard renders for one raid and faction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub key: RaidFactionKey,
    pub raid_name: String,
    pub table: Vec<TableRow>,
    pub region_distribution: Chart<CategoryCount>,
    pub realm_distribution: Chart<CategoryCount>,
    pub time_series: Chart<TimePoint>,
}

/// Result of resolving a UI selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    /// The faction or the raid has not been chosen yet.
    Idle,
    Ready(DashboardView),
}

impl ViewOutcome {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewOutcome::Idle)
    }
}
