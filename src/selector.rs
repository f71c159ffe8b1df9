use std::str::FromStr;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::*;
use crate::source::LeaderboardSource;

pub const REGION_CHART_TITLE: &str = "Distribution of Regions";
pub const REALM_CHART_TITLE: &str = "Distribution of Realms";
pub const TIME_SERIES_TITLE: &str = "Mythic Raid Leaderboard Time series";
const COUNT_AXIS: &str = "Number of Guilds";

/// Current state of the faction tabs and the raid dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub tab: Option<Faction>,
    pub raid: Option<Raid>,
}

impl Selection {
    pub fn new(tab: Option<Faction>, raid: Option<Raid>) -> Self {
        Self { tab, raid }
    }

    /// Build a selection from raw UI values. Anything that does not name a
    /// known faction or raid counts as not selected.
    pub fn from_raw(tab: Option<&str>, raid: Option<&str>) -> Self {
        Self {
            tab: tab.and_then(|t| Faction::from_str(t.trim()).ok()),
            raid: raid.and_then(|r| Raid::from_str(r.trim()).ok()),
        }
    }

    pub fn key(&self) -> Option<RaidFactionKey> {
        Some(RaidFactionKey::new(self.raid?, self.tab?))
    }

    pub fn banner(&self) -> Banner {
        Banner::for_tab(self.tab)
    }
}

/// Resolve a UI selection into the dashboard views.
///
/// Returns [`ViewOutcome::Idle`] without touching `source` when either
/// the tab or the raid is missing. Fetch errors are returned unchanged.
#[instrument(skip(source))]
pub async fn select_view<S: LeaderboardSource>(
    source: &S,
    tab: Option<Faction>,
    raid: Option<Raid>,
) -> Result<ViewOutcome> {
    let Some(key) = Selection::new(tab, raid).key() else {
        debug!("selection incomplete");
        return Ok(ViewOutcome::Idle);
    };

    let entries = source.fetch_leaderboard(key).await?;
    Ok(ViewOutcome::Ready(build_view(key, &entries)))
}

/// Derive every view from one fetched table.
pub fn build_view(key: RaidFactionKey, entries: &[LeaderboardEntry]) -> DashboardView {
    DashboardView {
        key,
        raid_name: key.raid.to_string(),
        table: ranked_table(entries),
        region_distribution: Chart {
            title: REGION_CHART_TITLE,
            x_axis: "Region",
            y_axis: COUNT_AXIS,
            data: region_distribution(entries),
        },
        realm_distribution: Chart {
            title: REALM_CHART_TITLE,
            x_axis: "Realm",
            y_axis: COUNT_AXIS,
            data: realm_distribution(entries),
        },
        time_series: Chart {
            title: TIME_SERIES_TITLE,
            x_axis: "Date",
            y_axis: "Rank",
            data: time_series(entries),
        },
    }
}

/// Table rows in fetch order; the first three rows get podium emphasis.
pub fn ranked_table(entries: &[LeaderboardEntry]) -> Vec<TableRow> {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| TableRow {
            guild: entry.guild_name.clone(),
            region: entry.region,
            realm: entry.realm_name.clone(),
            faction: entry.faction,
            date: entry.recorded_at,
            rank: entry.rank,
            emphasis: Podium::for_position(position),
        })
        .collect()
}

pub fn region_distribution(entries: &[LeaderboardEntry]) -> Vec<CategoryCount> {
    frequency(entries.iter().map(|e| e.region.to_string()))
}

pub fn realm_distribution(entries: &[LeaderboardEntry]) -> Vec<CategoryCount> {
    frequency(entries.iter().map(|e| e.realm_name.clone()))
}

/// Count labels, most frequent first, ties in ascending label order.
fn frequency(labels: impl Iterator<Item = String>) -> Vec<CategoryCount> {
    labels
        .counts()
        .into_iter()
        .sorted_by(|(a_label, a_count), (b_label, b_count)| {
            b_count.cmp(a_count).then_with(|| a_label.cmp(b_label))
        })
        .map(|(label, count)| CategoryCount::new(label, count))
        .collect()
}

/// Date and rank per entry, kept in table order rather than sorted by date.
pub fn time_series(entries: &[LeaderboardEntry]) -> Vec<TimePoint> {
    entries
        .iter()
        .map(|entry| TimePoint {
            recorded_at: entry.recorded_at,
            rank: entry.rank,
            region: entry.region,
        })
        .collect()
}
