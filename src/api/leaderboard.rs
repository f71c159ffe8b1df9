use std::collections::HashMap;

use chrono::DateTime;
use itertools::Itertools;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api;
use crate::config::API_NAMESPACE;
use crate::error::{LeaderboardError, Result};
use crate::model::{Faction, LeaderboardEntry, RaidFactionKey, Region};

const PREFERRED_LOCALE: &str = "en_US";

#[derive(Debug, Deserialize)]
struct HallOfFame {
    entries: Option<Vec<RawEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    guild: RawGuild,
    faction: RawFaction,
    timestamp: i64,
    region: String,
    rank: i64,
}

#[derive(Debug, Deserialize)]
struct RawGuild {
    name: String,
    realm: RawRealm,
}

#[derive(Debug, Deserialize)]
struct RawRealm {
    name: LocalizedName,
}

#[derive(Debug, Deserialize)]
struct RawFaction {
    #[serde(rename = "type")]
    kind: String,
}

/// Realm names come back as a single string when a locale is requested
/// and as a locale map otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocalizedName {
    Plain(String),
    Localized(HashMap<String, String>),
}

impl LocalizedName {
    /// `en_US` when present, else the alphabetically first locale.
    /// Blank names count as missing.
    fn into_preferred(self) -> Option<String> {
        let present = |name: &String| !name.trim().is_empty();
        match self {
            LocalizedName::Plain(name) => Some(name).filter(present),
            LocalizedName::Localized(mut names) => names
                .remove(PREFERRED_LOCALE)
                .filter(present)
                .or_else(|| {
                    names
                        .into_iter()
                        .filter(|(_, name)| present(name))
                        .sorted_by(|a, b| a.0.cmp(&b.0))
                        .map(|(_, name)| name)
                        .next()
                }),
        }
    }
}

pub(crate) fn hall_of_fame_url(api_url: &str, key: RaidFactionKey) -> String {
    format!(
        "{}/data/wow/leaderboard/hall-of-fame/{}/{}?namespace={API_NAMESPACE}",
        api_url.trim_end_matches('/'),
        key.raid.slug(),
        key.faction.slug(),
    )
}

/// Fetch the US hall of fame for one raid and faction, in API order.
#[instrument(skip(client, token), fields(raid = key.raid.slug(), faction = key.faction.slug()))]
pub(crate) async fn get_hall_of_fame(
    client: &reqwest::Client,
    api_url: &str,
    token: &str,
    key: RaidFactionKey,
) -> Result<Vec<LeaderboardEntry>> {
    let url = hall_of_fame_url(api_url, key);
    let request = client
        .get(&url)
        .header(AUTHORIZATION, format!("Bearer {token}"));
    let hall_of_fame: HallOfFame = api::get_json(request, &url).await?;
    let raw_entries = hall_of_fame
        .entries
        .ok_or(LeaderboardError::MissingEntries { url })?;

    let entries = normalize_entries(raw_entries)?;
    debug!(count = entries.len(), "parsed leaderboard");
    Ok(entries)
}

fn normalize_entries(raw_entries: Vec<RawEntry>) -> Result<Vec<LeaderboardEntry>> {
    let entries: Vec<LeaderboardEntry> = raw_entries
        .into_iter()
        .map(normalize_entry)
        .collect::<Result<_>>()?;

    if let Some(rank) = entries.iter().map(|e| e.rank).duplicates().next() {
        return Err(LeaderboardError::DuplicateRank(rank));
    }

    Ok(entries)
}

fn normalize_entry(raw: RawEntry) -> Result<LeaderboardEntry> {
    let rank = u32::try_from(raw.rank)
        .ok()
        .filter(|rank| *rank > 0)
        .ok_or(LeaderboardError::InvalidRank(raw.rank))?;
    let recorded_at = DateTime::from_timestamp_millis(raw.timestamp)
        .ok_or(LeaderboardError::InvalidTimestamp(raw.timestamp))?;

    let realm_name = raw
        .guild
        .realm
        .name
        .into_preferred()
        .ok_or_else(|| LeaderboardError::MissingRealmName {
            guild: raw.guild.name.clone(),
        })?;

    Ok(LeaderboardEntry {
        guild_name: raw.guild.name,
        region: Region::from_code(&raw.region)?,
        realm_name,
        faction: Faction::from_api_type(&raw.faction.kind)?,
        rank,
        recorded_at,
    })
}
