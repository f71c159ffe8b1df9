use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::{EnumIter, EnumString};

use crate::error::{LeaderboardError, Result};

/// Region a guild plays in, as labelled on the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Region {
    Us,
    Eu,
    Cn,
    Kr,
    Tw,
}

impl Region {
    /// Translate the API's short region code. Unknown codes are a data error.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            "cn" => Ok(Region::Cn),
            "kr" => Ok(Region::Kr),
            "tw" => Ok(Region::Tw),
            other => Err(LeaderboardError::UnknownRegion(other.to_owned())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
            Region::Cn => "cn",
            Region::Kr => "kr",
            Region::Tw => "tw",
        }
    }
}

/// One of the two in-game allegiances.
///
/// Parsing accepts the API slug, the display name and the dashboard tab id,
/// ignoring ASCII case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Faction {
    #[strum(to_string = "Alliance", serialize = "tab-1-example")]
    Alliance,
    #[strum(to_string = "Horde", serialize = "tab-2-example")]
    Horde,
}

impl Faction {
    /// Path segment used by the hall-of-fame endpoint.
    pub fn slug(&self) -> &'static str {
        match self {
            Faction::Alliance => "alliance",
            Faction::Horde => "horde",
        }
    }

    /// Translate the `faction.type` value of a leaderboard entry.
    pub fn from_api_type(kind: &str) -> Result<Self> {
        match kind {
            "ALLIANCE" => Ok(Faction::Alliance),
            "HORDE" => Ok(Faction::Horde),
            other => Err(LeaderboardError::UnknownFaction(other.to_owned())),
        }
    }
}

/// The five raids tracked by the dashboard.
///
/// Parsing accepts the API slug, the dropdown short code and the display
/// name, ignoring ASCII case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    EnumString,
    EnumIter,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum Raid {
    #[strum(to_string = "Uldir", serialize = "U")]
    Uldir,
    #[strum(
        to_string = "Battle of Dazar'alor",
        serialize = "battle-of-dazaralor",
        serialize = "BattleOfDazaralor",
        serialize = "BOD"
    )]
    BattleOfDazaralor,
    #[strum(
        to_string = "Crucible of Storms",
        serialize = "crucible-of-storms",
        serialize = "CrucibleOfStorms",
        serialize = "COS"
    )]
    CrucibleOfStorms,
    #[strum(
        to_string = "The Eternal Palace",
        serialize = "the-eternal-palace",
        serialize = "TheEternalPalace",
        serialize = "TEP"
    )]
    TheEternalPalace,
    #[strum(
        to_string = "Ny'alotha, the Waking City",
        serialize = "nyalotha-the-waking-city",
        serialize = "NyalothaTheWakingCity",
        serialize = "NTWC"
    )]
    NyalothaTheWakingCity,
}

impl Raid {
    /// Identifier used in the hall-of-fame endpoint path.
    pub fn slug(&self) -> &'static str {
        match self {
            Raid::Uldir => "uldir",
            Raid::BattleOfDazaralor => "battle-of-dazaralor",
            Raid::CrucibleOfStorms => "crucible-of-storms",
            Raid::TheEternalPalace => "the-eternal-palace",
            Raid::NyalothaTheWakingCity => "nyalotha-the-waking-city",
        }
    }

    /// Short code used by the raid dropdown.
    pub fn code(&self) -> &'static str {
        match self {
            Raid::Uldir => "U",
            Raid::BattleOfDazaralor => "BOD",
            Raid::CrucibleOfStorms => "COS",
            Raid::TheEternalPalace => "TEP",
            Raid::NyalothaTheWakingCity => "NTWC",
        }
    }
}

/// Lookup key for one leaderboard: a raid seen from one faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RaidFactionKey {
    pub raid: Raid,
    pub faction: Faction,
}

impl RaidFactionKey {
    pub fn new(raid: Raid, faction: Faction) -> Self {
        Self { raid, faction }
    }
}

/// A single normalized leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub guild_name: String,
    pub region: Region,
    pub realm_name: String,
    pub faction: Faction,
    pub rank: u32,
    pub recorded_at: DateTime<Utc>,
}
