// Wire records for the Sleeper read API.
//
// Sleeper payloads are loosely shaped: fields go missing between seasons,
// ids arrive as null, and settings blocks are omitted for empty rosters.
// Every field that can be absent is either `Option` or `#[serde(default)]`
// so a record either decodes or the whole response is rejected as malformed.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::points::Points;

/// Playoff start week assumed when a season's settings omit it.
pub const DEFAULT_PLAYOFF_WEEK_START: u32 = 15;

// ---------------------------------------------------------------------------
// League (one season)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub league_id: String,
    /// Year label, e.g. "2024".
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Predecessor season. `None` (or an empty / "0" id) marks the root.
    #[serde(default)]
    pub previous_league_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: LeagueSettings,
}

impl League {
    /// The predecessor id, if it points anywhere.
    pub fn predecessor(&self) -> Option<&str> {
        self.previous_league_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != "0")
    }

    pub fn playoff_week_start(&self) -> u32 {
        self.settings
            .playoff_week_start
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_PLAYOFF_WEEK_START)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSettings {
    #[serde(default)]
    pub playoff_week_start: Option<u32>,
}

// ---------------------------------------------------------------------------
// Rosters and users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: RosterSettings,
}

impl RosterRecord {
    pub fn points_for(&self) -> Points {
        self.settings.points_for()
    }

    pub fn points_against(&self) -> Points {
        self.settings.points_against()
    }
}

/// Cumulative season settings. Points come split into whole and hundredths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub fpts: i64,
    #[serde(default)]
    pub fpts_decimal: i64,
    #[serde(default)]
    pub fpts_against: i64,
    #[serde(default)]
    pub fpts_against_decimal: i64,
}

impl RosterSettings {
    pub fn points_for(&self) -> Points {
        Points::from_parts(self.fpts, self.fpts_decimal)
    }

    pub fn points_against(&self) -> Points {
        Points::from_parts(self.fpts_against, self.fpts_against_decimal)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<UserMetadata>,
}

impl UserRecord {
    /// The most stable account handle this record offers:
    /// username, then display name, then the raw user id.
    pub fn handle(&self) -> &str {
        non_blank(self.username.as_deref())
            .or_else(|| non_blank(self.display_name.as_deref()))
            .unwrap_or(&self.user_id)
    }

    pub fn team_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| non_blank(m.team_name.as_deref()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Matchups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub roster_id: u32,
    /// Shared by the rosters that faced each other. Null for byes.
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters_points: Vec<f64>,
    /// Every rostered player's score that week, bench included.
    #[serde(default, deserialize_with = "null_as_default")]
    pub players_points: HashMap<String, f64>,
}

impl MatchupRecord {
    pub fn score(&self) -> Points {
        self.points.map(Points::from_f64).unwrap_or(Points::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Playoff bracket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    /// Round number, 1-based.
    #[serde(default)]
    pub r: u32,
    /// Match id within the bracket.
    #[serde(default)]
    pub m: u32,
    #[serde(default)]
    pub t1: Option<u32>,
    #[serde(default)]
    pub t2: Option<u32>,
    #[serde(default)]
    pub w: Option<u32>,
    /// Older payloads spell the winner out.
    #[serde(default)]
    pub winner: Option<u32>,
    #[serde(default)]
    pub l: Option<u32>,
    /// Final placement decided by this match (1 = championship game).
    #[serde(default)]
    pub p: Option<u32>,
}

impl BracketMatch {
    pub fn winner_roster_id(&self) -> Option<u32> {
        self.w.or(self.winner)
    }
}

// ---------------------------------------------------------------------------
// Player directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub draft_id: String,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub draft_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftPickRecord {
    pub pick_no: u32,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub roster_id: Option<u32>,
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub picked_by: Option<String>,
    #[serde(default)]
    pub metadata: Option<DraftPickMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftPickMetadata {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `Some` only for strings with visible content.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}
