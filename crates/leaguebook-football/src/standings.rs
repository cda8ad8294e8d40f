// Per-season standings table.

use leaguebook_core::Points;
use serde::Serialize;

use crate::identity::Identity;
use crate::season::{Record, Season};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsRow {
    /// 1-based position.
    pub rank: usize,
    pub roster_id: u32,
    pub identity: Identity,
    pub team_name: Option<String>,
    pub record: Record,
    pub points_for: Points,
    pub points_against: Points,
}

/// Every team in the season, including unowned slots, ordered by wins
/// descending then points-for descending.
pub fn season_standings(season: &Season) -> Vec<StandingsRow> {
    let mut teams: Vec<_> = season.teams.iter().collect();
    teams.sort_by(|a, b| {
        b.record
            .wins
            .cmp(&a.record.wins)
            .then_with(|| b.points_for.cmp(&a.points_for))
    });

    teams
        .into_iter()
        .enumerate()
        .map(|(i, t)| StandingsRow {
            rank: i + 1,
            roster_id: t.roster_id,
            identity: t.identity.clone(),
            team_name: t.team_name.clone(),
            record: t.record,
            points_for: t.points_for,
            points_against: t.points_against,
        })
        .collect()
}
