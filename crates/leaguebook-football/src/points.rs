// Points-for / points-against leaderboards, per season and all-time.

use std::collections::{HashMap, HashSet};

use leaguebook_core::Points;
use serde::Serialize;

use crate::identity::Identity;
use crate::season::{Record, Season};

/// One owned team's totals for a single season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsRow {
    pub season: String,
    pub roster_id: u32,
    pub identity: Identity,
    pub team_name: Option<String>,
    pub points_for: Points,
    pub points_against: Points,
}

/// One participant's totals across every season of the lineage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTimePointsRow {
    pub identity: Identity,
    pub seasons_played: usize,
    pub record: Record,
    pub points_for: Points,
    pub points_against: Points,
}

/// Owned teams of `season`, highest points-for first.
pub fn season_points(season: &Season) -> Vec<PointsRow> {
    let mut rows: Vec<PointsRow> = season
        .owned_teams()
        .map(|t| PointsRow {
            season: season.label.clone(),
            roster_id: t.roster_id,
            identity: t.identity.clone(),
            team_name: t.team_name.clone(),
            points_for: t.points_for,
            points_against: t.points_against,
        })
        .collect();
    rows.sort_by(|a, b| b.points_for.cmp(&a.points_for));
    rows
}

/// Sum every owned team's season totals per identity.
///
/// Sorted by points-for descending; equal totals keep the order in which
/// the identities first appear in `seasons`.
pub fn all_time_points<'a>(seasons: impl IntoIterator<Item = &'a Season>) -> Vec<AllTimePointsRow> {
    let mut rows: Vec<AllTimePointsRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: Vec<HashSet<String>> = Vec::new();

    for season in seasons {
        for team in season.owned_teams() {
            let slot = *index.entry(team.identity.handle.clone()).or_insert_with(|| {
                rows.push(AllTimePointsRow {
                    identity: team.identity.clone(),
                    seasons_played: 0,
                    record: Record::default(),
                    points_for: Points::ZERO,
                    points_against: Points::ZERO,
                });
                seen.push(HashSet::new());
                rows.len() - 1
            });

            let row = &mut rows[slot];
            row.points_for += team.points_for;
            row.points_against += team.points_against;
            row.record.add(team.record);
            if seen[slot].insert(season.league_id.clone()) {
                row.seasons_played += 1;
            }
        }
    }

    rows.sort_by(|a, b| b.points_for.cmp(&a.points_for));
    rows
}
