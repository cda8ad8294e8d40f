// Draft analysis: how each pick actually scored over the regular season.

use std::collections::HashMap;

use leaguebook_core::records::{non_blank, DraftPickRecord, PlayerInfo};
use leaguebook_core::Points;
use serde::Serialize;

use crate::high_scores::player_display_name;
use crate::history::{LeagueHistory, SeasonData};
use crate::identity::{Identity, IdentityResolver};

/// One pick with its realised value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftPickAnalysis {
    pub pick_no: u32,
    pub round: u32,
    pub player_id: String,
    pub player_name: String,
    pub position: Option<String>,
    pub drafter: Identity,
    /// Regular-season total across every week before the playoffs.
    pub season_points: Points,
    /// 1 = highest-scoring player of this draft.
    pub value_rank: usize,
}

/// A season's draft, picks in draft order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSummary {
    pub season: String,
    pub draft_id: String,
    pub picks: Vec<DraftPickAnalysis>,
}

/// Analyse every season that has a draft, newest first.
pub fn draft_analysis(
    history: &LeagueHistory,
    players: &HashMap<String, PlayerInfo>,
    resolver: &IdentityResolver,
) -> Vec<DraftSummary> {
    history
        .iter()
        .filter_map(|data| analyze_season_draft(data, players, resolver))
        .collect()
}

/// Analyse one season's draft; `None` when the season has none.
pub fn analyze_season_draft(
    data: &SeasonData,
    players: &HashMap<String, PlayerInfo>,
    resolver: &IdentityResolver,
) -> Option<DraftSummary> {
    let draft = data.draft.as_ref()?;
    let season = &data.season;
    let totals = regular_season_totals(data);

    let mut picks: Vec<&DraftPickRecord> = draft.picks.iter().collect();
    picks.sort_by_key(|p| p.pick_no);

    let mut analysed: Vec<DraftPickAnalysis> = picks
        .into_iter()
        .map(|pick| {
            let info = players.get(&pick.player_id);
            let drafter = pick
                .roster_id
                .and_then(|id| season.team(id))
                .or_else(|| {
                    let picked_by = non_blank(pick.picked_by.as_deref())?;
                    season
                        .teams
                        .iter()
                        .find(|t| t.owner_id.as_deref() == Some(picked_by))
                })
                .map(|t| t.identity.clone())
                .unwrap_or_else(|| {
                    resolver.resolve(
                        &season.league_id,
                        pick.roster_id.unwrap_or_default(),
                        pick.picked_by.as_deref(),
                    )
                });

            DraftPickAnalysis {
                pick_no: pick.pick_no,
                round: pick.round,
                player_id: pick.player_id.clone(),
                player_name: pick_player_name(pick, info),
                position: info
                    .and_then(|p| p.position.clone())
                    .or_else(|| pick.metadata.as_ref().and_then(|m| m.position.clone())),
                drafter,
                season_points: totals.get(pick.player_id.as_str()).copied().unwrap_or_default(),
                value_rank: 0,
            }
        })
        .collect();

    let mut by_value: Vec<usize> = (0..analysed.len()).collect();
    by_value.sort_by(|&a, &b| analysed[b].season_points.cmp(&analysed[a].season_points));
    for (rank, idx) in by_value.into_iter().enumerate() {
        analysed[idx].value_rank = rank + 1;
    }

    Some(DraftSummary {
        season: season.label.clone(),
        draft_id: draft.draft.draft_id.clone(),
        picks: analysed,
    })
}

/// Per-player points summed over weeks `1..playoff_week_start`.
fn regular_season_totals(data: &SeasonData) -> HashMap<&str, Points> {
    let mut totals: HashMap<&str, Points> = HashMap::new();
    let end = data.season.playoff_week_start.max(1);
    for entries in data.weeks.range(1..end).map(|(_, e)| e) {
        for entry in entries {
            for (player_id, &points) in &entry.players_points {
                *totals.entry(player_id.as_str()).or_default() += Points::from_f64(points);
            }
        }
    }
    totals
}

fn pick_player_name(pick: &DraftPickRecord, info: Option<&PlayerInfo>) -> String {
    if info.is_some() {
        return player_display_name(info, &pick.player_id);
    }
    let from_metadata = pick.metadata.as_ref().map(|m| PlayerInfo {
        first_name: m.first_name.clone(),
        last_name: m.last_name.clone(),
        ..PlayerInfo::default()
    });
    player_display_name(from_metadata.as_ref(), &pick.player_id)
}
