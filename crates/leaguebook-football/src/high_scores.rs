// All-time single-week high scores, by team and by individual starter.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use leaguebook_core::records::{non_blank, MatchupRecord, PlayerInfo};
use leaguebook_core::Points;
use serde::Serialize;
use tracing::debug;

use crate::history::{opponent_of, LeagueHistory};
use crate::identity::Identity;

/// Default length of the high-score tables.
pub const DEFAULT_TOP_N: usize = 20;

/// The best team score of one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWeekHigh {
    pub season: String,
    pub week: u32,
    pub roster_id: u32,
    pub team: Identity,
    pub points: Points,
    /// `None` when the entry had no matchup partner.
    pub opponent: Option<Identity>,
    pub opponent_points: Option<Points>,
}

/// One starter's score in one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerWeekHigh {
    pub season: String,
    pub week: u32,
    pub player_id: String,
    pub player_name: String,
    pub position: Option<String>,
    pub team: Identity,
    pub points: Points,
}

/// Highest team score of every season/week, best first, at most `limit`.
///
/// Ties within a week go to the first entry. Weeks where nobody scored
/// (not yet played) produce no row.
pub fn top_team_weeks(
    history: &LeagueHistory,
    weeks: RangeInclusive<u32>,
    limit: usize,
) -> Vec<TeamWeekHigh> {
    let mut highs = Vec::new();

    for data in history.iter() {
        let season = &data.season;
        for week in weeks.clone() {
            let Some(entries) = data.weeks.get(&week) else {
                continue;
            };
            let best = entries.iter().fold(None, |best: Option<&MatchupRecord>, e| match best {
                Some(b) if b.score() >= e.score() => Some(b),
                _ => Some(e),
            });
            let Some(best) = best.filter(|b| b.score().is_positive()) else {
                continue;
            };

            let opponent = opponent_of(entries, best);
            highs.push(TeamWeekHigh {
                season: season.label.clone(),
                week,
                roster_id: best.roster_id,
                team: season.identity_of(best.roster_id),
                points: best.score(),
                opponent: opponent.map(|o| season.identity_of(o.roster_id)),
                opponent_points: opponent.map(|o| o.score()),
            });
        }
    }

    highs.sort_by(|a, b| b.points.cmp(&a.points));
    highs.truncate(limit);
    highs
}

/// Best individual starter performances, best first, at most `limit`.
///
/// Entries whose starter list is empty or does not line up with the starter
/// points are skipped, as are non-positive scores.
pub fn top_player_weeks(
    history: &LeagueHistory,
    weeks: RangeInclusive<u32>,
    players: &HashMap<String, PlayerInfo>,
    limit: usize,
) -> Vec<PlayerWeekHigh> {
    let mut highs = Vec::new();

    for data in history.iter() {
        let season = &data.season;
        for week in weeks.clone() {
            let Some(entries) = data.weeks.get(&week) else {
                continue;
            };
            for entry in entries {
                if entry.starters.is_empty() || entry.starters.len() != entry.starters_points.len() {
                    debug!(
                        "Season {} week {} roster {}: starters and points misaligned, skipped",
                        season.label, week, entry.roster_id
                    );
                    continue;
                }
                for (player_id, &raw) in entry.starters.iter().zip(&entry.starters_points) {
                    let points = Points::from_f64(raw);
                    if !points.is_positive() {
                        continue;
                    }
                    let info = players.get(player_id);
                    highs.push(PlayerWeekHigh {
                        season: season.label.clone(),
                        week,
                        player_id: player_id.clone(),
                        player_name: player_display_name(info, player_id),
                        position: info.and_then(|p| p.position.clone()),
                        team: season.identity_of(entry.roster_id),
                        points,
                    });
                }
            }
        }
    }

    highs.sort_by(|a, b| b.points.cmp(&a.points));
    highs.truncate(limit);
    highs
}

/// Full name, then "first last", then whichever part exists, then the id.
pub fn player_display_name(info: Option<&PlayerInfo>, player_id: &str) -> String {
    let Some(info) = info else {
        return player_id.to_string();
    };
    if let Some(full) = non_blank(info.full_name.as_deref()) {
        return full.to_string();
    }
    match (
        non_blank(info.first_name.as_deref()),
        non_blank(info.last_name.as_deref()),
    ) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(part), None) | (None, Some(part)) => part.to_string(),
        (None, None) => player_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SeasonData;
    use crate::testutil::{entry, season, starters};
    use leaguebook_core::records::MatchupRecord;

    fn two_team_season(label: &str) -> SeasonData {
        SeasonData::new(season(
            &format!("L{label}"),
            label,
            &[(1, Some("alice"), 0, 0, 0), (2, Some("bob"), 0, 0, 0), (3, None, 0, 0, 0)],
        ))
    }

    #[test]
    fn one_row_per_week_with_opponent() {
        let data = two_team_season("2024")
            .with_week(1, vec![entry(1, 1, 120.5), entry(2, 1, 99.0)])
            .with_week(2, vec![entry(1, 1, 88.0), entry(2, 1, 140.0)]);
        let highs = top_team_weeks(&LeagueHistory::new(vec![data]), 1..=18, DEFAULT_TOP_N);

        assert_eq!(highs.len(), 2);
        assert_eq!(highs[0].week, 2);
        assert_eq!(highs[0].team.handle, "@bob");
        assert_eq!(highs[0].opponent.as_ref().map(|o| o.handle.as_str()), Some("@alice"));
        assert_eq!(highs[0].opponent_points, Some(Points::from_f64(88.0)));
        assert_eq!(highs[1].points, Points::from_f64(120.5));
    }

    #[test]
    fn first_entry_wins_ties_and_bye_has_no_opponent() {
        let bye = MatchupRecord {
            roster_id: 2,
            matchup_id: None,
            points: Some(100.0),
            ..MatchupRecord::default()
        };
        let data = two_team_season("2024").with_week(1, vec![bye, entry(1, 1, 100.0)]);
        let highs = top_team_weeks(&LeagueHistory::new(vec![data]), 1..=18, DEFAULT_TOP_N);
        assert_eq!(highs[0].roster_id, 2);
        assert!(highs[0].opponent.is_none());
    }

    #[test]
    fn unplayed_weeks_are_skipped() {
        let data = two_team_season("2024").with_week(1, vec![entry(1, 1, 0.0), entry(2, 1, 0.0)]);
        assert!(top_team_weeks(&LeagueHistory::new(vec![data]), 1..=18, 5).is_empty());
    }

    #[test]
    fn truncation_is_min_of_limit_and_weeks() {
        let mut data = two_team_season("2024");
        for week in 1..=6 {
            data = data.with_week(week, vec![entry(1, 1, 100.0 + week as f64), entry(2, 1, 90.0)]);
        }
        let history = LeagueHistory::new(vec![data]);

        assert_eq!(top_team_weeks(&history, 1..=18, 4).len(), 4);
        assert_eq!(top_team_weeks(&history, 1..=18, 20).len(), 6);
        assert_eq!(
            top_team_weeks(&history, 1..=18, 4),
            top_team_weeks(&history, 1..=18, 4)
        );
    }

    #[test]
    fn unowned_high_scorer_is_synthetic() {
        let data = two_team_season("2024").with_week(1, vec![entry(3, 1, 150.0), entry(1, 1, 90.0)]);
        let highs = top_team_weeks(&LeagueHistory::new(vec![data]), 1..=18, 5);
        assert_eq!(highs[0].team.display_name, "Team 3");
    }

    #[test]
    fn player_rows_skip_misaligned_and_non_positive() {
        let mut misaligned = starters(2, 1, &[("p3", 50.0)]);
        misaligned.starters_points.push(1.0);

        let data = two_team_season("2024").with_week(
            1,
            vec![
                starters(1, 1, &[("p1", 31.4), ("p2", 0.0), ("p4", -2.0)]),
                misaligned,
                starters(3, 2, &[]),
            ],
        );
        let mut players = HashMap::new();
        players.insert(
            "p1".to_string(),
            PlayerInfo {
                first_name: Some("Josh".into()),
                last_name: Some("Allen".into()),
                position: Some("QB".into()),
                ..PlayerInfo::default()
            },
        );

        let highs = top_player_weeks(&LeagueHistory::new(vec![data]), 1..=18, &players, 20);
        assert_eq!(highs.len(), 1);
        assert_eq!(highs[0].player_name, "Josh Allen");
        assert_eq!(highs[0].position.as_deref(), Some("QB"));
        assert_eq!(highs[0].team.handle, "@alice");
        assert_eq!(highs[0].points, Points::from_f64(31.4));
    }

    #[test]
    fn player_rows_merge_across_seasons() {
        let newer = two_team_season("2024").with_week(3, vec![starters(1, 1, &[("a", 40.0)])]);
        let older = two_team_season("2023").with_week(3, vec![starters(2, 1, &[("b", 45.0)])]);
        let highs = top_player_weeks(
            &LeagueHistory::new(vec![newer, older]),
            1..=18,
            &HashMap::new(),
            20,
        );
        assert_eq!(highs[0].season, "2023");
        assert_eq!(highs[0].player_name, "b");
        assert_eq!(highs[1].season, "2024");
    }

    #[test]
    fn display_name_fallbacks() {
        let mut info = PlayerInfo {
            full_name: Some("Christian McCaffrey".into()),
            first_name: Some("Christian".into()),
            last_name: Some("McCaffrey".into()),
            ..PlayerInfo::default()
        };
        assert_eq!(player_display_name(Some(&info), "x"), "Christian McCaffrey");
        info.full_name = None;
        assert_eq!(player_display_name(Some(&info), "x"), "Christian McCaffrey");
        info.first_name = None;
        assert_eq!(player_display_name(Some(&info), "x"), "McCaffrey");
        info.last_name = Some(" ".into());
        assert_eq!(player_display_name(Some(&info), "x"), "x");
        assert_eq!(player_display_name(None, "4046"), "4046");
    }
}
