// Playoff outcomes: champion from the winners bracket, last place from the
// regular-season record.

use std::fmt;

use leaguebook_core::records::BracketMatch;
use serde::Serialize;

use crate::history::LeagueHistory;
use crate::identity::Identity;
use crate::season::Season;

/// A derived placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "identity", rename_all = "snake_case")]
pub enum Finisher {
    Team(Identity),
    Unknown,
}

impl Finisher {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Finisher::Team(identity) => Some(identity),
            Finisher::Unknown => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Finisher::Team(identity) => &identity.display_name,
            Finisher::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Finisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Champion and last place for one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonHonours {
    pub season: String,
    pub league_id: String,
    pub champion: Finisher,
    pub last_place: Finisher,
}

/// The championship winner.
///
/// The final is the match flagged with placement 1; brackets without that
/// flag fall back to the matches of the highest round. The first candidate
/// with a recorded winner decides. Unowned winners are `Unknown`.
pub fn derive_champion(season: &Season, bracket: &[BracketMatch]) -> Finisher {
    let mut candidates: Vec<&BracketMatch> = bracket.iter().filter(|m| m.p == Some(1)).collect();
    if candidates.is_empty() {
        let Some(final_round) = bracket.iter().map(|m| m.r).max() else {
            return Finisher::Unknown;
        };
        candidates = bracket.iter().filter(|m| m.r == final_round).collect();
    }

    candidates
        .into_iter()
        .find_map(BracketMatch::winner_roster_id)
        .and_then(|roster_id| season.owned_team(roster_id))
        .map(|t| Finisher::Team(t.identity.clone()))
        .unwrap_or(Finisher::Unknown)
}

/// Fewest wins among owned teams, fewest points-for breaking ties.
///
/// A regular-season heuristic; it does not read a losers bracket.
pub fn derive_last_place(season: &Season) -> Finisher {
    season
        .owned_teams()
        .min_by(|a, b| {
            a.record
                .wins
                .cmp(&b.record.wins)
                .then_with(|| a.points_for.cmp(&b.points_for))
        })
        .map(|t| Finisher::Team(t.identity.clone()))
        .unwrap_or(Finisher::Unknown)
}

/// Champion and last place of every season, newest season first.
pub fn season_honours(history: &LeagueHistory) -> Vec<SeasonHonours> {
    let mut honours: Vec<SeasonHonours> = history
        .iter()
        .map(|data| SeasonHonours {
            season: data.season.label.clone(),
            league_id: data.season.league_id.clone(),
            champion: derive_champion(&data.season, &data.bracket),
            last_place: derive_last_place(&data.season),
        })
        .collect();
    honours.sort_by(|a, b| b.season.cmp(&a.season));
    honours
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SeasonData;
    use crate::testutil::season;

    fn bracket_match(r: u32, m: u32, w: Option<u32>, p: Option<u32>) -> BracketMatch {
        BracketMatch {
            r,
            m,
            w,
            p,
            ..BracketMatch::default()
        }
    }

    fn four_teams() -> Season {
        season(
            "L1",
            "2024",
            &[
                (1, Some("alice"), 10, 4, 1600),
                (2, Some("bob"), 9, 5, 1500),
                (3, Some("carol"), 3, 11, 1200),
                (4, Some("dave"), 3, 11, 1100),
                (5, None, 0, 14, 800),
            ],
        )
    }

    #[test]
    fn placement_flag_picks_the_final() {
        let bracket = vec![
            bracket_match(3, 6, Some(2), Some(3)),
            bracket_match(3, 7, Some(1), Some(1)),
        ];
        assert_eq!(derive_champion(&four_teams(), &bracket).display_name(), "alice");
    }

    #[test]
    fn max_round_fallback_matches_flagged_final() {
        let flagged = vec![
            bracket_match(1, 1, Some(2), None),
            bracket_match(2, 3, Some(1), Some(1)),
        ];
        let unflagged = vec![
            bracket_match(1, 1, Some(2), None),
            bracket_match(2, 3, Some(1), None),
        ];
        let s = four_teams();
        assert_eq!(derive_champion(&s, &flagged), derive_champion(&s, &unflagged));
    }

    #[test]
    fn legacy_winner_field_is_read() {
        let legacy = BracketMatch {
            r: 3,
            m: 7,
            winner: Some(2),
            p: Some(1),
            ..BracketMatch::default()
        };
        assert_eq!(derive_champion(&four_teams(), &[legacy]).display_name(), "bob");
    }

    #[test]
    fn missing_data_is_unknown() {
        let s = four_teams();
        assert_eq!(derive_champion(&s, &[]), Finisher::Unknown);
        assert_eq!(derive_champion(&s, &[bracket_match(3, 7, None, Some(1))]), Finisher::Unknown);
        assert_eq!(derive_champion(&s, &[bracket_match(3, 7, Some(5), Some(1))]), Finisher::Unknown);
        assert_eq!(derive_champion(&s, &[bracket_match(3, 7, Some(42), Some(1))]).to_string(), "Unknown");
    }

    #[test]
    fn last_place_uses_wins_then_points() {
        assert_eq!(derive_last_place(&four_teams()).display_name(), "dave");
        assert_eq!(derive_last_place(&season("L", "2020", &[])), Finisher::Unknown);
    }

    #[test]
    fn honours_are_newest_first() {
        let history = LeagueHistory::new(vec![
            SeasonData::new(season("A", "2022", &[(1, Some("x"), 1, 0, 10)])),
            SeasonData::new(season("C", "2024", &[(1, Some("y"), 1, 0, 10)])),
            SeasonData::new(season("B", "2023", &[(1, Some("z"), 1, 0, 10)])),
        ]);
        let labels: Vec<String> = season_honours(&history).into_iter().map(|h| h.season).collect();
        assert_eq!(labels, vec!["2024", "2023", "2022"]);
    }
}
