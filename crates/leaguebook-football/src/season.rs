// One season of a league: metadata plus resolved teams.

use std::collections::HashMap;

use leaguebook_core::records::{League, RosterRecord, UserRecord};
use leaguebook_core::Points;
use serde::Serialize;

use crate::identity::{Identity, IdentityResolver};

/// Win/loss/tie record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// (wins + ½ ties) / games; 0 when no games were played.
    pub fn win_pct(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => (f64::from(self.wins) + 0.5 * f64::from(self.ties)) / f64::from(games),
        }
    }

    pub fn add(&mut self, other: Record) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.ties += other.ties;
    }
}

/// A roster slot within one season, with its resolved owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    pub identity: Identity,
    /// Custom team name from the owner's profile, if set.
    pub team_name: Option<String>,
    pub record: Record,
    pub points_for: Points,
    pub points_against: Points,
}

impl Team {
    pub fn is_owned(&self) -> bool {
        self.identity.is_owned()
    }
}

/// A fetched season with its teams resolved. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Season {
    pub league_id: String,
    /// Year label, e.g. "2024".
    pub label: String,
    pub name: String,
    pub previous_league_id: Option<String>,
    pub status: Option<String>,
    pub playoff_week_start: u32,
    /// Sorted by roster id.
    pub teams: Vec<Team>,
}

impl Season {
    /// Join rosters with their owners and resolve every slot's identity.
    pub fn assemble(
        league: &League,
        rosters: &[RosterRecord],
        users: &[UserRecord],
        resolver: &IdentityResolver,
    ) -> Season {
        let users_by_id: HashMap<&str, &UserRecord> =
            users.iter().map(|u| (u.user_id.as_str(), u)).collect();

        let mut teams: Vec<Team> = rosters
            .iter()
            .map(|roster| {
                let user = roster
                    .owner_id
                    .as_deref()
                    .and_then(|id| users_by_id.get(id).copied());
                Team {
                    roster_id: roster.roster_id,
                    owner_id: roster.owner_id.clone(),
                    identity: resolver.resolve_roster(&league.league_id, roster, user),
                    team_name: user.and_then(|u| u.team_name()).map(str::to_string),
                    record: Record {
                        wins: roster.settings.wins,
                        losses: roster.settings.losses,
                        ties: roster.settings.ties,
                    },
                    points_for: roster.points_for(),
                    points_against: roster.points_against(),
                }
            })
            .collect();
        teams.sort_by_key(|t| t.roster_id);

        Season {
            league_id: league.league_id.clone(),
            label: league.season.clone(),
            name: league.name.clone(),
            previous_league_id: league.predecessor().map(str::to_string),
            status: league.status.clone(),
            playoff_week_start: league.playoff_week_start(),
            teams,
        }
    }

    pub fn team(&self, roster_id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.roster_id == roster_id)
    }

    /// The team for `roster_id`, only if it has a resolvable owner.
    pub fn owned_team(&self, roster_id: u32) -> Option<&Team> {
        self.team(roster_id).filter(|t| t.is_owned())
    }

    pub fn owned_teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(|t| t.is_owned())
    }

    /// Identity for a roster slot; synthetic when the slot is unknown.
    pub fn identity_of(&self, roster_id: u32) -> Identity {
        self.team(roster_id)
            .map(|t| t.identity.clone())
            .unwrap_or_else(|| Identity::synthetic(roster_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaguebook_core::records::{RosterSettings, UserMetadata};

    #[test]
    fn assemble_joins_owners_and_sorts() {
        let league = League {
            league_id: "L1".into(),
            season: "2024".into(),
            previous_league_id: Some("L0".into()),
            ..League::default()
        };
        let rosters = vec![
            RosterRecord {
                roster_id: 2,
                owner_id: None,
                ..RosterRecord::default()
            },
            RosterRecord {
                roster_id: 1,
                owner_id: Some("u1".into()),
                settings: RosterSettings {
                    wins: 10,
                    losses: 4,
                    fpts: 1500,
                    fpts_decimal: 25,
                    ..RosterSettings::default()
                },
            },
        ];
        let users = vec![UserRecord {
            user_id: "u1".into(),
            username: Some("alice".into()),
            display_name: None,
            metadata: Some(UserMetadata {
                team_name: Some("Gridiron Gang".into()),
            }),
        }];

        let season = Season::assemble(&league, &rosters, &users, &IdentityResolver::default());

        assert_eq!(season.label, "2024");
        assert_eq!(season.previous_league_id.as_deref(), Some("L0"));
        assert_eq!(season.playoff_week_start, 15);
        assert_eq!(season.teams[0].roster_id, 1);
        assert_eq!(season.teams[0].identity.handle, "@alice");
        assert_eq!(season.teams[0].team_name.as_deref(), Some("Gridiron Gang"));
        assert_eq!(season.teams[0].points_for, Points::from_parts(1500, 25));
        assert_eq!(season.teams[0].record.games(), 14);

        assert!(season.owned_team(2).is_none());
        assert_eq!(season.team(2).map(|t| t.identity.display_name.as_str()), Some("Team 2"));
        assert_eq!(season.owned_teams().count(), 1);
        assert_eq!(season.identity_of(9).display_name, "Team 9");
    }

    #[test]
    fn win_pct_counts_ties_as_half() {
        let r = Record {
            wins: 1,
            losses: 0,
            ties: 1,
        };
        assert!((r.win_pct() - 0.75).abs() < 1e-9);
        assert_eq!(Record::default().win_pct(), 0.0);
    }
}
