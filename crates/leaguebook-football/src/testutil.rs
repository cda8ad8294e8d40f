// Shared fixture builders for unit tests.

use leaguebook_core::records::{League, MatchupRecord, RosterRecord, RosterSettings, UserRecord};

use crate::history::SeasonData;
use crate::identity::IdentityResolver;
use crate::season::Season;

/// (roster_id, username or None, wins, losses, points_for)
pub type TeamSpec<'a> = (u32, Option<&'a str>, u32, u32, i64);

pub fn season(league_id: &str, label: &str, teams: &[TeamSpec<'_>]) -> Season {
    let league = League {
        league_id: league_id.into(),
        season: label.into(),
        name: "Test League".into(),
        ..League::default()
    };
    let mut rosters = Vec::new();
    let mut users = Vec::new();
    for &(roster_id, username, wins, losses, pf) in teams {
        let owner_id = username.map(|u| format!("uid-{u}"));
        if let (Some(user_id), Some(name)) = (&owner_id, username) {
            users.push(UserRecord {
                user_id: user_id.clone(),
                username: Some(name.into()),
                display_name: None,
                metadata: None,
            });
        }
        rosters.push(RosterRecord {
            roster_id,
            owner_id,
            settings: RosterSettings {
                wins,
                losses,
                fpts: pf,
                fpts_against: 1000,
                ..RosterSettings::default()
            },
        });
    }
    Season::assemble(&league, &rosters, &users, &IdentityResolver::default())
}

pub fn entry(roster_id: u32, matchup_id: u32, points: f64) -> MatchupRecord {
    MatchupRecord {
        roster_id,
        matchup_id: Some(matchup_id),
        points: Some(points),
        ..MatchupRecord::default()
    }
}

pub fn starters(roster_id: u32, matchup_id: u32, lineup: &[(&str, f64)]) -> MatchupRecord {
    MatchupRecord {
        roster_id,
        matchup_id: Some(matchup_id),
        points: Some(lineup.iter().map(|(_, p)| p).sum()),
        starters: lineup.iter().map(|(id, _)| id.to_string()).collect(),
        starters_points: lineup.iter().map(|(_, p)| *p).collect(),
        players_points: lineup.iter().map(|(id, p)| (id.to_string(), *p)).collect(),
    }
}

/// Two-team season: roster 1 = alice, roster 2 = bob, one matchup in week 1.
pub fn head_to_head_season(league_id: &str, label: &str, alice: f64, bob: f64) -> SeasonData {
    SeasonData::new(season(
        league_id,
        label,
        &[(1, Some("alice"), 0, 0, 0), (2, Some("bob"), 0, 0, 0)],
    ))
    .with_week(1, vec![entry(1, 1, alice), entry(2, 1, bob)])
}
