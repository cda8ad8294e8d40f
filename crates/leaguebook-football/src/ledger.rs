// Head-to-head ledger: all-time win/loss/tie record between every pair of
// participants, built from weekly matchups across the whole lineage.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use leaguebook_core::Points;
use serde::Serialize;
use tracing::debug;

use crate::history::{matchup_groups, LeagueHistory};
use crate::identity::Identity;
use crate::season::Record;

/// Result of one counted game from the first team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// Symmetric head-to-head ledger keyed by canonical handle.
#[derive(Debug, Clone, Default)]
pub struct HeadToHeadLedger {
    records: BTreeMap<String, BTreeMap<String, Record>>,
    identities: HashMap<String, Identity>,
}

impl HeadToHeadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one game between `a` and `b`, updating both directions.
    pub fn record(&mut self, a: &Identity, b: &Identity, a_score: Points, b_score: Points) -> Outcome {
        let outcome = match a_score.cmp(&b_score) {
            Ordering::Greater => Outcome::Win,
            Ordering::Less => Outcome::Loss,
            Ordering::Equal => Outcome::Tie,
        };

        let (ab, ba) = match outcome {
            Outcome::Win => (win(), loss()),
            Outcome::Loss => (loss(), win()),
            Outcome::Tie => (tie(), tie()),
        };
        self.entry(a, b).add(ab);
        self.entry(b, a).add(ba);
        outcome
    }

    /// Record of `team` against `opponent`, by handle.
    pub fn get(&self, team: &str, opponent: &str) -> Option<Record> {
        self.records.get(team)?.get(opponent).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flatten to rows sorted by team display name, then win pct descending.
    pub fn rows(&self) -> Vec<HeadToHeadRow> {
        let mut rows: Vec<HeadToHeadRow> = self
            .records
            .iter()
            .flat_map(|(team, opponents)| {
                opponents.iter().filter_map(move |(opponent, record)| {
                    Some(HeadToHeadRow {
                        team: self.identities.get(team)?.clone(),
                        opponent: self.identities.get(opponent)?.clone(),
                        wins: record.wins,
                        losses: record.losses,
                        ties: record.ties,
                        games: record.games(),
                        win_pct: record.win_pct(),
                    })
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            a.team
                .display_name
                .cmp(&b.team.display_name)
                .then_with(|| b.win_pct.total_cmp(&a.win_pct))
                .then_with(|| a.opponent.display_name.cmp(&b.opponent.display_name))
        });
        rows
    }

    fn entry(&mut self, team: &Identity, opponent: &Identity) -> &mut Record {
        self.identities
            .entry(team.handle.clone())
            .or_insert_with(|| team.clone());
        self.identities
            .entry(opponent.handle.clone())
            .or_insert_with(|| opponent.clone());
        self.records
            .entry(team.handle.clone())
            .or_default()
            .entry(opponent.handle.clone())
            .or_default()
    }
}

fn win() -> Record {
    Record { wins: 1, ..Record::default() }
}

fn loss() -> Record {
    Record { losses: 1, ..Record::default() }
}

fn tie() -> Record {
    Record { ties: 1, ..Record::default() }
}

/// One (team, opponent) line of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHeadRow {
    pub team: Identity,
    pub opponent: Identity,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub games: u32,
    pub win_pct: f64,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the ledger over every season in `history` for the given weeks.
///
/// Only two-team groups are meaningful: if a matchup id groups more entries,
/// the first two count and the rest are dropped. Games involving an unowned
/// roster, a team against itself, or a 0-0 result are not counted.
pub fn build_ledger(history: &LeagueHistory, weeks: RangeInclusive<u32>) -> HeadToHeadLedger {
    let mut ledger = HeadToHeadLedger::new();

    for data in history.iter() {
        let season = &data.season;
        for week in weeks.clone() {
            let Some(entries) = data.weeks.get(&week) else {
                continue;
            };

            for group in matchup_groups(entries) {
                if group.len() < 2 {
                    continue;
                }
                if group.len() > 2 {
                    debug!(
                        "Season {} week {}: matchup {:?} has {} entries, counting the first two",
                        season.label,
                        week,
                        group[0].matchup_id,
                        group.len()
                    );
                }
                let (home, away) = (group[0], group[1]);

                let (Some(a), Some(b)) = (
                    season.owned_team(home.roster_id),
                    season.owned_team(away.roster_id),
                ) else {
                    continue;
                };
                if a.identity.handle == b.identity.handle {
                    continue;
                }

                let (a_score, b_score) = (home.score(), away.score());
                if a_score.is_zero() && b_score.is_zero() {
                    continue;
                }
                ledger.record(&a.identity, &b.identity, a_score, b_score);
            }
        }
    }

    ledger
}
