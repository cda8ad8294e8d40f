// Multi-season history: the in-memory input every aggregation reads.

use std::collections::{BTreeMap, HashMap};

use leaguebook_core::records::{BracketMatch, DraftPickRecord, DraftRecord, MatchupRecord};

use crate::season::Season;

/// A season's draft and its picks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftData {
    pub draft: DraftRecord,
    pub picks: Vec<DraftPickRecord>,
}

/// Everything fetched for one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonData {
    pub season: Season,
    /// Week number to that week's matchup entries. Missing weeks are absent.
    pub weeks: BTreeMap<u32, Vec<MatchupRecord>>,
    pub bracket: Vec<BracketMatch>,
    pub draft: Option<DraftData>,
}

impl SeasonData {
    pub fn new(season: Season) -> Self {
        SeasonData {
            season,
            weeks: BTreeMap::new(),
            bracket: Vec::new(),
            draft: None,
        }
    }

    pub fn with_week(mut self, week: u32, entries: Vec<MatchupRecord>) -> Self {
        self.weeks.insert(week, entries);
        self
    }

    pub fn with_bracket(mut self, bracket: Vec<BracketMatch>) -> Self {
        self.bracket = bracket;
        self
    }
}

/// A league's seasons, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueHistory {
    pub seasons: Vec<SeasonData>,
}

impl LeagueHistory {
    pub fn new(seasons: Vec<SeasonData>) -> Self {
        LeagueHistory { seasons }
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeasonData> {
        self.seasons.iter()
    }

    pub fn newest(&self) -> Option<&SeasonData> {
        self.seasons.first()
    }
}

/// Group a week's entries by matchup id, in order of first appearance.
/// Entries without a matchup id (byes, unscheduled) are left out.
pub fn matchup_groups(entries: &[MatchupRecord]) -> Vec<Vec<&MatchupRecord>> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut groups: Vec<Vec<&MatchupRecord>> = Vec::new();
    for entry in entries {
        let Some(matchup_id) = entry.matchup_id else {
            continue;
        };
        let slot = *index.entry(matchup_id).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(entry);
    }
    groups
}

/// The other entry sharing `entry`'s matchup id, if any.
pub fn opponent_of<'a>(entries: &'a [MatchupRecord], entry: &MatchupRecord) -> Option<&'a MatchupRecord> {
    let matchup_id = entry.matchup_id?;
    entries
        .iter()
        .find(|e| e.matchup_id == Some(matchup_id) && e.roster_id != entry.roster_id)
}
