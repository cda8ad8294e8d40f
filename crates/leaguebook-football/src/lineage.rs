// Season chain walker.
//
// Starting from the newest season, follow `previous_league_id` back to the
// league's first season. The walk is fail-soft: any bad link ends it at the
// last good season.

use std::collections::{HashMap, HashSet};

use leaguebook_core::provider::LeagueProvider;
use leaguebook_core::records::League;
use tracing::{debug, info, warn};

/// Default bound on how many seasons a walk may visit.
pub const DEFAULT_MAX_SEASONS: usize = 20;

/// Walk the predecessor chain from `start_id`, newest season first.
///
/// Stops at the root, after `max_seasons` seasons, on a revisited id, or on
/// the first failed or empty fetch.
pub async fn resolve_lineage(
    provider: &dyn LeagueProvider,
    start_id: &str,
    max_seasons: usize,
) -> Vec<League> {
    let mut seasons: Vec<League> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut next = Some(start_id.to_string());

    while let Some(league_id) = next.take() {
        if seasons.len() >= max_seasons {
            warn!(
                "Lineage walk hit the {} season cap at {}; older seasons ignored",
                max_seasons, league_id
            );
            break;
        }
        if !visited.insert(league_id.clone()) {
            warn!("Lineage cycle detected at {}; stopping walk", league_id);
            break;
        }

        let league = match provider.league(&league_id).await {
            Ok(Some(league)) if !league.league_id.trim().is_empty() => league,
            Ok(_) => {
                warn!("League {} returned no record; lineage truncated", league_id);
                break;
            }
            Err(e) => {
                warn!("Failed to fetch league {}: {}; lineage truncated", league_id, e);
                break;
            }
        };

        debug!(
            "Lineage: {} season {} -> {:?}",
            league.league_id,
            league.season,
            league.predecessor()
        );
        next = league.predecessor().map(str::to_string);
        seasons.push(league);
    }

    info!("Resolved lineage of {} seasons from {}", seasons.len(), start_id);
    seasons
}

// ---------------------------------------------------------------------------
// LineageCache
// ---------------------------------------------------------------------------

/// Process-local cache of resolved lineages keyed by start id.
#[derive(Debug, Default)]
pub struct LineageCache {
    entries: HashMap<String, Vec<League>>,
}

impl LineageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, start_id: &str) -> Option<&[League]> {
        self.entries.get(start_id).map(Vec::as_slice)
    }

    pub fn insert(&mut self, start_id: impl Into<String>, lineage: Vec<League>) {
        self.entries.insert(start_id.into(), lineage);
    }

    /// Forget one lineage. Returns whether it was cached.
    pub fn invalidate(&mut self, start_id: &str) -> bool {
        self.entries.remove(start_id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// [`resolve_lineage`] through `cache`. Empty walks are not cached.
pub async fn resolve_lineage_cached(
    cache: &mut LineageCache,
    provider: &dyn LeagueProvider,
    start_id: &str,
    max_seasons: usize,
) -> Vec<League> {
    if let Some(hit) = cache.get(start_id) {
        debug!("Lineage cache hit for {}", start_id);
        return hit.to_vec();
    }
    let lineage = resolve_lineage(provider, start_id, max_seasons).await;
    if !lineage.is_empty() {
        cache.insert(start_id, lineage.clone());
    }
    lineage
}
