// History loading: resolve the lineage, then fetch every season's rosters,
// users, bracket, drafts and weekly matchups with bounded concurrency.
//
// Every per-season request is independent once the lineage is known, so
// they are issued as one stream through `buffer_unordered`. Results are
// keyed by (season, request) and slotted back in place, so completion order
// never leaks into the assembled history. A failed request degrades only
// its own slot and is recorded in `LoadDiagnostics`.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use futures_util::stream::{self, StreamExt};
use leaguebook_core::config::Config;
use leaguebook_core::provider::{LeagueProvider, ProviderError, ProviderResult};
use leaguebook_core::records::{
    BracketMatch, DraftPickRecord, DraftRecord, League, MatchupRecord, RosterRecord, UserRecord,
};
use leaguebook_football::history::{DraftData, LeagueHistory, SeasonData};
use leaguebook_football::identity::IdentityResolver;
use leaguebook_football::lineage::{resolve_lineage, resolve_lineage_cached, LineageCache};
use leaguebook_football::season::Season;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// One upstream request that failed and was degraded around.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub season: String,
    pub path: String,
    pub error: String,
}

/// What the load did, including every degradation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadDiagnostics {
    pub seasons: usize,
    pub requests: usize,
    pub failed_requests: usize,
    pub failures: Vec<FetchFailure>,
}

impl LoadDiagnostics {
    fn record_failure(&mut self, season: &str, error: &ProviderError) {
        warn!("Season {}: {}; continuing without it", season, error);
        self.failed_requests += 1;
        self.failures.push(FetchFailure {
            season: season.to_string(),
            path: error.path().to_string(),
            error: error.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failed_requests == 0
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Request {
    Rosters,
    Users,
    Bracket,
    Drafts,
    Week(u32),
    Picks(String),
}

enum Payload {
    Rosters(Vec<RosterRecord>),
    Users(Vec<UserRecord>),
    Bracket(Vec<BracketMatch>),
    Drafts(Vec<DraftRecord>),
    Week(u32, Vec<MatchupRecord>),
    Picks(Vec<DraftPickRecord>),
}

async fn fetch(provider: &dyn LeagueProvider, league_id: &str, request: Request) -> ProviderResult<Payload> {
    Ok(match request {
        Request::Rosters => Payload::Rosters(provider.rosters(league_id).await?),
        Request::Users => Payload::Users(provider.users(league_id).await?),
        Request::Bracket => Payload::Bracket(provider.winners_bracket(league_id).await?),
        Request::Drafts => Payload::Drafts(provider.drafts(league_id).await?),
        Request::Week(week) => Payload::Week(week, provider.matchups(league_id, week).await?),
        Request::Picks(draft_id) => Payload::Picks(provider.draft_picks(&draft_id).await?),
    })
}

/// Per-season fetch results before assembly.
#[derive(Default)]
struct Partial {
    rosters: Vec<RosterRecord>,
    users: Vec<UserRecord>,
    bracket: Vec<BracketMatch>,
    drafts: Vec<DraftRecord>,
    weeks: BTreeMap<u32, Vec<MatchupRecord>>,
    picks: Vec<DraftPickRecord>,
}

impl Partial {
    fn absorb(&mut self, payload: Payload) {
        match payload {
            Payload::Rosters(r) => self.rosters = r,
            Payload::Users(u) => self.users = u,
            Payload::Bracket(b) => self.bracket = b,
            Payload::Drafts(d) => self.drafts = d,
            Payload::Week(week, entries) => {
                self.weeks.insert(week, entries);
            }
            Payload::Picks(picks) => self.picks = picks,
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryLoader
// ---------------------------------------------------------------------------

/// Loads a [`LeagueHistory`] from a provider.
pub struct HistoryLoader<'a> {
    provider: &'a dyn LeagueProvider,
    resolver: &'a IdentityResolver,
    weeks: RangeInclusive<u32>,
    max_seasons: usize,
    concurrency: usize,
    lineages: Option<&'a Mutex<LineageCache>>,
}

impl<'a> HistoryLoader<'a> {
    pub fn new(provider: &'a dyn LeagueProvider, resolver: &'a IdentityResolver, config: &Config) -> Self {
        HistoryLoader {
            provider,
            resolver,
            weeks: config.reports.weeks(),
            max_seasons: config.reports.max_seasons,
            concurrency: config.provider.max_concurrent_requests.max(1),
            lineages: None,
        }
    }

    pub fn with_weeks(mut self, weeks: RangeInclusive<u32>) -> Self {
        self.weeks = weeks;
        self
    }

    /// Resolve lineages through `cache`, shared across loaders.
    pub fn with_lineage_cache(mut self, cache: &'a Mutex<LineageCache>) -> Self {
        self.lineages = Some(cache);
        self
    }

    /// The seasons reachable from `start_id`, newest first.
    pub async fn lineage(&self, start_id: &str) -> Vec<League> {
        match self.lineages {
            Some(cache) => {
                let mut cache = cache.lock().await;
                resolve_lineage_cached(&mut cache, self.provider, start_id, self.max_seasons).await
            }
            None => resolve_lineage(self.provider, start_id, self.max_seasons).await,
        }
    }

    /// Walk the lineage from `start_id` and load every season of it.
    pub async fn load(&self, start_id: &str) -> (LeagueHistory, LoadDiagnostics) {
        let lineage = self.lineage(start_id).await;
        self.load_seasons(&lineage).await
    }

    /// Load the given seasons (newest first); the output keeps their order.
    pub async fn load_seasons(&self, lineage: &[League]) -> (LeagueHistory, LoadDiagnostics) {
        let mut diagnostics = LoadDiagnostics {
            seasons: lineage.len(),
            ..LoadDiagnostics::default()
        };
        let mut partials: Vec<Partial> = lineage.iter().map(|_| Partial::default()).collect();

        // Stage 1: everything keyed by league id.
        let mut requests = Vec::new();
        for idx in 0..lineage.len() {
            for request in [Request::Rosters, Request::Users, Request::Bracket, Request::Drafts] {
                requests.push((idx, request));
            }
            for week in self.weeks.clone() {
                requests.push((idx, Request::Week(week)));
            }
        }
        diagnostics.requests += requests.len();
        info!(
            "Fetching {} seasons ({} requests, {} at a time)",
            lineage.len(),
            requests.len(),
            self.concurrency
        );

        let results: Vec<(usize, Request, ProviderResult<Payload>)> = stream::iter(requests)
            .map(|(idx, request)| async move {
                let league_id = lineage[idx].league_id.as_str();
                let result = fetch(self.provider, league_id, request.clone()).await;
                (idx, request, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for (idx, request, result) in results {
            match result {
                Ok(payload) => partials[idx].absorb(payload),
                Err(e) => {
                    debug!("Request {:?} failed for season index {}", request, idx);
                    diagnostics.record_failure(&lineage[idx].season, &e);
                }
            }
        }

        // Stage 2: picks for each season's first draft, plus any regular-season
        // week outside the report window that draft value needs.
        let mut followups: Vec<(usize, Request)> = Vec::new();
        for (idx, partial) in partials.iter().enumerate() {
            let Some(draft) = partial.drafts.first() else {
                continue;
            };
            followups.push((idx, Request::Picks(draft.draft_id.clone())));
            for week in 1..lineage[idx].playoff_week_start() {
                if !self.weeks.contains(&week) {
                    followups.push((idx, Request::Week(week)));
                }
            }
        }
        diagnostics.requests += followups.len();

        let followup_results: Vec<(usize, ProviderResult<Payload>)> = stream::iter(followups)
            .map(|(idx, request)| async move {
                let league_id = lineage[idx].league_id.as_str();
                (idx, fetch(self.provider, league_id, request).await)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for (idx, result) in followup_results {
            match result {
                Ok(payload) => partials[idx].absorb(payload),
                Err(e) => diagnostics.record_failure(&lineage[idx].season, &e),
            }
        }

        let seasons = lineage
            .iter()
            .zip(partials)
            .map(|(league, partial)| self.assemble(league, partial))
            .collect();

        if !diagnostics.is_clean() {
            warn!(
                "History loaded with {} of {} requests failed",
                diagnostics.failed_requests, diagnostics.requests
            );
        }
        (LeagueHistory::new(seasons), diagnostics)
    }

    fn assemble(&self, league: &League, partial: Partial) -> SeasonData {
        let season = Season::assemble(league, &partial.rosters, &partial.users, self.resolver);
        let draft = partial.drafts.into_iter().next().map(|draft| DraftData {
            draft,
            picks: partial.picks,
        });
        debug!(
            "Season {}: {} teams, {} weeks, {} bracket matches, draft: {}",
            season.label,
            season.teams.len(),
            partial.weeks.len(),
            partial.bracket.len(),
            draft.is_some()
        );
        SeasonData {
            season,
            weeks: partial.weeks,
            bracket: partial.bracket,
            draft,
        }
    }
}
