// Read contract for the upstream league data provider.
//
// The aggregation engine only ever reads through this trait. Production
// code talks to Sleeper over HTTP (`crate::sleeper::SleeperClient`); tests
// plug in in-memory fakes.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::records::{
    BracketMatch, DraftPickRecord, DraftRecord, League, MatchupRecord, PlayerInfo, RosterRecord,
    UserRecord,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        source: reqwest::Error,
    },

    #[error("request to {path} timed out")]
    Timeout { path: String },

    #[error("upstream returned status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    /// Used by non-HTTP providers (fixtures, fakes) to signal a failed fetch.
    #[error("{path} unavailable: {message}")]
    Unavailable { path: String, message: String },
}

impl ProviderError {
    /// The upstream path the failure belongs to, for log lines.
    pub fn path(&self) -> &str {
        match self {
            ProviderError::Request { path, .. }
            | ProviderError::Timeout { path }
            | ProviderError::Status { path, .. }
            | ProviderError::Decode { path, .. }
            | ProviderError::Unavailable { path, .. } => path,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Read-only access to per-season league data.
///
/// All ids are opaque strings except roster ids, which are small integers
/// local to one season. A season that does not exist is `Ok(None)`, not an
/// error; list endpoints return an empty `Vec` for a `null` body.
#[async_trait]
pub trait LeagueProvider: Send + Sync {
    /// Season metadata, including the predecessor pointer.
    async fn league(&self, league_id: &str) -> ProviderResult<Option<League>>;

    async fn rosters(&self, league_id: &str) -> ProviderResult<Vec<RosterRecord>>;

    async fn users(&self, league_id: &str) -> ProviderResult<Vec<UserRecord>>;

    async fn matchups(&self, league_id: &str, week: u32) -> ProviderResult<Vec<MatchupRecord>>;

    async fn winners_bracket(&self, league_id: &str) -> ProviderResult<Vec<BracketMatch>>;

    /// The full player directory. Large; callers should go through
    /// [`crate::players::PlayerDirectory`] rather than calling this directly.
    async fn players(&self) -> ProviderResult<HashMap<String, PlayerInfo>>;

    async fn drafts(&self, league_id: &str) -> ProviderResult<Vec<DraftRecord>>;

    async fn draft_picks(&self, draft_id: &str) -> ProviderResult<Vec<DraftPickRecord>>;
}
