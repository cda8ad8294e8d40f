// Sleeper HTTP client.
//
// Thin reqwest wrapper that implements `LeagueProvider` against
// `https://api.sleeper.app/v1`. Every request is bounded by the configured
// timeout; Sleeper answers unknown ids with a `null` body, which decodes to
// `None` / an empty list instead of an error.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::provider::{LeagueProvider, ProviderError, ProviderResult};
use crate::records::{
    BracketMatch, DraftPickRecord, DraftRecord, League, MatchupRecord, PlayerInfo, RosterRecord,
    UserRecord,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const USER_AGENT: &str = concat!("leaguebook/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

/// Read-only Sleeper API client.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| ProviderError::Request {
                path: base_url.clone(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    /// Build a client from the `[provider]` section of league.toml.
    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the body. `null` or an empty body is `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(path, e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<T>>(&body).map_err(|source| ProviderError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<Vec<T>> {
        Ok(self.get_optional::<Vec<T>>(path).await?.unwrap_or_default())
    }
}

fn classify(path: &str, source: reqwest::Error) -> ProviderError {
    if source.is_timeout() {
        ProviderError::Timeout {
            path: path.to_string(),
        }
    } else {
        ProviderError::Request {
            path: path.to_string(),
            source,
        }
    }
}

#[async_trait]
impl LeagueProvider for SleeperClient {
    async fn league(&self, league_id: &str) -> ProviderResult<Option<League>> {
        self.get_optional(&format!("/league/{league_id}")).await
    }

    async fn rosters(&self, league_id: &str) -> ProviderResult<Vec<RosterRecord>> {
        self.get_list(&format!("/league/{league_id}/rosters")).await
    }

    async fn users(&self, league_id: &str) -> ProviderResult<Vec<UserRecord>> {
        self.get_list(&format!("/league/{league_id}/users")).await
    }

    async fn matchups(&self, league_id: &str, week: u32) -> ProviderResult<Vec<MatchupRecord>> {
        self.get_list(&format!("/league/{league_id}/matchups/{week}"))
            .await
    }

    async fn winners_bracket(&self, league_id: &str) -> ProviderResult<Vec<BracketMatch>> {
        self.get_list(&format!("/league/{league_id}/winners_bracket"))
            .await
    }

    async fn players(&self) -> ProviderResult<HashMap<String, PlayerInfo>> {
        Ok(self
            .get_optional::<HashMap<String, PlayerInfo>>("/players/nfl")
            .await?
            .unwrap_or_default())
    }

    async fn drafts(&self, league_id: &str) -> ProviderResult<Vec<DraftRecord>> {
        self.get_list(&format!("/league/{league_id}/drafts")).await
    }

    async fn draft_picks(&self, draft_id: &str) -> ProviderResult<Vec<DraftPickRecord>> {
        self.get_list(&format!("/draft/{draft_id}/picks")).await
    }
}
