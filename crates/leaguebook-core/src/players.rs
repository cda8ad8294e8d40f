// Process-scoped cache for the player directory.
//
// The directory is several megabytes and changes rarely, so a report run
// fetches it at most once per `PlayerDirectory` and shares it read-only.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::provider::LeagueProvider;
use crate::records::PlayerInfo;

pub type PlayerMap = HashMap<String, PlayerInfo>;

/// Lazily-fetched, shared player directory.
///
/// A failed fetch is not cached: the caller gets an empty map and the next
/// call tries again.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    cell: OnceCell<Arc<PlayerMap>>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory that never touches the provider (fixtures, offline runs).
    pub fn preloaded(players: PlayerMap) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(players))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the directory, fetching it through `provider` on first use.
    pub async fn get(&self, provider: &dyn LeagueProvider) -> Arc<PlayerMap> {
        let result = self
            .cell
            .get_or_try_init(|| async {
                let players = provider.players().await?;
                info!("Player directory loaded: {} players", players.len());
                Ok::<_, crate::provider::ProviderError>(Arc::new(players))
            })
            .await;

        match result {
            Ok(players) => Arc::clone(players),
            Err(e) => {
                warn!("Player directory unavailable, names fall back to ids: {}", e);
                Arc::new(PlayerMap::new())
            }
        }
    }

    /// Drop the cached directory so the next `get` refetches it.
    pub fn clear(&mut self) {
        self.cell.take();
    }
}
