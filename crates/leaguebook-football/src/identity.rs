// Identity resolution: roster slot and raw account handle to the stable
// participant identity every aggregation keys on.

use std::collections::{HashMap, HashSet};

use leaguebook_core::config::IdentityConfig;
use leaguebook_core::records::{non_blank, RosterRecord, UserRecord};
use serde::Serialize;

/// Upper bound on alias hops; a cyclic alias table stops here.
const MAX_ALIAS_HOPS: usize = 8;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Where an identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// A manual roster override from identities.toml.
    Override,
    /// The owner's account (username, display name or id).
    Account,
    /// No owner could be resolved; placeholder `Team {roster_id}`.
    Synthetic,
}

/// A resolved participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    /// Canonical handle with a leading `@`. The aggregation key.
    pub handle: String,
    /// Human label: real name when known, else the bare handle.
    pub display_name: String,
    pub source: IdentitySource,
}

impl Identity {
    /// Placeholder for a roster nobody owns.
    pub fn synthetic(roster_id: u32) -> Self {
        Identity {
            handle: format!("@team-{roster_id}"),
            display_name: format!("Team {roster_id}"),
            source: IdentitySource::Synthetic,
        }
    }

    /// True unless this is a placeholder for an unowned roster.
    pub fn is_owned(&self) -> bool {
        self.source != IdentitySource::Synthetic
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Pure, total mapping from (season, roster, raw handle) to [`Identity`].
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    aliases: HashMap<String, String>,
    display_names: HashMap<String, String>,
    season_overrides: HashMap<(String, u32), String>,
    roster_overrides: HashMap<u32, String>,
}

impl IdentityResolver {
    pub fn new(config: &IdentityConfig) -> Self {
        let mut resolver = IdentityResolver {
            aliases: config
                .aliases
                .iter()
                .map(|(from, to)| (strip_at(from).to_string(), strip_at(to).to_string()))
                .collect(),
            display_names: config
                .display_names
                .iter()
                .map(|(handle, name)| (strip_at(handle).to_string(), name.clone()))
                .collect(),
            ..IdentityResolver::default()
        };

        for o in &config.roster_overrides {
            let handle = strip_at(o.handle.trim()).to_string();
            match &o.season_id {
                Some(season_id) => {
                    resolver
                        .season_overrides
                        .insert((season_id.clone(), o.roster_id), handle);
                }
                None => {
                    resolver.roster_overrides.insert(o.roster_id, handle);
                }
            }
        }
        resolver
    }

    /// Strip a leading `@` and follow the alias table to its end.
    pub fn canonical_handle(&self, raw: &str) -> String {
        let mut current = strip_at(raw.trim());
        let mut seen = HashSet::new();
        for _ in 0..MAX_ALIAS_HOPS {
            if !seen.insert(current) {
                break;
            }
            match self.aliases.get(current) {
                Some(next) if next.as_str() != current => current = next.as_str(),
                _ => break,
            }
        }
        current.to_string()
    }

    /// Resolve one roster slot.
    ///
    /// Order: season-specific override, roster-wide override, `raw_handle`,
    /// then the synthetic `Team {roster_id}` placeholder.
    pub fn resolve(&self, season_id: &str, roster_id: u32, raw_handle: Option<&str>) -> Identity {
        let overridden = self
            .season_overrides
            .get(&(season_id.to_string(), roster_id))
            .or_else(|| self.roster_overrides.get(&roster_id))
            .map(String::as_str)
            .and_then(|h| non_blank(Some(h)));

        if let Some(handle) = overridden {
            return self.identity_for(handle, IdentitySource::Override);
        }

        match non_blank(raw_handle).map(strip_at).and_then(|h| non_blank(Some(h))) {
            Some(handle) => self.identity_for(handle, IdentitySource::Account),
            None => Identity::synthetic(roster_id),
        }
    }

    /// Resolve a roster with its owning user record, if any.
    ///
    /// The raw handle is the user's username, display name or id, falling
    /// back to the roster's owner id when the user record is missing.
    pub fn resolve_roster(
        &self,
        season_id: &str,
        roster: &RosterRecord,
        user: Option<&UserRecord>,
    ) -> Identity {
        let raw = user
            .map(UserRecord::handle)
            .or_else(|| non_blank(roster.owner_id.as_deref()));
        self.resolve(season_id, roster.roster_id, raw)
    }

    fn identity_for(&self, handle: &str, source: IdentitySource) -> Identity {
        let canonical = self.canonical_handle(handle);
        let display_name = self
            .display_names
            .get(&canonical)
            .filter(|n| !n.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| canonical.clone());
        Identity {
            handle: format!("@{canonical}"),
            display_name,
            source,
        }
    }
}

fn strip_at(s: &str) -> &str {
    s.strip_prefix('@').unwrap_or(s)
}
