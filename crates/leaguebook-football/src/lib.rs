// Football league domain: seasons and identities, the lineage walker and
// every history aggregation (head-to-head, points, standings, high scores,
// playoff outcomes, draft analysis).

pub mod draft;
pub mod high_scores;
pub mod history;
pub mod identity;
pub mod ledger;
pub mod lineage;
pub mod playoffs;
pub mod points;
pub mod season;
pub mod standings;

#[cfg(test)]
pub(crate) mod testutil;

pub use history::{LeagueHistory, SeasonData};
pub use identity::{Identity, IdentityResolver, IdentitySource};
pub use season::{Record, Season, Team};
