// Core library: configuration, the upstream provider contract, Sleeper wire
// records and HTTP client, fixed-point points and the player directory.

pub mod config;
pub mod players;
pub mod points;
pub mod provider;
pub mod records;
pub mod sleeper;

pub use points::Points;
pub use provider::{LeagueProvider, ProviderError, ProviderResult};
