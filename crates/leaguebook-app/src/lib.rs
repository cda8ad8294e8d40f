// Report orchestration: load a league's history from a provider and run
// every aggregation into a serializable report.

pub mod loader;
pub mod report;

pub use loader::{HistoryLoader, LoadDiagnostics};
pub use report::{build_report, generate_report, LeagueReport};
