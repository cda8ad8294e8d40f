// League report: every aggregation over a loaded history, in one
// serializable value, plus CSV export of the tabular parts.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Utc};
use leaguebook_core::config::Config;
use leaguebook_core::players::PlayerDirectory;
use leaguebook_core::provider::LeagueProvider;
use leaguebook_core::records::PlayerInfo;
use leaguebook_core::Points;
use leaguebook_football::draft::{draft_analysis, DraftSummary};
use leaguebook_football::high_scores::{top_player_weeks, top_team_weeks, PlayerWeekHigh, TeamWeekHigh};
use leaguebook_football::history::LeagueHistory;
use leaguebook_football::identity::IdentityResolver;
use leaguebook_football::ledger::{build_ledger, HeadToHeadRow};
use leaguebook_football::lineage::LineageCache;
use leaguebook_football::playoffs::{season_honours, SeasonHonours};
use leaguebook_football::points::{all_time_points, AllTimePointsRow};
use leaguebook_football::standings::{season_standings, StandingsRow};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::loader::{HistoryLoader, LoadDiagnostics};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Season metadata as listed in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: String,
    pub league_id: String,
    pub name: String,
    pub status: Option<String>,
    pub teams: usize,
    pub weeks_loaded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonStandings {
    pub season: String,
    pub rows: Vec<StandingsRow>,
}

/// Everything derived from one league history.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueReport {
    pub league_name: String,
    pub start_league_id: String,
    pub generated_at: DateTime<Utc>,
    pub seasons: Vec<SeasonSummary>,
    pub standings: Vec<SeasonStandings>,
    pub all_time: Vec<AllTimePointsRow>,
    pub head_to_head: Vec<HeadToHeadRow>,
    pub team_highs: Vec<TeamWeekHigh>,
    pub player_highs: Vec<PlayerWeekHigh>,
    pub honours: Vec<SeasonHonours>,
    pub drafts: Vec<DraftSummary>,
    pub diagnostics: LoadDiagnostics,
}

/// Run every aggregation over an already-loaded history.
pub fn build_report(
    config: &Config,
    history: &LeagueHistory,
    players: &HashMap<String, PlayerInfo>,
    resolver: &IdentityResolver,
    diagnostics: LoadDiagnostics,
) -> LeagueReport {
    let weeks = config.reports.weeks();
    let top_n = config.reports.top_n;

    let seasons = history
        .iter()
        .map(|d| SeasonSummary {
            season: d.season.label.clone(),
            league_id: d.season.league_id.clone(),
            name: d.season.name.clone(),
            status: d.season.status.clone(),
            teams: d.season.teams.len(),
            weeks_loaded: d.weeks.len(),
        })
        .collect();

    let standings = history
        .iter()
        .map(|d| SeasonStandings {
            season: d.season.label.clone(),
            rows: season_standings(&d.season),
        })
        .collect();

    LeagueReport {
        league_name: history
            .newest()
            .map(|d| d.season.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| config.league.name.clone()),
        start_league_id: config.league.league_id.clone(),
        generated_at: Utc::now(),
        seasons,
        standings,
        all_time: all_time_points(history.iter().map(|d| &d.season)),
        head_to_head: build_ledger(history, weeks.clone()).rows(),
        team_highs: top_team_weeks(history, weeks.clone(), top_n),
        player_highs: top_player_weeks(history, weeks, players, top_n),
        honours: season_honours(history),
        drafts: draft_analysis(history, players, resolver),
        diagnostics,
    }
}

/// Load the configured league's history and build its report.
///
/// `directory` and `lineages` are process-local caches; pass the same ones
/// to repeated calls to skip refetching the player directory and lineage.
pub async fn generate_report(
    provider: &dyn LeagueProvider,
    directory: &PlayerDirectory,
    lineages: &Mutex<LineageCache>,
    config: &Config,
) -> anyhow::Result<LeagueReport> {
    let resolver = IdentityResolver::new(&config.identities);
    let loader = HistoryLoader::new(provider, &resolver, config).with_lineage_cache(lineages);

    let (history, diagnostics) = loader.load(&config.league.league_id).await;
    if history.is_empty() {
        anyhow::bail!(
            "league {} returned no seasons; check league.league_id",
            config.league.league_id
        );
    }

    let players = directory.get(provider).await;
    let report = build_report(config, &history, &players, &resolver, diagnostics);
    info!(
        "Report built: {} seasons, {} head-to-head rows, {} drafts",
        report.seasons.len(),
        report.head_to_head.len(),
        report.drafts.len()
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

pub fn write_json<W: Write>(report: &LeagueReport, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, report).context("failed to serialize report")
}

#[derive(Serialize)]
struct HeadToHeadCsvRow<'a> {
    team: &'a str,
    team_handle: &'a str,
    opponent: &'a str,
    opponent_handle: &'a str,
    wins: u32,
    losses: u32,
    ties: u32,
    games: u32,
    win_pct: String,
}

#[derive(Serialize)]
struct LeaderboardCsvRow<'a> {
    rank: usize,
    team: &'a str,
    handle: &'a str,
    seasons: usize,
    wins: u32,
    losses: u32,
    ties: u32,
    points_for: Points,
    points_against: Points,
}

/// Write the head-to-head table as CSV.
pub fn write_head_to_head_csv<W: Write>(rows: &[HeadToHeadRow], writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(HeadToHeadCsvRow {
            team: &row.team.display_name,
            team_handle: &row.team.handle,
            opponent: &row.opponent.display_name,
            opponent_handle: &row.opponent.handle,
            wins: row.wins,
            losses: row.losses,
            ties: row.ties,
            games: row.games,
            win_pct: format!("{:.3}", row.win_pct),
        })
        .context("failed to write head-to-head row")?;
    }
    csv.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Write the all-time leaderboard as CSV.
pub fn write_leaderboard_csv<W: Write>(rows: &[AllTimePointsRow], writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for (i, row) in rows.iter().enumerate() {
        csv.serialize(LeaderboardCsvRow {
            rank: i + 1,
            team: &row.identity.display_name,
            handle: &row.identity.handle,
            seasons: row.seasons_played,
            wins: row.record.wins,
            losses: row.record.losses,
            ties: row.record.ties,
            points_for: row.points_for,
            points_against: row.points_against,
        })
        .context("failed to write leaderboard row")?;
    }
    csv.flush().context("failed to flush CSV output")?;
    Ok(())
}
