// leaguebook entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (stderr, so stdout stays machine-readable)
// 3. Load config (auto-populating config/ from defaults/)
// 4. Build the Sleeper client and run the requested command
// 5. Write JSON or CSV to stdout, or to a file under reports.output_dir

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use leaguebook_app::loader::HistoryLoader;
use leaguebook_app::report::{self, LeagueReport};
use leaguebook_core::config::{self, Config};
use leaguebook_core::players::PlayerDirectory;
use leaguebook_core::sleeper::SleeperClient;
use leaguebook_football::identity::IdentityResolver;
use leaguebook_football::lineage::LineageCache;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "leaguebook", version, about = "Sleeper league history and records")]
struct Cli {
    /// Directory holding config/ and defaults/ (defaults to the current directory).
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Override league.league_id from league.toml.
    #[arg(long, global = true)]
    league_id: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the full history report.
    Report {
        /// Also save the report under reports.output_dir.
        #[arg(long)]
        save: bool,
    },
    /// All-time head-to-head records.
    HeadToHead,
    /// All-time points-for / points-against leaderboard.
    Leaderboard,
    /// List the seasons of the league's lineage, newest first.
    Lineage,
}

#[derive(Serialize)]
struct LineageEntry {
    season: String,
    league_id: String,
    name: String,
    previous_league_id: Option<String>,
}

/// Caches shared by every command in this process.
#[derive(Default)]
struct Caches {
    players: PlayerDirectory,
    lineages: Mutex<LineageCache>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;

    // 3. Load config
    let base_dir = match &cli.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let mut config = config::load_config_in(&base_dir).context("failed to load configuration")?;
    if let Some(league_id) = &cli.league_id {
        config.league.league_id = league_id.clone();
    }
    info!(
        "Config loaded: league={} ({}), weeks {}-{}",
        config.league.name,
        config.league.league_id,
        config.reports.first_week,
        config.reports.last_week
    );

    // 4. Build the client and run
    let client = SleeperClient::from_config(&config.provider).context("failed to build HTTP client")?;
    let caches = Caches::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Lineage => {
            let resolver = IdentityResolver::new(&config.identities);
            let lineage = HistoryLoader::new(&client, &resolver, &config)
                .with_lineage_cache(&caches.lineages)
                .lineage(&config.league.league_id)
                .await;
            let entries: Vec<LineageEntry> = lineage
                .iter()
                .map(|l| LineageEntry {
                    season: l.season.clone(),
                    league_id: l.league_id.clone(),
                    name: l.name.clone(),
                    previous_league_id: l.predecessor().map(str::to_string),
                })
                .collect();
            write_rows(&entries, cli.format, &mut out)?;
        }
        Command::HeadToHead => {
            let report = run_report(&client, &caches, &config).await?;
            match cli.format {
                Format::Json => write_json(&report.head_to_head, &mut out)?,
                Format::Csv => report::write_head_to_head_csv(&report.head_to_head, &mut out)?,
            }
        }
        Command::Leaderboard => {
            let report = run_report(&client, &caches, &config).await?;
            match cli.format {
                Format::Json => write_json(&report.all_time, &mut out)?,
                Format::Csv => report::write_leaderboard_csv(&report.all_time, &mut out)?,
            }
        }
        Command::Report { save } => {
            let report = run_report(&client, &caches, &config).await?;
            if save {
                let path = save_report(&report, &base_dir, &config)?;
                info!("Report saved to {}", path.display());
            }
            match cli.format {
                Format::Json => report::write_json(&report, &mut out)?,
                Format::Csv => report::write_leaderboard_csv(&report.all_time, &mut out)?,
            }
        }
    }
    if cli.format == Format::Json {
        writeln!(out).context("failed to write output")?;
    }

    Ok(())
}

async fn run_report(client: &SleeperClient, caches: &Caches, config: &Config) -> anyhow::Result<LeagueReport> {
    let report = report::generate_report(client, &caches.players, &caches.lineages, config)
        .await
        .context("failed to build league report")?;
    if report.diagnostics.failed_requests > 0 {
        info!(
            "{} upstream requests failed; affected sections are partial",
            report.diagnostics.failed_requests
        );
    }
    Ok(report)
}

fn save_report(report: &LeagueReport, base_dir: &Path, config: &Config) -> anyhow::Result<PathBuf> {
    let dir = base_dir.join(&config.reports.output_dir);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}-report.json", config.league.league_id));
    let file = fs::File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    report::write_json(report, io::BufWriter::new(file))?;
    Ok(path)
}

fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, value).context("failed to serialize output")
}

fn write_rows<T: Serialize, W: Write>(rows: &[T], format: Format, writer: W) -> anyhow::Result<()> {
    match format {
        Format::Json => write_json(rows, writer),
        Format::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for row in rows {
                csv.serialize(row).context("failed to write CSV row")?;
            }
            csv.flush().context("failed to flush CSV output")?;
            Ok(())
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leaguebook=info,warn")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
