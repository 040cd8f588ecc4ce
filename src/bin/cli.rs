//! Keiba CLI - ranked odds grids for JRA races

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
#[cfg(feature = "scraper")]
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use keiba::core::{extract_race_id, prepare_display, venue_name, DisplayReport, RaceId};
use keiba::data::{list_snapshots, load_snapshot, save_snapshot, snapshot_saved_at};
use keiba::OddsSnapshot;

#[cfg(feature = "scraper")]
use keiba::scraper::{parse_snapshot, ClientConfig, OddsClient};

/// Default odds snapshot directory (relative to project root)
const DEFAULT_ODDS_DIR: &str = "data/odds";

#[derive(Parser)]
#[command(name = "keiba")]
#[command(author, version, about = "JRA race odds grid CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to odds snapshot directory
    #[arg(long, default_value = DEFAULT_ODDS_DIR, global = true)]
    odds_dir: PathBuf,

    /// Fetch odds from this API instead of the snapshot directory
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ranked odds grid for a race
    Show {
        /// netkeiba URL or race_id
        input: String,

        /// Also print the tab-separated export
        #[arg(long)]
        tsv: bool,

        /// Save fetched odds to the snapshot directory
        #[arg(long)]
        save: bool,
    },

    /// Export the odds grid as tab-separated text
    Export {
        /// netkeiba URL or race_id
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse saved JRA odds pages into a snapshot (requires scraper feature)
    #[cfg(feature = "scraper")]
    Parse {
        /// netkeiba URL or race_id the pages belong to
        #[arg(short, long)]
        race_id: String,

        /// Saved 単勝・複勝 page
        #[arg(long)]
        tanpuku: Option<PathBuf>,

        /// Saved 馬連 page
        #[arg(long)]
        umaren: Option<PathBuf>,
    },

    /// List stored odds snapshots
    List,

    /// List venue codes
    Venues,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();

    if cli.interactive {
        run_interactive(&cli.odds_dir, api_url)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Show { input, tsv, save } => {
                show_race(&cli.odds_dir, api_url, &input, tsv, save)?;
            }
            Commands::Export { input, output } => {
                export_race(&cli.odds_dir, api_url, &input, output.as_deref())?;
            }
            #[cfg(feature = "scraper")]
            Commands::Parse {
                race_id,
                tanpuku,
                umaren,
            } => {
                run_parse(&cli.odds_dir, &race_id, tanpuku.as_deref(), umaren.as_deref())?;
            }
            Commands::List => {
                list_races(&cli.odds_dir)?;
            }
            Commands::Venues => {
                list_venues();
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

/// Load odds from the API when configured, otherwise from the snapshot directory
fn load_odds(odds_dir: &Path, api_url: Option<&str>, race_id: &RaceId) -> Result<OddsSnapshot> {
    match api_url {
        Some(url) => fetch_odds(url, race_id),
        None => load_snapshot(odds_dir, race_id)
            .with_context(|| format!("Failed to load odds for race {} from {:?}", race_id, odds_dir)),
    }
}

#[cfg(feature = "scraper")]
fn fetch_odds(api_url: &str, race_id: &RaceId) -> Result<OddsSnapshot> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let client = OddsClient::new(ClientConfig {
        base_url: api_url.to_string(),
        ..Default::default()
    })
    .context("Failed to create HTTP client")?;

    let pb = spinner(format!("オッズ情報を取得しています... ({})", race_id));
    let result = rt.block_on(client.fetch_snapshot(race_id));
    pb.finish_and_clear();

    result.with_context(|| format!("Failed to fetch odds for race {}", race_id))
}

#[cfg(not(feature = "scraper"))]
fn fetch_odds(_api_url: &str, _race_id: &RaceId) -> Result<OddsSnapshot> {
    anyhow::bail!("Fetching from the odds API requires the scraper feature")
}

#[cfg(feature = "scraper")]
fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

fn race_heading(race_id: &RaceId) -> String {
    match race_id.describe() {
        Some(desc) => format!("{} ({})", race_id, desc),
        None => race_id.to_string(),
    }
}

fn show_race(
    odds_dir: &Path,
    api_url: Option<&str>,
    input: &str,
    tsv: bool,
    save: bool,
) -> Result<()> {
    let race_id = extract_race_id(input)?;
    println!("{}: {}", "取得中のrace_id".green(), race_heading(&race_id));
    println!();

    let snapshot = load_odds(odds_dir, api_url, &race_id)?;

    if save && api_url.is_some() {
        let path = save_snapshot(odds_dir, &race_id, &snapshot)?;
        println!("{}: {:?}", "Saved".green(), path);
        println!();
    }

    let report = prepare_display(&snapshot);
    if report.grid.is_empty() {
        println!("{}", "オッズデータが見つかりませんでした。".yellow());
        return Ok(());
    }

    print_grid(&report);

    if let Some(summary) = &report.summary {
        println!("{}", summary.annotation().cyan());
        println!();
    }

    if report.skipped > 0 {
        println!(
            "{}",
            format!("({} 件の不正なキーをスキップしました)", report.skipped).dimmed()
        );
        println!();
    }

    if tsv {
        println!("{}", report.to_tsv());
    }

    Ok(())
}

/// Render the grid as a terminal table
fn print_grid(report: &DisplayReport) {
    const LABEL_WIDTH: usize = 12;
    const CELL_WIDTH: usize = 7;

    let grid = &report.grid;
    let top_pair = report.quinella.top_pair.len();

    println!("{}", "オッズ一覧表（オッズ順ソート）".yellow().bold());

    let header: String = grid
        .column_headers()
        .iter()
        .map(|h| format!("{:>width$}", h, width = CELL_WIDTH))
        .collect();
    println!("{:<width$}{}", "", header.bold(), width = LABEL_WIDTH);
    println!("{}", "-".repeat(LABEL_WIDTH + CELL_WIDTH * grid.max_cols()));

    for row in grid.rows() {
        let mut line = String::new();
        for (idx, cell) in row.cells.iter().enumerate() {
            let text = format!("{:>width$}", cell, width = CELL_WIDTH);
            let is_quinella = matches!(
                row.label,
                keiba::RowLabel::QuinellaOdds | keiba::RowLabel::QuinellaHorses
            );
            let styled = if is_quinella && idx < top_pair {
                text.green().to_string()
            } else if row.label.is_odds() {
                text
            } else {
                text.cyan().to_string()
            };
            line.push_str(&styled);
        }
        println!("{:<width$}{}", row.label.as_str(), line, width = LABEL_WIDTH);
    }
    println!();
    println!("{}", "※各列はオッズの低い順（人気順）に並んでいます".dimmed());
    println!();
}

fn export_race(
    odds_dir: &Path,
    api_url: Option<&str>,
    input: &str,
    output: Option<&Path>,
) -> Result<()> {
    let race_id = extract_race_id(input)?;
    let snapshot = load_odds(odds_dir, api_url, &race_id)?;
    let report = prepare_display(&snapshot);
    let tsv = report.to_tsv();

    match output {
        Some(path) => {
            std::fs::write(path, &tsv)
                .with_context(|| format!("Failed to write TSV to {:?}", path))?;
            eprintln!(
                "{}: {} columns for race {} -> {:?}",
                "Exported".green(),
                report.max_cols(),
                race_id,
                path
            );
        }
        None => println!("{}", tsv),
    }

    Ok(())
}

#[cfg(feature = "scraper")]
fn run_parse(
    odds_dir: &Path,
    race: &str,
    tanpuku: Option<&Path>,
    umaren: Option<&Path>,
) -> Result<()> {
    if tanpuku.is_none() && umaren.is_none() {
        anyhow::bail!("At least one of --tanpuku or --umaren is required");
    }

    let race_id = extract_race_id(race)?;
    println!("{}: {}", "Parsing".green(), race_heading(&race_id));

    let tanpuku_html = tanpuku
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("Failed to read {:?}", p)))
        .transpose()?;
    let umaren_html = umaren
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("Failed to read {:?}", p)))
        .transpose()?;

    let snapshot = parse_snapshot(tanpuku_html.as_deref(), umaren_html.as_deref())
        .context("Failed to parse odds pages")?;

    println!("単勝: {}件", snapshot.tansho.len());
    println!("複勝: {}件", snapshot.fukusho.len());
    println!("馬連: {}件", snapshot.umaren.len());

    let path = save_snapshot(odds_dir, &race_id, &snapshot)?;
    println!("{}: {:?}", "Saved".green(), path);

    Ok(())
}

fn list_races(odds_dir: &Path) -> Result<()> {
    println!("{}: {:?}", "Listing snapshots in".green(), odds_dir);
    println!();

    let entries = list_snapshots(odds_dir);
    if entries.is_empty() {
        println!("{}", "No snapshots found.".yellow());
        return Ok(());
    }

    println!(
        "{:<14} {:<24} {:>6} {:>6} {:>6} {:>20}",
        "race_id", "レース", "単勝", "複勝", "馬連", "保存日時"
    );
    println!("{}", "-".repeat(84));

    for entry in &entries {
        let race_id = extract_race_id(&entry.race_id)?;
        let desc = race_id.describe().unwrap_or_else(|| "-".to_string());
        let saved = snapshot_saved_at(odds_dir, &race_id)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        match load_snapshot(odds_dir, &race_id) {
            Ok(snapshot) => println!(
                "{:<14} {:<24} {:>6} {:>6} {:>6} {:>20}",
                entry.race_id,
                desc,
                snapshot.tansho.len(),
                snapshot.fukusho.len(),
                snapshot.umaren.len(),
                saved
            ),
            Err(e) => println!("{:<14} {}", entry.race_id, format!("{}", e).red()),
        }
    }

    println!();
    println!("Total: {} snapshots", entries.len());

    Ok(())
}

fn list_venues() {
    println!("{}", "Venue Codes:".yellow().bold());
    println!("{}", "-".repeat(20));
    for code in 1..=10u8 {
        if let Some(name) = venue_name(code) {
            println!("  {:02}: {}", code, name);
        }
    }
}

fn run_interactive(odds_dir: &Path, api_url: Option<&str>) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Type 'quit' to exit.\n");

    let theme = ColorfulTheme::default();

    loop {
        let options = vec!["Show odds", "Export TSV", "List snapshots", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 | 1 => {
                let input: String = Input::with_theme(&theme)
                    .with_prompt("netkeibaのURLまたはrace_id")
                    .interact_text()?;

                if input.trim().eq_ignore_ascii_case("quit") {
                    break;
                }

                println!();
                let result = if selection == 0 {
                    show_race(odds_dir, api_url, &input, false, false)
                } else {
                    export_race(odds_dir, api_url, &input, None)
                };
                // Keep the loop alive on bad input or missing races
                if let Err(e) = result {
                    println!("{}: {:#}", "エラーが発生しました".red(), e);
                }
                println!();
            }
            2 => {
                println!();
                list_races(odds_dir)?;
                println!();
            }
            3 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_show() {
        let cli = Cli::try_parse_from(["keiba", "show", "202505041007", "--tsv"]).unwrap();
        match cli.command {
            Some(Commands::Show { input, tsv, save }) => {
                assert_eq!(input, "202505041007");
                assert!(tsv);
                assert!(!save);
            }
            _ => panic!("expected show command"),
        }
        assert_eq!(cli.odds_dir, PathBuf::from(DEFAULT_ODDS_DIR));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "keiba",
            "export",
            "123",
            "--odds-dir",
            "/tmp/odds",
            "--api-url",
            "http://localhost:8080",
        ])
        .unwrap();
        assert_eq!(cli.odds_dir, PathBuf::from("/tmp/odds"));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_race_heading() {
        let id = extract_race_id("202505041007").unwrap();
        assert_eq!(race_heading(&id), "202505041007 (2025 東京 4回10日 7R)");
        let short = extract_race_id("456").unwrap();
        assert_eq!(race_heading(&short), "456");
    }

    #[test]
    fn test_export_writes_tsv_file() {
        let dir = tempfile::tempdir().unwrap();
        let race_id = extract_race_id("123").unwrap();
        let mut snapshot = OddsSnapshot::default();
        snapshot.tansho.insert("2".to_string(), 1.1);
        save_snapshot(dir.path(), &race_id, &snapshot).unwrap();

        let out = dir.path().join("grid.tsv");
        export_race(dir.path(), None, "race_id=123", Some(&out)).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("単勝_オッズ\t1.10\n単勝_馬番\t02\n"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_show_rejects_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(show_race(dir.path(), None, "abc", false, false).is_err());
        assert!(show_race(dir.path(), None, "race_id=１２３４", false, false).is_err());
    }

    #[cfg(feature = "scraper")]
    #[test]
    fn test_spinner_message() {
        let pb = spinner("取得中".to_string());
        assert_eq!(pb.message(), "取得中");
        pb.finish_and_clear();
    }
}
