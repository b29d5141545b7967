use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use guttertrack_core::PriceTable;
use guttertrack_io::TrackStorage;
use guttertrack_planner::{calculate_bom, estimate_assembly_time, parse_track};
use guttertrack_validate::validate_track;

#[derive(Parser, Debug)]
#[command(name = "guttertrack", version, about = "Gutter track layout planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Track storage directory (defaults to ~/.guttertrack)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a track document
    Validate { file: PathBuf },
    /// Print the bill of materials and cost estimate for a track document
    Bom {
        file: PathBuf,
        /// Emit the raw JSON response instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Estimate assembly time for a track document
    Estimate { file: PathBuf },
    /// Import a track document into the storage directory
    Import { file: PathBuf },
    /// List saved tracks, newest first
    List,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let data_dir = cli
        .dir
        .clone()
        .unwrap_or_else(default_data_dir);

    match cli.command {
        Commands::Validate { file } => {
            let data = read_document(&file)?;
            let report = validate_track(&data);
            if report.valid {
                println!("OK: {} is a valid track description", file.display());
            } else {
                eprintln!("{} error(s):", report.errors.len());
                for error in &report.errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(1);
            }
        }
        Commands::Bom { file, json } => {
            let data = read_document(&file)?;
            let response = calculate_bom(&data, None)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_bom_report(&response);
            }
        }
        Commands::Estimate { file } => {
            let data = read_document(&file)?;
            let estimate = estimate_assembly_time(&data)?;
            println!("Estimated assembly time: {}", estimate);
        }
        Commands::Import { file } => {
            let data = read_document(&file)?;
            let track = parse_track(&data)?;
            let storage = TrackStorage::new(&data_dir)?;
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.to_string());
            let saved = storage.save_track(&track, name.as_deref())?;
            println!("Imported {} as {}", file.display(), saved);
        }
        Commands::List => {
            let storage = TrackStorage::new(&data_dir)?;
            let tracks = storage.list_tracks()?;
            if tracks.is_empty() {
                println!("No saved tracks in {}", data_dir.display());
            }
            for info in tracks {
                println!("{}\t{}", info.name, info.path.display());
            }
        }
    }

    Ok(())
}

fn read_document(path: &PathBuf) -> Result<Value> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".guttertrack"))
        .unwrap_or_else(|| PathBuf::from(".guttertrack"))
}

fn print_bom_report(response: &guttertrack_planner::BomResponse) {
    let prices = PriceTable::default();
    let bom = &response.bom;
    let cost = &response.cost;

    println!("Bill of materials");
    println!(
        "  Straight gutter   {:>8.2} ft   ${:>7.2}  (${:.2}/ft)",
        bom.straight_feet, cost.straight, prices.straight_foot
    );
    println!(
        "  22.5-degree elbows{:>8}      ${:>7.2}",
        bom.elbows_22_5, cost.elbows_22_5
    );
    println!(
        "  45-degree elbows  {:>8}      ${:>7.2}",
        bom.elbows_45, cost.elbows_45
    );
    println!(
        "  90-degree elbows  {:>8}      ${:>7.2}",
        bom.elbows_90, cost.elbows_90
    );
    println!(
        "  T-junctions       {:>8}      ${:>7.2}",
        bom.t_junctions, cost.t_junctions
    );
    println!(
        "  Connectors        {:>8}      ${:>7.2}",
        bom.connectors, cost.connectors
    );
    println!(
        "  Screws            {:>8}      ${:>7.2}",
        bom.screws, cost.screws
    );
    println!("  Total                           ${:>7.2}", cost.total);
}
