use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hr_analytics::analytics::{describe, diagnose, predict};
use hr_analytics::config::AppConfig;
use hr_analytics::ingestion::write_csv;
use hr_analytics::observability::init_logging;
use hr_analytics::report::build_report;
use hr_analytics::synthesizer::{row_count_from_signed, synthesize};
use hr_analytics::{Normalizer, Session};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "hr-analytics")]
#[command(about = "Workforce analytics over employee data, with a simulated fallback dataset")]
struct Args {
    /// Employee CSV to load (default: HR_DATA_PATH or Data/employee_data.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Seed for simulated data (default: HR_SEED or 42)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated employees (default: HR_ROW_COUNT or 1000)
    #[arg(long, allow_negative_numbers = true)]
    rows: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a simulated employee dataset to CSV
    Generate {
        #[arg(short, long, default_value = "Data/employee_data.csv")]
        output: PathBuf,
    },
    /// Workforce KPIs and distribution charts
    Describe,
    /// Engineering attrition diagnostics
    Diagnose,
    /// Attrition risk forecast
    Predict,
    /// Full summary report
    Report {
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Markdown,
    Json,
}

fn main() -> Result<()> {
    let mut config = AppConfig::from_env()?;
    init_logging(&config.log_level);

    let args = Args::parse();
    if let Some(data) = args.data {
        config.data_path = data;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rows) = args.rows {
        config.row_count = row_count_from_signed(rows)?;
    }

    match args.command {
        Command::Generate { output } => {
            let mut table = synthesize(config.seed, config.row_count)?;
            write_csv(&mut table, &output)
                .with_context(|| format!("writing simulated data to {}", output.display()))?;
        }
        Command::Describe => {
            let mut session = Session::new(config);
            let table = session.current_table()?;
            print_json(&describe(table, &mut Normalizer::new())?)?;
        }
        Command::Diagnose => {
            let mut session = Session::new(config);
            let table = session.current_table()?;
            print_json(&diagnose(table, &mut Normalizer::new())?)?;
        }
        Command::Predict => {
            let mut session = Session::new(config);
            let table = session.current_table()?;
            print_json(&predict(table, &mut Normalizer::new())?)?;
        }
        Command::Report { format, output } => {
            let mut session = Session::new(config);
            session.current_table()?;
            let source = session.source().map(|s| s.to_string());
            let table = session.current_table()?;
            let report = build_report(table, &mut Normalizer::new(), source)?;

            let rendered = match format {
                ReportFormat::Markdown => report.to_string(),
                ReportFormat::Json => report.to_json()?,
            };
            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("writing report to {}", path.display()))?;
                    info!("Report written to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
