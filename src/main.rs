use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use degreeverify_export::export::{self, ExportOptions};
use degreeverify_export::model::{DateWindow, InstitutionProfile};
use degreeverify_export::{ExportError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;

    let window = DateWindow::new(cli.start_date, cli.end_date)?;
    let database = resolve_database(cli.database)?;
    let profile = match &cli.school_config {
        Some(path) => InstitutionProfile::from_path(path)?,
        None => InstitutionProfile::default(),
    };
    let transmission_date = cli
        .transmission_date
        .unwrap_or_else(|| Local::now().date_naive());

    let options = ExportOptions {
        database,
        output_dir: cli.output_dir,
        window,
        profile,
        transmission_date,
    };
    let summary = export::generate(&options)?;
    println!(
        "{} detail records written to {}",
        summary.detail_records,
        summary.submission_path.display()
    );
    Ok(())
}

fn resolve_database(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match std::env::var_os("DEGREEVERIFY_DATABASE") {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(ExportError::MissingDatabase),
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ExportError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Create a DegreeVerify submission file for the degree-verification clearinghouse."
)]
struct Cli {
    /// First conferral date included in the export window, e.g. 2022-01-15.
    start_date: NaiveDate,

    /// Last conferral date included in the export window, e.g. 2022-05-15.
    end_date: NaiveDate,

    /// Student-records database; falls back to DEGREEVERIFY_DATABASE.
    #[arg(long)]
    database: Option<PathBuf>,

    /// Directory receiving the submission file and the review workbook.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// JSON profile overriding the institution identity in the header record.
    #[arg(long)]
    school_config: Option<PathBuf>,

    /// Transmission date stamped into the header record; defaults to today.
    #[arg(long)]
    transmission_date: Option<NaiveDate>,
}
