use std::{error::Error, path::PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fare_engine::{FareEngine, Invoice, Period};

use crate::{
    error::{AppError, Result},
    settings::Settings,
};

mod error;
mod files;
mod render;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "billing")]
#[command(about = "Price trips and issue client invoices")]
struct Cli {
    /// Settings file (TOML). Missing files are ignored.
    #[arg(long, env = "BILLING_SETTINGS")]
    settings: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a single trip.
    Quote(QuoteArgs),
    /// Price a client's trips and show the invoice totals.
    Preview(PreviewArgs),
    /// Issue an invoice record for a client's trips.
    Emit(EmitArgs),
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Client fare configuration (JSON).
    #[arg(long)]
    config: PathBuf,
    /// Trip record (JSON).
    #[arg(long)]
    trip: PathBuf,
    /// Print the breakdown as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TripsArgs {
    /// Client fare configuration (JSON).
    #[arg(long)]
    config: PathBuf,
    /// List of trip records (JSON array).
    #[arg(long)]
    trips: PathBuf,
    /// First service date to bill (YYYY-MM-DD).
    #[arg(long, requires = "to")]
    from: Option<String>,
    /// Last service date to bill (YYYY-MM-DD).
    #[arg(long, requires = "from")]
    to: Option<String>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    trips: TripsArgs,
    /// Print the preview as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EmitArgs {
    #[command(flatten)]
    trips: TripsArgs,
    #[arg(long)]
    number: String,
    #[arg(long)]
    client: String,
    /// Where to write the invoice record (JSON).
    #[arg(long)]
    out: PathBuf,
    /// Also export the invoice lines as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(raw.to_string()))
}

fn parse_period(args: &TripsArgs) -> Result<Option<Period>> {
    match (&args.from, &args.to) {
        (Some(from), Some(to)) => Ok(Some(Period::new(parse_date(from)?, parse_date(to)?)?)),
        _ => Ok(None),
    }
}

fn preview_trips(
    engine: &FareEngine,
    args: &TripsArgs,
) -> Result<fare_engine::InvoicePreview> {
    let period = parse_period(args)?;
    let config = files::load_config(&args.config)?;
    let trips = files::load_trips(&args.trips)?;
    Ok(engine.preview(&trips, &config, period.as_ref()))
}

fn run(cli: Cli, settings: &Settings) -> Result<()> {
    let engine = FareEngine::builder().tolls(settings.toll_table()).build();
    let symbol = settings.currency_symbol.as_str();

    match cli.command {
        Command::Quote(args) => {
            let config = files::load_config(&args.config)?;
            let trip = files::load_trip(&args.trip)?;
            let fare = engine.compute(&trip, &config);
            if args.json {
                let json = serde_json::to_string_pretty(&fare).map_err(|source| AppError::Json {
                    path: "stdout".to_string(),
                    source,
                })?;
                println!("{json}");
            } else {
                print!("{}", render::breakdown(&fare, symbol));
            }
        }
        Command::Preview(args) => {
            let preview = preview_trips(&engine, &args.trips)?;
            if args.json {
                let json =
                    serde_json::to_string_pretty(&preview).map_err(|source| AppError::Json {
                        path: "stdout".to_string(),
                        source,
                    })?;
                println!("{json}");
            } else {
                print!("{}", render::preview(&preview, symbol));
            }
        }
        Command::Emit(args) => {
            let preview = preview_trips(&engine, &args.trips)?;
            let invoice = Invoice::emit(&args.number, &args.client, preview)?;
            files::write_invoice(&args.out, &invoice)?;
            if let Some(csv) = &args.csv {
                files::export_lines_to(csv, invoice.lines())?;
            }
            println!(
                "emitted invoice {} ({}): {}",
                invoice.number(),
                invoice.id(),
                fare_engine::Amount::new(invoice.totals().total).with_symbol(symbol)
            );
        }
    }

    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.settings.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "billing={level},fare_engine={level}",
            level = settings.level
        ))
        .init();

    if let Err(err) = run(cli, &settings) {
        tracing::error!("{err}");
        return Err(err.into());
    }
    Ok(())
}
