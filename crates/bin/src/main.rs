//! Quarry CLI binary.
//!
//! Provides a command-line interface for the Quarry data facade.

mod logger;
mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use quarry::data::french::THREE_FACTOR_DATASET;
use quarry::data::yahoo::Interval;
use quarry::{
    DEFAULT_FUTURES_SYMBOL, DEFAULT_OPTIONS_SYMBOL, DEFAULT_PROVIDER, HistoricalQuery, Output,
    Provider, Quarry, QuarryConfig,
};
use render::{Format, render};
use std::io::{self, Write};
use std::process;
use std::time::Duration;
use tracing::debug;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Quarry: fetch market data into tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    format: Format,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Historical prices for a ticker
    Stock {
        /// Ticker symbol
        ticker: String,

        /// Data provider (yfinance or cboe)
        #[arg(long, default_value = DEFAULT_PROVIDER)]
        provider: Provider,

        /// First day (YYYY-MM-DD), defaults to one year before --end
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Bar interval (1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo)
        #[arg(long, default_value = "1d")]
        interval: Interval,
    },

    /// Futures settlement curve
    FuturesCurve {
        /// Futures product code
        #[arg(default_value = DEFAULT_FUTURES_SYMBOL)]
        symbol: String,

        /// Settlement date (YYYY-MM-DD), defaults to the latest
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Option chain for an underlying
    OptionsChain {
        /// Underlying symbol
        #[arg(default_value = DEFAULT_OPTIONS_SYMBOL)]
        symbol: String,
    },

    /// Fama-French factor tables
    FamaFrench {
        /// Dataset name in the French data library
        #[arg(long, default_value = THREE_FACTOR_DATASET)]
        dataset: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    quarry::set_output_type(cli.format.output_type())?;

    let config = QuarryConfig::default().with_timeout(Duration::from_secs(cli.timeout));
    let quarry = Quarry::with_config(&config)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Stock {
            ticker,
            provider,
            start,
            end,
            interval,
        } => {
            let mut query = HistoricalQuery::new(ticker)
                .provider(provider)
                .interval(interval);
            query.start = start;
            query.end = end;

            let output = quarry.stock_data(&query).await?;
            render(&mut out, &output, cli.format)?;
        }
        Commands::FuturesCurve { symbol, date } => {
            let output = quarry.futures_curve(&symbol, date).await?;
            render(&mut out, &output, cli.format)?;
        }
        Commands::OptionsChain { symbol } => {
            let output = quarry.options_chain(&symbol).await?;
            render(&mut out, &output, cli.format)?;
        }
        Commands::FamaFrench { dataset } => {
            fama_french(&quarry, &dataset, cli.format, &mut out).await?;
        }
    }

    Ok(())
}

async fn fama_french(
    quarry: &Quarry,
    dataset: &str,
    format: Format,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    if dataset == THREE_FACTOR_DATASET {
        let factors = quarry.fama_french_factors().await?;
        print_section(out, format, &factors.description)?;
        print_section(out, format, "Monthly factors")?;
        render(out, &factors.monthly, format)?;
        print_section(out, format, "Annual factors")?;
        render(out, &factors.annual, format)?;
        return Ok(());
    }

    let parsed = quarry.fama_french_dataset(dataset).await?;
    debug!(dataset, tables = parsed.tables.len(), "rendering dataset");
    print_section(out, format, &parsed.description)?;
    for table in parsed.tables {
        print_section(out, format, &table.title)?;
        let output = Output::shape(table.frame, quarry::output_type())?;
        render(out, &output, format)?;
    }
    Ok(())
}

/// Headings only make sense for text output; machine formats stay parseable per table.
fn print_section(out: &mut impl Write, format: Format, heading: &str) -> io::Result<()> {
    if format == Format::Text && !heading.is_empty() {
        writeln!(out, "\n{heading}\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["quarry", "futures-curve"]).unwrap();
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.timeout, 30);
        match cli.command {
            Commands::FuturesCurve { symbol, date } => {
                assert_eq!(symbol, "VX");
                assert!(date.is_none());
            }
            _ => panic!("expected futures-curve"),
        }
    }

    #[test]
    fn test_cli_stock_args() {
        let cli = Cli::try_parse_from([
            "quarry",
            "stock",
            "AAPL",
            "--provider",
            "cboe",
            "--start",
            "2024-01-01",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Format::Json);
        match cli.command {
            Commands::Stock {
                ticker,
                provider,
                start,
                interval,
                ..
            } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(provider, Provider::Cboe);
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(interval, Interval::OneDay);
            }
            _ => panic!("expected stock"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_provider() {
        let result = Cli::try_parse_from(["quarry", "stock", "AAPL", "--provider", "polygon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_options_default_symbol() {
        let cli = Cli::try_parse_from(["quarry", "options-chain"]).unwrap();
        assert!(matches!(cli.command, Commands::OptionsChain { symbol } if symbol == "SPY"));
    }
}
