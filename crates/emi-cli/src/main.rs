mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::loan::{PrepayArgs, ScheduleArgs, YearlyArgs};

/// Loan EMI, moratorium and prepayment schedules
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI, moratorium and prepayment schedules",
    long_about = "Computes equated monthly installments and month-by-month amortization \
                  schedules with decimal precision. Supports interest-only moratoriums, \
                  explicit or templated prepayments, savings comparison and an \
                  inflation-adjusted cost estimate."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Baseline EMI, totals and amortization schedule
    Schedule(ScheduleArgs),
    /// Apply a prepayment plan and compare against the baseline
    Prepay(PrepayArgs),
    /// Calendar-year summary of the effective schedule
    Yearly(YearlyArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("emi=debug,emi_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("emi=info,emi_core=warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Prepay(args) => commands::loan::run_prepay(args),
        Commands::Yearly(args) => commands::loan::run_yearly(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yearly_rejects_entries_flag() {
        let parsed = Cli::try_parse_from([
            "emi", "yearly", "--principal", "500000", "--rate", "9", "--tenure-months", "36",
            "--entries",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_yearly_accepts_prepayment_plan() {
        let cli = Cli::try_parse_from([
            "emi", "yearly", "--principal", "500000", "--rate", "9", "--tenure-months", "36",
            "--template", "16-emi",
        ])
        .unwrap();
        match cli.command {
            Commands::Yearly(args) => assert!(args.template.is_some()),
            _ => panic!("Expected yearly command"),
        }
    }

    #[test]
    fn test_prepay_still_accepts_entries_flag() {
        let cli = Cli::try_parse_from([
            "emi", "prepay", "--principal", "500000", "--rate", "9", "--tenure-months", "36",
            "--template", "16-emi", "--entries",
        ])
        .unwrap();
        match cli.command {
            Commands::Prepay(args) => assert!(args.entries),
            _ => panic!("Expected prepay command"),
        }
    }
}
