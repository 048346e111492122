//! sheetroll CLI - Team leader rollups from daily attendance workbooks
//!
//! Command-line front end over the filtering pipeline: inspect a workbook's
//! date sheets and team leaders, then export one team leader's rows.

mod commands;
mod config;
mod exit;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::exit::ExitCode;

#[derive(Parser)]
#[command(name = "sheetroll")]
#[command(author, version, about = "Filter daily attendance sheets by team leader", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List date sheets, team leaders and the covered date range
    Inspect {
        /// Input workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Fail on sheets named like an impossible date instead of skipping them
        #[arg(long)]
        strict_dates: bool,
    },

    /// Export the rows of one team leader over a date range
    Filter {
        /// Input workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Team leader name (case-insensitive, partial match)
        #[arg(short = 'l', long)]
        supervisor: String,

        /// First day to include (dd.mm.yyyy); defaults to the earliest sheet
        #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        /// Last day to include (dd.mm.yyyy); defaults to the latest sheet
        #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
        to: Option<NaiveDate>,

        /// Output workbook (default: <input>_filtered.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the output sheet
        #[arg(long)]
        sheet_name: Option<String>,

        /// Print the first rows of the result
        #[arg(long)]
        preview: bool,

        /// Fail on sheets named like an impossible date instead of skipping them
        #[arg(long)]
        strict_dates: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    sheetroll_core::parse_user_date(value).map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect {
            file,
            format,
            strict_dates,
        } => {
            config::apply_strict_dates(&mut config, strict_dates);
            commands::inspect(&file, format, &config)
        }
        Commands::Filter {
            file,
            supervisor,
            from,
            to,
            output,
            sheet_name,
            preview,
            strict_dates,
        } => {
            config::apply_strict_dates(&mut config, strict_dates);
            if let Some(name) = sheet_name {
                config.output_sheet_name = name;
            }
            commands::filter(
                &commands::FilterArgs {
                    file,
                    supervisor,
                    from,
                    to,
                    output,
                    preview,
                },
                &config,
            )
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::Failure.into()
        }
    }
}
