//! exscan CLI
//!
//! Command-line interface for the exception-contract differencing engine

use clap::{Parser, Subcommand, ValueEnum};
use exscan_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "exscan")]
#[command(about = "exscan - Exception-contract differencing", long_about = None)]
struct Cli {
    /// Diagnostic log format on stderr
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn profile(self) -> Profile {
        match self {
            LogFormat::Text => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan one version and write its report
    Scan(commands::scan::ScanArgs),
    /// Scan a baseline and a target version and write both reports plus their difference
    Compare(commands::compare::CompareArgs),
    /// Difference two previously written reports
    Diff(commands::diff::DiffArgs),
}

fn main() {
    // Usage errors exit 1 like every other failure; help and version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logging_facility::init(cli.log_format.profile());

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::execute(args),
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
