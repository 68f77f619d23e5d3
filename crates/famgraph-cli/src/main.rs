//! famgraph CLI
//!
//! Command-line interface over a family tree export document

use clap::{Parser, Subcommand, ValueEnum};
use famgraph_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "famgraph")]
#[command(about = "famgraph - Family relationship graph tools", long_about = None)]
struct Cli {
    /// Log output format (filtered by RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show parents, children, spouses and siblings of a person
    Kin(commands::kin::KinArgs),
    /// Assign generation numbers
    Generations(commands::generations::GenerationsArgs),
    /// Compute a positioned tree layout as JSON
    Layout(commands::layout::LayoutArgs),
    /// Check whether a relationship could be added
    Validate(commands::validate::ValidateArgs),
    /// Compare an incoming document against an existing one
    ImportCheck(commands::import_check::ImportCheckArgs),
    /// Scan a document for dangling edges and ancestry cycles
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Kin(args) => commands::kin::execute(args).map(|()| 0),
        Commands::Generations(args) => commands::generations::execute(args).map(|()| 0),
        Commands::Layout(args) => commands::layout::execute(args).map(|()| 0),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::ImportCheck(args) => commands::import_check::execute(args).map(|()| 0),
        Commands::Check(args) => commands::check::execute(args).map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
