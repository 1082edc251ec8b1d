#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::struct_excessive_bools)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modlink")]
#[command(author, version, about = "Resolve schema and library modules with their dependencies", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Load modules and report the resolved model and its findings
    Resolve {
        /// Module documents to load as roots
        files: Vec<PathBuf>,

        /// Namespaces to load through the resolver
        #[arg(long = "namespace", value_name = "NS")]
        namespaces: Vec<String>,

        /// Catalog files mapping namespaces to locations
        #[arg(long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,

        /// Directories to index by declared namespace
        #[arg(long = "index", value_name = "DIR")]
        indexes: Vec<PathBuf>,

        /// Reject libraries whose checksum is missing or wrong
        #[arg(long)]
        crc: bool,

        /// Maximum include/import nesting below each root
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Engine configuration file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print the checksum of a library document
    Checksum {
        /// Library document
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    logging::init(cli.verbose, cli.json);

    match cli.command {
        Commands::Version => commands::version::run(cli.json),
        Commands::Resolve {
            files,
            namespaces,
            catalogs,
            indexes,
            crc,
            max_depth,
            config,
        } => commands::resolve::run(
            &cwd,
            &commands::resolve::ResolveArgs {
                files,
                namespaces,
                catalogs,
                indexes,
                crc,
                max_depth,
                config,
            },
            cli.json,
        ),
        Commands::Checksum { file } => commands::checksum::run(&cwd, &file, cli.json),
    }
}
