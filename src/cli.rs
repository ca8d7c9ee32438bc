use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A tool to build, inspect and share table filter sets as URL parameters
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the filterable fields and their value rules
    Fields,

    /// Decode a `filters` parameter and display the restored rows
    Show {
        /// Encoded parameter value; omit for "no active filters"
        #[arg(short, long)]
        filters: Option<String>,
    },

    /// Decode a `filters` parameter and print the query-ready predicates
    Transform {
        /// Encoded parameter value; omit for "no active filters"
        #[arg(short, long)]
        filters: Option<String>,
    },

    /// Encode a JSON array of filter rows into a `filters` parameter value
    Encode {
        /// Path to the JSON file, or "-" for stdin
        #[arg(short, long)]
        input: PathBuf,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
