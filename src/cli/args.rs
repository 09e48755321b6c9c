//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Extract Go package documentation as JSON
#[derive(Parser, Debug)]
#[command(name = "goscribe")]
#[command(about = "Extract Go package documentation as JSON")]
#[command(version)]
pub struct Args {
    /// Directory of the Go package to document
    pub path: Option<PathBuf>,

    /// Write the document to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
