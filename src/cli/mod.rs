//! CLI module for goscribe

mod args;

pub use args::Args;

use crate::config::Config;
use crate::doc::Extractor;
use crate::error::Result;
use crate::output::write_json;
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;

const GREETING: &str = "Hello, World!";

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(args.verbose);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    // RUST_LOG overrides the default level
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn execute(args: Args) -> Result<()> {
    let Some(path) = args.path else {
        println!("{}", GREETING);
        return Ok(());
    };

    let mut cfg = Config::discover(args.config.as_deref())?;
    cfg.merge_cli(args.pretty);

    log::debug!("Documenting {}", path.display());
    let extractor = Extractor::new(&cfg)?;
    let package = extractor.extract(&path)?;

    match &args.output {
        Some(output) => {
            let mut writer = BufWriter::new(File::create(output)?);
            write_json(&package, &mut writer, cfg.output.pretty)?;
            log::info!("Documentation written to {}", output.display());
        }
        None => {
            let stdout = io::stdout();
            write_json(&package, &mut stdout.lock(), cfg.output.pretty)?;
        }
    }

    Ok(())
}
