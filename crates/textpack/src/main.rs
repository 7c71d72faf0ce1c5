use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use textpack::{Config, RunSummary};

#[derive(Parser, Debug)]
#[command(
    name = "textpack",
    version,
    about = "Collect files from a directory and its subdirectories into multiple output files"
)]
struct Cli {
    /// The directory to search for files (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Base name for output files (default: collected_files)
    #[arg(short, long, value_name = "BASE")]
    output: Option<String>,

    /// File name suffixes to include (default: all files)
    #[arg(short, long, num_args = 1.., value_name = "EXT")]
    extensions: Option<Vec<String>>,

    /// Maximum number of lines per output file (default: 7000)
    #[arg(short, long, value_name = "N")]
    line_limit: Option<usize>,

    /// Additional directory names to skip; node_modules is always skipped
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Config file to use instead of ./textpack.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Apply command-line flags over the file-based configuration
    fn override_config(&self, config: &mut Config) {
        if let Some(directory) = &self.directory {
            config.directory.clone_from(directory);
        }
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if let Some(extensions) = &self.extensions {
            config.extensions = Some(extensions.clone());
        }
        if let Some(line_limit) = self.line_limit {
            config.line_limit = line_limit;
        }
        if !self.exclude.is_empty() {
            config.exclude.clone_from(&self.exclude);
        }
    }

    const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();

    match execute(&cli) {
        Ok(summary) => {
            println!(
                "Collection complete. Created {} output files.",
                summary.bundle_count()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<RunSummary> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.override_config(&mut config);
    log::debug!("Resolved configuration: {config:?}");
    Ok(textpack::run(&config)?)
}
