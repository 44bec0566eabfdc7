use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, warn};

use contribution_analyzer::config::{Config, OutputFormat};
use contribution_analyzer::constants::{DEFAULT_CONFIG_FILE, INVALID_INPUT_MESSAGE};
use contribution_analyzer::logging;
use contribution_analyzer::parser::parse_entry;
use contribution_analyzer::pipeline::Pipeline;
use contribution_analyzer::{AnalyzerError, RollupTarget, SortKey};

const EXIT_INVALID_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "contribution-analyzer")]
#[command(about = "Composer and publisher contribution analyzer for album split sheets")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate composer shares across an album spreadsheet
    Analyze {
        /// Spreadsheet to read (xlsx, xlsm, xlsb, xls, ods or csv)
        file: PathBuf,
        /// TOML config file (defaults to ./analyzer.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Workbook sheet to read instead of the first one
        #[arg(long)]
        sheet: Option<String>,
        /// Second list to build: publishers or organizations
        #[arg(long)]
        rollup: Option<RollupTarget>,
        /// Zero-based column of the completeness marker
        #[arg(long)]
        marker_column: Option<usize>,
        /// Zero-based column of the composer entries
        #[arg(long)]
        composer_column: Option<usize>,
        /// Zero-based column of the publisher entries
        #[arg(long)]
        publisher_column: Option<usize>,
        /// Order of the composer list: points or percentage
        #[arg(long)]
        composer_sort: Option<SortKey>,
        /// Order of the second list: points or percentage
        #[arg(long)]
        rollup_sort: Option<SortKey>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Parse a single rights-holder token and print the result
    Parse {
        /// Token such as "Alice (ASCAP 50) [00012345678]"
        token: String,
    },
}

struct Overrides {
    rollup: Option<RollupTarget>,
    marker_column: Option<usize>,
    composer_column: Option<usize>,
    publisher_column: Option<usize>,
    composer_sort: Option<SortKey>,
    rollup_sort: Option<SortKey>,
    json: bool,
}

fn apply_overrides(mut config: Config, o: Overrides) -> Result<Config> {
    if let Some(rollup) = o.rollup {
        config.aggregation.rollup = rollup;
    }
    if let Some(col) = o.marker_column {
        config.columns.marker = col;
    }
    if let Some(col) = o.composer_column {
        config.columns.composers = col;
    }
    if let Some(col) = o.publisher_column {
        config.columns.publishers = Some(col);
    }
    if let Some(key) = o.composer_sort {
        config.aggregation.composer_sort = key;
    }
    if let Some(key) = o.rollup_sort {
        config.aggregation.rollup_sort = key;
    }
    if o.json {
        config.output.format = OutputFormat::Json;
    }
    config.validate()?;
    Ok(config)
}

fn analyze(file: &Path, config: &Config, sheet: Option<&str>) -> Result<ExitCode> {
    let result = match Pipeline::run_for_file(file, config, sheet) {
        Ok(result) => result,
        Err(AnalyzerError::InvalidInput(reason)) => {
            warn!("{}: {}", file.display(), reason);
            println!("{}", INVALID_INPUT_MESSAGE);
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("Failed to analyze {}", file.display())))
        }
    };

    let report = result.report(config);
    match config.output.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.render_json()?),
    }
    Ok(ExitCode::SUCCESS)
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Analyze {
            file,
            config,
            sheet,
            rollup,
            marker_column,
            composer_column,
            publisher_column,
            composer_sort,
            rollup_sort,
            json,
        } => {
            let loaded = Config::load_or_default(config.as_deref(), Path::new(DEFAULT_CONFIG_FILE))
                .context("Failed to load configuration")?;
            let config = apply_overrides(
                loaded,
                Overrides {
                    rollup,
                    marker_column,
                    composer_column,
                    publisher_column,
                    composer_sort,
                    rollup_sort,
                    json,
                },
            )?;

            let _guard = logging::init_logging(cli.verbose, config.logging.log_dir.as_deref());
            analyze(&file, &config, sheet.as_deref())
        }
        Commands::Parse { token } => {
            let _guard = logging::init_logging(cli.verbose, None);
            match parse_entry(&token) {
                Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
                None => println!("no entry"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
