// invmerge - reconcile scanned equipment with an inventory export

mod exit_codes;
mod logger;
mod steps;
mod workspace;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use invmerge_inventory::InventoryError;

use exit_codes::{inventory_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

const DEFAULT_CONFIG: &str = "config.json";

#[derive(Parser)]
#[command(name = "invmerge")]
#[command(about = "Merge recorded equipment scans into an inventory export")]
#[command(version)]
struct Cli {
    /// Also print debug messages
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add the actual-count column and generate pseudo-IDs in the inventory CSV
    #[command(after_help = "\
Examples:
  invmerge init
  invmerge init -c thw/config.json")]
    Init {
        /// Config file (JSON, or TOML by extension)
        #[arg(long, short = 'c', default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Count recorded scans and write a reconciled result CSV
    #[command(after_help = "\
Examples:
  invmerge process
  invmerge process -c config.json --json
  invmerge process --output-dir exports/")]
    Process {
        /// Config file (JSON, or TOML by extension)
        #[arg(long, short = 'c', default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Print the reconciliation report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Directory for the result file (default: <working_dir>/result)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Write recorded counts into the configured Excel worksheet
    #[command(after_help = "\
Examples:
  invmerge update-excel
  invmerge update-excel --output inventar_neu.xlsx")]
    UpdateExcel {
        /// Config file (JSON, or TOML by extension)
        #[arg(long, short = 'c', default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Output workbook (default: overwrite the configured file)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Validate a config file without touching any data
    Validate {
        /// Config file (JSON, or TOML by extension)
        #[arg(long, short = 'c', default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(logger::level_for(cli.quiet, cli.verbose)) {
        eprintln!("warning: logging unavailable: {e}");
    }

    let result = match cli.command {
        Commands::Init { config } => steps::cmd_init(config),
        Commands::Process { config, json, output_dir } => steps::cmd_process(config, json, output_dir),
        Commands::UpdateExcel { config, output } => steps::cmd_update_excel(config, output),
        Commands::Validate { config } => steps::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Failure that fits no specific exit code.
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<InventoryError> for CliError {
    fn from(err: InventoryError) -> Self {
        let hint = match &err {
            InventoryError::MissingColumn { role, .. } => {
                Some(format!("check columns.{role} in the config file"))
            }
            InventoryError::TargetParse { .. } => {
                Some("fix the quantity in the inventory CSV; no result file was written".to_string())
            }
            _ => None,
        };
        Self { code: inventory_exit_code(&err), message: err.to_string(), hint }
    }
}
