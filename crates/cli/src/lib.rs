pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use dealiq_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "dealiq",
    about = "DealIQ analytics operator CLI",
    long_about = "Validate generated Excel/PDF deliverables and analyze CRM exports: \
                  schema detection, data cleaning, and pipeline metrics.",
    after_help = "Examples:\n  dealiq validate out/forecast.xlsx --save\n  dealiq analyze data/uploads/deals.csv\n  dealiq schema data/uploads/deals.csv"
)]
pub struct Cli {
    /// Path to a dealiq.toml config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate a generated .xlsx/.xlsm/.pdf deliverable and report quality")]
    Validate {
        file: PathBuf,
        #[arg(long, help = "Persist the report as JSON under the configured reports directory")]
        save: bool,
    },
    #[command(about = "Run the full pipeline: ingest, schema detection, cleaning, metrics")]
    Analyze { file: PathBuf },
    #[command(about = "Detect CRM schema fields in a tabular export")]
    Schema { file: PathBuf },
    #[command(about = "Show basic statistics for a tabular export")]
    Profile { file: PathBuf },
    #[command(about = "Inspect effective configuration values")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            let result =
                commands::CommandResult::failure("config", "config", error.to_string(), 2);
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Validate { file, save } => commands::validate::run(&file, save, &config),
        Command::Analyze { file } => commands::analyze::run(&file),
        Command::Schema { file } => commands::schema::run(&file),
        Command::Profile { file } => commands::profile::run(&file),
        Command::Config => commands::config::run(&config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_validate_with_save() {
        let cli = Cli::try_parse_from(["dealiq", "validate", "out.xlsx", "--save"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Validate { ref file, save: true } if file == &PathBuf::from("out.xlsx")
        ));
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["dealiq"]).is_err());
    }

    #[test]
    fn global_config_flag_is_accepted_after_subcommand() {
        let cli =
            Cli::try_parse_from(["dealiq", "analyze", "deals.csv", "--config", "dealiq.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dealiq.toml")));
    }
}
