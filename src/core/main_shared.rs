use std::env;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::SqlStore;
use crate::core::cli::{Args, Commands, ReportArgs};
use crate::core::cmds;
use crate::core::cmds::report::{OutputFormat, ReportOptions, Section, parse_sections};
use crate::core::logging::init_logging;
use crate::types::config::{CliOverrides, ReportConfig, config, init_with_overrides};
use crate::types::{AppError, AppResult};

/// What a parsed command line asks for once config is resolved
#[derive(Debug)]
pub enum Plan {
    Config(OutputFormat),
    Report {
        sections: Vec<Section>,
        options: ReportOptions,
    },
}

fn parse_format(format: &str) -> AppResult<OutputFormat> {
    format
        .parse::<OutputFormat>()
        .map_err(|_| AppError::Config(format!("Unknown output format: {format}")))
}

fn default_command() -> Commands {
    Commands::Report(ReportArgs {
        format: OutputFormat::Text.to_string(),
        ..Default::default()
    })
}

/// Global flags plus the report settings the chosen subcommand can override
pub fn cli_overrides(args: &Args, command: &Commands) -> CliOverrides {
    let mut overrides = CliOverrides {
        db: args.db.clone(),
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
        ..Default::default()
    };
    match command {
        Commands::Report(report_args) => {
            overrides.limit = report_args.limit;
            overrides.threshold = report_args.threshold;
            overrides.keep_going = report_args.keep_going;
        }
        Commands::Articles(articles_args) => overrides.limit = articles_args.limit,
        Commands::Errors(errors_args) => overrides.threshold = errors_args.threshold,
        Commands::Authors(_) | Commands::Config(_) => {}
    }
    overrides
}

/// Turn a subcommand into the sections to run, with limit, threshold and
/// keep-going taken from the already merged report config
pub fn plan(command: Commands, report_config: &ReportConfig) -> AppResult<Plan> {
    let (sections, format) = match command {
        Commands::Config(format_args) => {
            return Ok(Plan::Config(parse_format(&format_args.format)?));
        }
        Commands::Report(report_args) => {
            let sections = match report_args.sections.as_deref() {
                Some(list) => parse_sections(list)?,
                None => Section::all(),
            };
            (sections, parse_format(&report_args.format)?)
        }
        Commands::Articles(articles_args) => (
            vec![Section::Articles],
            parse_format(&articles_args.format)?,
        ),
        Commands::Authors(format_args) => {
            (vec![Section::Authors], parse_format(&format_args.format)?)
        }
        Commands::Errors(errors_args) => {
            (vec![Section::Errors], parse_format(&errors_args.format)?)
        }
    };

    Ok(Plan::Report {
        sections,
        options: ReportOptions {
            limit: report_config.limit(),
            threshold: report_config.threshold(),
            keep_going: report_config.keep_going(),
            format,
        },
    })
}

pub async fn run_main() -> AppResult<()> {
    let mut args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }

    let command = args.command.take().unwrap_or_else(default_command);

    // Initialize configuration (file, then CLI overrides)
    init_with_overrides(&cli_overrides(&args, &command))?;

    // Initialize logging after config so level/color are applied
    init_logging();
    debug!("Current working directory: {}", env::current_dir()?.display());

    let (sections, options) = match plan(command, &config().report())? {
        Plan::Config(format) => {
            return cmds::execute_config(format, &mut std::io::stdout()).await;
        }
        Plan::Report { sections, options } => (sections, options),
    };

    debug!("Using database: {}", config().db());
    let store = SqlStore::connect(config().db()).await?;
    let result = cmds::execute_report(&store, &sections, &options, &mut std::io::stdout()).await;
    store.close().await;
    result
}
