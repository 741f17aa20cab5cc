use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory to run in; the config file is searched upward from here
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Database URL, e.g. "postgres://localhost/news" or "sqlite:news.db"
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Logging level (overrides config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    /// Runs the full report when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the full readership and reliability report
    Report(ReportArgs),

    /// Print the most viewed articles
    Articles(ArticlesArgs),

    /// Print authors ranked by total article views
    Authors(FormatArgs),

    /// Print the days on which too many requests failed
    Errors(ErrorsArgs),

    /// Print the effective configuration
    Config(FormatArgs),
}

/// Arguments for the report command
#[derive(Parser, Debug, Default)]
pub struct ReportArgs {
    /// Comma-separated sections to print: articles, authors, errors.
    /// If omitted, all sections are printed.
    #[arg(long)]
    pub sections: Option<String>,

    /// Number of articles in the top articles section.
    /// Replaces config [report].limit if provided.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Error percentage a day must exceed to be listed.
    /// Replaces config [report].threshold if provided.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Keep printing the remaining sections after one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the articles command
#[derive(Parser, Debug)]
pub struct ArticlesArgs {
    /// Number of articles to list.
    /// Replaces config [report].limit if provided.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the errors command
#[derive(Parser, Debug)]
pub struct ErrorsArgs {
    /// Error percentage a day must exceed to be listed.
    /// Replaces config [report].threshold if provided.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for commands that only choose an output format
#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    pub format: String,
}
