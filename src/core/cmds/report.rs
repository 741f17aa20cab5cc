use std::io::Write;

use log::{debug, error};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::SqlStore;
use crate::types::{AppError, AppResult, ArticleStat, AuthorStat, ErrorDay, StoreResult};

/// One of the three summaries a report is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Section {
    Articles,
    Authors,
    Errors,
}

impl Section {
    /// Every section, in the order a full report prints them
    pub fn all() -> Vec<Section> {
        Section::iter().collect()
    }

    pub fn header(&self, options: &ReportOptions) -> String {
        match self {
            Section::Articles => format!("-- Top {} Most Read Articles --", options.limit),
            Section::Authors => "-- Most Popular Authors --".to_string(),
            Section::Errors => {
                format!("-- Days With More Than {}% Errors --", options.threshold)
            }
        }
    }
}

/// Parse a comma-separated list of section names, e.g. "articles,errors".
/// Duplicates are dropped and the result follows the fixed report order.
pub fn parse_sections(input: &str) -> AppResult<Vec<Section>> {
    let mut requested = Vec::new();
    for name in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let section = name
            .parse::<Section>()
            .map_err(|_| AppError::Config(format!("Unknown report section: {name}")))?;
        requested.push(section);
    }
    if requested.is_empty() {
        return Err(AppError::Config("No report sections given".to_string()));
    }
    Ok(Section::iter().filter(|s| requested.contains(s)).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub limit: u32,
    pub threshold: f64,
    pub keep_going: bool,
    pub format: OutputFormat,
}

enum SectionRows {
    Articles(Vec<ArticleStat>),
    Authors(Vec<AuthorStat>),
    Errors(Vec<ErrorDay>),
}

impl SectionRows {
    fn lines(&self) -> Vec<String> {
        match self {
            SectionRows::Articles(rows) => rows.iter().map(ToString::to_string).collect(),
            SectionRows::Authors(rows) => rows.iter().map(ToString::to_string).collect(),
            SectionRows::Errors(rows) => rows.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Serialize, Default)]
struct JsonReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    articles: Option<Vec<ArticleStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authors: Option<Vec<AuthorStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_days: Option<Vec<ErrorDay>>,
}

impl JsonReport {
    fn insert(&mut self, rows: SectionRows) {
        match rows {
            SectionRows::Articles(rows) => self.articles = Some(rows),
            SectionRows::Authors(rows) => self.authors = Some(rows),
            SectionRows::Errors(rows) => self.error_days = Some(rows),
        }
    }
}

async fn fetch_section(
    store: &SqlStore,
    section: Section,
    options: &ReportOptions,
) -> StoreResult<SectionRows> {
    Ok(match section {
        Section::Articles => SectionRows::Articles(store.top_articles(options.limit).await?),
        Section::Authors => SectionRows::Authors(store.author_ranking().await?),
        Section::Errors => SectionRows::Errors(store.high_error_days(options.threshold).await?),
    })
}

/// Run the requested sections in order and write them to `out`.
///
/// Rows for a section are fully fetched before anything of that section is
/// written, so a failed query never leaves a half-printed section behind.
pub async fn execute_report<W: Write>(
    store: &SqlStore,
    sections: &[Section],
    options: &ReportOptions,
    out: &mut W,
) -> AppResult<()> {
    let mut failed = 0;
    let mut printed = 0;
    let mut json = JsonReport::default();

    for &section in sections {
        debug!("Running {section} section");
        let rows = match fetch_section(store, section, options).await {
            Ok(rows) => rows,
            Err(e) if options.keep_going => {
                error!("The {section} section failed: {e}");
                failed += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match options.format {
            OutputFormat::Text => {
                if printed > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "{}", section.header(options))?;
                for line in rows.lines() {
                    writeln!(out, "{line}")?;
                }
            }
            OutputFormat::Json => json.insert(rows),
        }
        printed += 1;
    }

    if options.format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    }
    out.flush()?;

    if failed > 0 {
        return Err(AppError::SectionsFailed(failed));
    }
    Ok(())
}
