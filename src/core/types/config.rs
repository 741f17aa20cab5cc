use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::types::{AppError, AppResult};

pub const DEFAULT_DB: &str = "postgres://localhost/news";
pub const DEFAULT_LIMIT: u32 = 3;
pub const DEFAULT_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReportConfig {
    /// Number of articles in the top articles section
    pub limit: Option<u32>,
    /// Error percentage a day must strictly exceed to be reported
    pub threshold: Option<f64>,
    /// Continue with the remaining sections after one fails
    pub keep_going: Option<bool>,
}

impl ReportConfig {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn keep_going(&self) -> bool {
        self.keep_going.unwrap_or(false)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            limit: Some(self.limit()),
            threshold: Some(self.threshold()),
            keep_going: Some(self.keep_going()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub db: Option<String>,

    // Nested sections
    pub log: Option<LogConfig>,
    pub report: Option<ReportConfig>,
}

impl Config {
    pub fn db(&self) -> &str {
        self.db.as_deref().unwrap_or(DEFAULT_DB)
    }

    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn report(&self) -> ReportConfig {
        self.report.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            db: Some(self.db().to_string()),
            log: Some(self.log().to_effective()),
            report: Some(self.report().to_effective()),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let report = self.report();
        if report.limit() == 0 {
            return Err(AppError::Config(
                "report.limit must be at least 1".to_string(),
            ));
        }
        let threshold = report.threshold();
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(AppError::Config(format!(
                "report.threshold must be a percentage between 0 and 100, got {threshold}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<String>,
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
    pub limit: Option<u32>,
    pub threshold: Option<f64>,
    pub keep_going: bool,
}

pub const CONFIG_FILENAME: &str = "readerwise.toml";

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let mut cfg = Config::default();
        if let Some(path) = find_nearest_config_file()
            && let Ok(file_cfg) = read_config_file(&path)
        {
            apply_file_config(&mut cfg, &file_cfg);
        }
        cfg
    })
}

pub fn init_with_overrides(overrides: &CliOverrides) -> AppResult<()> {
    let mut cfg = Config::default();

    // 1) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file() {
        let file_cfg = read_config_file(&path)?;
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 2) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);

    cfg.validate()?;
    let _ = CONFIG.set(cfg);
    Ok(())
}

fn read_config_file(path: &Path) -> AppResult<Config> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str::<Config>(&contents)?)
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    if file.db.is_some() {
        cfg.db = file.db.clone();
    }

    // Merge log section
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    // Merge report section
    if let Some(file_report) = &file.report {
        let mut report = cfg.report.clone().unwrap_or_default();
        if file_report.limit.is_some() {
            report.limit = file_report.limit;
        }
        if file_report.threshold.is_some() {
            report.threshold = file_report.threshold;
        }
        if file_report.keep_going.is_some() {
            report.keep_going = file_report.keep_going;
        }
        cfg.report = Some(report);
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    if let Some(db) = &overrides.db
        && !db.trim().is_empty()
    {
        cfg.db = Some(db.trim().to_string());
    }

    // Log overrides
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }

    // Report overrides
    let mut report = cfg.report.clone().unwrap_or_default();
    if overrides.limit.is_some() {
        report.limit = overrides.limit;
    }
    if overrides.threshold.is_some() {
        report.threshold = overrides.threshold;
    }
    // A bare flag can only switch keep-going on
    if overrides.keep_going {
        report.keep_going = Some(true);
    }
    if overrides.limit.is_some() || overrides.threshold.is_some() || overrides.keep_going {
        cfg.report = Some(report);
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled_stderr(),
    }
}
