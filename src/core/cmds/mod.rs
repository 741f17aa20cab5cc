pub mod config;
pub mod report;

pub use config::{execute_config, write_config};
pub use report::execute_report;
