pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::store::SqlStore;
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::cmds::report::{OutputFormat, ReportOptions, Section, execute_report};
pub use crate::core::cmds::{execute_config, write_config};
pub use crate::core::main_shared::run_main;
