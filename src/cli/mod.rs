//! CLI command handling

pub mod check;
pub mod config_cmd;
pub mod output;

pub use check::*;
pub use config_cmd::*;
pub use output::*;
