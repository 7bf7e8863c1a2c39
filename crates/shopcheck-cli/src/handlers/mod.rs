//! Command handlers, one module per subcommand

pub mod config;
pub mod list;
pub mod run;

pub use config::{execute_config, masked_yaml};
pub use list::{execute_list, listing};
pub use run::{execute_run, resolve_config};
