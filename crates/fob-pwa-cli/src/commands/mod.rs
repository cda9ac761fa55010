//! Command implementations

mod build;
mod config;

pub use build::execute as build_execute;
pub use config::execute as config_execute;
