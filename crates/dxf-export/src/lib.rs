use clap::ValueEnum;

pub mod commands;
pub mod config;
pub mod prompt;
pub mod snapshot;
pub mod utils;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
