//! Part list extraction for flat pattern export.
//!
//! Turns a drawing's BOM table or an assembly's component tree into a flat,
//! deduplicated list of [`Item`]s. The CAD host is only reached through the
//! [`TableSource`], [`AssemblySource`] and [`Component`] traits.

mod columns;
mod extract;
mod item;
pub mod naming;
mod source;

pub use columns::{
    resolve_columns, BomColumnIndices, ColumnResolver, ColumnRole, ExplicitColumns,
    HeuristicColumns,
};
pub use extract::{AssemblyItemExtractor, BomItemExtractor, ItemExtractor};
pub use item::{strip_font_markup, CutProcess, Item};
pub use source::{AssemblySource, ColumnType, Component, TableSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BomError {
    #[error("{0} column not found")]
    ColumnNotFound(ColumnRole),

    #[error(
        "BOM row {row} references more than one configuration ({}); multi-configuration rows are not supported",
        configurations.join(", ")
    )]
    MultipleConfigurations {
        row: usize,
        configurations: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, BomError>;
