use std::fmt;

use serde::Serialize;

use crate::source::{ColumnType, TableSource};
use crate::{BomError, Result};

/// What a BOM column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    ItemNumber,
    Quantity,
    Description,
    PartNumber,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::ItemNumber => write!(f, "Item number"),
            ColumnRole::Quantity => write!(f, "Quantity"),
            ColumnRole::Description => write!(f, "Description"),
            ColumnRole::PartNumber => write!(f, "Part number"),
        }
    }
}

/// Column position per role; `None` means the role was not found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BomColumnIndices {
    pub item_number: Option<usize>,
    pub quantity: Option<usize>,
    pub description: Option<usize>,
    pub part_number: Option<usize>,
}

impl BomColumnIndices {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::ItemNumber => self.item_number,
            ColumnRole::Quantity => self.quantity,
            ColumnRole::Description => self.description,
            ColumnRole::PartNumber => self.part_number,
        }
    }

    /// Fail on the first role that is still unresolved
    pub fn require_all(&self) -> Result<()> {
        for role in [
            ColumnRole::PartNumber,
            ColumnRole::ItemNumber,
            ColumnRole::Description,
            ColumnRole::Quantity,
        ] {
            if self.get(role).is_none() {
                return Err(BomError::ColumnNotFound(role));
            }
        }
        Ok(())
    }
}

/// Strategy for locating BOM columns in a table
pub trait ColumnResolver {
    fn resolve<T: TableSource + ?Sized>(&self, table: &T) -> Result<BomColumnIndices>;
}

/// Resolve columns from the table's own column metadata.
///
/// Every role must be found; a table missing any of them is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitColumns;

impl ExplicitColumns {
    fn index_of_type<T: TableSource + ?Sized>(table: &T, column_type: ColumnType) -> Option<usize> {
        (0..table.column_count()).find(|&column| table.column_type(column) == Some(column_type))
    }

    fn index_of_title<T: TableSource + ?Sized>(table: &T, title: &str) -> Option<usize> {
        let title = title.to_lowercase();
        (0..table.column_count()).find(|&column| table.column_title(column).to_lowercase() == title)
    }
}

impl ColumnResolver for ExplicitColumns {
    fn resolve<T: TableSource + ?Sized>(&self, table: &T) -> Result<BomColumnIndices> {
        let indices = BomColumnIndices {
            item_number: Self::index_of_type(table, ColumnType::ItemNumber),
            quantity: Self::index_of_type(table, ColumnType::Quantity),
            description: Self::index_of_title(table, "Description"),
            part_number: Self::index_of_type(table, ColumnType::PartNumber),
        };

        log::debug!("Resolved BOM columns from metadata: {indices:?}");
        indices.require_all()?;
        Ok(indices)
    }
}

/// Guess the item number column from the cell values alone.
///
/// Item numbers run 1, 2, 3, ... down the table, so the column with the most
/// adjacent rows holding consecutive integers is taken as the item number
/// column. Only that role is resolved, and a wrong guess is not detectable
/// here: without any consecutive pair the first column is taken. Only a table
/// with no columns at all stays unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicColumns;

impl HeuristicColumns {
    /// Number of rows `r` where `cell[r] + 1 == cell[r + 1]`
    pub fn consecutive_pairs<T: TableSource + ?Sized>(table: &T, column: usize) -> usize {
        let values: Vec<Option<i64>> = (0..table.row_count())
            .map(|row| table.raw_text(row, column).trim().parse::<i64>().ok())
            .collect();

        values
            .windows(2)
            .filter(|pair| match (pair[0], pair[1]) {
                (Some(a), Some(b)) => a.checked_add(1) == Some(b),
                _ => false,
            })
            .count()
    }
}

impl ColumnResolver for HeuristicColumns {
    fn resolve<T: TableSource + ?Sized>(&self, table: &T) -> Result<BomColumnIndices> {
        let mut best: Option<(usize, usize)> = None;

        for column in 0..table.column_count() {
            let count = Self::consecutive_pairs(table, column);
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((column, count));
            }
        }

        match best {
            Some((column, count)) => log::debug!(
                "Guessed item number column {column} ({count} consecutive row pair(s))"
            ),
            None => log::warn!("Table has no columns, item number column not resolved"),
        }

        Ok(BomColumnIndices {
            item_number: best.map(|(column, _)| column),
            ..Default::default()
        })
    }
}

/// Resolve columns with metadata when the table has it, otherwise by guessing
pub fn resolve_columns<T: TableSource + ?Sized>(table: &T) -> Result<BomColumnIndices> {
    if table.has_column_types() {
        ExplicitColumns.resolve(table)
    } else {
        log::debug!("Table has no column metadata, falling back to heuristic resolution");
        HeuristicColumns.resolve(table)
    }
}
