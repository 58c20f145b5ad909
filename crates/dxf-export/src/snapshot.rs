//! JSON snapshots of CAD host data.
//!
//! A host-side exporter dumps drawing views, BOM tables and assemblies into
//! these documents; the commands then run the decision and extraction engines
//! over them without a live CAD session.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use dxf_bom::{AssemblySource, ColumnType, Component, TableSource};
use dxf_flat::{Annotation, ViewSource};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Read and parse a snapshot file
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
}

/// Name to report for a snapshot: its own name, else the file stem
fn display_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    })
}

fn default_configuration() -> String {
    "Default".to_string()
}

fn default_true() -> bool {
    true
}

/// A flat pattern drawing view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    /// `[min_x, min_y, max_x, max_y]` in meters
    pub outline: [f64; 4],
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ViewSnapshot {
    pub fn display_name(&self, path: &Path) -> String {
        display_name(&self.name, path)
    }
}

impl ViewSource for ViewSnapshot {
    fn annotations(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }

    fn outline(&self) -> [f64; 4] {
        self.outline
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub title: String,
    #[serde(default = "default_configuration")]
    pub configuration: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub suppressed: bool,
    /// Direct child of the assembly (as opposed to a sub-assembly member)
    #[serde(default = "default_true")]
    pub top_level: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_metal: Option<SheetMetalSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<DescriptionProperty>,
}

impl ComponentSnapshot {
    /// `Description` custom property of the referenced configuration, falling
    /// back to the file-level one. Blank values count as missing.
    pub fn description_property(&self) -> Option<&str> {
        let property = self.description.as_ref()?;

        property
            .configurations
            .get(&self.configuration)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
            .or_else(|| {
                property
                    .file
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
            })
    }
}

/// `Description` custom property values of a part document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Per configuration name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configurations: BTreeMap<String, String>,
}

/// Sheet metal feature data, lengths in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetMetalSnapshot {
    pub thickness: f64,
    pub k_factor: f64,
    pub bend_radius: f64,
}

impl Component for ComponentSnapshot {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn referenced_configuration(&self) -> String {
        self.configuration.clone()
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub title: String,
    /// Absent when the host did not report column types
    #[serde(default, rename = "type")]
    pub column_type: Option<ColumnType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowSnapshot {
    /// Displayed cell text, one entry per column
    pub cells: Vec<String>,
    /// Unformatted cell values; the displayed text is used when absent
    #[serde(default)]
    pub raw: Option<Vec<String>>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub components: Vec<ComponentSnapshot>,
}

/// A BOM table. Column titles form row 0 of the table, `rows[0]` is row 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<ColumnSnapshot>,
    #[serde(default)]
    pub rows: Vec<RowSnapshot>,
}

impl TableSnapshot {
    pub fn display_name(&self, path: &Path) -> String {
        display_name(&self.name, path)
    }

    fn data_row(&self, row: usize) -> Option<&RowSnapshot> {
        row.checked_sub(1).and_then(|i| self.rows.get(i))
    }
}

impl TableSource for TableSnapshot {
    type Component = ComponentSnapshot;

    fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn displayed_text(&self, row: usize, column: usize) -> String {
        if row == 0 {
            return self.column_title(column);
        }
        self.data_row(row)
            .and_then(|r| r.cells.get(column))
            .cloned()
            .unwrap_or_default()
    }

    fn raw_text(&self, row: usize, column: usize) -> String {
        let raw = self
            .data_row(row)
            .and_then(|r| r.raw.as_ref())
            .and_then(|raw| raw.get(column));

        match raw {
            Some(text) => text.clone(),
            None => self.displayed_text(row, column),
        }
    }

    fn is_row_hidden(&self, row: usize) -> bool {
        self.data_row(row).is_some_and(|r| r.hidden)
    }

    fn column_type(&self, column: usize) -> Option<ColumnType> {
        self.columns.get(column).and_then(|c| c.column_type)
    }

    fn column_title(&self, column: usize) -> String {
        self.columns
            .get(column)
            .map(|c| c.title.clone())
            .unwrap_or_default()
    }

    fn components_for_row(&self, row: usize) -> Vec<ComponentSnapshot> {
        self.data_row(row)
            .map(|r| r.components.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblySnapshot {
    #[serde(default)]
    pub name: Option<String>,
    pub components: Vec<ComponentSnapshot>,
}

impl AssemblySnapshot {
    pub fn display_name(&self, path: &Path) -> String {
        display_name(&self.name, path)
    }
}

impl AssemblySource for AssemblySnapshot {
    type Component = ComponentSnapshot;

    fn components(&self, top_level_only: bool) -> Vec<ComponentSnapshot> {
        self.components
            .iter()
            .filter(|c| !top_level_only || c.top_level)
            .cloned()
            .collect()
    }
}
