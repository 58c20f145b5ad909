use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use dxf_bom::{
    BomColumnIndices, ColumnResolver, ColumnRole, ColumnType, ExplicitColumns, HeuristicColumns,
    TableSource,
};
use serde::Serialize;

use crate::snapshot::{self, TableSnapshot};
use crate::OutputFormat;

const ROLES: [ColumnRole; 4] = [
    ColumnRole::ItemNumber,
    ColumnRole::PartNumber,
    ColumnRole::Description,
    ColumnRole::Quantity,
];

#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// BOM table snapshot (JSON)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub table: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ColumnReport {
    index: usize,
    title: String,
    #[serde(rename = "type")]
    column_type: Option<ColumnType>,
    consecutive_pairs: usize,
    explicit: Option<ColumnRole>,
    heuristic: Option<ColumnRole>,
}

#[derive(Debug, Serialize)]
struct ResolutionReport {
    table: String,
    columns: Vec<ColumnReport>,
    /// Why metadata resolution failed, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    explicit_error: Option<String>,
}

fn role_of(indices: Option<&BomColumnIndices>, column: usize) -> Option<ColumnRole> {
    let indices = indices?;
    ROLES.into_iter().find(|&role| indices.get(role) == Some(column))
}

pub fn execute(args: ColumnsArgs) -> Result<()> {
    let table: TableSnapshot = snapshot::load(&args.table)?;
    let name = table.display_name(&args.table);

    let (explicit, explicit_error) = match ExplicitColumns.resolve(&table) {
        Ok(indices) => (Some(indices), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let heuristic = HeuristicColumns.resolve(&table)?;

    let columns = (0..table.column_count())
        .map(|column| ColumnReport {
            index: column,
            title: table.column_title(column),
            column_type: table.column_type(column),
            consecutive_pairs: HeuristicColumns::consecutive_pairs(&table, column),
            explicit: role_of(explicit.as_ref(), column),
            heuristic: role_of(Some(&heuristic), column),
        })
        .collect();

    let report = ResolutionReport {
        table: name,
        columns,
        explicit_error,
    };

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Table => write_report(&report, &mut writer)?,
    }

    Ok(())
}

fn write_report<W: Write>(report: &ResolutionReport, mut writer: W) -> io::Result<()> {
    let role = |role: Option<ColumnRole>| role.map(|r| r.to_string()).unwrap_or_default();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Title", "Type", "Pairs", "Metadata", "Guessed"]);

    for c in &report.columns {
        table.add_row(vec![
            c.index.to_string(),
            c.title.clone(),
            c.column_type
                .map(|t| format!("{t:?}"))
                .unwrap_or_else(|| "-".into()),
            c.consecutive_pairs.to_string(),
            role(c.explicit),
            role(c.heuristic),
        ]);
    }

    writeln!(writer, "{}", report.table)?;
    writeln!(writer, "{table}")?;
    if let Some(error) = &report.explicit_error {
        writeln!(writer, "Metadata resolution failed: {error}")?;
    }
    Ok(())
}
