use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dxf_bom::naming::ordinal;
use dxf_bom::{BomItemExtractor, ItemExtractor};

use super::{enrich_items, file_prefix, write_items_table, ItemList};
use crate::config::ExportConfig;
use crate::snapshot::{self, TableSnapshot};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct BomArgs {
    /// BOM table snapshots (JSON)
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub tables: Vec<PathBuf>,

    /// Keep rows that are hidden on the drawing
    #[arg(long)]
    pub include_hidden: bool,

    /// Prefix for exported file names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

pub fn execute(args: BomArgs, config: &ExportConfig, cancel: &AtomicBool) -> Result<()> {
    let skip_hidden_rows = !args.include_hidden && config.bom.skip_hidden_rows;

    let mut lists = Vec::new();
    let mut failed = Vec::new();

    for (i, path) in args.tables.iter().enumerate() {
        if cancel.load(Ordering::SeqCst) {
            break;
        }

        match read_table(path, &args, config, skip_hidden_rows, cancel) {
            Ok(list) => {
                log::info!(
                    "Read {} item(s) from the {} table ({})",
                    list.items.len(),
                    ordinal(i + 1),
                    list.source
                );
                lists.push(list);
            }
            Err(e) => {
                eprintln!("{} {}: {e:#}", "Error:".red(), path.display());
                failed.push(path.display().to_string());
            }
        }
    }

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            writeln!(writer, "{}", serde_json::to_string_pretty(&lists)?)?;
        }
        OutputFormat::Table => {
            for list in &lists {
                write_items_table(list, &mut writer)?;
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} BOM table(s) could not be read",
            failed.len(),
            args.tables.len()
        );
    }

    Ok(())
}

fn read_table(
    path: &Path,
    args: &BomArgs,
    config: &ExportConfig,
    skip_hidden_rows: bool,
    cancel: &AtomicBool,
) -> Result<ItemList> {
    let table: TableSnapshot = snapshot::load(path)?;
    let source = table.display_name(path);

    let mut items = BomItemExtractor::new(&table)
        .skip_hidden_rows(skip_hidden_rows)
        .extract_items_until(cancel)
        .with_context(|| format!("Failed to read BOM {source}"))?;

    let prefix = file_prefix(
        args.prefix.as_deref(),
        config.export.prefix.as_deref(),
        &source,
    );
    enrich_items(&mut items, &prefix);

    Ok(ItemList { source, items })
}
