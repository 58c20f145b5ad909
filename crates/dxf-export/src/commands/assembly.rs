use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::Args;
use dxf_bom::{AssemblyItemExtractor, ItemExtractor};

use super::{enrich_items, file_prefix, write_items_table, ItemList};
use crate::config::ExportConfig;
use crate::snapshot::{self, AssemblySnapshot};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct AssemblyArgs {
    /// Assembly snapshot (JSON)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub assembly: PathBuf,

    /// Only count the assembly's direct children
    #[arg(long)]
    pub top_level_only: bool,

    /// Prefix for exported file names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

pub fn execute(args: AssemblyArgs, config: &ExportConfig, cancel: &AtomicBool) -> Result<()> {
    let assembly: AssemblySnapshot = snapshot::load(&args.assembly)?;
    let source = assembly.display_name(&args.assembly);

    let top_level_only = args.top_level_only || config.assembly.top_level_only;
    let mut items = AssemblyItemExtractor::new(&assembly)
        .top_level_only(top_level_only)
        .extract_items_until(cancel)
        .with_context(|| format!("Failed to read assembly {source}"))?;

    log::info!("Found {} distinct part(s) in {source}", items.len());

    let prefix = file_prefix(
        args.prefix.as_deref(),
        config.export.prefix.as_deref(),
        &source,
    );
    enrich_items(&mut items, &prefix);

    let list = ItemList { source, items };

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            writeln!(writer, "{}", serde_json::to_string_pretty(&list)?)?;
        }
        OutputFormat::Table => write_items_table(&list, &mut writer)?,
    }

    Ok(())
}
