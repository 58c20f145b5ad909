use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use dxf_bom::naming::{export_file_name, DrawingInfo};
use dxf_bom::{strip_font_markup, Item};
use serde::Serialize;

use crate::snapshot::ComponentSnapshot;

pub mod assembly;
pub mod bom;
pub mod columns;
pub mod flip;

pub type SnapshotItem = Item<ComponentSnapshot>;

/// Items extracted from one snapshot
#[derive(Debug, Serialize)]
pub struct ItemList {
    pub source: String,
    pub items: Vec<SnapshotItem>,
}

/// Prefix for exported file names: the flag, then the config file, then
/// whatever drawing number the source name carries.
pub fn file_prefix(flag: Option<&str>, configured: Option<&str>, source_name: &str) -> String {
    if let Some(prefix) = flag.or(configured) {
        return prefix.to_string();
    }

    match DrawingInfo::parse(source_name) {
        Some(info) => {
            log::debug!("Using drawing number {info} from {source_name:?}");
            info.part_prefix()
        }
        None => String::new(),
    }
}

/// Fill in what the component knows about the part. Only sheet metal parts
/// get a DXF, so only they are given a file name.
pub fn enrich_items(items: &mut [SnapshotItem], prefix: &str) {
    for item in items.iter_mut() {
        let Some(component) = item.component.as_ref() else {
            match item.cut_process() {
                Some(process) => log::warn!(
                    "{} is marked for {process} cutting but has no part to export",
                    item.part_name
                ),
                None => log::debug!("{} has no part to export", item.part_name),
            }
            continue;
        };

        let description = match item.description {
            Some(_) => None,
            None => component.description_property().map(strip_font_markup),
        };
        let material = component.material.clone();
        let sheet_metal = component.sheet_metal;

        if description.is_some() {
            item.description = description;
        }
        item.material = material;

        match sheet_metal {
            Some(sm) => {
                item.apply_sheet_metal(sm.thickness, sm.k_factor, sm.bend_radius);
                item.file_name = Some(export_file_name(prefix, item));
            }
            None => match item.cut_process() {
                Some(process) => log::warn!(
                    "{} is marked for {process} cutting but is not sheet metal",
                    item.part_name
                ),
                None => log::debug!("{} is not sheet metal, skipping DXF", item.part_name),
            },
        }
    }
}

pub fn write_items_table<W: Write>(list: &ItemList, mut writer: W) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
    table.set_header(vec![
        "Item",
        "Part",
        "Qty",
        "Description",
        "Material",
        "Thickness",
        "File",
    ]);

    for item in &list.items {
        table.add_row(vec![
            item.item_no.clone().unwrap_or_default(),
            item.part_name.clone(),
            item.quantity.to_string(),
            item.description.clone().unwrap_or_default(),
            item.material.clone().unwrap_or_default(),
            item.thickness.map(|t| format!("{t:.4}")).unwrap_or_default(),
            item.file_name.clone().unwrap_or_default(),
        ]);
    }

    writeln!(writer, "{}", list.source)?;
    writeln!(writer, "{table}")?;
    Ok(())
}
