use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use itertools::Itertools;

use crate::columns::{BomColumnIndices, ColumnResolver, ExplicitColumns};
use crate::item::{strip_font_markup, Item};
use crate::naming::component_name;
use crate::source::{AssemblySource, Component, TableSource};
use crate::{BomError, Result};

/// Produces the part list for one table or assembly.
///
/// Extraction is read-only and deterministic: running it twice over an
/// unchanged source yields the same items in the same order.
pub trait ItemExtractor {
    type Component;

    /// Extract items, stopping early once `cancel` is set.
    ///
    /// The flag is checked between rows (or component groups); items produced
    /// before cancellation are returned as is.
    fn extract_items_until(&self, cancel: &AtomicBool) -> Result<Vec<Item<Self::Component>>>;

    fn extract_items(&self) -> Result<Vec<Item<Self::Component>>> {
        self.extract_items_until(&AtomicBool::new(false))
    }
}

/// Reads items from a BOM table, one item per row
pub struct BomItemExtractor<'a, T: ?Sized> {
    table: &'a T,
    pub skip_hidden_rows: bool,
}

impl<'a, T: TableSource + ?Sized> BomItemExtractor<'a, T> {
    pub fn new(table: &'a T) -> Self {
        Self {
            table,
            skip_hidden_rows: false,
        }
    }

    pub fn skip_hidden_rows(mut self, skip: bool) -> Self {
        self.skip_hidden_rows = skip;
        self
    }

    fn cell(&self, row: usize, column: Option<usize>) -> Option<String> {
        let text = self.table.displayed_text(row, column?);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn item(&self, row: usize, columns: &BomColumnIndices) -> Result<Item<T::Component>> {
        let mut item = Item::new(self.cell(row, columns.part_number).unwrap_or_default());

        item.item_no = self.cell(row, columns.item_number);
        item.description = self
            .cell(row, columns.description)
            .map(|text| strip_font_markup(&text));
        item.quantity = self
            .cell(row, columns.quantity)
            .and_then(|text| text.parse::<u32>().ok())
            .unwrap_or(0);

        item.component = self.component(row)?;
        item.configuration = item
            .component
            .as_ref()
            .map(|component| component.referenced_configuration());

        Ok(item)
    }

    /// First component on the row that is not suppressed
    fn component(&self, row: usize) -> Result<Option<T::Component>> {
        let active: Vec<T::Component> = self
            .table
            .components_for_row(row)
            .into_iter()
            .filter(|component| {
                let suppressed = component.is_suppressed();
                if suppressed {
                    log::debug!("Row {row}: skipping suppressed {}", component.title());
                }
                !suppressed
            })
            .collect();

        let configurations: Vec<String> = active
            .iter()
            .map(|component| component.referenced_configuration())
            .unique()
            .collect();

        if configurations.len() > 1 {
            return Err(BomError::MultipleConfigurations {
                row,
                configurations,
            });
        }

        Ok(active.into_iter().next())
    }
}

impl<T: TableSource + ?Sized> ItemExtractor for BomItemExtractor<'_, T> {
    type Component = T::Component;

    fn extract_items_until(&self, cancel: &AtomicBool) -> Result<Vec<Item<T::Component>>> {
        let columns = ExplicitColumns.resolve(self.table)?;
        let mut items = Vec::new();

        // Row 0 holds the column titles
        for row in 1..self.table.row_count() {
            if cancel.load(Ordering::SeqCst) {
                log::info!("BOM extraction cancelled after {} item(s)", items.len());
                break;
            }

            if self.skip_hidden_rows && self.table.is_row_hidden(row) {
                log::debug!("Skipping hidden BOM row {row}");
                continue;
            }

            items.push(self.item(row, &columns)?);
        }

        Ok(items)
    }
}

/// Reads items from an assembly, one item per distinct part and configuration
pub struct AssemblyItemExtractor<'a, A: ?Sized> {
    assembly: &'a A,
    pub top_level_only: bool,
}

impl<'a, A: AssemblySource + ?Sized> AssemblyItemExtractor<'a, A> {
    pub fn new(assembly: &'a A) -> Self {
        Self {
            assembly,
            top_level_only: false,
        }
    }

    pub fn top_level_only(mut self, top_level_only: bool) -> Self {
        self.top_level_only = top_level_only;
        self
    }
}

impl<A: AssemblySource + ?Sized> ItemExtractor for AssemblyItemExtractor<'_, A> {
    type Component = A::Component;

    fn extract_items_until(&self, cancel: &AtomicBool) -> Result<Vec<Item<A::Component>>> {
        // Groups keep the order in which each part/configuration was first seen
        let mut groups: Vec<Vec<A::Component>> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for component in self.assembly.components(self.top_level_only) {
            if component.is_hidden() {
                continue;
            }

            let key = (component.title(), component.referenced_configuration());
            match index.get(&key) {
                Some(&i) => groups[i].push(component),
                None => {
                    index.insert(key, groups.len());
                    groups.push(vec![component]);
                }
            }
        }

        let mut items = Vec::with_capacity(groups.len());

        for group in groups {
            if cancel.load(Ordering::SeqCst) {
                log::info!("Assembly extraction cancelled after {} item(s)", items.len());
                break;
            }

            let quantity = group.len();
            let Some(first) = group.into_iter().next() else {
                continue;
            };

            let configuration = first.referenced_configuration();
            let mut item = Item::new(component_name(&first.title(), &configuration));
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            item.configuration = Some(configuration);
            item.component = Some(first);

            items.push(item);
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::source::ColumnType;

    #[derive(Debug, Clone, PartialEq)]
    struct Part {
        title: &'static str,
        configuration: &'static str,
        hidden: bool,
        suppressed: bool,
    }

    impl Part {
        fn new(title: &'static str, configuration: &'static str) -> Self {
            Self {
                title,
                configuration,
                hidden: false,
                suppressed: false,
            }
        }

        fn hidden(mut self) -> Self {
            self.hidden = true;
            self
        }

        fn suppressed(mut self) -> Self {
            self.suppressed = true;
            self
        }
    }

    impl Component for Part {
        fn title(&self) -> String {
            self.title.to_string()
        }
        fn referenced_configuration(&self) -> String {
            self.configuration.to_string()
        }
        fn is_hidden(&self) -> bool {
            self.hidden
        }
        fn is_suppressed(&self) -> bool {
            self.suppressed
        }
    }

    struct Row {
        cells: [&'static str; 4],
        hidden: bool,
        parts: Vec<Part>,
    }

    fn row(cells: [&'static str; 4], parts: Vec<Part>) -> Row {
        Row {
            cells,
            hidden: false,
            parts,
        }
    }

    /// Table with columns: item no, part number, description, qty
    struct Bom {
        rows: Vec<Row>,
    }

    const COLUMN_TYPES: [ColumnType; 4] = [
        ColumnType::ItemNumber,
        ColumnType::PartNumber,
        ColumnType::Other,
        ColumnType::Quantity,
    ];

    impl TableSource for Bom {
        type Component = Part;

        fn row_count(&self) -> usize {
            self.rows.len() + 1
        }
        fn column_count(&self) -> usize {
            4
        }
        fn displayed_text(&self, row: usize, column: usize) -> String {
            if row == 0 {
                self.column_title(column)
            } else {
                self.rows[row - 1].cells[column].to_string()
            }
        }
        fn raw_text(&self, row: usize, column: usize) -> String {
            self.displayed_text(row, column)
        }
        fn is_row_hidden(&self, row: usize) -> bool {
            row > 0 && self.rows[row - 1].hidden
        }
        fn column_type(&self, column: usize) -> Option<ColumnType> {
            Some(COLUMN_TYPES[column])
        }
        fn column_title(&self, column: usize) -> String {
            ["ITEM NO.", "PART NUMBER", "DESCRIPTION", "QTY."][column].to_string()
        }
        fn components_for_row(&self, row: usize) -> Vec<Part> {
            self.rows[row - 1].parts.clone()
        }
    }

    fn sample_bom() -> Bom {
        let mut hidden = row(["3", "P-3", "Hidden", "1"], vec![Part::new("C.SLDPRT", "Default")]);
        hidden.hidden = true;

        Bom {
            rows: vec![
                row(
                    ["1", "P-1", "<FONT size=3>PLATE", "2"],
                    vec![Part::new("A.SLDPRT", "Default")],
                ),
                row(
                    ["2", "P-2", "Angle", "lots"],
                    vec![
                        Part::new("B.SLDPRT", "Short").suppressed(),
                        Part::new("B.SLDPRT", "Long"),
                    ],
                ),
                hidden,
            ],
        }
    }

    #[test]
    fn test_bom_rows_become_items() {
        let bom = sample_bom();
        let items = BomItemExtractor::new(&bom).extract_items().unwrap();

        assert_eq!(items.len(), 3);

        let first = &items[0];
        assert_eq!(first.item_no.as_deref(), Some("1"));
        assert_eq!(first.part_name, "P-1");
        assert_eq!(first.description.as_deref(), Some("PLATE"));
        assert_eq!(first.quantity, 2);
        assert_eq!(first.configuration.as_deref(), Some("Default"));
        assert_eq!(first.component.as_ref().unwrap().title, "A.SLDPRT");
    }

    #[test]
    fn test_bad_quantity_defaults_to_zero() {
        let bom = sample_bom();
        let items = BomItemExtractor::new(&bom).extract_items().unwrap();
        assert_eq!(items[1].quantity, 0);

        let bom = Bom {
            rows: vec![row(["1", "P-1", "", "-3"], vec![]), row(["2", "P-2", "", " 7 "], vec![])],
        };
        let items = BomItemExtractor::new(&bom).extract_items().unwrap();
        assert_eq!(items[0].quantity, 0);
        assert_eq!(items[1].quantity, 7);
        assert_eq!(items[0].description, None);
    }

    #[test]
    fn test_suppressed_components_are_skipped() {
        let bom = sample_bom();
        let items = BomItemExtractor::new(&bom).extract_items().unwrap();

        let component = items[1].component.as_ref().unwrap();
        assert_eq!(component.configuration, "Long");
        assert_eq!(items[1].configuration.as_deref(), Some("Long"));
    }

    #[test]
    fn test_all_suppressed_row_has_no_component() {
        let bom = Bom {
            rows: vec![row(
                ["1", "P-1", "", "1"],
                vec![Part::new("A.SLDPRT", "Default").suppressed()],
            )],
        };
        let items = BomItemExtractor::new(&bom).extract_items().unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].component, None);
        assert_eq!(items[0].configuration, None);
    }

    #[test]
    fn test_hidden_rows_are_optional() {
        let bom = sample_bom();

        let all = BomItemExtractor::new(&bom).extract_items().unwrap();
        assert_eq!(all.len(), 3);

        let visible = BomItemExtractor::new(&bom)
            .skip_hidden_rows(true)
            .extract_items()
            .unwrap();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|item| item.part_name != "P-3"));
    }

    #[test]
    fn test_multiple_configurations_in_row_fail() {
        let bom = Bom {
            rows: vec![row(
                ["1", "P-1", "", "2"],
                vec![Part::new("A.SLDPRT", "Short"), Part::new("A.SLDPRT", "Long")],
            )],
        };

        let err = BomItemExtractor::new(&bom).extract_items().unwrap_err();
        match err {
            BomError::MultipleConfigurations {
                row,
                configurations,
            } => {
                assert_eq!(row, 1);
                assert_eq!(configurations, vec!["Short", "Long"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_fails_before_any_item() {
        struct Untyped(Bom);

        impl TableSource for Untyped {
            type Component = Part;

            fn row_count(&self) -> usize {
                self.0.row_count()
            }
            fn column_count(&self) -> usize {
                self.0.column_count()
            }
            fn displayed_text(&self, row: usize, column: usize) -> String {
                self.0.displayed_text(row, column)
            }
            fn raw_text(&self, row: usize, column: usize) -> String {
                self.0.raw_text(row, column)
            }
            fn is_row_hidden(&self, row: usize) -> bool {
                self.0.is_row_hidden(row)
            }
            fn column_type(&self, _column: usize) -> Option<ColumnType> {
                None
            }
            fn column_title(&self, column: usize) -> String {
                self.0.column_title(column)
            }
            fn components_for_row(&self, row: usize) -> Vec<Part> {
                self.0.components_for_row(row)
            }
        }

        let err = BomItemExtractor::new(&Untyped(sample_bom()))
            .extract_items()
            .unwrap_err();
        assert_eq!(err.to_string(), "Part number column not found");
    }

    #[test]
    fn test_bom_extraction_is_repeatable() {
        let bom = sample_bom();
        let extractor = BomItemExtractor::new(&bom).skip_hidden_rows(true);

        assert_eq!(
            extractor.extract_items().unwrap(),
            extractor.extract_items().unwrap()
        );
    }

    #[test]
    fn test_cancelled_bom_keeps_nothing_new() {
        let bom = sample_bom();
        let cancel = AtomicBool::new(true);

        let items = BomItemExtractor::new(&bom)
            .extract_items_until(&cancel)
            .unwrap();
        assert!(items.is_empty());
    }

    /// Sets the cancel flag when the components of `row` are requested
    struct CancelAtRow<'a> {
        bom: Bom,
        row: usize,
        cancel: &'a AtomicBool,
    }

    impl TableSource for CancelAtRow<'_> {
        type Component = Part;

        fn row_count(&self) -> usize {
            self.bom.row_count()
        }
        fn column_count(&self) -> usize {
            self.bom.column_count()
        }
        fn displayed_text(&self, row: usize, column: usize) -> String {
            self.bom.displayed_text(row, column)
        }
        fn raw_text(&self, row: usize, column: usize) -> String {
            self.bom.raw_text(row, column)
        }
        fn is_row_hidden(&self, row: usize) -> bool {
            self.bom.is_row_hidden(row)
        }
        fn column_type(&self, column: usize) -> Option<ColumnType> {
            self.bom.column_type(column)
        }
        fn column_title(&self, column: usize) -> String {
            self.bom.column_title(column)
        }
        fn components_for_row(&self, row: usize) -> Vec<Part> {
            if row == self.row {
                self.cancel.store(true, Ordering::SeqCst);
            }
            self.bom.components_for_row(row)
        }
    }

    #[test]
    fn test_cancel_mid_bom_returns_earlier_rows() {
        let cancel = AtomicBool::new(false);
        let table = CancelAtRow {
            bom: sample_bom(),
            row: 2,
            cancel: &cancel,
        };

        let items = BomItemExtractor::new(&table)
            .extract_items_until(&cancel)
            .unwrap();

        // Row 2 was already being read when the flag went up; row 3 never is
        let parts: Vec<&str> = items.iter().map(|item| item.part_name.as_str()).collect();
        assert_eq!(parts, ["P-1", "P-2"]);
        assert_eq!(items[0].quantity, 2);
        assert!(cancel.load(Ordering::SeqCst));
    }

    struct Assembly(Vec<Part>);

    impl AssemblySource for Assembly {
        type Component = Part;

        fn components(&self, top_level_only: bool) -> Vec<Part> {
            if top_level_only {
                self.0.iter().take(1).cloned().collect()
            } else {
                self.0.clone()
            }
        }
    }

    #[test]
    fn test_assembly_dedup_by_title_and_configuration() {
        let assembly = Assembly(vec![
            Part::new("Bracket.SLDPRT", "Default"),
            Part::new("Bracket.SLDPRT", "Default"),
            Part::new("Bracket.SLDPRT", "Default"),
        ]);

        let items = AssemblyItemExtractor::new(&assembly).extract_items().unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].part_name, "Bracket");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].configuration.as_deref(), Some("Default"));
        assert_eq!(items[0].item_no, None);
    }

    #[test]
    fn test_assembly_groups_keep_first_seen_order() {
        let assembly = Assembly(vec![
            Part::new("Base.SLDPRT", "Default"),
            Part::new("Bracket.SLDPRT", "Left"),
            Part::new("Base.SLDPRT", "Default"),
            Part::new("Bracket.SLDPRT", "DEFAULT"),
            Part::new("Bracket.SLDPRT", "Left"),
            Part::new("Cover.SLDPRT", "Default").hidden(),
        ]);

        let items = AssemblyItemExtractor::new(&assembly).extract_items().unwrap();
        let summary: Vec<(&str, u32)> = items
            .iter()
            .map(|item| (item.part_name.as_str(), item.quantity))
            .collect();

        assert_eq!(
            summary,
            vec![("Base", 2), ("Bracket [Left]", 2), ("Bracket", 1)]
        );

        assert_eq!(
            AssemblyItemExtractor::new(&assembly).extract_items().unwrap(),
            items
        );
    }

    #[test]
    fn test_assembly_top_level_only() {
        let assembly = Assembly(vec![
            Part::new("Base.SLDPRT", "Default"),
            Part::new("Bolt.SLDPRT", "Default"),
        ]);

        let items = AssemblyItemExtractor::new(&assembly)
            .top_level_only(true)
            .extract_items()
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].part_name, "Base");
    }

    /// Sets the cancel flag the second time its title is read
    #[derive(Clone)]
    struct Tripwire<'a> {
        part: Part,
        reads: &'a Cell<usize>,
        cancel: Option<&'a AtomicBool>,
    }

    impl Component for Tripwire<'_> {
        fn title(&self) -> String {
            if let Some(cancel) = self.cancel {
                self.reads.set(self.reads.get() + 1);
                if self.reads.get() == 2 {
                    cancel.store(true, Ordering::SeqCst);
                }
            }
            self.part.title()
        }
        fn referenced_configuration(&self) -> String {
            self.part.referenced_configuration()
        }
        fn is_hidden(&self) -> bool {
            self.part.is_hidden()
        }
        fn is_suppressed(&self) -> bool {
            self.part.is_suppressed()
        }
    }

    struct TripwireAssembly<'a>(Vec<Tripwire<'a>>);

    impl<'a> AssemblySource for TripwireAssembly<'a> {
        type Component = Tripwire<'a>;

        fn components(&self, _top_level_only: bool) -> Vec<Tripwire<'a>> {
            self.0.clone()
        }
    }

    #[test]
    fn test_cancel_mid_assembly_returns_earlier_groups() {
        let cancel = AtomicBool::new(false);
        let reads = Cell::new(0);
        let (reads_ref, cancel_ref) = (&reads, &cancel);
        let wire = move |title: &'static str, armed: bool| Tripwire {
            part: Part::new(title, "Default"),
            reads: reads_ref,
            cancel: armed.then_some(cancel_ref),
        };

        let assembly = TripwireAssembly(vec![
            wire("Base.SLDPRT", false),
            wire("Bracket.SLDPRT", true),
            wire("Base.SLDPRT", false),
            wire("Cover.SLDPRT", false),
        ]);

        let items = AssemblyItemExtractor::new(&assembly)
            .extract_items_until(&cancel)
            .unwrap();

        let summary: Vec<(&str, u32)> = items
            .iter()
            .map(|item| (item.part_name.as_str(), item.quantity))
            .collect();
        assert_eq!(summary, vec![("Base", 2), ("Bracket", 1)]);
    }

    #[test]
    fn test_cancelled_assembly_yields_no_items() {
        let assembly = Assembly(vec![Part::new("Base.SLDPRT", "Default")]);

        let items = AssemblyItemExtractor::new(&assembly)
            .extract_items_until(&AtomicBool::new(true))
            .unwrap();
        assert!(items.is_empty());
    }
}
