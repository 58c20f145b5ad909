use serde::{Deserialize, Serialize};

/// Handle to a component owned by the CAD host.
///
/// Extractors pass handles through to the items they produce and only ever
/// call these accessors on them.
pub trait Component: Clone {
    /// Title of the referenced document, e.g. `Bracket.SLDPRT`
    fn title(&self) -> String;
    fn referenced_configuration(&self) -> String;
    fn is_hidden(&self) -> bool;
    fn is_suppressed(&self) -> bool;
}

/// Column kind as reported by the host's table metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    ItemNumber,
    Quantity,
    PartNumber,
    Other,
}

/// Read access to a BOM table annotation.
///
/// Row 0 is the title row. Rows and columns are zero based.
pub trait TableSource {
    type Component: Component;

    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;

    /// Cell text as shown on the drawing
    fn displayed_text(&self, row: usize, column: usize) -> String;

    /// Underlying cell value, before display formatting
    fn raw_text(&self, row: usize, column: usize) -> String;

    fn is_row_hidden(&self, row: usize) -> bool;

    /// Column kind, or `None` when the table carries no type metadata
    fn column_type(&self, column: usize) -> Option<ColumnType>;

    fn column_title(&self, column: usize) -> String;

    /// Components the host maps to a row, in host order
    fn components_for_row(&self, row: usize) -> Vec<Self::Component>;

    fn has_column_types(&self) -> bool {
        (0..self.column_count()).any(|column| self.column_type(column).is_some())
    }
}

/// Read access to an assembly document
pub trait AssemblySource {
    type Component: Component;

    /// Components of the assembly, optionally only the direct children
    fn components(&self, top_level_only: bool) -> Vec<Self::Component>;
}
