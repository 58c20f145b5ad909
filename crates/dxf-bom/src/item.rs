use std::fmt;

use dxf_flat::units::meters_to_inches;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Inline font formatting the host embeds in cell and property text
static FONT_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<FONT.*?>").unwrap());

/// One line of the exported part list.
///
/// Created by an extractor and filled in further by the export loop as more
/// is learned about the part (sheet metal data, material, output file).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item<C> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_no: Option<String>,
    pub part_name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Sheet thickness in inches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_factor: Option<f64>,
    /// Inside bend radius in inches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bend_radius: Option<f64>,
    /// Name of the exported DXF, without extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    /// Host component this item was read from
    #[serde(skip)]
    pub component: Option<C>,
}

impl<C> Item<C> {
    pub fn new(part_name: impl Into<String>) -> Self {
        Self {
            item_no: None,
            part_name: part_name.into(),
            quantity: 0,
            description: None,
            material: None,
            thickness: None,
            k_factor: None,
            bend_radius: None,
            file_name: None,
            configuration: None,
            component: None,
        }
    }

    /// Record sheet metal parameters as reported by the host (lengths in meters)
    pub fn apply_sheet_metal(&mut self, thickness: f64, k_factor: f64, bend_radius: f64) {
        self.thickness = Some(meters_to_inches(thickness));
        self.k_factor = Some(k_factor);
        self.bend_radius = Some(meters_to_inches(bend_radius));
    }

    /// Cutting process named in the description, if any
    pub fn cut_process(&self) -> Option<CutProcess> {
        let description = self.description.as_deref()?.to_lowercase();

        if description.contains("laser") {
            Some(CutProcess::Laser)
        } else if description.contains("plasma") {
            Some(CutProcess::Plasma)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutProcess {
    Laser,
    Plasma,
}

impl fmt::Display for CutProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutProcess::Laser => write!(f, "laser"),
            CutProcess::Plasma => write!(f, "plasma"),
        }
    }
}

/// Remove `<FONT ...>` tags from text.
///
/// Matches are removed back to front so earlier offsets stay valid.
pub fn strip_font_markup(text: &str) -> String {
    let spans: Vec<_> = FONT_MARKUP.find_iter(text).map(|m| m.range()).collect();

    let mut stripped = text.to_string();
    for span in spans.into_iter().rev() {
        stripped.replace_range(span, "");
    }
    stripped
}
