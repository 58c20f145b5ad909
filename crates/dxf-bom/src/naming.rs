//! Names for exported files and report text.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::item::Item;

/// Job number followed by a drawing number, e.g. `4321 A12` or `3456-2B E7-1A`
static DRAWING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?P<job>[34][0-9]{3}(?:-[0-9]+\w{1,2})?)\s?(?P<dwg>[ABEP][0-9]+(?:-?[0-9]+[A-Z]?)?)")
        .unwrap()
});

/// Display name of a part: the file name without extension, with the
/// configuration appended in brackets unless it is the default one.
pub fn component_name(title: &str, configuration: &str) -> String {
    let stem = Path::new(title)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| title.to_string());

    if configuration.to_lowercase() == "default" {
        stem
    } else {
        format!("{stem} [{configuration}]")
    }
}

/// File name (without extension) for an item's DXF.
///
/// Numbered items use the item number padded to two digits, anything else
/// falls back to the part name. Double quotes in the prefix are not valid in
/// file names and become two single quotes.
pub fn export_file_name<C>(prefix: &str, item: &Item<C>) -> String {
    let prefix = prefix.replace('"', "''");

    match item.item_no.as_deref().map(str::trim) {
        Some(item_no) if !item_no.is_empty() => format!("{prefix}{item_no:0>2}"),
        _ => format!("{prefix}{}", item.part_name),
    }
}

/// Job and drawing number found in a document title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DrawingInfo {
    pub job_no: String,
    pub drawing_no: String,
    pub source: String,
}

impl DrawingInfo {
    pub fn parse(input: &str) -> Option<Self> {
        let caps = DRAWING_NUMBER.captures(input)?;

        Some(Self {
            job_no: caps["job"].to_string(),
            drawing_no: caps["dwg"].to_string(),
            source: input.to_string(),
        })
    }

    /// Prefix for exported part files, e.g. `4321 A12 PT`
    pub fn part_prefix(&self) -> String {
        format!("{self} PT")
    }

    pub fn bom_file_stem(&self) -> String {
        format!("{self} BOM")
    }
}

impl fmt::Display for DrawingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.job_no, self.drawing_no)
    }
}

/// `1st`, `2nd`, `3rd`, `4th`, ..., `11th`, ..., `21st`
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Join words into an English list: `a`, `a and b`, `a, b, and c`
pub fn punctuate_list<S: AsRef<str>>(words: &[S]) -> String {
    match words {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name() {
        assert_eq!(component_name("Bracket.SLDPRT", "Default"), "Bracket");
        assert_eq!(component_name("Bracket.SLDPRT", "default"), "Bracket");
        assert_eq!(component_name("Bracket.SLDPRT", "Long"), "Bracket [Long]");
        assert_eq!(component_name("Bracket", "Default"), "Bracket");
        assert_eq!(component_name("Base.Plate.SLDPRT", "Default"), "Base.Plate");
    }

    #[test]
    fn test_export_file_name() {
        let mut item: Item<()> = Item::new("Bracket [Long]");
        assert_eq!(export_file_name("4321 A12 PT", &item), "4321 A12 PTBracket [Long]");

        item.item_no = Some("3".to_string());
        assert_eq!(export_file_name("4321 A12 PT", &item), "4321 A12 PT03");

        item.item_no = Some("12".to_string());
        assert_eq!(export_file_name("", &item), "12");

        item.item_no = Some("  ".to_string());
        assert_eq!(export_file_name("", &item), "Bracket [Long]");

        item.item_no = Some("7".to_string());
        assert_eq!(export_file_name("1\" PT", &item), "1'' PT07");
    }

    #[test]
    fn test_drawing_info() {
        let info = DrawingInfo::parse("4321 A12 bracket").unwrap();
        assert_eq!(info.job_no, "4321");
        assert_eq!(info.drawing_no, "A12");
        assert_eq!(info.to_string(), "4321 A12");
        assert_eq!(info.part_prefix(), "4321 A12 PT");
        assert_eq!(info.bom_file_stem(), "4321 A12 BOM");

        let info = DrawingInfo::parse("3456-2B E7-1A.SLDDRW").unwrap();
        assert_eq!(info.job_no, "3456-2B");
        assert_eq!(info.drawing_no, "E7-1A");

        let info = DrawingInfo::parse("4000p3").unwrap();
        assert_eq!((info.job_no.as_str(), info.drawing_no.as_str()), ("4000", "p3"));

        assert_eq!(DrawingInfo::parse("Bracket assembly"), None);
        assert_eq!(DrawingInfo::parse("5321 A12"), None);
    }

    #[test]
    fn test_ordinal() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111]
            .into_iter()
            .map(ordinal)
            .collect();
        assert_eq!(
            got,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th"]
        );
    }

    #[test]
    fn test_punctuate_list() {
        assert_eq!(punctuate_list::<&str>(&[]), "");
        assert_eq!(punctuate_list(&["a"]), "a");
        assert_eq!(punctuate_list(&["a", "b"]), "a and b");
        assert_eq!(punctuate_list(&["a", "b", "c"]), "a, b, and c");
    }
}
