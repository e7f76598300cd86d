// src/metadata.rs

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub const TAGS_LIST: &str = "Xmp.digiKam.TagsList";
pub const LAST_KEYWORD: &str = "Xmp.MicrosoftPhoto.LastKeywordXMP";
pub const SUBJECT: &str = "Xmp.dc.subject";
pub const HIERARCHICAL_SUBJECT: &str = "Xmp.lr.hierarchicalSubject";
pub const CATALOG_SETS: &str = "Xmp.mediapro.CatalogSets";
pub const KEYWORDS: &str = "Xmp.pdf.Keywords";
pub const CATEGORIES: &str = "Xmp.acdsee.categories";

/// Key fragments of the two face region schemas (Microsoft Photo and MWG).
pub const REGION_NAME_MARKERS: [&str; 2] = ["MPReg:PersonDisplayName", "mwg-rs:Name"];

/// Separator of hierarchy levels in tags as this tool handles them.
pub const TAG_SEPARATOR: char = '/';
/// Separator of hierarchy levels in `lr:hierarchicalSubject` style fields.
pub const HIERARCHY_SEPARATOR: char = '|';
/// Joins items of the string form of a multi-value field.
pub const LIST_DELIMITER: &str = ", ";

pub type TagSet = BTreeSet<String>;

/// Tag name to the files it was found in.
pub type TagCollection = BTreeMap<String, BTreeSet<PathBuf>>;

/// Old tag name to new tag name.
pub type RenameTable = BTreeMap<String, String>;

pub fn is_region_name_key(key: &str) -> bool {
    REGION_NAME_MARKERS.iter().any(|marker| key.contains(marker))
}

pub fn to_hierarchy(tag: &str) -> String {
    tag.replace(TAG_SEPARATOR, &HIERARCHY_SEPARATOR.to_string())
}

pub fn from_hierarchy(tag: &str) -> String {
    tag.replace(HIERARCHY_SEPARATOR, &TAG_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_conversion_is_symmetric_for_plain_names() {
        assert_eq!(to_hierarchy("People/Family/Alice"), "People|Family|Alice");
        assert_eq!(from_hierarchy("People|Family|Alice"), "People/Family/Alice");
        assert_eq!(from_hierarchy(&to_hierarchy("Alice")), "Alice");
    }

    #[test]
    fn region_keys_of_both_schemas_are_recognised() {
        assert!(is_region_name_key(
            "Xmp.mwg-rs.Regions/mwg-rs:RegionList[3]/mwg-rs:Name"
        ));
        assert!(is_region_name_key(
            "Xmp.MP.RegionInfo/MPRI:Regions[1]/MPReg:PersonDisplayName"
        ));
        assert!(!is_region_name_key("Xmp.mwg-rs.Regions/mwg-rs:RegionList[3]/mwg-rs:Type"));
        assert!(!is_region_name_key(TAGS_LIST));
    }
}
