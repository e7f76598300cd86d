//! Reading and writing the operator-facing YAML (or JSON) files.

use crate::error::AppError;
use crate::metadata::{RenameTable, TagCollection};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let content = if is_json(path) {
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        text
    } else {
        serde_yaml::to_string(value)?
    };
    fs::write(path, content)?;
    Ok(())
}

/// Writes the collected tags: a sorted list of names, or with `locations`
/// a mapping from each name to the sorted list of files carrying it.
pub fn export_tags(path: &Path, tags: &TagCollection, locations: bool) -> Result<(), AppError> {
    log::info!("Creating output '{}'", path.display());
    if locations {
        let mapping: BTreeMap<&str, Vec<String>> = tags
            .iter()
            .map(|(tag, files)| {
                let files = files.iter().map(|f| f.to_string_lossy().into_owned()).collect();
                (tag.as_str(), files)
            })
            .collect();
        write_document(path, &mapping)
    } else {
        let names: Vec<&str> = tags.keys().map(String::as_str).collect();
        write_document(path, &names)
    }
}

/// Loads the old-name to new-name table. A missing or empty file yields an
/// empty table; malformed content is an error.
pub fn load_rename_table(path: &Path) -> Result<RenameTable, AppError> {
    if !path.exists() {
        log::warn!("Rename file '{}' not found", path.display());
        return Ok(RenameTable::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(RenameTable::new());
    }
    let table: Option<RenameTable> = if is_json(path) {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    let table = table.unwrap_or_default();
    log::info!("Loaded {} renames from '{}'", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn collection() -> TagCollection {
        let mut tags = TagCollection::new();
        tags.entry("Zoë".to_string())
            .or_default()
            .insert(PathBuf::from("/photos/b.jpg"));
        tags.entry("People/Alice".to_string())
            .or_default()
            .extend([PathBuf::from("/photos/b.jpg"), PathBuf::from("/photos/a.jpg")]);
        tags
    }

    #[test]
    fn names_are_a_sorted_block_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.yaml");
        export_tags(&path, &collection(), false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "- People/Alice\n- Zoë\n");
    }

    #[test]
    fn locations_map_names_to_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.yaml");
        export_tags(&path, &collection(), true).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, Vec<String>> = serde_yaml::from_str(&text).unwrap();
        assert_eq!(
            parsed.keys().cloned().collect::<BTreeSet<_>>(),
            collection().keys().cloned().collect::<BTreeSet<_>>()
        );
        assert_eq!(parsed["People/Alice"], vec!["/photos/a.jpg", "/photos/b.jpg"]);
        assert!(!text.contains('{'));
    }

    #[test]
    fn empty_collection_is_an_empty_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.yaml");
        export_tags(&path, &TagCollection::new(), false).unwrap();

        let parsed: Vec<String> = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn json_output_is_chosen_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.JSON");
        export_tags(&path, &collection(), false).unwrap();

        let parsed: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, vec!["People/Alice", "Zoë"]);
    }

    #[test]
    fn rename_table_loads_from_yaml_and_json() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("rename.yaml");
        fs::write(&yaml, "Alice: Alice Smith\n\"Bob\": \"Robert\"\n").unwrap();
        let table = load_rename_table(&yaml).unwrap();
        assert_eq!(table.get("Alice").map(String::as_str), Some("Alice Smith"));
        assert_eq!(table.get("Bob").map(String::as_str), Some("Robert"));

        let json = dir.path().join("rename.json");
        fs::write(&json, r#"{"Alice": "Alice Smith"}"#).unwrap();
        assert_eq!(load_rename_table(&json).unwrap().len(), 1);
    }

    #[test]
    fn missing_or_empty_rename_file_is_an_empty_table() {
        let dir = TempDir::new().unwrap();
        assert!(load_rename_table(&dir.path().join("absent.yaml")).unwrap().is_empty());

        let empty = dir.path().join("empty.yaml");
        fs::write(&empty, "\n").unwrap();
        assert!(load_rename_table(&empty).unwrap().is_empty());

        let null = dir.path().join("null.yaml");
        fs::write(&null, "~\n").unwrap();
        assert!(load_rename_table(&null).unwrap().is_empty());
    }

    #[test]
    fn malformed_rename_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rename.yaml");
        fs::write(&path, "- just\n- a list\n").unwrap();
        assert!(load_rename_table(&path).is_err());

        fs::write(&path, "Alice: [unterminated\n").unwrap();
        assert!(load_rename_table(&path).is_err());
    }
}
