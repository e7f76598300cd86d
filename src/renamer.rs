use crate::backend::MetadataBackend;
use crate::error::AppError;
use crate::metadata::RenameTable;
use crate::reader::{read_file_tags, TagScope};
use crate::writer::write_file_tags;
use std::path::PathBuf;

/// Rewrites the tags of every file through `renames`. Tags missing from the
/// table are kept as they are. Returns the number of files written.
///
/// The first write failure aborts the run; files already written stay
/// written.
pub fn rename_tags(
    backend: &dyn MetadataBackend,
    files: &[PathBuf],
    renames: &RenameTable,
) -> Result<usize, AppError> {
    if renames.is_empty() {
        log::info!("Rename table is empty, nothing to do");
        return Ok(0);
    }
    log::info!("Renaming tags in {} files", files.len());

    let mut written = 0;
    for file in files {
        let tags: Vec<String> = read_file_tags(backend, file, TagScope::All)
            .into_iter()
            .map(|tag| renames.get(&tag).cloned().unwrap_or(tag))
            .collect();
        if write_file_tags(backend, file, &tags, renames)? {
            written += 1;
        }
    }

    log::info!("Rewrote tags of {} files", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::xmp_file::XmpFileBackend;
    use crate::metadata::TagSet;
    use std::fs;
    use tempfile::TempDir;

    fn tagged(dir: &TempDir, name: &str, tag: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(
            &path,
            format!(
                r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<rdf:Description xmlns:digiKam="http://www.digikam.org/ns/1.0/">
<digiKam:TagsList><rdf:Seq><rdf:li>{}</rdf:li></rdf:Seq></digiKam:TagsList>
</rdf:Description></rdf:RDF>"#,
                tag
            ),
        )
        .unwrap();
        path
    }

    fn set(tags: &[&str]) -> TagSet {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn empty_table_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = tagged(&dir, "a.xmp", "Alice");
        let before = fs::read(&path).unwrap();

        let written = rename_tags(&XmpFileBackend::new(), &[path.clone()], &RenameTable::new()).unwrap();

        assert_eq!(written, 0);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn renamed_tag_replaces_old_name() {
        let dir = TempDir::new().unwrap();
        let alice = tagged(&dir, "a.xmp", "Alice");
        let bob = tagged(&dir, "b.xmp", "Bob");
        let backend = XmpFileBackend::new();
        let renames: RenameTable = [("Alice".to_string(), "Alice Smith".to_string())].into();

        let written = rename_tags(&backend, &[alice.clone(), bob.clone()], &renames).unwrap();

        assert_eq!(written, 2);
        assert_eq!(read_file_tags(&backend, &alice, TagScope::All), set(&["Alice Smith"]));
        assert_eq!(read_file_tags(&backend, &bob, TagScope::All), set(&["Bob"]));
    }

    #[test]
    fn identity_table_preserves_tags() {
        let dir = TempDir::new().unwrap();
        let path = tagged(&dir, "a.xmp", "Alice");
        let backend = XmpFileBackend::new();
        let before = read_file_tags(&backend, &path, TagScope::All);
        let renames: RenameTable = before.iter().map(|t| (t.clone(), t.clone())).collect();

        rename_tags(&backend, &[path.clone()], &renames).unwrap();

        assert_eq!(read_file_tags(&backend, &path, TagScope::All), before);
    }

    #[test]
    fn unreadable_files_are_passed_over() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, "Alice").unwrap();
        let renames: RenameTable = [("Alice".to_string(), "Alice Smith".to_string())].into();

        let written = rename_tags(&XmpFileBackend::new(), &[text.clone()], &renames).unwrap();

        assert_eq!(written, 0);
        assert_eq!(fs::read_to_string(&text).unwrap(), "Alice");
    }
}
