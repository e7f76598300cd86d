use crate::backend::MetadataBackend;
use crate::metadata::TagCollection;
use crate::reader::{read_file_tags, TagScope};
use std::path::PathBuf;

/// Reads every file in turn and records, for each tag, the files carrying it.
pub fn collect_tags(
    backend: &dyn MetadataBackend,
    files: &[PathBuf],
    scope: TagScope,
) -> TagCollection {
    log::info!("Collecting tags from {} files", files.len());

    let mut collection = TagCollection::new();
    for file in files {
        for tag in read_file_tags(backend, file, scope) {
            collection.entry(tag).or_default().insert(file.clone());
        }
    }

    log::info!("Found {} distinct tags", collection.len());
    collection
}
