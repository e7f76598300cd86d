use crate::backend::{MetadataBackend, MetadataHandle, OpenOutcome};
use crate::metadata::{
    from_hierarchy, is_region_name_key, TagSet, CATALOG_SETS, HIERARCHICAL_SUBJECT, LAST_KEYWORD,
    LIST_DELIMITER, SUBJECT, TAGS_LIST,
};
use std::path::Path;

/// Which tags of a photo are of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    /// Keyword lists, hierarchical subjects and face region names.
    All,
    /// Face region names only.
    Regions,
}

/// Names of every face region, across both region schemas.
pub fn read_region_names(handle: &dyn MetadataHandle) -> TagSet {
    handle
        .tag_keys()
        .into_iter()
        .filter(|key| is_region_name_key(key))
        .filter_map(|key| handle.tag_string(&key))
        .collect()
}

/// Every people tag of one opened container.
pub fn read_tags(handle: &dyn MetadataHandle) -> TagSet {
    let mut tags = TagSet::new();

    tags.extend(handle.tag_multiple(TAGS_LIST));
    tags.extend(handle.tag_multiple(LAST_KEYWORD));
    tags.extend(handle.tag_multiple(SUBJECT));

    // Only an empty whole string is skipped; empty segments between
    // delimiters are kept as tags.
    if let Some(hierarchical) = handle.tag_string(HIERARCHICAL_SUBJECT) {
        if !hierarchical.is_empty() {
            tags.extend(hierarchical.split(LIST_DELIMITER).map(from_hierarchy));
        }
    }
    // Catalog sets are stored hierarchy-encoded but read back raw.
    tags.extend(handle.tag_multiple(CATALOG_SETS));

    tags.extend(read_region_names(handle));
    tags
}

/// Opens `path` and reads its tags. Files without a usable metadata
/// container yield an empty set.
pub fn read_file_tags(backend: &dyn MetadataBackend, path: &Path, scope: TagScope) -> TagSet {
    match backend.open(path) {
        OpenOutcome::Opened(handle) => {
            let tags = match scope {
                TagScope::All => read_tags(handle.as_ref()),
                TagScope::Regions => read_region_names(handle.as_ref()),
            };
            log::debug!("{:?}: {:?}", path, tags);
            tags
        }
        OpenOutcome::Skipped(reason) => {
            log::debug!("Skipping {:?}: {}", path, reason);
            TagSet::new()
        }
    }
}
