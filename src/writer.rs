use crate::backend::{MetadataBackend, MetadataHandle, OpenOutcome};
use crate::error::AppError;
use crate::metadata::{
    is_region_name_key, to_hierarchy, RenameTable, CATALOG_SETS, CATEGORIES,
    HIERARCHICAL_SUBJECT, KEYWORDS, LAST_KEYWORD, LIST_DELIMITER, SUBJECT, TAGS_LIST,
};
use std::path::Path;

/// Replaces `>old<` with `>new<` for every rename. The categories field
/// holds escaped markup and is patched as plain text.
pub fn patch_categories(text: &str, renames: &RenameTable) -> String {
    let mut patched = text.to_string();
    for (old, new) in renames {
        patched = patched.replace(&format!(">{}<", old), &format!(">{}<", new));
    }
    patched
}

/// Rewrites the people tag fields of one opened container. `tags` is the
/// complete target list, already passed through `renames`.
pub fn write_tags(
    handle: &mut dyn MetadataHandle,
    tags: &[String],
    renames: &RenameTable,
) -> Result<(), AppError> {
    handle.set_tag_multiple(TAGS_LIST, tags)?;
    handle.set_tag_multiple(LAST_KEYWORD, tags)?;
    handle.set_tag_multiple(SUBJECT, tags)?;
    handle.set_tag_string(KEYWORDS, &tags.join(LIST_DELIMITER))?;

    let hierarchy: Vec<String> = tags.iter().map(|t| to_hierarchy(t)).collect();
    log::trace!("Hierarchy encoded tags: {:?}", hierarchy);
    handle.clear_tag(HIERARCHICAL_SUBJECT);
    handle.set_tag_string(HIERARCHICAL_SUBJECT, &hierarchy.join(LIST_DELIMITER))?;
    handle.set_tag_multiple(CATALOG_SETS, &hierarchy)?;

    let region_keys: Vec<String> = handle
        .tag_keys()
        .into_iter()
        .filter(|key| is_region_name_key(key))
        .collect();
    for key in region_keys {
        if let Some(new_name) = handle.tag_string(&key).and_then(|name| renames.get(&name)) {
            log::debug!("Renaming region {} to '{}'", key, new_name);
            handle.set_tag_string(&key, new_name)?;
        }
    }

    if handle.has_tag(CATEGORIES) {
        if let Some(categories) = handle.tag_string(CATEGORIES) {
            let patched = patch_categories(&categories, renames);
            if patched != categories {
                handle.set_tag_string(CATEGORIES, &patched)?;
            }
        }
    }

    handle.save()
}

/// Opens `path` and rewrites its tags. Returns `false` when the file has no
/// usable metadata container and was left alone.
pub fn write_file_tags(
    backend: &dyn MetadataBackend,
    path: &Path,
    tags: &[String],
    renames: &RenameTable,
) -> Result<bool, AppError> {
    match backend.open(path) {
        OpenOutcome::Opened(mut handle) => {
            log::debug!("Writing {:?}: {:?}", path, tags);
            write_tags(handle.as_mut(), tags, renames)?;
            Ok(true)
        }
        OpenOutcome::Skipped(reason) => {
            log::debug!("Not writing {:?}: {}", path, reason);
            Ok(false)
        }
    }
}
