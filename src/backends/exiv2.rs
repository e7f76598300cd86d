use crate::backend::{MetadataBackend, MetadataHandle, OpenOutcome, SkipReason};
use crate::error::AppError;
use rexiv2::Metadata;
use std::path::{Path, PathBuf};

/// Every format exiv2 understands, through gexiv2.
pub struct Exiv2Backend;

pub struct Exiv2Handle {
    path: PathBuf,
    metadata: Metadata,
}

impl Exiv2Backend {
    pub fn new() -> Result<Self, AppError> {
        rexiv2::initialize()?;
        log::debug!("Initialized exiv2 metadata backend");
        Ok(Self)
    }
}

impl MetadataBackend for Exiv2Backend {
    fn name(&self) -> &'static str {
        "exiv2"
    }

    fn open(&self, path: &Path) -> OpenOutcome {
        match Metadata::new_from_path(path) {
            Ok(metadata) => OpenOutcome::Opened(Box::new(Exiv2Handle {
                path: path.to_path_buf(),
                metadata,
            })),
            Err(e) => OpenOutcome::Skipped(SkipReason::Unparsable(e.to_string())),
        }
    }
}

impl MetadataHandle for Exiv2Handle {
    fn tag_multiple(&self, key: &str) -> Vec<String> {
        self.metadata.get_tag_multiple_strings(key).unwrap_or_default()
    }

    fn tag_string(&self, key: &str) -> Option<String> {
        self.metadata.get_tag_string(key).ok()
    }

    fn tag_keys(&self) -> Vec<String> {
        self.metadata.get_xmp_tags().unwrap_or_default()
    }

    fn has_tag(&self, key: &str) -> bool {
        self.metadata.has_tag(key)
    }

    fn set_tag_multiple(&mut self, key: &str, values: &[String]) -> Result<(), AppError> {
        log::trace!("{:?}: {} <- {:?}", self.path, key, values);
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        self.metadata.set_tag_multiple_strings(key, &values)?;
        Ok(())
    }

    fn set_tag_string(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        log::trace!("{:?}: {} <- {:?}", self.path, key, value);
        self.metadata.set_tag_string(key, value)?;
        Ok(())
    }

    fn clear_tag(&mut self, key: &str) {
        self.metadata.clear_tag(key);
    }

    fn save(&mut self) -> Result<(), AppError> {
        self.metadata.save_to_file(&self.path)?;
        log::debug!("Saved metadata of {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::SUBJECT;
    use tempfile::TempDir;

    fn opened(outcome: OpenOutcome) -> Box<dyn MetadataHandle> {
        match outcome {
            OpenOutcome::Opened(handle) => handle,
            OpenOutcome::Skipped(reason) => panic!("file skipped: {}", reason),
        }
    }

    #[test]
    fn jpeg_subject_survives_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        image::RgbImage::new(16, 16)
            .save_with_format(&path, image::ImageFormat::Jpeg)
            .unwrap();

        let backend = Exiv2Backend::new().unwrap();
        let tags = vec!["Alice".to_string(), "Bob".to_string()];
        let mut handle = opened(backend.open(&path));
        handle.set_tag_multiple(SUBJECT, &tags).unwrap();
        handle.save().unwrap();

        let reopened = opened(backend.open(&path));
        assert!(reopened.has_tag(SUBJECT));
        assert_eq!(reopened.tag_multiple(SUBJECT), tags);
    }

    #[test]
    fn non_image_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let backend = Exiv2Backend::new().unwrap();
        assert!(matches!(backend.open(&path), OpenOutcome::Skipped(_)));
    }
}
