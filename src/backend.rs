use crate::error::AppError;
use std::fmt;
use std::path::Path;

/// Why a file was passed over instead of being opened for metadata access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No metadata container is known for this kind of file.
    Unsupported,
    Unreadable(String),
    Unparsable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unsupported => write!(f, "unsupported file type"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {}", e),
            SkipReason::Unparsable(e) => write!(f, "unparsable metadata: {}", e),
        }
    }
}

pub enum OpenOutcome {
    Opened(Box<dyn MetadataHandle>),
    Skipped(SkipReason),
}

/// One opened metadata container. Keys use exiv2 naming
/// (`Xmp.dc.subject`, `Xmp.mwg-rs.Regions/mwg-rs:RegionList[1]/mwg-rs:Name`).
pub trait MetadataHandle {
    /// All values of a multi-value key, empty when absent.
    fn tag_multiple(&self, key: &str) -> Vec<String>;

    /// String form of a key; arrays are joined with `", "`.
    fn tag_string(&self, key: &str) -> Option<String>;

    fn tag_keys(&self) -> Vec<String>;

    fn has_tag(&self, key: &str) -> bool;

    fn set_tag_multiple(&mut self, key: &str, values: &[String]) -> Result<(), AppError>;

    /// Sets a string key. When the key holds an array the value is appended.
    fn set_tag_string(&mut self, key: &str, value: &str) -> Result<(), AppError>;

    fn clear_tag(&mut self, key: &str);

    /// Writes pending changes back to the file.
    fn save(&mut self) -> Result<(), AppError>;
}

pub trait MetadataBackend {
    fn name(&self) -> &'static str;

    fn open(&self, path: &Path) -> OpenOutcome;
}
