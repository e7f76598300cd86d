use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "exiv2")]
    #[error("exiv2 error: {0}")]
    Exiv2(#[from] rexiv2::Rexiv2Error),

    #[error("Unknown metadata backend: {0}")]
    UnknownBackend(String),

    #[error("XMP packet of {0} bytes does not fit in a JPEG segment")]
    XmpTooLarge(usize),

    #[error("Invalid metadata key: {0}")]
    InvalidKey(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl From<quick_xml::events::attributes::AttrError> for AppError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        AppError::Xml(err.into())
    }
}
