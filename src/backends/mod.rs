#[cfg(feature = "exiv2")]
pub mod exiv2;
pub mod xmp_file;

use crate::backend::MetadataBackend;
use crate::config::AppConfig;
use crate::error::AppError;

/// Builds the metadata backend named by `config.backend`.
pub fn from_config(config: &AppConfig) -> Result<Box<dyn MetadataBackend>, AppError> {
    match config.backend.as_str() {
        "xmp" => Ok(Box::new(xmp_file::XmpFileBackend::new())),
        #[cfg(feature = "exiv2")]
        "exiv2" => Ok(Box::new(exiv2::Exiv2Backend::new()?)),
        other => Err(AppError::UnknownBackend(other.to_string())),
    }
}
