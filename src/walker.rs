use crate::config::AppConfig;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Lists every regular file below `config.scan_directory`. No filtering by
/// type happens here; files without metadata are skipped when opened.
pub fn collect_photos(config: &AppConfig) -> Vec<PathBuf> {
    log::info!("Starting file discovery in {}", config.scan_directory);

    let mut photos = Vec::new();
    for entry in WalkDir::new(&config.scan_directory).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_dir() {
            log::info!("Collecting files in '{}'", path.display());
        } else if entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file()) {
            log::trace!("Discovered file: {:?}", path);
            photos.push(path.to_path_buf());
        } else {
            log::trace!("Skipping non-file entry: {:?}", path);
        }
    }

    log::info!("File discovery complete, {} files found.", photos.len());
    photos
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> AppConfig {
        AppConfig {
            scan_directory: dir.path().to_string_lossy().to_string(),
            output: "people.yaml".to_string(),
            input: "rename.yaml".to_string(),
            locations: false,
            log_level: "warn".to_string(),
            backend: "xmp".to_string(),
        }
    }

    #[test]
    fn finds_files_in_nested_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("2023/summer")).unwrap();
        fs::write(dir.path().join("top.jpg"), b"x").unwrap();
        fs::write(dir.path().join("2023/summer/beach.jpg"), b"x").unwrap();
        fs::write(dir.path().join("2023/notes.txt"), b"x").unwrap();

        let photos = collect_photos(&config_for(&dir));

        assert_eq!(
            photos,
            vec![
                dir.path().join("2023/notes.txt"),
                dir.path().join("2023/summer/beach.jpg"),
                dir.path().join("top.jpg"),
            ]
        );
    }

    #[test]
    fn empty_or_missing_directory_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(collect_photos(&config_for(&dir)).is_empty());

        let mut config = config_for(&dir);
        config.scan_directory = dir.path().join("absent").to_string_lossy().to_string();
        assert!(collect_photos(&config).is_empty());
    }
}
