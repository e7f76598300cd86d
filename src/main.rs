mod backend;
mod backends;
mod cli;
mod collector;
mod config;
mod error;
mod metadata;
mod reader;
mod renamer;
mod serializer;
mod walker;
mod writer;
mod xmp;

use crate::backend::MetadataBackend;
use crate::cli::{Action, Cli};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::reader::TagScope;
use anyhow::Result;
use clap::Parser;
use log::info;
use std::io::Write;
use std::path::Path;

fn export_collection(
    config: &AppConfig,
    backend: &dyn MetadataBackend,
    files: &[std::path::PathBuf],
    scope: TagScope,
) -> Result<(), AppError> {
    let tags = collector::collect_tags(backend, files, scope);
    serializer::export_tags(Path::new(&config.output), &tags, config.locations)
}

/// Runs one action over the configured directory.
pub fn run(config: &AppConfig, action: Action) -> Result<(), AppError> {
    let backend = backends::from_config(config)?;
    info!("Using {} metadata backend", backend.name());
    let photos = walker::collect_photos(config);

    match action {
        Action::Collect => export_collection(config, backend.as_ref(), &photos, TagScope::All),
        Action::Regions => export_collection(config, backend.as_ref(), &photos, TagScope::Regions),
        Action::Rename => {
            info!("Renaming tags");
            let renames = serializer::load_rename_table(Path::new(&config.input))?;
            renamer::rename_tags(backend.as_ref(), &photos, &renames)?;
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new(&cli)?;

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .format(|buf, record| writeln!(buf, "{:<8} {}", record.level(), record.args()))
        .init();

    info!("Starting people-tags {:?} on {}", cli.action, config.scan_directory);

    run(&config, cli.action)?;

    info!("people-tags finished");

    Ok(())
}
