use crate::cli::Cli;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub scan_directory: String,
    pub output: String,
    pub input: String,
    pub locations: bool,
    pub log_level: String,
    pub backend: String,
}

impl AppConfig {
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("scan_directory", ".")?
            .set_default("output", "people.yaml")?
            .set_default("input", "rename.yaml")?
            .set_default("locations", false)?
            .set_default("log_level", "warn")?
            .set_default("backend", "xmp")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        }

        let s = builder
            .add_source(Environment::with_prefix("PEOPLE_TAGS"))
            .set_override_option("scan_directory", cli.directory.clone())?
            .set_override_option("output", cli.output.clone())?
            .set_override_option("input", cli.input.clone())?
            .set_override_option("locations", cli.locations.then_some(true))?
            .set_override_option("log_level", cli.verbosity.log_level())?
            .set_override_option("backend", cli.backend.clone())?
            .build()?;

        s.try_deserialize()
    }
}
