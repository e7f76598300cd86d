use clap::{Args, Parser, ValueEnum};

/// Rename or collect tags of people in photos.
#[derive(Parser, Debug)]
#[command(name = "people-tags", version, about)]
pub struct Cli {
    /// Collect or rename tags
    #[arg(value_enum)]
    pub action: Action,

    /// Directory scanned for photos
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Output yaml (or .json) file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Input yaml (or .json) file with renaming info, a mapping {oldtag: newtag}
    #[arg(short, long)]
    pub input: Option<String>,

    /// Add tag locations in collected file
    #[arg(long)]
    pub locations: bool,

    /// Metadata backend (xmp or exiv2)
    #[arg(long)]
    pub backend: Option<String>,

    /// Extra configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Export every people tag found
    Collect,
    /// Rewrite tags using the rename table
    Rename,
    /// Export face region names only
    Regions,
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct Verbosity {
    /// Don't print status messages to stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Output warning information to stderr (default)
    #[arg(short, long)]
    pub warning: bool,

    /// Output verbose status (info) to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Output debug information to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Verbosity {
    /// The log level selected on the command line, if any.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.debug {
            Some("debug")
        } else if self.verbose {
            Some("info")
        } else if self.warning {
            Some("warn")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
