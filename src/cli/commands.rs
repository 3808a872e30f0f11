use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Migrates CircleCI 1.0 circle.yml files to CircleCI 2.0
#[derive(Parser, Debug)]
#[command(
    name = "circle-migrate",
    about = "Migrates CircleCI 1.0 circle.yml files to CircleCI 2.0 .circleci/config.yml",
    version,
    author,
    long_about = "circle-migrate reads circle.yml, inspects the repository (marker files, \
                  Makefile, test sources) to pick docker images, and writes an equivalent \
                  .circleci/config.yml. The original circle.yml is renamed to circle.yml.bak."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Migrate a repository's circle.yml",
        long_about = "Translates circle.yml into .circleci/config.yml and renames circle.yml \
                      to circle.yml.bak. Nothing is written if translation fails.\n\n\
                      Examples:\n  \
                      circle-migrate migrate\n  \
                      circle-migrate migrate /path/to/repo --dry-run\n  \
                      circle-migrate migrate --output /tmp/config.yml --no-rename"
    )]
    Migrate(MigrateArgs),

    #[command(
        about = "Show detected app type, images and working directory",
        long_about = "Runs repository detection and image resolution without translating.\n\n\
                      Examples:\n  \
                      circle-migrate detect\n  \
                      circle-migrate detect /path/to/repo --format json"
    )]
    Detect(DetectArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct MigrateArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to repository (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(long, help = "Print the generated config instead of writing it")]
    pub dry_run: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write config to FILE instead of .circleci/config.yml"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Leave circle.yml in place")]
    pub no_rename: bool,

    #[arg(long, value_name = "ORG", help = "GitHub organization for the working directory")]
    pub org: Option<String>,

    #[arg(long, value_enum, help = "Content scan backend")]
    pub scan_backend: Option<ScanBackendArg>,
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to repository (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "ORG", help = "GitHub organization for the working directory")]
    pub org: Option<String>,

    #[arg(long, value_enum, help = "Content scan backend")]
    pub scan_backend: Option<ScanBackendArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanBackendArg {
    Grep,
    Builtin,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

impl From<ScanBackendArg> for crate::scan::ScanBackend {
    fn from(arg: ScanBackendArg) -> Self {
        match arg {
            ScanBackendArg::Grep => crate::scan::ScanBackend::Grep,
            ScanBackendArg::Builtin => crate::scan::ScanBackend::Builtin,
        }
    }
}
