use circle_migrate::cli::commands::{CliArgs, Commands};
use circle_migrate::cli::handlers::{handle_detect, handle_migrate};
use circle_migrate::util::logging::{init_logging, json_from_env, level_from_flags, LoggingConfig};
use circle_migrate::{MigrateConfig, NAME, VERSION};

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    let config = MigrateConfig::default();
    init_logging_from_args(&args, &config);

    if !args.quiet {
        eprintln!("{} v{}", NAME, VERSION);
    }
    debug!("Arguments: {:?}", args);
    debug!("{}", config);

    let exit_code = match &args.command {
        Commands::Migrate(migrate_args) => handle_migrate(migrate_args, config, args.quiet),
        Commands::Detect(detect_args) => handle_detect(detect_args, config),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &MigrateConfig) {
    let level = level_from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
        &config.log_level,
    );
    init_logging(LoggingConfig::with_level(level).json(json_from_env()));
}
