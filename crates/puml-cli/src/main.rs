//! puml CLI - Render PlantUML diagrams through a PlantUML server

mod cli;

use clap::Parser;
use puml::core::logging::init_logging_with_default;

fn main() {
    let cli_args = cli::Cli::parse();

    // Flags win over PUML_LOG_LEVEL / PUML_LOG_FORMAT; quiet unless asked
    let log_level = cli_args.log_level.map(|level| level.as_str());
    let log_format = cli_args.log_format.map(|format| format.as_str());
    if let Err(e) = init_logging_with_default(log_level, log_format, "warn") {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::PumlApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
