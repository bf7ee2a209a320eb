use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use guetzli_export_cli::cli_args::Args;
use guetzli_export_cli::progress::TerminalProgress;
use guetzli_export_core::config;
use guetzli_export_core::error::Result;
use guetzli_export_core::export::Exporter;
use log::{debug, info};

fn execute() -> Result<()> {
    let args = Args::parse();

    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{config_path}`");

    // Loaded once and borrowed by everything below
    let config = config::load_config(&config_path)?;
    let search_directory = config::search_directory(&config_path, &args.tool_directory);
    debug!("Tool directory: `{}`", search_directory.display());

    let canvas = args.canvas(&config.command.suffixes)?;
    let options = args.export_options();
    let mut exporter = Exporter::new(&config, search_directory);

    if args.dry_run {
        let request = exporter.prepare(canvas.as_ref(), &options)?;
        println!("Executing command:\n{request}");
        println!("Dry run is specified, exiting without executing.");
        return Ok(());
    }

    let mut progress = TerminalProgress::new(stdout());
    let result = exporter.export(canvas.as_ref(), &options, &mut progress)?;
    info!("Tool exited with code {}", result.exit_code);

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
