//! Standalone validator for Storm configuration files.
//!
//! Loads a YAML document, checks it against the schema Storm reads and
//! cross-checks provider references.

use std::process::ExitCode;

use clap::Parser;

use storm_config::render::Document;

/// Storm configuration validator.
#[derive(Parser, Debug)]
#[command(name = "validate_storm_config")]
#[command(about = "Validates configuration files for the Storm backup tool")]
#[command(version)]
struct Args {
    /// Path to the YAML configuration file to validate.
    #[arg(short, long, default_value = "config.yaml")]
    file: String,

    /// Show the backup and camera paths.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    validate_config(&args.file, args.verbose)
}

fn validate_config(path: &str, verbose: bool) -> ExitCode {
    println!("Validating: {path}\n");

    let document = match Document::load_from_file(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("✗ Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if verbose {
        println!("Backup ({} -> {}):", document.backup.provider, document.backup.to);
        for mapping in &document.backup.paths {
            println!("  {} -> {}", mapping.from, mapping.to);
        }
        println!("Camera:");
        for camera in &document.camera.paths {
            println!("  {} -> {} [{}]", camera.from, camera.to, camera.low_unzipped);
        }
        println!();
    }

    let errors = document.validate_all();
    for e in &errors {
        println!("  ✗ Error: {e}");
    }

    if errors.is_empty() {
        println!("✓ Configuration is valid!");
        println!("\nSummary:");
        println!("  Backup paths:   {}", document.backup.paths.len());
        println!("  Providers:      {}", document.cloud.providers.len());
        println!("  Camera paths:   {}", document.camera.paths.len());
        println!(
            "  Tasker logging: {}",
            if document.logs_to_tasker() { "enabled" } else { "disabled" }
        );

        ExitCode::SUCCESS
    } else {
        println!("\n✗ Validation failed: {} error(s)", errors.len());

        ExitCode::FAILURE
    }
}
