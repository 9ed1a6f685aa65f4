//! Standalone validator for command table files.
//!
//! Checks a JSON command table before it is handed to the bot: command
//! syntax, pair ids, lookup keys and duplicates.

use std::process::ExitCode;

use clap::Parser;

use cotacao_bot::commands::CommandTable;

/// Command table validator.
#[derive(Parser, Debug)]
#[command(name = "validate_commands")]
#[command(about = "Validates command table files for the quote bot")]
#[command(version)]
struct Args {
    /// Path to the JSON command table to validate.
    #[arg(short, long, default_value = "commands.json")]
    file: String,

    /// Generate an example command table at the specified path.
    #[arg(long)]
    generate_example: Option<String>,

    /// Show every entry, not only the failing ones.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(output_path) = args.generate_example {
        return generate_example(&output_path);
    }

    validate_table(&args.file, args.verbose)
}

fn generate_example(output_path: &str) -> ExitCode {
    let example = CommandTable::example();

    match example.save_to_file(output_path) {
        Ok(()) => {
            println!("✓ Example command table written to: {output_path}");
            println!("\nThe file contains {} example commands.", example.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to write example file: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate_table(path: &str, verbose: bool) -> ExitCode {
    println!("Validating: {path}\n");

    let table = match CommandTable::load_from_file(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("✗ Failed to load command table: {e}");
            return ExitCode::FAILURE;
        }
    };

    let results = table.validate_all();
    let mut errors = 0;

    for (i, result) in results.iter().enumerate() {
        if verbose && let Some(entry) = table.entries().get(i) {
            println!(
                "{} → {} (key {}, \"{}\")",
                entry.command, entry.pair_id, entry.lookup_key, entry.display_name
            );
        }

        match result {
            Ok(()) => {
                if verbose {
                    println!("  ✓ OK");
                }
            }
            Err(e) => {
                errors += 1;
                println!("  ✗ Error: {e}");
            }
        }
    }

    println!();

    let total = table.len();

    if errors == 0 {
        println!("✓ All {total} commands are valid!");
        println!("\nHelp reply:\n  {}", table.help_text());
        ExitCode::SUCCESS
    } else {
        println!("✗ Validation failed: {errors} error(s) in {total} commands");
        ExitCode::FAILURE
    }
}
