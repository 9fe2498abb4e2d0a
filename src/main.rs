//! Wordlist Substitute - substitution-table wordlist mutation
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use wordlist_substitute::cli::Args;
use wordlist_substitute::processor::{Processor, ProcessorConfig};
use wordlist_substitute::progress::{print_error, print_header, print_info};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        for cause in e.chain().skip(1) {
            print_error(&format!("  Caused by: {}", cause));
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Validate arguments
    validate_args(&args)?;

    // Create processor configuration
    let config = ProcessorConfig::from_args(&args)?;

    // Show configuration
    if !args.quiet && args.verbose {
        print_config(&args, &config);
    }

    // Create and run processor
    let processor = Processor::new(config);
    processor.process()?;

    Ok(())
}

/// Validate command-line arguments
fn validate_args(args: &Args) -> anyhow::Result<()> {
    if !args.dictionary.is_file() {
        anyhow::bail!("Dictionary file does not exist: {:?}", args.dictionary);
    }

    for table in &args.tables {
        if !table.is_file() {
            anyhow::bail!("Substitution table does not exist: {:?}", table);
        }
    }

    if args.threads == Some(0) {
        anyhow::bail!("--threads must be at least 1");
    }

    if args.queue_size == 0 {
        anyhow::bail!("--queue-size must be at least 1");
    }

    if args.min > args.max {
        log::warn!(
            "Minimum substitutions ({}) exceeds maximum ({}); no variants will be generated",
            args.min,
            args.max
        );
    }

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, config: &ProcessorConfig) {
    print_header("Configuration");

    print_info(&format!("Dictionary:   {:?}", config.dictionary));
    print_info(&format!("Tables:       {:?}", config.tables));
    print_info(&format!("Strategy:     {}", config.strategy));
    print_info(&format!("Substitutions: {}..={}", config.bounds.min(), config.bounds.max()));
    print_info(&format!("Threads:      {}", config.threads));
    print_info(&format!("Queue size:   {}", config.queue_size));
    print_info(&format!("Buffer size:  {} KB", config.buffer_size / 1024));
    print_info(&format!("Stats:        {}", args.stats));
}
