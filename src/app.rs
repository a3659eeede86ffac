// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod manifest;
pub mod models;
pub mod report;
pub mod scanner;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::config::resolve_config;
use self::report::{write_report, ReportAssembler};

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration (root, rules, output path)
    let config = resolve_config(args)?;

    // 3. Scan and assemble the document
    let assembler = ReportAssembler::new(&config)?;
    let document = assembler.build_document(chrono::Utc::now().date_naive());

    // 4. Write it out
    write_report(&config.output, &document)?;

    println!("✅ Project tree generated: {}", config.output.display());
    println!("   {} lines", document.split('\n').count());

    Ok(())
}
