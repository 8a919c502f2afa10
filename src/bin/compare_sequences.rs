use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use hla_exons::cli;
use hla_exons::compare::compare;
use hla_exons::fasta::read_fasta_path;

#[derive(Parser)]
#[command(
    name = "compare_sequences",
    about = "Compare extracted sequences against a reference protein FASTA"
)]
struct Cli {
    /// FASTA produced by extract_exons
    #[arg(short = 'p', long = "produced")]
    produced: PathBuf,

    /// Reference protein FASTA
    #[arg(short = 'r', long = "reference")]
    reference: PathBuf,

    /// List every matched allele
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Compare Sequences");

    cli::section("Input");
    let produced = read_fasta_path(&cli_args.produced)
        .with_context(|| format!("failed to read FASTA: {}", cli_args.produced.display()))?;
    let reference = read_fasta_path(&cli_args.reference)
        .with_context(|| format!("failed to read FASTA: {}", cli_args.reference.display()))?;
    cli::kv("Produced", &format!("{} sequences", produced.len()));
    cli::kv("Reference", &format!("{} sequences", reference.len()));
    eprintln!();

    let report = compare(&produced, &reference);

    cli::section("Comparison");
    if cli_args.verbose {
        for allele in &report.matched {
            cli::success(allele);
        }
    }
    cli::kv("Reference alleles", &report.total().to_string());
    cli::kv("Matched", &report.matched.len().to_string().green().to_string());
    cli::kv("Missing", &report.missing.len().to_string());
    cli::kv("Mismatched", &report.mismatched.len().to_string());
    if !report.missing.is_empty() {
        cli::warning(&format!("missing: {}", report.missing.join(", ")));
    }
    if !report.mismatched.is_empty() {
        cli::warning(&format!("mismatched: {}", report.mismatched.join(", ")));
    }

    cli::print_summary(start);
    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
