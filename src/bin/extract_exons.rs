use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use hla_exons::checksum;
use hla_exons::cli;
use hla_exons::config::ExtractionConfig;
use hla_exons::embl::read_dat;
use hla_exons::fasta::write_fasta;
use hla_exons::pipeline::{extract, write_diagnostics};

#[derive(Parser)]
#[command(
    name = "extract_exons",
    about = "Extract exon 2/3 protein sequences from an IPD-IMGT/HLA .dat file"
)]
struct Cli {
    /// Input flat file (hla.dat or hla.dat.gz)
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output FASTA file
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Optional JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Minimum residue count of an accepted sequence
    #[arg(long = "min-length")]
    min_length: Option<usize>,

    /// Stop after this many accepted alleles
    #[arg(long = "top")]
    top: Option<usize>,

    /// FASTA line width
    #[arg(long = "line-width")]
    line_width: Option<usize>,

    /// Write every rejected record to this TSV file
    #[arg(long = "rejections")]
    rejections: Option<PathBuf>,

    /// Print every rejected record
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Extract Exons");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let mut config = match &cli_args.config {
        Some(path) => {
            cli::kv("Config", &path.display().to_string());
            ExtractionConfig::from_file(path)?
        }
        None => ExtractionConfig::default(),
    };
    if let Some(min_length) = cli_args.min_length {
        config.min_length = min_length;
    }
    if let Some(line_width) = cli_args.line_width {
        config.line_width = line_width;
    }
    if cli_args.top.is_some() {
        config.top = cli_args.top;
    }
    config.validate()?;

    cli::kv("Input", &cli_args.input.display().to_string());
    cli::kv("Output", &cli_args.out.display().to_string());
    cli::kv("Min length", &config.min_length.to_string());
    cli::kv("Loci", &config.loci.join(" "));
    if let Some(top) = config.top {
        cli::kv("Top", &top.to_string());
    }

    eprintln!();

    // ── Input ────────────────────────────────────────────
    cli::section("Input");

    if let Some(expected) = &config.dat_md5 {
        checksum::verify_md5(&cli_args.input, expected)?;
        cli::success("MD5 verified");
    }

    let content = read_dat(&cli_args.input)
        .with_context(|| format!("failed to read input: {}", cli_args.input.display()))?;
    cli::kv("Size", &format!("{} bytes", content.len()));

    eprintln!();

    // ── Extraction ───────────────────────────────────────
    cli::section("Extraction");

    let report = extract(&content, &config);
    let stats = &report.stats;

    if stats.num_records == 0 {
        cli::warning("no records found in input");
    }

    if cli_args.verbose {
        for d in &report.diagnostics {
            cli::skip(&d.label, &d.rejection.to_string());
        }
    }

    cli::kv("Records", &stats.num_records.to_string());
    cli::kv("Accepted", &stats.num_accepted.to_string().green().to_string());
    cli::kv("Rejected", &stats.num_rejected().to_string());
    cli::kv("  format", &stats.num_format.to_string());
    cli::kv("  structural", &stats.num_structural.to_string());
    cli::kv("  consistency", &stats.num_consistency.to_string());
    cli::kv("  duplicate", &stats.num_duplicate.to_string());
    cli::kv("Shifted frame", &stats.num_shifted_frame.to_string());
    cli::kv("Unverified", &stats.num_unverified.to_string());
    if stats.num_cds_mismatch > 0 {
        cli::warning(&format!(
            "{} accepted records have a CDS translation that differs from /translation",
            stats.num_cds_mismatch
        ));
    }
    if report.limit_reached {
        cli::warning("record limit reached; remaining records were not processed");
    }

    eprintln!();

    // ── Output ───────────────────────────────────────────
    cli::section("Output");

    let out_file = File::create(&cli_args.out)
        .with_context(|| format!("failed to create output: {}", cli_args.out.display()))?;
    write_fasta(BufWriter::new(out_file), report.mapping.iter(), config.line_width)?;
    cli::success(&format!(
        "{} sequences written to {}",
        report.mapping.len(),
        cli_args.out.display()
    ));

    if let Some(path) = &cli_args.rejections {
        let file = File::create(path)
            .with_context(|| format!("failed to create rejections file: {}", path.display()))?;
        write_diagnostics(BufWriter::new(file), &report.diagnostics)?;
        cli::success(&format!(
            "{} rejections written to {}",
            report.diagnostics.len(),
            path.display()
        ));
    }

    cli::print_summary(start);
    Ok(())
}
