use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;

use hla_exons::cli;
use hla_exons::fasta::read_fasta_path;
use hla_exons::length_report::LengthDistribution;

#[derive(Parser)]
#[command(
    name = "length_report",
    about = "Report the sequence-length distribution of extracted alleles per gene"
)]
struct Cli {
    /// Extracted FASTA file
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// List the alleles of this gene with the length given by --length
    #[arg(long = "gene", requires = "length")]
    gene: Option<String>,

    /// Sequence length to query together with --gene
    #[arg(long = "length", requires = "gene")]
    length: Option<usize>,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Length Report");

    cli::section("Input");
    let records = read_fasta_path(&cli_args.input)
        .with_context(|| format!("failed to read FASTA: {}", cli_args.input.display()))?;
    if records.is_empty() {
        bail!("no sequences in {}", cli_args.input.display());
    }
    cli::kv("FASTA", &cli_args.input.display().to_string());
    cli::kv("Sequences", &records.len().to_string());
    eprintln!();

    let distribution = LengthDistribution::from_records(&records);

    if let (Some(gene), Some(length)) = (&cli_args.gene, cli_args.length) {
        cli::section("Query");
        let alleles = distribution.alleles(gene, length);
        cli::kv("Gene", gene);
        cli::kv("Length", &length.to_string());
        cli::kv("Alleles", &alleles.len().to_string());
        for allele in alleles {
            println!("{allele}");
        }
    } else {
        match &cli_args.out {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create report: {}", path.display()))?;
                distribution.render(BufWriter::new(file))?;
                cli::success(&format!("report written to {}", path.display()));
            }
            None => distribution.render(io::stdout().lock())?,
        }
    }

    cli::print_summary(start);
    Ok(())
}
