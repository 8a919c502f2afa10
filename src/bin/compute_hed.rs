use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use hla_exons::allele::classical_loci;
use hla_exons::cli;
use hla_exons::fasta::read_fasta_path;
use hla_exons::hed::{AlleleSequences, HedSummary, annotate_file, summarize_loci, write_locus_table};

#[derive(Parser)]
#[command(
    name = "compute_hed",
    about = "HLA evolutionary divergence (mean Grantham distance) between alleles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// HED between two alleles
    Pair {
        allele1: String,
        allele2: String,

        /// Extracted allele FASTA
        #[arg(short = 'f', long = "fasta")]
        fasta: PathBuf,
    },

    /// Append a HED column to a TSV of (id, allele1, allele2, ...) rows
    Annotate {
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Extracted allele FASTA
        #[arg(short = 'f', long = "fasta")]
        fasta: PathBuf,
    },

    /// Annotate <dir>/<LOCUS>.txt for every locus and print a summary table
    Summary {
        #[arg(short = 'd', long = "dir")]
        dir: PathBuf,

        /// Extracted allele FASTA
        #[arg(short = 'f', long = "fasta")]
        fasta: PathBuf,

        /// Loci to summarize (defaults to the classical loci)
        #[arg(long = "loci", value_delimiter = ',')]
        loci: Vec<String>,
    },
}

fn load_sequences(path: &Path) -> Result<AlleleSequences> {
    let records = read_fasta_path(path)
        .with_context(|| format!("failed to read FASTA: {}", path.display()))?;
    if records.is_empty() {
        bail!("no sequences in {}", path.display());
    }
    cli::kv("Alleles", &records.len().to_string());
    Ok(AlleleSequences::new(records))
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Compute HED");

    match cli_args.command {
        Commands::Pair {
            allele1,
            allele2,
            fasta,
        } => {
            let sequences = load_sequences(&fasta)?;
            let value = sequences.pair(&allele1, &allele2)?;
            println!("{allele1}\t{allele2}\t{value:.2}");
        }
        Commands::Annotate {
            input,
            output,
            fasta,
        } => {
            let sequences = load_sequences(&fasta)?;
            let values = annotate_file(&input, &output, &sequences)
                .with_context(|| format!("failed to annotate {}", input.display()))?;
            let valid: Vec<f64> = values.iter().flatten().copied().collect();
            cli::kv("Rows", &values.len().to_string());
            match HedSummary::from_values(&valid) {
                Some(s) => {
                    cli::kv("Valid pairs", &s.count.to_string());
                    cli::kv("Median HED", &format!("{:.2}", s.median));
                    cli::kv("IQR", &format!("({:.2} - {:.2})", s.q1, s.q3));
                }
                None => cli::warning("no valid HED values"),
            }
            cli::success(&format!("annotated table written to {}", output.display()));
        }
        Commands::Summary { dir, fasta, loci } => {
            let sequences = load_sequences(&fasta)?;
            let loci = if loci.is_empty() { classical_loci() } else { loci };
            let table = summarize_loci(&dir, &loci, &sequences)?;
            for (path, reason) in &table.skipped {
                cli::warning(&format!("{}: {reason}", path.display()));
            }
            write_locus_table(io::stdout().lock(), &table.rows)?;
        }
    }

    cli::print_summary(start);
    Ok(())
}
