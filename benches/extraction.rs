use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use hla_exons::codon::CodonTable;
use hla_exons::config::ExtractionConfig;
use hla_exons::pipeline::extract;

const NUM_RECORDS: usize = 2_000;
const LOCI: [&str; 4] = ["A", "B", "C", "DRB1"];

/// Deterministic 552 bp coding sequence without in-frame stops.
fn coding_sequence(seed: usize) -> String {
    const CODONS: [&str; 8] = ["GCT", "CGA", "AAC", "GAT", "TGC", "CAG", "GGA", "CTG"];
    (0..184)
        .map(|i| CODONS[(i * 7 + seed * 13 + i / 5) % CODONS.len()])
        .collect()
}

fn render_record(index: usize, table: &CodonTable) -> String {
    let locus = LOCI[index % LOCI.len()];
    let class_two = locus.starts_with('D');
    let dna = coding_sequence(index);
    let (dna, cds, exons): (&str, &str, &[(u32, usize, usize)]) = if class_two {
        (&dna[..342], "join(1..72,73..342)", &[(1, 1, 72), (2, 73, 342)][..])
    } else {
        (
            dna.as_str(),
            "join(1..72,73..342,343..552)",
            &[(1, 1, 72), (2, 73, 342), (3, 343, 552)][..],
        )
    };
    let translation = String::from_utf8_lossy(&table.translate(dna.as_bytes())).into_owned();

    let mut out = String::new();
    let _ = writeln!(out, "ID   HLA{index:05}; SV 1; standard; DNA; HUM; {} BP.", dna.len());
    let _ = writeln!(
        out,
        "DE   HLA-{locus}*{:02}:{:02}:01, Human MHC Class {} sequence",
        index / 100 + 1,
        index % 100 + 1,
        if class_two { "II" } else { "I" }
    );
    let _ = writeln!(out, "FT   CDS             {cds}");
    let _ = writeln!(out, "FT                   /codon_start=1");
    for (i, chunk) in translation.as_bytes().chunks(56).enumerate() {
        let open = if i == 0 { "/translation=\"" } else { "" };
        let close = if (i + 1) * 56 >= translation.len() { "\"" } else { "" };
        let _ = writeln!(
            out,
            "FT                   {open}{}{close}",
            String::from_utf8_lossy(chunk)
        );
    }
    for &(number, start, end) in exons {
        let _ = writeln!(out, "FT   exon            {start}..{end}");
        let _ = writeln!(out, "FT                   /number=\"{number}\"");
    }
    let _ = writeln!(out, "SQ   Sequence {} BP;", dna.len());
    for chunk in dna.to_lowercase().as_bytes().chunks(60) {
        let _ = writeln!(out, "     {}", String::from_utf8_lossy(chunk));
    }
    out.push_str("//\n");
    out
}

fn bench_extract(c: &mut Criterion) {
    let table = CodonTable::standard();
    let content: String = (0..NUM_RECORDS).map(|i| render_record(i, &table)).collect();
    let config = ExtractionConfig::default();

    c.bench_function("extract (2000 synthetic records)", |b| {
        b.iter(|| {
            let report = extract(&content, &config);
            assert_eq!(report.stats.num_records as usize, NUM_RECORDS);
        });
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
