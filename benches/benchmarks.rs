use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fastakit::io::fasta::{parse_str, to_fasta_string, CaseMode, FastaFormat, Sequence};
use fastakit::stats;
use fastakit::transform::{
    DuplicatePolicy, DuplicateResolver, StrandStyle, StrandTransformer, Transformer,
};

fn make_residues(len: usize, seed: u32) -> String {
    let bases = ['A', 'C', 'G', 'T'];
    let mut seq = String::with_capacity(len);
    let mut x: u32 = seed;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

/// n 条序列，每 4 条共享一个标识符
fn make_sequences(n: usize, len: usize) -> Vec<Sequence> {
    (0..n)
        .map(|i| Sequence::new(format!("seq{}", i / 4), make_residues(len, i as u32 + 1)))
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let seqs = make_sequences(200, 1_000);
    let text = to_fasta_string(&seqs, FastaFormat { case: CaseMode::Original, wrap: 60 })
        .expect("serialize");

    c.bench_function("parse_200x1kb_wrapped", |b| {
        b.iter(|| {
            black_box(parse_str(black_box(&text)).expect("parse"));
        })
    });
}

fn bench_write(c: &mut Criterion) {
    let seqs = make_sequences(200, 1_000);
    let fmt = FastaFormat { case: CaseMode::Lower, wrap: 60 };

    c.bench_function("write_200x1kb_wrap60_lower", |b| {
        b.iter(|| {
            black_box(to_fasta_string(black_box(&seqs), fmt).expect("serialize"));
        })
    });
}

fn bench_revcomp(c: &mut Criterion) {
    let seqs = make_sequences(200, 1_000);
    let t = StrandTransformer::new(StrandStyle::ReverseComplement);

    c.bench_function("revcomp_200x1kb", |b| {
        b.iter(|| {
            black_box(t.transform(black_box(&seqs)).expect("revcomp"));
        })
    });
}

fn bench_rename(c: &mut Criterion) {
    let seqs = make_sequences(10_000, 10);
    let t = DuplicateResolver::new(DuplicatePolicy::Rename);

    c.bench_function("rename_10k", |b| {
        b.iter(|| {
            black_box(t.transform(black_box(&seqs)).expect("rename"));
        })
    });
}

fn bench_stats(c: &mut Criterion) {
    let seqs = make_sequences(200, 1_000);

    c.bench_function("stats_200x1kb", |b| {
        b.iter(|| {
            black_box(stats::compute_table(black_box(&seqs)));
        })
    });
}

criterion_group!(benches, bench_parse, bench_write, bench_revcomp, bench_rename, bench_stats);
criterion_main!(benches);
