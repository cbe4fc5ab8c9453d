use std::fs;
use std::path::Path;

use fastakit::io::fasta::{parse_file, CaseMode, Sequence};
use fastakit::pipeline::{self, PipelineConfig};
use fastakit::transform::{DuplicatePolicy, StrandStyle};
use fastakit::Error;

fn write(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

#[test]
fn process_single_file_with_all_steps() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("reads.fasta");
    write(&input, ">a\nAAC\nCG\n>a\nttga\n>b\nGGGT\n");
    let output = dir.path().join("out").join("reads_out.fasta");

    let cfg = PipelineConfig {
        case: CaseMode::Upper,
        wrap: 3,
        duplicates: Some(DuplicatePolicy::Rename),
        strand: Some(StrandStyle::ReverseComplement),
        stats: true,
        plots_dir: Some(dir.path().join("plots")),
        strict: false,
    };
    let reports = pipeline::process(&input, &output, &cfg).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].sequences, 3);

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, ">a.1\nCGG\nTT\n\n>a.2\nTCA\nA\n\n>b\nACC\nC\n");

    let stats = fs::read_to_string(dir.path().join("out").join("reads_stats.csv")).unwrap();
    assert_eq!(
        stats,
        "id,len,A,C,T,G,-\na.1,5,0,1,2,2,0\na.2,4,0,0,0,0,0\nb,4,1,3,0,0,0\n"
    );

    assert!(dir.path().join("plots").join("reads_histogram.svg").is_file());
    assert!(dir.path().join("plots").join("reads_boxplot.svg").is_file());
}

#[test]
fn written_file_parses_back_with_source_tag() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("x.fa");
    write(&input, ">s1 some description\nAC\nGT\n>s2\nAC-GT\n");
    let output = dir.path().join("x_out.fa");

    pipeline::process(&input, &output, &PipelineConfig::default()).unwrap();

    let seqs = parse_file(&output, true).unwrap();
    assert_eq!(seqs.len(), 2);
    assert_eq!(seqs[0].id, "s1 some description");
    assert_eq!(seqs[0].residues, "ACGT");
    assert_eq!(seqs[1].residues, "AC-GT");
    let tag = output.display().to_string();
    assert!(seqs.iter().all(|s| s.source.as_deref() == Some(tag.as_str())));
}

#[test]
fn process_directory_one_file_at_a_time() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    write(&input.join("b.fasta"), ">x\nACGT\n>x\nAC\n");
    write(&input.join("a.fasta"), ">y\nGG\n");
    write(&input.join("notes.txt"), "not a fasta file\n");
    let output = dir.path().join("results");

    let cfg = PipelineConfig {
        duplicates: Some(DuplicatePolicy::Remove),
        stats: true,
        ..Default::default()
    };
    let reports = pipeline::process(&input, &output, &cfg).unwrap();
    let names: Vec<String> = reports
        .iter()
        .map(|r| r.output.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_result.fasta", "b_result.fasta"]);

    assert_eq!(fs::read_to_string(output.join("b_result.fasta")).unwrap(), ">x\nACGT\n");
    assert!(output.join("a_stats.csv").is_file());
    assert!(output.join("b_stats.csv").is_file());
}

#[test]
fn complement_failure_propagates_and_names_the_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gaps.fasta");
    write(&input, ">ok\nACGT\n>gappy\nAC-GT\n");
    let cfg = PipelineConfig {
        strand: Some(StrandStyle::Complement),
        ..Default::default()
    };
    let err = pipeline::process(&input, &dir.path().join("o.fasta"), &cfg).unwrap_err();
    match err {
        Error::Lookup { id, residue, position } => {
            assert_eq!(id, "gappy");
            assert_eq!(residue, '-');
            assert_eq!(position, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = pipeline::process(dir.path(), &dir.path().join("out"), &PipelineConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::NoInputFiles(_)));
}

#[test]
fn shared_stem_in_directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    write(&input.join("a.fa"), ">from_fa\nAAAA\n");
    write(&input.join("a.fasta"), ">from_fasta\nCCCC\n");
    let out = dir.path().join("out");

    let err = pipeline::process(&input, &out, &PipelineConfig::default()).unwrap_err();
    match err {
        Error::DuplicateStem { stem, first, second } => {
            assert_eq!(stem, "a");
            assert_eq!(first, input.join("a.fa"));
            assert_eq!(second, input.join("a.fasta"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out.join("a_result.fasta").exists());

    let err = pipeline::summarize(&input, &out, None, false).unwrap_err();
    assert!(matches!(err, Error::DuplicateStem { .. }));
}

#[test]
fn summary_of_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    write(&input.join("one.fasta"), ">S1\nAAAACCCTTG\n");
    write(&input.join("two.fasta"), ">S2\nAC\n>S3\n--\n");
    let out = dir.path().join("csv");

    let n = pipeline::summarize(&input, &out, None, false).unwrap();
    assert_eq!(n, 3);
    assert_eq!(
        fs::read_to_string(out.join("one.csv")).unwrap(),
        "id,len,A,C,T,G,-\nS1,10,4,3,2,1,0\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("two.csv")).unwrap(),
        "id,len,A,C,T,G,-\nS2,2,1,1,0,0,0\nS3,2,0,0,0,0,2\n"
    );
}

#[test]
fn strict_mode_rejects_orphan_body_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.fasta");
    write(&input, "ACGT\n>s\nAC\n");

    let lenient = pipeline::summarize(&input, &dir.path().join("l.csv"), None, false).unwrap();
    assert_eq!(lenient, 1);

    let err = pipeline::summarize(&input, &dir.path().join("s.csv"), None, true).unwrap_err();
    assert!(matches!(err, Error::Format { line: 1, .. }));
}

#[test]
fn parse_file_preserves_sequence_values() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("p.fasta");
    write(&input, ">s1\nACGT\n>s2\nAC-GT\n");
    let seqs = parse_file(&input, false).unwrap();
    let tag = input.display().to_string();
    assert_eq!(
        seqs,
        vec![
            Sequence::new("s1", "ACGT").with_source(tag.as_str()),
            Sequence::new("s2", "AC-GT").with_source(tag.as_str()),
        ]
    );
}
