//! Integration tests for reading records from files into profiles.

use kira_kmer::core::io::{MmapSource, RecordFormat};
use kira_kmer::{KmerError, Profile};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_fasta_file_into_profile() {
    let file = write_temp(">chr1 test\nAAAC\nGT\n>chr2\nTTTT\n");
    let source = MmapSource::open(file.path()).unwrap();
    let mut p = Profile::dna(2).unwrap();
    let summary = p.ingest(source.records(RecordFormat::Fasta)).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(p.total(), 5 + 3);
    assert_eq!(p.count_str("AA").unwrap(), 2);
    assert_eq!(p.count_str("CG").unwrap(), 1);
    assert_eq!(p.count_str("TT").unwrap(), 3);
    assert!(p.is_loaded());
}

#[test]
fn test_fastq_file_into_profile() {
    let file = write_temp("@r1\nACGT\n+\nIIII\n@r2\nACGA\n+\nIIII\n");
    let source = MmapSource::open(file.path()).unwrap();
    let mut p = Profile::dna(3).unwrap();
    p.ingest(source.records(RecordFormat::Fastq)).unwrap();
    assert_eq!(p.count_str("ACG").unwrap(), 2);
    assert_eq!(p.total(), 4);
}

#[test]
fn test_malformed_file_keeps_partial_counts() {
    let file = write_temp("@r1\nACGT\n+\nIIII\n@r2\nACGA\nIIII\n");
    let source = MmapSource::open(file.path()).unwrap();
    let mut p = Profile::dna(2).unwrap();
    let err = p.ingest(source.records(RecordFormat::Fastq)).unwrap_err();
    assert!(matches!(err, KmerError::Parse { .. }));
    assert!(!p.is_loaded());
    assert_eq!(p.total(), 3);
}

#[test]
fn test_empty_file() {
    let file = write_temp("");
    let source = MmapSource::open(file.path()).unwrap();
    assert!(source.is_empty());
    let mut p = Profile::dna(2).unwrap();
    let summary = p.ingest(source.records(RecordFormat::Fasta)).unwrap();
    assert_eq!(summary.records, 0);
    assert!(p.is_loaded());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(MmapSource::open(&dir.path().join("absent.fa")).is_err());
}
