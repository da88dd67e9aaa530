use crate::core::error::{KmerError, Result};
use crate::core::record::OwnedRecord;
use anyhow::Context;
use bio::io::{fasta, fastq};
use memmap2::Mmap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct MmapSource {
    mmap: Option<Mmap>,
}

impl MmapSource {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();
        if len == 0 {
            return Ok(Self { mmap: None });
        }
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }.with_context(|| "mmap failed")?;
        Ok(Self { mmap: Some(mmap) })
    }

    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self, format: RecordFormat) -> Records<'_> {
        Records::new(self.bytes(), format)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordFormat {
    Fasta,
    Fastq,
}

enum Parser<'a> {
    Fasta(fasta::Records<BufReader<&'a [u8]>>),
    Fastq(fastq::Records<BufReader<&'a [u8]>>),
}

/// Records of a chosen format, each copied out of the input buffer.
///
/// The first malformed record ends iteration with [`KmerError::Parse`],
/// numbered from 1 in input order.
pub struct Records<'a> {
    parser: Parser<'a>,
    seen: u64,
    failed: bool,
}

impl<'a> Records<'a> {
    pub fn new(data: &'a [u8], format: RecordFormat) -> Self {
        let parser = match format {
            RecordFormat::Fasta => Parser::Fasta(fasta::Reader::new(data).records()),
            RecordFormat::Fastq => Parser::Fastq(fastq::Reader::new(data).records()),
        };
        Self {
            parser,
            seen: 0,
            failed: false,
        }
    }
}

impl Iterator for Records<'_> {
    type Item = Result<OwnedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let parsed = match &mut self.parser {
            Parser::Fasta(records) => records
                .next()?
                .map_err(|e| e.to_string())
                .and_then(from_fasta),
            Parser::Fastq(records) => records
                .next()?
                .map_err(|e| e.to_string())
                .and_then(from_fastq),
        };
        self.seen += 1;
        match parsed {
            Ok(record) => Some(Ok(record)),
            Err(reason) => {
                self.failed = true;
                Some(Err(KmerError::Parse {
                    record: self.seen,
                    reason,
                }))
            }
        }
    }
}

fn from_fasta(record: fasta::Record) -> std::result::Result<OwnedRecord, String> {
    record.check().map_err(str::to_string)?;
    Ok(OwnedRecord {
        id: header(record.id(), record.desc()),
        seq: record.seq().to_vec(),
        qual: None,
    })
}

fn from_fastq(record: fastq::Record) -> std::result::Result<OwnedRecord, String> {
    record.check().map_err(str::to_string)?;
    Ok(OwnedRecord {
        id: header(record.id(), record.desc()),
        seq: record.seq().to_vec(),
        qual: Some(record.qual().to_vec()),
    })
}

fn header(id: &str, desc: Option<&str>) -> Vec<u8> {
    match desc {
        Some(desc) => format!("{id} {desc}").into_bytes(),
        None => id.as_bytes().to_vec(),
    }
}
