use crate::core::error::{KmerError, Result};
use crate::core::profile::Profile;
use crate::core::record::OwnedRecord;
use crossbeam_channel as channel;
use std::thread;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRow {
    pub name: String,
    pub probability: f64,
    pub log_likelihood: Option<f64>,
}

pub fn score_record(profile: &Profile, record: &OwnedRecord) -> Result<ScoreRow> {
    Ok(ScoreRow {
        name: record.name(),
        probability: profile.probability_of_sequence(&record.seq)?,
        log_likelihood: profile.log_likelihood(&record.seq)?,
    })
}

/// Scores every record against a read-only profile on `threads` workers.
///
/// Rows come back in input order. If any record fails, the error of the
/// earliest failing record is returned.
pub fn score_records(
    profile: &Profile,
    records: &[OwnedRecord],
    threads: usize,
) -> Result<Vec<ScoreRow>> {
    if threads == 0 {
        return Err(KmerError::InvalidArgument("threads must be >= 1".into()));
    }
    let (job_tx, job_rx) = channel::bounded::<(usize, &OwnedRecord)>(threads.saturating_mul(2));
    let (result_tx, result_rx) = channel::unbounded::<(usize, Result<ScoreRow>)>();

    thread::scope(|scope| {
        for _ in 0..threads {
            let rx = job_rx.clone();
            let tx = result_tx.clone();
            scope.spawn(move || {
                for (index, record) in rx.iter() {
                    if tx.send((index, score_record(profile, record))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);
        for job in records.iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);
    });

    let mut rows: Vec<Option<Result<ScoreRow>>> = vec![None; records.len()];
    for (index, row) in result_rx.iter() {
        rows[index] = Some(row);
    }
    let mut out = Vec::with_capacity(records.len());
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Some(Ok(row)) => out.push(row),
            Some(Err(e)) => {
                warn!(record = %records[index].name(), error = %e, "scoring failed");
                return Err(e);
            }
            None => {
                return Err(KmerError::Source(format!("no score produced for record {index}")));
            }
        }
    }
    debug!(records = out.len(), threads, "scoring finished");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Profile {
        let mut p = Profile::dna(2).unwrap();
        p.ingest_all(["CACACCG", "ACGTACGT", "TTGCA"]).unwrap();
        p
    }

    #[test]
    fn parallel_matches_sequential() {
        let p = reference();
        let records: Vec<OwnedRecord> = ["CACC", "ACGTA", "TTGCAC", "GCAT", "CGTAC"]
            .iter()
            .enumerate()
            .map(|(i, s)| OwnedRecord::new(format!("q{i}"), *s))
            .collect();
        let sequential: Vec<ScoreRow> = records
            .iter()
            .map(|r| score_record(&p, r).unwrap())
            .collect();
        for threads in [1, 2, 7] {
            assert_eq!(score_records(&p, &records, threads).unwrap(), sequential);
        }
        assert_eq!(sequential[0].name, "q0");
    }

    #[test]
    fn earliest_failure_wins() {
        let p = reference();
        let records = vec![
            OwnedRecord::new("ok", "CACC"),
            OwnedRecord::new("short", "AC"),
            OwnedRecord::new("foreign", "ACNNT"),
        ];
        let err = score_records(&p, &records, 3).unwrap_err();
        assert!(err.to_string().contains("longer than k"), "{err}");
    }

    #[test]
    fn zero_threads_rejected() {
        let p = reference();
        assert!(matches!(
            score_records(&p, &[], 0),
            Err(KmerError::InvalidArgument(_))
        ));
        assert_eq!(score_records(&p, &[], 2).unwrap(), Vec::new());
    }
}
