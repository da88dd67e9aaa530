use crate::core::error::{KmerError, Result};
use crate::core::profile::Profile;
use crate::core::record::SequenceRecord;
use crossbeam_channel::{self as channel, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub records: u64,
    pub kmers: u64,
    pub elapsed: Duration,
}

/// Message protocol between a record source and [`spawn_ingest`].
///
/// A source must finish with `Done`; a channel that disconnects first is
/// treated as an early termination and the profile is not marked loaded.
#[derive(Debug)]
pub enum Feed<R> {
    Record(R),
    Error(KmerError),
    Done,
}

#[derive(Default)]
struct Scratch {
    codes: Vec<u8>,
    rc: Vec<u8>,
    rc_codes: Vec<u8>,
}

impl Profile {
    /// Counts one sequence, plus its reverse complement for strand-non-specific
    /// profiles. Returns the number of k-mers counted. A sequence that fails
    /// validation leaves the counts untouched.
    pub fn update(&mut self, seq: &[u8]) -> Result<u64> {
        self.update_with(seq, &mut Scratch::default())
    }

    fn update_with(&mut self, seq: &[u8], scratch: &mut Scratch) -> Result<u64> {
        self.validate(seq, &mut scratch.codes)?;
        if !self.strand_specific() {
            self.alphabet().reverse_complement_into(seq, &mut scratch.rc)?;
            self.codec().codes_into(&scratch.rc, &mut scratch.rc_codes)?;
        }
        let mut n = self.count_codes(&scratch.codes);
        if !self.strand_specific() {
            n += self.count_codes(&scratch.rc_codes);
        }
        Ok(n)
    }

    /// Consumes records in order, failing fast on the first error.
    ///
    /// Counts from records before the failure are kept. `loaded` is set only
    /// when the iterator is exhausted without error; the cached total is
    /// refreshed either way.
    pub fn ingest<I, R>(&mut self, records: I) -> Result<IngestSummary>
    where
        I: IntoIterator<Item = Result<R>>,
        R: SequenceRecord,
    {
        let t0 = Instant::now();
        self.set_loaded(false);
        let mut scratch = Scratch::default();
        let mut summary = IngestSummary::default();
        for item in records {
            let counted = item.and_then(|record| self.update_with(record.seq(), &mut scratch));
            match counted {
                Ok(n) => {
                    summary.records += 1;
                    summary.kmers += n;
                }
                Err(e) => {
                    self.recompute_total();
                    warn!(
                        k = self.k(),
                        records = summary.records,
                        error = %e,
                        "k-mer ingestion aborted"
                    );
                    return Err(e);
                }
            }
        }
        self.recompute_total();
        self.set_loaded(true);
        summary.elapsed = t0.elapsed();
        debug!(
            k = self.k(),
            records = summary.records,
            kmers = summary.kmers,
            total = self.total(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "k-mer ingestion finished"
        );
        Ok(summary)
    }

    pub fn ingest_all<I>(&mut self, records: I) -> Result<IngestSummary>
    where
        I: IntoIterator,
        I::Item: SequenceRecord,
    {
        self.ingest(records.into_iter().map(Ok))
    }
}

/// What an ingestion thread hands back: the profile, always, and how it went.
#[derive(Debug)]
pub struct IngestOutcome {
    pub profile: Profile,
    pub result: Result<IngestSummary>,
}

pub struct IngestHandle {
    done: Receiver<IngestOutcome>,
    worker: JoinHandle<()>,
}

impl IngestHandle {
    /// Completion signal; fires exactly once. Usable in `select!`.
    pub fn completion(&self) -> &Receiver<IngestOutcome> {
        &self.done
    }

    pub fn is_finished(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn wait(self) -> Result<IngestOutcome> {
        let outcome = self.done.recv().map_err(|_| unreported());
        join_worker(self.worker);
        outcome
    }

    /// Polls once; a still-running ingestion hands the handle back.
    pub fn try_finish(self) -> std::result::Result<Result<IngestOutcome>, Self> {
        match self.done.try_recv() {
            Ok(outcome) => {
                join_worker(self.worker);
                Ok(Ok(outcome))
            }
            Err(TryRecvError::Empty) => Err(self),
            Err(TryRecvError::Disconnected) => {
                join_worker(self.worker);
                Ok(Err(unreported()))
            }
        }
    }

    /// Waits at most `timeout`; on expiry the handle is returned untouched.
    pub fn wait_timeout(self, timeout: Duration) -> std::result::Result<Result<IngestOutcome>, Self> {
        match self.done.recv_timeout(timeout) {
            Ok(outcome) => {
                join_worker(self.worker);
                Ok(Ok(outcome))
            }
            Err(RecvTimeoutError::Timeout) => Err(self),
            Err(RecvTimeoutError::Disconnected) => {
                join_worker(self.worker);
                Ok(Err(unreported()))
            }
        }
    }
}

fn join_worker(worker: JoinHandle<()>) {
    if worker.join().is_err() {
        warn!("k-mer ingestion worker panicked");
    }
}

fn unreported() -> KmerError {
    KmerError::Source("ingestion worker exited without reporting".into())
}

pub fn spawn_ingest<R>(mut profile: Profile, records: Receiver<Feed<R>>) -> IngestHandle
where
    R: SequenceRecord + Send + 'static,
{
    let (done_tx, done_rx) = channel::bounded::<IngestOutcome>(1);
    let worker = thread::spawn(move || {
        let result = profile.ingest(feed_items(records));
        let _ = done_tx.send(IngestOutcome { profile, result });
    });
    IngestHandle {
        done: done_rx,
        worker,
    }
}

fn feed_items<R>(records: Receiver<Feed<R>>) -> impl Iterator<Item = Result<R>> {
    let mut finished = false;
    std::iter::from_fn(move || {
        if finished {
            return None;
        }
        match records.recv() {
            Ok(Feed::Record(r)) => Some(Ok(r)),
            Ok(Feed::Error(e)) => {
                finished = true;
                Some(Err(e))
            }
            Ok(Feed::Done) => {
                finished = true;
                None
            }
            Err(_) => {
                finished = true;
                Some(Err(KmerError::Source(
                    "record source closed before signalling completion".into(),
                )))
            }
        }
    })
}
