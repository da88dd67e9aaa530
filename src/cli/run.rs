use crate::cli::args::{Cli, Commands, CompareArgs, CountArgs, FormatArg, ProfileArgs, ScoreArgs};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use crossbeam_channel as channel;
use kira_kmer::core::io::{MmapSource, RecordFormat};
use kira_kmer::core::score::{ScoreRow, score_records};
use kira_kmer::{Alphabet, Feed, IngestSummary, OwnedRecord, Profile, ProfileConfig, spawn_ingest};
use std::env;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const RECORD_QUEUE: usize = 1024;

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Count(args) => count(args),
        Commands::Score(args) => score(args),
        Commands::Compare(args) => compare(args),
    }
}

fn count(args: CountArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    stage(stats, "preflight", || check_input(&args.input))?;

    let t_profile = Instant::now();
    let (profile, summary) = build_profile(&args.input, &args.profile)?;
    stage_done(stats, "profile", t_profile);
    log_summary(&args.input, &profile, &summary);

    let t_write = Instant::now();
    let mut out = BufWriter::new(io::stdout().lock());
    for (kmer, count) in profile.kmers() {
        if args.all || count > 0 {
            writeln!(out, "{kmer}\t{count}")?;
        }
    }
    out.flush().context("failed to write counts")?;
    stage_done(stats, "write", t_write);

    if stats {
        info!(target: "kira_stats", total = %fmt_dur(t0.elapsed()));
    }
    Ok(())
}

fn score(args: ScoreArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    stage(stats, "preflight", || {
        check_input(&args.reference)?;
        check_input(&args.query)?;
        if args.threads == 0 {
            bail!("--threads must be >= 1");
        }
        Ok(())
    })?;

    let t_profile = Instant::now();
    let (profile, summary) = build_profile(&args.reference, &args.profile)?;
    stage_done(stats, "profile", t_profile);
    log_summary(&args.reference, &profile, &summary);

    let t_query = Instant::now();
    let query_format = record_format(args.query_format.unwrap_or(args.profile.format));
    let source = MmapSource::open(&args.query)?;
    let filter = args
        .profile
        .skip_invalid
        .then(|| RecordFilter::for_scoring(&profile));
    let mut queries = Vec::new();
    let mut skipped = 0u64;
    for record in source.records(query_format) {
        let record =
            record.with_context(|| format!("failed to read {}", args.query.display()))?;
        if filter.as_ref().is_some_and(|f| f.rejects(&record)) {
            skipped += 1;
            continue;
        }
        queries.push(record);
    }
    if skipped > 0 {
        warn!(skipped, input = %args.query.display(), "skipped invalid query records");
    }
    stage_done(stats, "queries", t_query);

    let t_score = Instant::now();
    let rows = score_records(&profile, &queries, args.threads)
        .with_context(|| format!("failed to score {}", args.query.display()))?;
    stage_done(stats, "score", t_score);

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "id\tprobability\tlog_likelihood")?;
    for row in &rows {
        writeln!(out, "{}", score_line(row))?;
    }
    out.flush().context("failed to write scores")?;

    if stats {
        info!(target: "kira_stats", total = %fmt_dur(t0.elapsed()));
    }
    Ok(())
}

fn compare(args: CompareArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    stage(stats, "preflight", || {
        check_input(&args.first)?;
        check_input(&args.second)
    })?;

    let t_profile = Instant::now();
    let (first, second) = thread::scope(|scope| {
        let a = scope.spawn(|| build_profile(&args.first, &args.profile));
        let b = scope.spawn(|| build_profile(&args.second, &args.profile));
        (join_build(a.join()), join_build(b.join()))
    });
    let (first, first_summary) = first?;
    let (second, second_summary) = second?;
    stage_done(stats, "profiles", t_profile);
    log_summary(&args.first, &first, &first_summary);
    log_summary(&args.second, &second, &second_summary);

    let distance = first
        .euclidean_distance(&second)
        .context("failed to compute Euclidean distance")?;
    let correlation = first
        .pearson_correlation(&second)
        .context("failed to compute Pearson correlation")?;

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "euclidean\t{distance}")?;
    writeln!(out, "pearson\t{correlation}")?;
    out.flush().context("failed to write comparison")?;

    if stats {
        info!(target: "kira_stats", total = %fmt_dur(t0.elapsed()));
    }
    Ok(())
}

/// Streams one input into a fresh profile: a reader thread feeds an ingestion
/// thread, and this thread blocks on the ingestion's completion signal.
fn build_profile(path: &Path, args: &ProfileArgs) -> Result<(Profile, IngestSummary)> {
    let profile = ProfileConfig::new(args.k)
        .alphabet(args.alphabet.clone())
        .strand_specific(!args.both_strands)
        .build()
        .context("invalid profile parameters")?;
    let source = MmapSource::open(path)?;
    let format = record_format(args.format);
    if !profile.strand_specific() && !profile.alphabet().is_complement_closed() {
        warn!(
            alphabet = %profile.alphabet(),
            "alphabet has unpaired symbols; records using them fail on the reverse strand"
        );
    }
    let filter = args
        .skip_invalid
        .then(|| RecordFilter::for_counting(&profile));

    let (record_tx, record_rx) = channel::bounded::<Feed<OwnedRecord>>(RECORD_QUEUE);
    let handle = spawn_ingest(profile, record_rx);

    let reader = thread::spawn(move || {
        let mut skipped = 0u64;
        for item in source.records(format) {
            let feed = match item {
                Ok(record) if filter.as_ref().is_some_and(|f| f.rejects(&record)) => {
                    skipped += 1;
                    continue;
                }
                Ok(record) => Feed::Record(record),
                Err(e) => Feed::Error(e),
            };
            let failed = matches!(feed, Feed::Error(_));
            if record_tx.send(feed).is_err() || failed {
                return skipped;
            }
        }
        let _ = record_tx.send(Feed::Done);
        skipped
    });

    let outcome = handle.wait()?;
    let skipped = reader
        .join()
        .map_err(|_| anyhow!("record reader for {} panicked", path.display()))?;
    if skipped > 0 {
        warn!(skipped, input = %path.display(), "skipped invalid records");
    }
    let summary = outcome
        .result
        .with_context(|| format!("failed to build profile from {}", path.display()))?;
    Ok((outcome.profile, summary))
}

/// `--skip-invalid`: records shorter than `min_len` or holding foreign symbols.
struct RecordFilter {
    min_len: usize,
    alphabet: Alphabet,
}

impl RecordFilter {
    fn for_counting(profile: &Profile) -> Self {
        Self {
            min_len: profile.k(),
            alphabet: profile.alphabet().clone(),
        }
    }

    // scoring needs at least one transition
    fn for_scoring(profile: &Profile) -> Self {
        Self {
            min_len: profile.k() + 1,
            alphabet: profile.alphabet().clone(),
        }
    }

    fn rejects(&self, record: &OwnedRecord) -> bool {
        record.seq.len() < self.min_len || !self.alphabet.contains_all(&record.seq)
    }
}

fn score_line(row: &ScoreRow) -> String {
    match row.log_likelihood {
        Some(ll) => format!("{}\t{}\t{}", row.name, row.probability, ll),
        None => format!("{}\t{}\tNA", row.name, row.probability),
    }
}

fn join_build(
    joined: thread::Result<Result<(Profile, IngestSummary)>>,
) -> Result<(Profile, IngestSummary)> {
    joined.map_err(|_| anyhow!("profile builder thread panicked"))?
}

fn record_format(format: FormatArg) -> RecordFormat {
    match format {
        FormatArg::Fasta => RecordFormat::Fasta,
        FormatArg::Fastq => RecordFormat::Fastq,
    }
}

fn check_input(path: &Path) -> Result<()> {
    if path.as_os_str() == "-" {
        bail!("stdin is not supported; provide a FASTA or FASTQ file path");
    }
    if !path.is_file() {
        bail!("input file not found: {}", path.display());
    }
    Ok(())
}

fn log_summary(path: &Path, profile: &Profile, summary: &IngestSummary) {
    info!(
        input = %path.display(),
        k = profile.k(),
        records = summary.records,
        kmers = summary.kmers,
        total = profile.total(),
        loaded = profile.is_loaded(),
        "profile ready"
    );
}

pub(crate) fn stats_enabled() -> bool {
    matches!(env::var("KIRA_STATS").as_deref(), Ok("1"))
}

fn stage<F>(stats: bool, name: &str, f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    let t = Instant::now();
    let res = f();
    if stats {
        info!(target: "kira_stats", stage = name, time = %fmt_dur(t.elapsed()));
    }
    res
}

fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        info!(target: "kira_stats", stage = name, time = %fmt_dur(t.elapsed()));
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_filter_boundary() {
        let profile = Profile::dna(3).unwrap();
        let filter = RecordFilter::for_counting(&profile);
        assert!(!filter.rejects(&OwnedRecord::new("r", "ACG")));
        assert!(filter.rejects(&OwnedRecord::new("r", "AC")));
        assert!(filter.rejects(&OwnedRecord::new("r", "ACNG")));
        assert!(filter.rejects(&OwnedRecord::new("r", "acg")));
    }

    #[test]
    fn scoring_filter_needs_a_transition() {
        let profile = Profile::dna(3).unwrap();
        let filter = RecordFilter::for_scoring(&profile);
        assert!(filter.rejects(&OwnedRecord::new("r", "ACG")));
        assert!(!filter.rejects(&OwnedRecord::new("r", "ACGT")));
        assert!(filter.rejects(&OwnedRecord::new("r", "ACGX")));
    }

    #[test]
    fn score_rows_render_na() {
        let row = ScoreRow {
            name: "q1".into(),
            probability: 0.25,
            log_likelihood: Some(-1.5),
        };
        assert_eq!(score_line(&row), "q1\t0.25\t-1.5");
        let row = ScoreRow {
            name: "q2".into(),
            probability: 0.0,
            log_likelihood: None,
        };
        assert_eq!(score_line(&row), "q2\t0\tNA");
    }
}
