//! Integration tests for profile construction and streaming ingestion.

use kira_kmer::{Alphabet, Feed, KmerError, OwnedRecord, Profile, ProfileConfig, spawn_ingest};
use pretty_assertions::assert_eq;

/// Dinucleotide counts of a reference sequence, in index order.
const REFERENCE_K2: [u32; 16] = [
    604, 609, 657, 508, 725, 693, 712, 615, 832, 872, 952, 523, 215, 571, 860, 352,
];

fn reference_profile() -> Profile {
    let mut p = Profile::dna(2).unwrap();
    for (index, &n) in REFERENCE_K2.iter().enumerate() {
        for _ in 0..n {
            p.increment(index).unwrap();
        }
    }
    p
}

#[test]
fn test_profile_size_is_alphabet_pow_k() {
    assert_eq!(Profile::dna(2).unwrap().size(), 16);
    assert_eq!(Profile::dna(3).unwrap().size(), 64);
    let p = ProfileConfig::new(2).alphabet("ACGTN").build().unwrap();
    assert_eq!(p.size(), 25);
}

#[test]
fn test_reference_totals() {
    let mut p = reference_profile();
    assert_eq!(p.total(), 0);
    let expected: u64 = REFERENCE_K2.iter().map(|&c| c as u64).sum();
    assert_eq!(expected, 10300);
    assert_eq!(p.recompute_total(), 10300);
    assert_eq!(p.recompute_total(), 10300);
    assert_eq!(p.frequency(b"AA").unwrap(), 604.0 / 10300.0);
    assert_eq!(p.count_str("TT").unwrap(), 352);
}

#[test]
fn test_reference_transition() {
    let mut p = reference_profile();
    p.recompute_total();
    // successors of "C": CA, CC, CG, CT
    let context = 725.0 + 693.0 + 712.0 + 615.0;
    let got = p.transition_probability(b"AC", b"CG").unwrap();
    assert!((got - 712.0 / context).abs() < 1e-15);
    assert_eq!(p.transition_probability(b"AC", b"GG").unwrap(), 0.0);
}

#[test]
fn test_single_update() {
    let mut p = Profile::dna(2).unwrap();
    p.update(b"AAA").unwrap();
    assert_eq!(p.count_str("AA").unwrap(), 2);
    assert_eq!(p.counts().iter().filter(|&&c| c != 0).count(), 1);
}

#[test]
fn test_update_rejects_bad_input() {
    let mut p = Profile::dna(2).unwrap();
    assert!(matches!(p.update(b"1"), Err(KmerError::InvalidSequence(_))));
    assert!(matches!(p.update(b"1111"), Err(KmerError::InvalidSequence(_))));
    assert_eq!(p.recompute_total(), 0);
}

#[test]
fn test_ingest_is_order_independent() {
    let seqs = ["ACGTTGCA", "GGGCCCAT", "TTTTACG", "CAGTCAGT"];
    let mut forward = Profile::new(3, Alphabet::dna(), false).unwrap();
    let mut backward = Profile::new(3, Alphabet::dna(), false).unwrap();
    forward.ingest_all(seqs).unwrap();
    backward.ingest_all(seqs.iter().rev().copied()).unwrap();
    assert_eq!(forward.counts(), backward.counts());
    assert_eq!(forward.total(), backward.total());
}

#[test]
fn test_both_strands_doubles_windows() {
    let mut single = Profile::dna(3).unwrap();
    let mut both = Profile::new(3, Alphabet::dna(), false).unwrap();
    single.ingest_all(["ACGTTGCAAG"]).unwrap();
    let summary = both.ingest_all(["ACGTTGCAAG"]).unwrap();
    assert_eq!(summary.kmers, 2 * single.total());
    assert_eq!(both.total(), 16);
    // reverse complement of ACG is CGT
    assert_eq!(
        both.count_str("CGT").unwrap(),
        single.count_str("CGT").unwrap() + single.count_str("ACG").unwrap()
    );
}

#[test]
fn test_threaded_profiles_are_independent() {
    let inputs = [vec!["AAAA", "ACAC"], vec!["GGGG", "TGTG", "CCCC"]];
    let handles: Vec<_> = inputs
        .iter()
        .map(|seqs| {
            let (tx, rx) = crossbeam_channel::unbounded();
            for s in seqs {
                tx.send(Feed::Record(OwnedRecord::new("", *s))).unwrap();
            }
            tx.send(Feed::Done).unwrap();
            spawn_ingest(Profile::dna(2).unwrap(), rx)
        })
        .collect();
    let totals: Vec<u64> = handles
        .into_iter()
        .map(|h| {
            let outcome = h.wait().unwrap();
            outcome.result.unwrap();
            assert!(outcome.profile.is_loaded());
            outcome.profile.total()
        })
        .collect();
    assert_eq!(totals, vec![3 + 3, 3 + 3 + 3]);
}

#[test]
fn test_completion_signal_is_selectable() {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let handle = spawn_ingest(Profile::dna(1).unwrap(), rx);
    tx.send(Feed::Record("ACGT")).unwrap();
    tx.send(Feed::Done).unwrap();
    crossbeam_channel::select! {
        recv(handle.completion()) -> outcome => {
            let outcome = outcome.unwrap();
            assert_eq!(outcome.profile.total(), 4);
            assert!(outcome.profile.is_loaded());
        }
        default(std::time::Duration::from_secs(10)) => panic!("ingestion never completed"),
    }
}
