//! Integration tests for the statistics and comparison APIs.

use kira_kmer::{KmerError, Profile, euclidean_distance, pearson_correlation};
use proptest::prelude::*;

fn trained(k: usize) -> Profile {
    let mut p = Profile::dna(k).unwrap();
    p.ingest_all([
        "ACGTTGCATGCATGCAACGT",
        "TTGACCGTAGGCTAACGTTA",
        "GGGCATCGATCGATTACAGA",
    ])
    .unwrap();
    p
}

#[test]
fn test_probability_is_bounded() {
    let p = trained(3);
    let prob = p.probability_of_sequence(b"ACGTTGCA").unwrap();
    assert!((0.0..=1.0).contains(&prob));
    assert!(prob > 0.0);
}

#[test]
fn test_log_likelihood_matches_probability_chain() {
    let p = trained(2);
    let seq = b"GCATGCA";
    let prob = p.probability_of_sequence(seq).unwrap();
    let ll = p.log_likelihood(seq).unwrap().expect("every step was observed");
    let first = p.frequency(&seq[..2]).unwrap();
    assert!((prob.ln() - (first.ln() + ll)).abs() < 1e-9);
}

#[test]
fn test_log_likelihood_undefined_is_distinct() {
    let p = trained(3);
    // "CCC" never occurs in the training set
    assert_eq!(p.log_likelihood(b"ACCCA").unwrap(), None);
    assert_eq!(p.probability_of_sequence(b"ACCCA").unwrap(), 0.0);
}

#[test]
fn test_comparator_properties() {
    let a = [1, 2, 3, 4];
    assert_eq!(euclidean_distance(&a, &a).unwrap(), 0.0);
    assert_eq!(euclidean_distance(&a, &[7, 14, 21, 28]).unwrap(), 0.0);
    assert_eq!(pearson_correlation(&a, &a).unwrap(), 1.0);
    assert_eq!(pearson_correlation(&a, &[4, 3, 2, 1]).unwrap(), -1.0);
    assert_eq!(
        euclidean_distance(&a, &[1, 2]),
        Err(KmerError::DimensionMismatch { left: 4, right: 2 })
    );
}

#[test]
fn test_profiles_compare_to_themselves() {
    let p = trained(2);
    let q = trained(2);
    assert_eq!(p.euclidean_distance(&q).unwrap(), 0.0);
    assert_eq!(p.pearson_correlation(&q).unwrap(), 1.0);
    let r = trained(3);
    assert!(matches!(
        p.euclidean_distance(&r),
        Err(KmerError::DimensionMismatch { .. })
    ));
}

proptest! {
    #[test]
    fn non_adjacent_transitions_are_zero(
        a in "[ACGT]{2,6}",
        b in "[ACGT]{2,6}",
    ) {
        let k = a.len().min(b.len());
        let (a, b) = (&a[..k], &b[..k]);
        prop_assume!(a[1..] != b[..k - 1]);
        let p = trained(k);
        prop_assert_eq!(p.transition_probability(a.as_bytes(), b.as_bytes()).unwrap(), 0.0);
    }

    #[test]
    fn transitions_are_probabilities(a in "[ACGT]{3}", c in "[ACGT]") {
        let p = trained(3);
        let b = format!("{}{}", &a[1..], c);
        let t = p.transition_probability(a.as_bytes(), b.as_bytes()).unwrap();
        prop_assert!((0.0..=1.0).contains(&t));
    }

    #[test]
    fn scaling_keeps_distance_zero(v in prop::collection::vec(1u32..1000, 1..32), s in 1u32..50) {
        let scaled: Vec<u32> = v.iter().map(|&x| x * s).collect();
        prop_assert_eq!(euclidean_distance(&v, &scaled).unwrap(), 0.0);
    }
}
