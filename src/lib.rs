//! Fixed-order Markov k-mer profiles.
//!
//! A [`Profile`] counts every overlapping length-k substring of the
//! sequences fed to it, optionally including their reverse complements, in a
//! dense table indexed by the base-`|alphabet|` value of each k-mer. From a
//! completed profile the crate derives k-mer frequencies, order-(k-1)
//! transition probabilities, whole-sequence probabilities and
//! log-likelihoods, and compares two profiles by Euclidean distance and
//! Pearson correlation.
//!
//! ```
//! use kira_kmer::Profile;
//!
//! let mut profile = Profile::dna(2).unwrap();
//! profile.ingest_all(["AAAC", "ACGT"]).unwrap();
//! assert!(profile.is_loaded());
//! assert_eq!(profile.count_str("AA").unwrap(), 2);
//! assert_eq!(profile.frequency(b"AA").unwrap(), 2.0 / 6.0);
//! ```

pub mod core;

pub use crate::core::alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use crate::core::codec::KmerCodec;
pub use crate::core::compare::{euclidean_distance, pearson_correlation};
pub use crate::core::engine::{Feed, IngestHandle, IngestOutcome, IngestSummary, spawn_ingest};
pub use crate::core::error::{KmerError, Result};
pub use crate::core::profile::{Profile, ProfileConfig};
pub use crate::core::record::{OwnedRecord, RecordView, SequenceRecord};
pub use crate::core::windows::{kmer_windows, kmer_windows_str};
