use crate::core::alphabet::{Alphabet, DEFAULT_ALPHABET};
use crate::core::codec::KmerCodec;
use crate::core::error::{KmerError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileConfig {
    pub k: usize,
    pub alphabet: String,
    pub strand_specific: bool,
}

impl ProfileConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            alphabet: DEFAULT_ALPHABET.to_string(),
            strand_specific: true,
        }
    }

    pub fn alphabet(mut self, letters: impl Into<String>) -> Self {
        self.alphabet = letters.into();
        self
    }

    pub fn strand_specific(mut self, strand_specific: bool) -> Self {
        self.strand_specific = strand_specific;
        self
    }

    pub fn build(&self) -> Result<Profile> {
        Profile::new(self.k, Alphabet::new(&self.alphabet)?, self.strand_specific)
    }
}

/// Dense k-mer count table indexed by [`KmerCodec`].
///
/// `counts` always holds exactly `|alphabet|^k` cells. `total` is a cache:
/// it is refreshed by [`Profile::recompute_total`] and by the ingestion
/// entry points, never by single-cell mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    codec: KmerCodec,
    strand_specific: bool,
    counts: Vec<u32>,
    total: u64,
    loaded: bool,
}

impl Profile {
    pub fn new(k: usize, alphabet: Alphabet, strand_specific: bool) -> Result<Self> {
        let codec = KmerCodec::new(k, alphabet)?;
        let counts = vec![0u32; codec.size()];
        let mut profile = Self {
            codec,
            strand_specific,
            counts,
            total: 0,
            loaded: false,
        };
        profile.recompute_total();
        Ok(profile)
    }

    pub fn dna(k: usize) -> Result<Self> {
        Self::new(k, Alphabet::dna(), true)
    }

    /// Wraps an existing count vector, which must have `|alphabet|^k` cells.
    pub fn from_counts(
        k: usize,
        alphabet: Alphabet,
        strand_specific: bool,
        counts: Vec<u32>,
    ) -> Result<Self> {
        let mut profile = Self::new(k, alphabet, strand_specific)?;
        if counts.len() != profile.counts.len() {
            return Err(KmerError::DimensionMismatch {
                left: profile.counts.len(),
                right: counts.len(),
            });
        }
        profile.counts = counts;
        profile.recompute_total();
        Ok(profile)
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.codec.k()
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.codec.alphabet()
    }

    pub fn codec(&self) -> &KmerCodec {
        &self.codec
    }

    pub fn strand_specific(&self) -> bool {
        self.strand_specific
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Direct write access; the cached total goes stale until recomputed.
    pub fn counts_mut(&mut self) -> &mut [u32] {
        &mut self.counts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    pub fn size(&self) -> usize {
        self.counts.len()
    }

    pub fn increment(&mut self, index: usize) -> Result<()> {
        let size = self.counts.len();
        let slot = self
            .counts
            .get_mut(index)
            .ok_or(KmerError::InvalidIndex { index, size })?;
        *slot = slot.saturating_add(1);
        Ok(())
    }

    pub(crate) fn count_codes(&mut self, codes: &[u8]) -> u64 {
        let Self { codec, counts, .. } = self;
        let mut n = 0u64;
        for index in codec.rolling_indices(codes) {
            let slot = &mut counts[index];
            *slot = slot.saturating_add(1);
            n += 1;
        }
        n
    }

    /// Sums every cell and refreshes the cached total. O(|alphabet|^k).
    pub fn recompute_total(&mut self) -> u64 {
        self.total = self.counts.iter().map(|&c| c as u64).sum();
        self.total
    }

    pub fn count(&self, kmer: &[u8]) -> Result<u32> {
        Ok(self.counts[self.codec.encode(kmer)?])
    }

    pub fn count_str(&self, kmer: &str) -> Result<u32> {
        self.count(kmer.as_bytes())
    }

    /// Counts the windows of a single sequence into a fresh vector, leaving
    /// this profile untouched. Only the given strand is counted.
    pub fn count_vector(&self, seq: &[u8]) -> Result<Vec<u32>> {
        let mut codes = Vec::new();
        self.validate(seq, &mut codes)?;
        let mut out = vec![0u32; self.counts.len()];
        for index in self.codec.rolling_indices(&codes) {
            out[index] = out[index].saturating_add(1);
        }
        Ok(out)
    }

    /// Adds the counts of a profile built with the same k, alphabet and strandedness.
    pub fn merge(&mut self, other: &Profile) -> Result<()> {
        if self.counts.len() != other.counts.len() {
            return Err(KmerError::DimensionMismatch {
                left: self.counts.len(),
                right: other.counts.len(),
            });
        }
        if self.codec != other.codec || self.strand_specific != other.strand_specific {
            return Err(KmerError::InvalidArgument(format!(
                "cannot merge k={} '{}' profile into k={} '{}' profile with different strandedness or alphabet",
                other.k(),
                other.alphabet(),
                self.k(),
                self.alphabet()
            )));
        }
        for (dst, &src) in self.counts.iter_mut().zip(&other.counts) {
            *dst = dst.saturating_add(src);
        }
        self.recompute_total();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.total = 0;
        self.loaded = false;
    }

    pub fn kmers(&self) -> impl Iterator<Item = (String, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| self.codec.decode(i).ok().map(|s| (s, c)))
    }

    pub(crate) fn validate(&self, seq: &[u8], codes: &mut Vec<u8>) -> Result<()> {
        if seq.len() < self.k() {
            return Err(KmerError::InvalidSequence(format!(
                "sequence of length {} is shorter than k = {}",
                seq.len(),
                self.k()
            )));
        }
        self.codec.codes_into(seq, codes)
    }
}
