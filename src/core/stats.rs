//! Order-(k-1) Markov statistics over a completed profile.
//!
//! Everything here reads the cached total. After mutating counts directly,
//! call [`Profile::recompute_total`] first or the results describe the old
//! table.

use crate::core::error::{KmerError, Result};
use crate::core::profile::Profile;

impl Profile {
    /// `count(kmer) / total`, or `0.0` while the cached total is zero.
    pub fn frequency(&self, kmer: &[u8]) -> Result<f64> {
        let count = self.count(kmer)?;
        if self.total() == 0 {
            return Ok(0.0);
        }
        Ok(count as f64 / self.total() as f64)
    }

    /// Probability of stepping from `from` to `to`.
    ///
    /// Zero when the two k-mers do not overlap by k-1 symbols, or when `to`
    /// was never seen. Otherwise `count(to)` over the summed counts of every
    /// k-mer sharing `to`'s (k-1)-prefix.
    pub fn transition_probability(&self, from: &[u8], to: &[u8]) -> Result<f64> {
        self.codec().encode(from)?;
        let to_index = self.codec().encode(to)?;
        let k = self.k();
        if from[1..] != to[..k - 1] {
            return Ok(0.0);
        }
        Ok(self.step_probability(to_index))
    }

    /// Markov-chain probability of a sequence longer than k: the frequency of
    /// its first window times every transition along the window chain.
    pub fn probability_of_sequence(&self, seq: &[u8]) -> Result<f64> {
        let indices = self.chain_indices(seq)?;
        let first = self.counts()[indices[0]];
        let mut p = if self.total() == 0 {
            0.0
        } else {
            first as f64 / self.total() as f64
        };
        for &next in &indices[1..] {
            if p == 0.0 {
                break;
            }
            p *= self.step_probability(next);
        }
        Ok(p)
    }

    /// Sum of natural-log transition probabilities along the window chain.
    ///
    /// `None` when the sum is not finite, i.e. some transition had zero
    /// probability or an empty context. A finite `0.0` is returned as is.
    pub fn log_likelihood(&self, seq: &[u8]) -> Result<Option<f64>> {
        let indices = self.chain_indices(seq)?;
        let sum: f64 = indices[1..]
            .iter()
            .map(|&next| {
                let numerator = self.counts()[next] as f64;
                let denominator = self.context_total(next) as f64;
                (numerator / denominator).ln()
            })
            .sum();
        Ok(sum.is_finite().then_some(sum))
    }

    #[inline]
    fn step_probability(&self, to_index: usize) -> f64 {
        let numerator = self.counts()[to_index];
        if numerator == 0 {
            return 0.0;
        }
        numerator as f64 / self.context_total(to_index) as f64
    }

    #[inline]
    fn context_total(&self, index: usize) -> u64 {
        let radix = self.alphabet().len();
        let start = (index / radix) * radix;
        self.counts()[start..start + radix]
            .iter()
            .map(|&c| c as u64)
            .sum()
    }

    fn chain_indices(&self, seq: &[u8]) -> Result<Vec<usize>> {
        if seq.len() <= self.k() {
            return Err(KmerError::InvalidSequence(format!(
                "sequence of length {} must be longer than k = {}",
                seq.len(),
                self.k()
            )));
        }
        let mut codes = Vec::with_capacity(seq.len());
        self.validate(seq, &mut codes)?;
        Ok(self.codec().rolling_indices(&codes).collect())
    }
}
