use crate::core::error::{KmerError, Result};
use std::slice::Windows;

/// Every length-`k` substring of `seq`, left to right.
///
/// A sequence of length `n >= k` yields exactly `n - k + 1` windows; a
/// shorter one is rejected with [`KmerError::InvalidLength`]. The returned
/// iterator is `Clone`, so the same enumeration can be restarted.
pub fn kmer_windows(seq: &[u8], k: usize) -> Result<KmerWindows<'_>> {
    if k == 0 {
        return Err(KmerError::InvalidArgument("k must be a positive integer".into()));
    }
    if seq.len() < k {
        return Err(KmerError::InvalidLength { len: seq.len(), k });
    }
    Ok(KmerWindows {
        inner: seq.windows(k),
    })
}

/// `&str` flavour of [`kmer_windows`].
pub fn kmer_windows_str(seq: &str, k: usize) -> Result<impl Iterator<Item = &str> + Clone> {
    if !seq.is_ascii() {
        return Err(KmerError::InvalidSequence(
            "k-mer windows are taken over ASCII text".into(),
        ));
    }
    kmer_windows(seq.as_bytes(), k)?;
    Ok((0..=seq.len() - k).map(move |i| &seq[i..i + k]))
}

#[derive(Clone, Debug)]
pub struct KmerWindows<'a> {
    inner: Windows<'a, u8>,
}

impl<'a> Iterator for KmerWindows<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<&'a [u8]> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for KmerWindows<'_> {}
