use crate::core::alphabet::Alphabet;
use crate::core::error::{KmerError, Result};

/// Upper bound on the number of cells a dense profile may hold.
pub const MAX_PROFILE_CELLS: u64 = 1 << 32;

/// Bidirectional mapping between length-k symbol strings and `[0, |alphabet|^k)`.
///
/// Strings are read as base-`|alphabet|` numbers, most significant symbol
/// first. Power-of-two alphabets pack codes with shifts and masks; any other
/// size falls back to multiply and divide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KmerCodec {
    alphabet: Alphabet,
    k: usize,
    size: usize,
    bits: Option<u32>,
}

impl KmerCodec {
    pub fn new(k: usize, alphabet: Alphabet) -> Result<Self> {
        if k == 0 {
            return Err(KmerError::InvalidArgument("k must be a positive integer".into()));
        }
        let radix = alphabet.len() as u64;
        let size = u32::try_from(k)
            .ok()
            .and_then(|k32| radix.checked_pow(k32))
            .filter(|&n| n <= MAX_PROFILE_CELLS)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                KmerError::InvalidArgument(format!(
                    "{radix}^{k} k-mers exceed the profile limit of {MAX_PROFILE_CELLS} cells"
                ))
            })?;
        let bits = if alphabet.len().is_power_of_two() {
            Some(alphabet.len().trailing_zeros())
        } else {
            None
        };
        Ok(Self {
            alphabet,
            k,
            size,
            bits,
        })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn encode(&self, kmer: &[u8]) -> Result<usize> {
        if kmer.len() != self.k {
            return Err(KmerError::InvalidAlphabet(format!(
                "'{}' has length {} but k = {}",
                String::from_utf8_lossy(kmer),
                kmer.len(),
                self.k
            )));
        }
        let mut index = 0usize;
        for &b in kmer {
            let code = self.alphabet.code(b).ok_or_else(|| {
                KmerError::InvalidAlphabet(format!(
                    "'{}' contains '{}' which is not in alphabet '{}'",
                    String::from_utf8_lossy(kmer),
                    b as char,
                    self.alphabet
                ))
            })?;
            index = self.push(index, code as usize);
        }
        Ok(index)
    }

    pub fn encode_str(&self, kmer: &str) -> Result<usize> {
        self.encode(kmer.as_bytes())
    }

    pub fn decode(&self, index: usize) -> Result<String> {
        if index >= self.size {
            return Err(KmerError::InvalidIndex {
                index,
                size: self.size,
            });
        }
        let radix = self.alphabet.len();
        let mut buf = vec![0u8; self.k];
        let mut rest = index;
        for slot in buf.iter_mut().rev() {
            let digit = match self.bits {
                Some(bits) => {
                    let d = rest & (radix - 1);
                    rest >>= bits;
                    d
                }
                None => {
                    let d = rest % radix;
                    rest /= radix;
                    d
                }
            };
            *slot = self.alphabet.letter(digit).ok_or(KmerError::InvalidIndex {
                index,
                size: self.size,
            })?;
        }
        Ok(buf.into_iter().map(char::from).collect())
    }

    pub fn codes_into(&self, seq: &[u8], out: &mut Vec<u8>) -> Result<()> {
        out.clear();
        out.reserve(seq.len());
        for (i, &b) in seq.iter().enumerate() {
            match self.alphabet.code(b) {
                Some(c) => out.push(c),
                None => {
                    return Err(KmerError::InvalidSequence(format!(
                        "symbol '{}' at position {} is not in alphabet '{}'",
                        b as char, i, self.alphabet
                    )));
                }
            }
        }
        Ok(())
    }

    /// Indices of every length-k window of an already encoded sequence, left to right.
    pub fn rolling_indices<'a>(&'a self, codes: &'a [u8]) -> RollingIndices<'a> {
        RollingIndices {
            codec: self,
            codes,
            pos: 0,
            index: 0,
        }
    }

    #[inline(always)]
    fn push(&self, index: usize, code: usize) -> usize {
        match self.bits {
            Some(bits) => (index << bits) | code,
            None => index * self.alphabet.len() + code,
        }
    }

    #[inline(always)]
    fn roll(&self, index: usize, code: usize) -> usize {
        let high = self.size / self.alphabet.len();
        match self.bits {
            Some(bits) => ((index & (high - 1)) << bits) | code,
            None => (index % high) * self.alphabet.len() + code,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RollingIndices<'a> {
    codec: &'a KmerCodec,
    codes: &'a [u8],
    pos: usize,
    index: usize,
}

impl Iterator for RollingIndices<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let k = self.codec.k;
        if self.pos + k > self.codes.len() {
            return None;
        }
        self.index = if self.pos == 0 {
            self.codes[..k]
                .iter()
                .fold(0usize, |acc, &c| self.codec.push(acc, c as usize))
        } else {
            self.codec
                .roll(self.index, self.codes[self.pos + k - 1] as usize)
        };
        self.pos += 1;
        Some(self.index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.codes.len() + 1).saturating_sub(self.codec.k + self.pos);
        (n, Some(n))
    }
}

impl ExactSizeIterator for RollingIndices<'_> {}
