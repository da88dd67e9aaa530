use crate::core::error::{KmerError, Result};
use std::fmt;

pub const DEFAULT_ALPHABET: &str = "ACGT";

const NO_CODE: u8 = u8::MAX;

/// An ordered set of distinct ASCII symbols, each mapped to its position.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: String,
    codes: [u8; 256],
}

impl Alphabet {
    pub fn new(letters: &str) -> Result<Self> {
        if !letters.is_ascii() {
            return Err(KmerError::InvalidArgument(format!(
                "alphabet '{letters}' must be ASCII"
            )));
        }
        if letters.len() < 2 {
            return Err(KmerError::InvalidArgument(format!(
                "alphabet '{letters}' must have at least 2 symbols"
            )));
        }
        let mut codes = [NO_CODE; 256];
        for (i, b) in letters.bytes().enumerate() {
            if codes[b as usize] != NO_CODE {
                return Err(KmerError::InvalidArgument(format!(
                    "alphabet '{letters}' repeats symbol '{}'",
                    b as char
                )));
            }
            codes[b as usize] = i as u8;
        }
        Ok(Self {
            letters: letters.to_string(),
            codes,
        })
    }

    pub fn dna() -> Self {
        let mut codes = [NO_CODE; 256];
        for (i, b) in DEFAULT_ALPHABET.bytes().enumerate() {
            codes[b as usize] = i as u8;
        }
        Self {
            letters: DEFAULT_ALPHABET.to_string(),
            codes,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn as_str(&self) -> &str {
        &self.letters
    }

    pub fn letters(&self) -> &[u8] {
        self.letters.as_bytes()
    }

    #[inline(always)]
    pub fn code(&self, symbol: u8) -> Option<u8> {
        match self.codes[symbol as usize] {
            NO_CODE => None,
            c => Some(c),
        }
    }

    #[inline(always)]
    pub fn letter(&self, code: usize) -> Option<u8> {
        self.letters.as_bytes().get(code).copied()
    }

    pub fn contains_all(&self, seq: &[u8]) -> bool {
        seq.iter().all(|&b| self.codes[b as usize] != NO_CODE)
    }

    pub fn first_foreign(&self, seq: &[u8]) -> Option<(usize, u8)> {
        seq.iter()
            .position(|&b| self.codes[b as usize] == NO_CODE)
            .map(|i| (i, seq[i]))
    }

    /// Watson-Crick partner of `symbol`, when both sides belong to the alphabet.
    pub fn complement(&self, symbol: u8) -> Option<u8> {
        self.code(symbol)?;
        let partner = pair_of(symbol)?;
        self.code(partner).map(|_| partner)
    }

    pub fn is_complement_closed(&self) -> bool {
        self.letters.bytes().all(|b| self.complement(b).is_some())
    }

    pub fn reverse_complement(&self, seq: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(seq.len());
        self.reverse_complement_into(seq, &mut out)?;
        Ok(out)
    }

    pub fn reverse_complement_into(&self, seq: &[u8], out: &mut Vec<u8>) -> Result<()> {
        out.clear();
        out.reserve(seq.len());
        for &b in seq.iter().rev() {
            match self.complement(b) {
                Some(c) => out.push(c),
                None => {
                    return Err(KmerError::InvalidSequence(format!(
                        "symbol '{}' has no complement in alphabet '{}'",
                        b as char, self.letters
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::dna()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.letters).finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)
    }
}

fn pair_of(symbol: u8) -> Option<u8> {
    match symbol {
        b'A' => Some(b'T'),
        b'T' => Some(b'A'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'N' => Some(b'N'),
        b'a' => Some(b't'),
        b't' => Some(b'a'),
        b'c' => Some(b'g'),
        b'g' => Some(b'c'),
        b'n' => Some(b'n'),
        _ => None,
    }
}
