//! Symbols, trials, and the per-trial difficulty metrics.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Largest supported trial length. Trials are indexed by `u64`, so `2^l` must fit.
pub const MAX_TRIAL_LEN: usize = 62;

/// One exemplar. `A < B`, which fixes the lexicographic enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    A,
    B,
}

impl Symbol {
    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Symbol::A => Symbol::B,
            Symbol::B => Symbol::A,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::A => 'A',
            Symbol::B => 'B',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'A' => Ok(Symbol::A),
            'B' => Ok(Symbol::B),
            other => Err(Error::InvalidSymbol(other)),
        }
    }
}

/// Check that `l` is a trial length the engine can enumerate.
pub fn validate_trial_len(l: usize) -> Result<usize> {
    if l == 0 || l % 2 != 0 || l > MAX_TRIAL_LEN {
        return Err(Error::InvalidTrialLength {
            got: l,
            max: MAX_TRIAL_LEN,
        });
    }
    Ok(l)
}

/// An immutable, fixed-length sequence of exemplars.
///
/// Ordering is lexicographic over symbols, so sorting trials of one length reproduces the
/// universe's enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Trial {
    symbols: Box<[Symbol]>,
}

impl Trial {
    /// Build a trial, rejecting odd, empty or oversized lengths.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        validate_trial_len(symbols.len())?;
        Ok(Self {
            symbols: symbols.into_boxed_slice(),
        })
    }

    /// The `index`-th trial of length `len` in lexicographic order.
    ///
    /// Bit `len - 1 - i` of `index` selects exemplar `i` (`0 → A`, `1 → B`).
    pub(crate) fn from_index(index: u64, len: usize) -> Self {
        let symbols = (0..len)
            .map(|i| {
                if (index >> (len - 1 - i)) & 1 == 0 {
                    Symbol::A
                } else {
                    Symbol::B
                }
            })
            .collect::<Vec<_>>();
        Self {
            symbols: symbols.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: trials are validated non-empty on construction.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    pub fn first(&self) -> Symbol {
        self.symbols[0]
    }

    pub fn last(&self) -> Symbol {
        self.symbols[self.symbols.len() - 1]
    }

    /// The A/B-swapped trial.
    #[must_use]
    pub fn complement(&self) -> Self {
        Self {
            symbols: self.symbols.iter().map(|s| s.complement()).collect(),
        }
    }

    /// `(countA, countB)` over the whole trial.
    pub fn counts(&self) -> (usize, usize) {
        let a = self.symbols.iter().filter(|&&s| s == Symbol::A).count();
        (a, self.symbols.len() - a)
    }

    /// Minimum Hamming distance to the two maximally ambiguous trials, `ABAB…` and `BABA…`.
    ///
    /// Low values mean hard trials; `0` means the trial is one of the alternating ones.
    pub fn hamming_to_ambiguous(&self) -> usize {
        let mut d_ab = 0usize;
        let mut d_ba = 0usize;
        for (i, &s) in self.symbols.iter().enumerate() {
            let ab = if i % 2 == 0 { Symbol::A } else { Symbol::B };
            if s != ab {
                d_ab += 1;
            }
            if s != ab.complement() {
                d_ba += 1;
            }
        }
        d_ab.min(d_ba)
    }
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in self.symbols.iter() {
            write!(f, "{}", s.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Trial {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let symbols = s
            .chars()
            .map(Symbol::from_char)
            .collect::<Result<Vec<_>>>()?;
        Trial::new(symbols)
    }
}

impl From<Trial> for String {
    fn from(t: Trial) -> Self {
        t.to_string()
    }
}

impl TryFrom<String> for Trial {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Tokens used in place of `A` and `B` when trials are written out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolEncoding {
    a: String,
    b: String,
}

impl Default for SymbolEncoding {
    fn default() -> Self {
        Self {
            a: "A".to_string(),
            b: "B".to_string(),
        }
    }
}

impl SymbolEncoding {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Result<Self> {
        let (a, b) = (a.into(), b.into());
        if a.is_empty() || b.is_empty() {
            return Err(Error::InvalidEncoding("tokens must be non-empty"));
        }
        if a == b {
            return Err(Error::InvalidEncoding("tokens must be distinct"));
        }
        Ok(Self { a, b })
    }

    /// Build from a token list; exactly two entries are required.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        match tokens {
            [a, b] => Self::new(a.as_ref(), b.as_ref()),
            _ => Err(Error::InvalidEncoding("exactly two tokens are required")),
        }
    }

    pub fn encode(&self, s: Symbol) -> &str {
        match s {
            Symbol::A => &self.a,
            Symbol::B => &self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Trial {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display_round_trip_the_text_form() {
        assert_eq!(t("AABB").to_string(), "AABB");
        assert!(matches!("AAB".parse::<Trial>(), Err(Error::InvalidTrialLength { .. })));
        assert!(matches!("".parse::<Trial>(), Err(Error::InvalidTrialLength { .. })));
        assert!(matches!("ABCA".parse::<Trial>(), Err(Error::InvalidSymbol('C'))));
    }

    #[test]
    fn from_index_is_lexicographic() {
        assert_eq!(Trial::from_index(0, 4).to_string(), "AAAA");
        assert_eq!(Trial::from_index(1, 4).to_string(), "AAAB");
        assert_eq!(Trial::from_index(6, 4).to_string(), "ABBA");
        assert_eq!(Trial::from_index(15, 4).to_string(), "BBBB");
        assert!(Trial::from_index(3, 4) < Trial::from_index(4, 4));
    }

    #[test]
    fn counts_and_complement() {
        let x = t("AABA");
        assert_eq!(x.counts(), (3, 1));
        assert_eq!(x.complement().to_string(), "BBAB");
        assert_eq!(x.complement().complement(), x);
        assert_eq!(x.first(), Symbol::A);
        assert_eq!(x.last(), Symbol::A);
    }

    #[test]
    fn hamming_to_ambiguous_references() {
        assert_eq!(t("ABAB").hamming_to_ambiguous(), 0);
        assert_eq!(t("BABA").hamming_to_ambiguous(), 0);
        assert_eq!(t("AAAA").hamming_to_ambiguous(), 2);
        assert_eq!(t("AABB").hamming_to_ambiguous(), 2);
        assert_eq!(t("ABAA").hamming_to_ambiguous(), 1);
    }

    #[test]
    fn encoding_requires_two_distinct_tokens() {
        assert!(SymbolEncoding::from_tokens(&["0", "1"]).is_ok());
        assert!(SymbolEncoding::from_tokens(&["0"]).is_err());
        assert!(SymbolEncoding::from_tokens(&["0", "1", "2"]).is_err());
        assert!(SymbolEncoding::new("x", "x").is_err());
        assert!(SymbolEncoding::new("", "x").is_err());
        let e = SymbolEncoding::new("left", "right").unwrap();
        assert_eq!(e.encode(Symbol::B), "right");
    }
}
