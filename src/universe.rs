//! Trial sources: the exhaustive universe, a curated select set, and (feature
//! `stochastic`) a seeded sample.
//!
//! Every source is indexable, so the engine can hand each model a fresh, independent
//! cursor and the `parallel` path can shard by index range without re-deriving anything.

use std::ops::Range;

use crate::trial::validate_trial_len;
use crate::{Result, Symbol, Trial};

/// An indexable, restartable collection of trials of one length.
pub trait TrialSource: Sync {
    /// Length of every trial this source yields.
    fn trial_len(&self) -> usize;

    /// Number of trials the engine iterates.
    fn count(&self) -> usize;

    /// The trial at `index`, or `None` if `index >= count()`.
    fn trial(&self, index: usize) -> Option<Trial>;

    /// A fresh cursor over every trial, in enumeration order.
    fn cursor(&self) -> TrialCursor<'_, Self> {
        TrialCursor {
            source: self,
            range: 0..self.count(),
        }
    }

    /// A cursor over one index range (clamped to `count()`).
    fn shard(&self, range: Range<usize>) -> TrialCursor<'_, Self> {
        let end = range.end.min(self.count());
        TrialCursor {
            source: self,
            range: range.start.min(end)..end,
        }
    }
}

/// Independent iterator over a [`TrialSource`].
#[derive(Debug, Clone)]
pub struct TrialCursor<'a, S: ?Sized> {
    source: &'a S,
    range: Range<usize>,
}

impl<S: TrialSource + ?Sized> Iterator for TrialCursor<'_, S> {
    type Item = Trial;

    fn next(&mut self) -> Option<Trial> {
        let i = self.range.next()?;
        self.source.trial(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<S: TrialSource + ?Sized> ExactSizeIterator for TrialCursor<'_, S> {}

/// Every trial of length `l`, in lexicographic order (`A < B`).
///
/// Only the first half (trials starting with `A`) is visible to the engine: the second
/// half is the bitwise complement of the first and carries no new comparative information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialUniverse {
    len: usize,
}

impl TrialUniverse {
    pub fn new(len: usize) -> Result<Self> {
        Ok(Self {
            len: validate_trial_len(len)?,
        })
    }

    /// `2^l`.
    pub fn total_count(&self) -> u64 {
        1u64 << self.len
    }

    /// `2^l / 2`, the bound on engine iteration.
    pub fn half_count(&self) -> u64 {
        self.total_count() / 2
    }

    /// Iterate the full universe, both halves, in order.
    pub fn iter_all(&self) -> impl Iterator<Item = Trial> + '_ {
        (0..self.total_count()).map(move |i| Trial::from_index(i, self.len))
    }
}

impl TrialSource for TrialUniverse {
    fn trial_len(&self) -> usize {
        self.len
    }

    fn count(&self) -> usize {
        self.half_count() as usize
    }

    fn trial(&self, index: usize) -> Option<Trial> {
        ((index as u64) < self.half_count()).then(|| Trial::from_index(index as u64, self.len))
    }
}

/// A small curated trial set whose model results are easy to check by eye.
///
/// All-A, all-B, one-then-rest (both ways), half-and-half (both ways) and the two
/// alternating trials. Duplicates (which appear at `l = 2`) are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectTrials {
    len: usize,
    trials: Vec<Trial>,
}

impl SelectTrials {
    pub fn new(len: usize) -> Result<Self> {
        let l = validate_trial_len(len)?;
        let h = l / 2;
        let run = |s: Symbol, n: usize| std::iter::repeat(s).take(n);
        let alternating = |first: Symbol| {
            (0..l)
                .map(move |i| if i % 2 == 0 { first } else { first.complement() })
                .collect::<Vec<_>>()
        };
        let candidates: Vec<Vec<Symbol>> = vec![
            run(Symbol::A, l).collect(),
            run(Symbol::B, l).collect(),
            run(Symbol::B, 1).chain(run(Symbol::A, l - 1)).collect(),
            run(Symbol::A, 1).chain(run(Symbol::B, l - 1)).collect(),
            run(Symbol::A, h).chain(run(Symbol::B, h)).collect(),
            run(Symbol::B, h).chain(run(Symbol::A, h)).collect(),
            alternating(Symbol::A),
            alternating(Symbol::B),
        ];
        let mut trials: Vec<Trial> = Vec::with_capacity(candidates.len());
        for symbols in candidates {
            let t = Trial::new(symbols)?;
            if !trials.contains(&t) {
                trials.push(t);
            }
        }
        Ok(Self { len: l, trials })
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }
}

impl TrialSource for SelectTrials {
    fn trial_len(&self) -> usize {
        self.len
    }

    fn count(&self) -> usize {
        self.trials.len()
    }

    fn trial(&self, index: usize) -> Option<Trial> {
        self.trials.get(index).cloned()
    }
}

/// A seeded, duplicate-free sample of the engine-visible half of the universe.
///
/// Useful when `2^l / 2` is too large to exhaust. Same `(len, n, seed)` gives the same
/// sample, in enumeration order.
#[cfg(feature = "stochastic")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledTrials {
    universe: TrialUniverse,
    indices: Vec<u64>,
}

#[cfg(feature = "stochastic")]
impl SampledTrials {
    pub fn new(len: usize, n: usize, seed: u64) -> Result<Self> {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};
        use std::collections::BTreeSet;

        let universe = TrialUniverse::new(len)?;
        let half = universe.half_count();
        let indices: Vec<u64> = if (n as u64) >= half {
            (0..half).collect()
        } else {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut picked = BTreeSet::new();
            while picked.len() < n {
                picked.insert(rng.random_range(0..half));
            }
            picked.into_iter().collect()
        };
        Ok(Self { universe, indices })
    }
}

#[cfg(feature = "stochastic")]
impl TrialSource for SampledTrials {
    fn trial_len(&self) -> usize {
        self.universe.len
    }

    fn count(&self) -> usize {
        self.indices.len()
    }

    fn trial(&self, index: usize) -> Option<Trial> {
        self.indices
            .get(index)
            .map(|&i| Trial::from_index(i, self.universe.len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings<I: Iterator<Item = Trial>>(it: I) -> Vec<String> {
        it.map(|t| t.to_string()).collect()
    }

    #[test]
    fn universe_counts() {
        let u = TrialUniverse::new(4).unwrap();
        assert_eq!(u.total_count(), 16);
        assert_eq!(u.half_count(), 8);
        assert_eq!(u.count(), 8);
        assert_eq!(u.iter_all().count(), 16);
    }

    #[test]
    fn universe_rejects_bad_lengths() {
        assert!(TrialUniverse::new(0).is_err());
        assert!(TrialUniverse::new(3).is_err());
        assert!(TrialUniverse::new(64).is_err());
        assert!(TrialUniverse::new(62).is_ok());
    }

    #[test]
    fn half_universe_is_the_a_prefixed_trials() {
        let u = TrialUniverse::new(4).unwrap();
        let v = strings(u.cursor());
        assert_eq!(
            v,
            ["AAAA", "AAAB", "AABA", "AABB", "ABAA", "ABAB", "ABBA", "ABBB"]
        );
        // Second half is the complement of the first.
        let all: Vec<Trial> = u.iter_all().collect();
        for t in u.cursor() {
            assert!(all[8..].contains(&t.complement()));
        }
    }

    #[test]
    fn cursors_are_independent_and_restartable() {
        let u = TrialUniverse::new(6).unwrap();
        let mut c1 = u.cursor();
        c1.next();
        c1.next();
        let c2 = u.cursor();
        assert_eq!(c2.len(), 32);
        assert_eq!(strings(u.cursor()), strings(u.cursor()));
        assert_eq!(c1.len(), 30);
    }

    #[test]
    fn shards_partition_the_cursor() {
        let u = TrialUniverse::new(6).unwrap();
        let whole = strings(u.cursor());
        let mut parts = strings(u.shard(0..10));
        parts.extend(strings(u.shard(10..100)));
        assert_eq!(whole, parts);
        assert_eq!(u.shard(40..50).len(), 0);
    }

    #[test]
    fn select_trials_match_curated_list() {
        let s = SelectTrials::new(4).unwrap();
        assert_eq!(
            strings(s.cursor()),
            ["AAAA", "BBBB", "BAAA", "ABBB", "AABB", "BBAA", "ABAB", "BABA"]
        );
        let s2 = SelectTrials::new(2).unwrap();
        assert_eq!(strings(s2.cursor()), ["AA", "BB", "BA", "AB"]);
    }

    #[cfg(feature = "stochastic")]
    #[test]
    fn sampled_trials_are_seeded_sorted_and_unique() {
        let a = SampledTrials::new(10, 20, 7).unwrap();
        let b = SampledTrials::new(10, 20, 7).unwrap();
        assert_eq!(a, b);
        let v: Vec<Trial> = a.cursor().collect();
        assert_eq!(v.len(), 20);
        assert!(v.windows(2).all(|w| w[0] < w[1]));
        assert!(v.iter().all(|t| t.first() == Symbol::A));
        let all = SampledTrials::new(4, 100, 0).unwrap();
        assert_eq!(all.count(), 8);
    }
}
