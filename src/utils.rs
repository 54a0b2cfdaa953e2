//! Small numeric helpers.

/// Binomial coefficient `C(n, k)` as `f64` (multiplicative form; `0` when `k > n`).
///
/// Exact for the `n <= 61` the trial universe can produce up to `f64` rounding.
///
/// ```rust
/// use accumulate::binomial;
///
/// assert_eq!(binomial(4, 2), 6.0);
/// assert_eq!(binomial(3, 5), 0.0);
/// ```
pub fn binomial(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut c = 1.0_f64;
    for i in 0..k {
        c = c * f64::from(n - i) / f64::from(i + 1);
    }
    c
}

/// Probability that at least `need` of `n` fair coin flips come up heads.
///
/// An empty range (`need > n`) is a probability of zero, not an error.
pub fn fair_upper_tail(n: u32, need: u32) -> f64 {
    if need > n {
        return 0.0;
    }
    let hits: f64 = (need..=n).map(|k| binomial(n, k)).sum();
    hits * 0.5_f64.powi(n as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn binomial_small_values() {
        assert_eq!(binomial(0, 0), 1.0);
        assert_eq!(binomial(5, 0), 1.0);
        assert_eq!(binomial(5, 5), 1.0);
        assert_eq!(binomial(6, 3), 20.0);
        assert_eq!(binomial(10, 4), 210.0);
    }

    #[test]
    fn upper_tail_edges() {
        assert_eq!(fair_upper_tail(0, 0), 1.0);
        assert_eq!(fair_upper_tail(0, 1), 0.0);
        assert_eq!(fair_upper_tail(3, 0), 1.0);
        assert_eq!(fair_upper_tail(3, 2), 0.5);
        assert_eq!(fair_upper_tail(2, 1), 0.75);
    }

    proptest! {
        #[test]
        fn binomial_row_sums_to_power_of_two(n in 0u32..40) {
            let s: f64 = (0..=n).map(|k| binomial(n, k)).sum();
            prop_assert!((s - 2f64.powi(n as i32)).abs() <= 2f64.powi(n as i32) * 1e-12);
        }

        #[test]
        fn upper_tail_is_a_monotone_probability(n in 0u32..40, need in 0u32..45) {
            let p = fair_upper_tail(n, need);
            prop_assert!((0.0..=1.0 + 1e-12).contains(&p), "p={}", p);
            prop_assert!(fair_upper_tail(n, need + 1) <= p + 1e-12);
        }
    }
}
