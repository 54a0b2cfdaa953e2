//! Fixed-increment "information" model.
//!
//! Every exemplar is treated as a fair binary event, so each observation adds the same
//! surrogate entropy `-0.5 * log2(0.5)` to its category's bucket. Buckets are scaled by
//! `log2(l) / l` so that scores stay comparable across trial lengths. This is not an
//! adaptive entropy estimate.

use crate::{decide, DeciderPolicy, DecisionRecord, Result, Symbol, Threshold, Trial};

/// Entropy contributed by one exemplar of a fair binary source.
pub fn exemplar_entropy() -> f64 {
    -0.5 * 0.5_f64.log2()
}

pub fn information(
    trial: &Trial,
    threshold: Threshold,
    policy: DeciderPolicy,
) -> Result<DecisionRecord> {
    let l = trial.len() as f64;
    let scale = l.log2() / l;
    let h = exemplar_entropy();
    let (mut h_a, mut h_b) = (0.0_f64, 0.0_f64);
    for (ii, s) in trial.iter().enumerate() {
        match s {
            Symbol::A => h_a += h,
            Symbol::B => h_b += h,
        }
        if let Some(r) = decide(policy, h_a * scale, h_b * scale, threshold, ii + 1)? {
            return Ok(r);
        }
    }
    Ok(DecisionRecord::NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn t(s: &str) -> Trial {
        s.parse().unwrap()
    }

    #[test]
    fn increment_is_half_a_bit() {
        assert!((exemplar_entropy() - 0.5).abs() < 1e-15);
    }

    #[test]
    fn scores_scale_with_log_length() {
        // l = 4: scale = 0.5, so each A adds 0.25.
        let r = information(&t("AABB"), Threshold::new(0.5).unwrap(), DeciderPolicy::Absolute)
            .unwrap();
        assert_eq!(r.decision, Category::A);
        assert_eq!(r.latency, Some(2));
        assert!((r.chosen_score.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn long_balanced_prefix_can_stay_undecided() {
        // l = 8: scale = 3/8, each exemplar adds 0.1875. Four of one kind reach 0.75.
        let th = Threshold::new(0.76).unwrap();
        let r = information(&t("ABABABAB"), th, DeciderPolicy::Absolute).unwrap();
        assert_eq!(r, DecisionRecord::NEUTRAL);
        let r = information(&t("AAAAABBB"), th, DeciderPolicy::Absolute).unwrap();
        assert_eq!(r.decision, Category::A);
        assert_eq!(r.latency, Some(5));
    }
}
