//! Weekly API cost estimate.

use crate::types::{CostAssumptions, TierLadder};

/// Estimated USD cost of summarizing `decisions` decisions with `tier`.
///
/// Rates are per 1M tokens; the result is rounded to four decimals. An
/// unknown tier costs 0.0.
pub fn estimate_cost(decisions: usize, tier: &str, tiers: &TierLadder, assumptions: &CostAssumptions) -> f64 {
    let Some(tier) = tiers.get(tier) else {
        return 0.0;
    };

    let n = decisions as f64;
    let input = n * assumptions.input_tokens as f64 * tier.input_rate;
    let output = n * assumptions.output_tokens as f64 * tier.output_rate;

    round4((input + output) / 1_000_000.0)
}

/// Estimate for every tier in ladder order.
pub fn estimate_all(decisions: usize, tiers: &TierLadder, assumptions: &CostAssumptions) -> Vec<(String, f64)> {
    tiers
        .tiers()
        .iter()
        .map(|t| (t.name.clone(), estimate_cost(decisions, &t.name, tiers, assumptions)))
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(n: usize, tier: &str) -> f64 {
        estimate_cost(n, tier, &TierLadder::openai_default(), &CostAssumptions::default())
    }

    #[test]
    fn test_nano_cost() {
        // 10 * (30000 * 0.05 + 500 * 0.40) / 1e6
        assert_eq!(cost(10, "gpt-5-nano"), 0.017);
    }

    #[test]
    fn test_full_model_cost() {
        // 3 * (30000 * 1.25 + 500 * 10.0) / 1e6 = 0.1275
        assert_eq!(cost(3, "gpt-5"), 0.1275);
    }

    #[test]
    fn test_rounding_to_four_decimals() {
        // 1 * (30000 * 0.25 + 500 * 2.0) / 1e6 = 0.0085
        assert_eq!(cost(1, "gpt-5-mini"), 0.0085);
        // 1 * (30000 * 0.05 + 500 * 0.4) / 1e6 = 0.0017
        assert_eq!(cost(1, "gpt-5-nano"), 0.0017);
    }

    #[test]
    fn test_unknown_tier_is_free() {
        assert_eq!(cost(10, "gpt-4o"), 0.0);
    }

    #[test]
    fn test_zero_decisions() {
        assert_eq!(cost(0, "gpt-5"), 0.0);
    }

    #[test]
    fn test_estimate_all_keeps_ladder_order() {
        let all = estimate_all(10, &TierLadder::openai_default(), &CostAssumptions::default());
        let names: Vec<&str> = all.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["gpt-5-nano", "gpt-5-mini", "gpt-5"]);
        assert!(all[0].1 < all[2].1);
    }
}
