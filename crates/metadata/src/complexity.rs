use crate::types::{Complexity, ComplexityLevel};

const ITEMS_PER_POINT: usize = 25;
const ITEMS_CAP: u32 = 40;
const DEPTH_WEIGHT: u32 = 5;
const DEPTH_CAP: u32 = 30;
const FEATURE_WEIGHT: u32 = 3;
const FEATURE_CAP: u32 = 30;

const HIGH_THRESHOLD: u32 = 50;
const MEDIUM_THRESHOLD: u32 = 20;

fn saturating(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Score a configuration from its item count, nesting depth and number of
/// distinct features. Each term is capped, so the score stays in `0..=100`.
pub fn assess(config_items: usize, max_depth: usize, features: usize) -> Complexity {
    let contributions = [
        (
            "config_items",
            saturating(config_items / ITEMS_PER_POINT).min(ITEMS_CAP),
        ),
        (
            "nesting_depth",
            saturating(max_depth)
                .saturating_mul(DEPTH_WEIGHT)
                .min(DEPTH_CAP),
        ),
        (
            "feature_diversity",
            saturating(features)
                .saturating_mul(FEATURE_WEIGHT)
                .min(FEATURE_CAP),
        ),
    ];

    let score: u32 = contributions.iter().map(|(_, points)| points).sum();
    let level = if score >= HIGH_THRESHOLD {
        ComplexityLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        ComplexityLevel::Medium
    } else {
        ComplexityLevel::Low
    };
    let factors = contributions
        .iter()
        .filter(|(_, points)| *points > 0)
        .map(|(label, _)| label.to_string())
        .collect();

    Complexity {
        score,
        level,
        factors,
    }
}
