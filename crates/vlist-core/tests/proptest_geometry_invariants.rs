//! Property-based invariant tests for the windowing geometry.
//!
//! These verify the structural invariants that must hold for any item
//! collection and any scroll position:
//!
//! 1. Model entries are contiguous and sorted by `top`.
//! 2. Entry heights sum to `total_height`.
//! 3. Offset search lands inside a span containing the offset.
//! 4. Spacer sizes plus window heights equal `total_height`.
//! 5. Range computation is idempotent for identical inputs.
//! 6. Window bounds are ordered and in range.

use proptest::prelude::*;
use vlist_core::{RenderingModel, compute_range, find_index_for_offset};

// ── Helpers ─────────────────────────────────────────────────────────────

fn heights_strategy() -> impl Strategy<Value = Vec<f64>> {
    // Mix of zero, small and large heights, including awkward fractions.
    prop::collection::vec(
        prop_oneof![
            Just(0.0),
            (1u32..=400).prop_map(f64::from),
            (1u32..=10_000).prop_map(|v| f64::from(v) / 4.0),
        ],
        1..200,
    )
}

fn build(heights: &[f64]) -> RenderingModel {
    RenderingModel::build(heights, |h| *h)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Entries are contiguous and sorted
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn entries_contiguous(heights in heights_strategy()) {
        let model = build(&heights);
        prop_assert_eq!(model.entry(0).unwrap().top, 0.0);
        for pair in model.entries().windows(2) {
            prop_assert!(pair[0].top <= pair[1].top);
            prop_assert!((pair[0].bottom() - pair[1].top).abs() < 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Heights sum to total
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn heights_sum_to_total(heights in heights_strategy()) {
        let model = build(&heights);
        let sum: f64 = model.entries().iter().map(|e| e.height).sum();
        prop_assert!((sum - model.total_height()).abs() < 1e-6);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Offset search containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn search_result_contains_offset(
        heights in heights_strategy(),
        fraction in 0.0f64..=1.0,
    ) {
        let model = build(&heights);
        let offset = model.total_height() * fraction;
        let index = find_index_for_offset(&model, offset);
        let entry = model.entry(index).unwrap();
        prop_assert!(
            entry.contains(offset),
            "offset {} outside span [{}, {}] of index {}",
            offset, entry.top, entry.bottom(), index
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Spacer invariant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spacer_invariant(
        heights in heights_strategy(),
        fraction in 0.0f64..=1.2,
        viewport in 0.0f64..=600.0,
    ) {
        let model = build(&heights);
        let scroll = model.total_height() * fraction;
        let range = compute_range(&model, scroll, viewport);
        let w = range.window.unwrap();
        let window_height: f64 = (w.first..=w.last)
            .map(|i| model.entry(i).unwrap().height)
            .sum();
        let reconstructed = range.leading + window_height + range.trailing;
        prop_assert!(
            (reconstructed - model.total_height()).abs() < 1e-6,
            "leading {} + window {} + trailing {} != total {}",
            range.leading, window_height, range.trailing, model.total_height()
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compute_range_idempotent(
        heights in heights_strategy(),
        fraction in 0.0f64..=1.0,
        viewport in 0.0f64..=600.0,
    ) {
        let model = build(&heights);
        let scroll = model.total_height() * fraction;
        let a = compute_range(&model, scroll, viewport);
        let b = compute_range(&model, scroll, viewport);
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Window bounds ordered and in range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_bounds_valid(
        heights in heights_strategy(),
        fraction in 0.0f64..=1.5,
        viewport in 0.0f64..=600.0,
    ) {
        let model = build(&heights);
        let scroll = model.total_height() * fraction;
        let range = compute_range(&model, scroll, viewport);
        let w = range.window.unwrap();
        prop_assert!(w.first <= w.last);
        prop_assert!(w.last < model.len());
        prop_assert!(range.leading >= 0.0);
        prop_assert!(range.trailing >= 0.0);
    }
}
