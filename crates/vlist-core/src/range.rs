//! Visible-range calculation: window boundaries plus spacer sizes.
//!
//! The two spacers let the scroll container report the true total content
//! height to the host's native scrollbar without materializing offscreen
//! items — the central performance property of the subsystem.

use crate::index::find_index_for_offset;
use crate::model::RenderingModel;

/// Inclusive materialized index span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First materialized item index.
    pub first: usize,
    /// Last materialized item index (inclusive).
    pub last: usize,
}

impl Window {
    /// Number of materialized items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// A window always holds at least one item.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` falls inside the span.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.first <= index && index <= self.last
    }
}

/// The materialized window plus the sizes of the two spacer regions.
///
/// Invariant: `leading + sum(heights of items in window) + trailing ==
/// total_height` whenever the window is up to date. Re-renders are
/// suppressed by field equality over all of `leading`, `window`, `trailing`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibleRange {
    /// Height of the unmaterialized region above/before the window.
    pub leading: f64,
    /// Materialized span; `None` when the collection is empty.
    pub window: Option<Window>,
    /// Height of the unmaterialized region below/after the window.
    pub trailing: f64,
}

impl VisibleRange {
    /// The range of an empty collection: no window, zero-sized spacers.
    pub const EMPTY: Self = Self {
        leading: 0.0,
        window: None,
        trailing: 0.0,
    };

    /// First materialized index, if any.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.window.map(|w| w.first)
    }

    /// Last materialized index, if any.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.window.map(|w| w.last)
    }

    /// Whether `index` is materialized.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.window.is_some_and(|w| w.contains(index))
    }
}

/// Compute the window boundaries and spacer sizes for a scroll position.
///
/// `scroll_offset` and the derived bottom edge are clamped into the model's
/// content bounds, so a stale offset (e.g. the collection just shrank under
/// the scroll position) degrades to the last valid window instead of
/// panicking.
#[must_use]
pub fn compute_range(model: &RenderingModel, scroll_offset: f64, viewport: f64) -> VisibleRange {
    if model.is_empty() {
        return VisibleRange::EMPTY;
    }

    let total = model.total_height();
    let scroll_offset = scroll_offset.clamp(0.0, total);
    let viewport = if viewport.is_finite() && viewport > 0.0 {
        viewport
    } else {
        0.0
    };

    let (first, leading) = if scroll_offset == 0.0 {
        (0, 0.0)
    } else {
        let first = find_index_for_offset(model, scroll_offset);
        (first, model.entry(first).map_or(0.0, |e| e.top))
    };

    let bottom = scroll_offset + viewport;
    let (last, trailing) = if bottom >= total {
        (model.len() - 1, 0.0)
    } else {
        let last = find_index_for_offset(model, bottom);
        let edge = model.entry(last).map_or(total, |e| e.bottom());
        (last, total - edge)
    };

    VisibleRange {
        leading,
        window: Some(Window { first, last }),
        trailing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, height: f64) -> RenderingModel {
        let items: Vec<f64> = (0..n).map(|_| height).collect();
        RenderingModel::build(&items, |h| *h)
    }

    fn spacer_invariant(model: &RenderingModel, range: &VisibleRange) {
        let Some(w) = range.window else {
            assert_eq!(range.leading, 0.0);
            assert_eq!(range.trailing, 0.0);
            return;
        };
        let window_height: f64 = (w.first..=w.last)
            .map(|i| model.entry(i).unwrap().height)
            .sum();
        let total = range.leading + window_height + range.trailing;
        assert!(
            (total - model.total_height()).abs() < 1e-9,
            "spacer invariant violated: {total} != {}",
            model.total_height()
        );
    }

    #[test]
    fn top_of_list_viewport() {
        // 100 items of height 20, viewport 100: the bottom edge (100) lands
        // exactly on item 5's top, which the contains rule still includes.
        let model = uniform(100, 20.0);
        let range = compute_range(&model, 0.0, 100.0);
        assert_eq!(range.leading, 0.0);
        assert_eq!(range.window, Some(Window { first: 0, last: 5 }));
        assert_eq!(range.trailing, 1880.0);
        spacer_invariant(&model, &range);
    }

    #[test]
    fn scrolled_to_exact_item_boundary() {
        let model = uniform(100, 20.0);
        let range = compute_range(&model, 1000.0, 100.0);
        assert_eq!(range.first(), Some(50));
        assert_eq!(range.leading, 1000.0);
        spacer_invariant(&model, &range);
    }

    #[test]
    fn bottom_of_list_has_zero_trailing() {
        let model = uniform(100, 20.0);
        let range = compute_range(&model, 1900.0, 100.0);
        assert_eq!(range.last(), Some(99));
        assert_eq!(range.trailing, 0.0);
        spacer_invariant(&model, &range);
    }

    #[test]
    fn viewport_larger_than_content() {
        let model = uniform(3, 20.0);
        let range = compute_range(&model, 0.0, 500.0);
        assert_eq!(range.window, Some(Window { first: 0, last: 2 }));
        assert_eq!(range.leading, 0.0);
        assert_eq!(range.trailing, 0.0);
    }

    #[test]
    fn empty_model_yields_empty_range() {
        let model = RenderingModel::default();
        let range = compute_range(&model, 0.0, 100.0);
        assert_eq!(range, VisibleRange::EMPTY);
        assert_eq!(range.first(), None);
        assert!(!range.contains(0));
    }

    #[test]
    fn stale_scroll_offset_is_clamped_after_shrink() {
        // Collection shrank from 100 to 10 items while scrolled near the
        // bottom; the next compute must clamp rather than panic.
        let model = uniform(10, 20.0);
        let range = compute_range(&model, 1900.0, 100.0);
        let w = range.window.unwrap();
        assert_eq!(w.last, 9);
        assert!(w.first <= 9);
        spacer_invariant(&model, &range);
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let model = uniform(100, 20.0);
        let a = compute_range(&model, 777.0, 140.0);
        let b = compute_range(&model, 777.0, 140.0);
        assert_eq!(a, b);
    }

    #[test]
    fn mid_span_scroll_includes_partially_visible_edges() {
        let model = uniform(100, 20.0);
        // Offset 30 clips item 1; bottom edge 130 clips item 6.
        let range = compute_range(&model, 30.0, 100.0);
        assert_eq!(range.window, Some(Window { first: 1, last: 6 }));
        assert_eq!(range.leading, 20.0);
        assert_eq!(range.trailing, 2000.0 - 140.0);
        spacer_invariant(&model, &range);
    }

    #[test]
    fn degenerate_viewport_still_produces_window() {
        let model = uniform(10, 20.0);
        let range = compute_range(&model, 50.0, 0.0);
        let w = range.window.unwrap();
        assert_eq!(w.first, 2);
        assert_eq!(w.last, 2);
        spacer_invariant(&model, &range);
    }

    #[test]
    fn variable_heights_respect_invariant() {
        let heights = [5.0, 80.0, 0.0, 33.0, 12.0, 61.0, 7.0];
        let model = RenderingModel::build(&heights, |h| *h);
        for offset in [0.0, 4.0, 5.0, 84.5, 118.0, 150.0, 198.0] {
            let range = compute_range(&model, offset, 50.0);
            spacer_invariant(&model, &range);
        }
    }

    #[test]
    fn window_len_and_contains() {
        let w = Window { first: 3, last: 7 };
        assert_eq!(w.len(), 5);
        assert!(w.contains(3));
        assert!(w.contains(7));
        assert!(!w.contains(8));
        assert!(!w.contains(2));
    }
}
