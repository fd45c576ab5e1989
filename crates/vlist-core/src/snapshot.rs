//! Scroll-state snapshots carried by external notifications.

use std::time::Instant;

use crate::model::RenderingModel;
use crate::range::VisibleRange;

/// Point-in-time scroll state, emitted with range-change notifications.
///
/// "Fully visible" indices exclude items clipped by either viewport edge;
/// both are `None` when every materialized item is clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSnapshot {
    /// First materialized item index.
    pub first_virtual: usize,
    /// Last materialized item index.
    pub last_virtual: usize,
    /// First item whose bounds fit entirely within the viewport.
    pub first_fully_visible: Option<usize>,
    /// Last item whose bounds fit entirely within the viewport.
    pub last_fully_visible: Option<usize>,
    /// Leading spacer size at capture time.
    pub leading: f64,
    /// Trailing spacer size at capture time.
    pub trailing: f64,
    /// When the snapshot was taken.
    pub captured_at: Instant,
}

impl ScrollSnapshot {
    /// Capture a snapshot for the given range, or `None` for an empty window.
    #[must_use]
    pub fn capture(
        model: &RenderingModel,
        range: &VisibleRange,
        scroll_offset: f64,
        viewport: f64,
        now: Instant,
    ) -> Option<Self> {
        let window = range.window?;
        let viewport_bottom = scroll_offset + viewport;

        let mut first_fully_visible = None;
        let mut last_fully_visible = None;
        for index in window.first..=window.last {
            let Some(entry) = model.entry(index) else {
                continue;
            };
            if entry.top >= scroll_offset && entry.bottom() <= viewport_bottom {
                if first_fully_visible.is_none() {
                    first_fully_visible = Some(index);
                }
                last_fully_visible = Some(index);
            }
        }

        Some(Self {
            first_virtual: window.first,
            last_virtual: window.last,
            first_fully_visible,
            last_fully_visible,
            leading: range.leading,
            trailing: range.trailing,
            captured_at: now,
        })
    }

    /// Whether the collection's last item is materialized.
    #[must_use]
    pub fn last_item_visible(&self, model: &RenderingModel) -> bool {
        !model.is_empty() && self.last_virtual == model.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::compute_range;

    fn uniform(n: usize, height: f64) -> RenderingModel {
        let items: Vec<f64> = (0..n).map(|_| height).collect();
        RenderingModel::build(&items, |h| *h)
    }

    #[test]
    fn clipped_edges_are_excluded_from_fully_visible() {
        let model = uniform(100, 20.0);
        // Viewport [30, 130): items 1..=6 materialized, 1 and 6 clipped.
        let range = compute_range(&model, 30.0, 100.0);
        let snap = ScrollSnapshot::capture(&model, &range, 30.0, 100.0, Instant::now()).unwrap();
        assert_eq!(snap.first_virtual, 1);
        assert_eq!(snap.last_virtual, 6);
        assert_eq!(snap.first_fully_visible, Some(2));
        assert_eq!(snap.last_fully_visible, Some(5));
        assert_eq!(snap.leading, 20.0);
    }

    #[test]
    fn aligned_viewport_has_no_clipping() {
        let model = uniform(100, 20.0);
        let range = compute_range(&model, 0.0, 100.0);
        let snap = ScrollSnapshot::capture(&model, &range, 0.0, 100.0, Instant::now()).unwrap();
        assert_eq!(snap.first_fully_visible, Some(0));
        assert_eq!(snap.last_fully_visible, Some(4));
        assert!(!snap.last_item_visible(&model));
    }

    #[test]
    fn empty_range_captures_nothing() {
        let model = RenderingModel::default();
        let range = compute_range(&model, 0.0, 100.0);
        assert!(ScrollSnapshot::capture(&model, &range, 0.0, 100.0, Instant::now()).is_none());
    }

    #[test]
    fn last_item_visible_at_bottom() {
        let model = uniform(10, 20.0);
        let range = compute_range(&model, 100.0, 100.0);
        let snap = ScrollSnapshot::capture(&model, &range, 100.0, 100.0, Instant::now()).unwrap();
        assert!(snap.last_item_visible(&model));
    }

    #[test]
    fn oversized_item_leaves_no_fully_visible_entries() {
        let heights = [300.0];
        let model = RenderingModel::build(&heights, |h| *h);
        let range = compute_range(&model, 50.0, 100.0);
        let snap = ScrollSnapshot::capture(&model, &range, 50.0, 100.0, Instant::now()).unwrap();
        assert_eq!(snap.first_fully_visible, None);
        assert_eq!(snap.last_fully_visible, None);
    }
}
