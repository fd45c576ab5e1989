//! Geometry table built from the caller's item collection.
//!
//! The model is rebuilt in full whenever the collection changes
//! (replace-entire-model semantics): rebuild is O(n) and collection changes
//! are rare next to scroll events, so incremental patching buys nothing.
//! Items themselves never enter the model; only their heights and optional
//! tab indexes do, read through caller-supplied accessors.

use std::collections::HashMap;

/// Geometry of a single item: cumulative start offset, extent, and the
/// stable tab index used by keyboard navigation (if any).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEntry {
    /// Cumulative offset of the item's start along the scroll axis.
    pub top: f64,
    /// Extent of the item along the scroll axis.
    pub height: f64,
    /// Stable tab index, present only when the model was built with a
    /// tab-index accessor and the accessor produced one for this item.
    pub tab_index: Option<u32>,
}

impl RenderEntry {
    /// The item's end offset (`top + height`).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `offset` falls within `[top, bottom]`, boundaries inclusive.
    #[inline]
    #[must_use]
    pub fn contains(&self, offset: f64) -> bool {
        self.top <= offset && offset <= self.bottom()
    }
}

/// Ordered geometry table plus aggregate total height.
///
/// # Invariants
///
/// 1. Entries are sorted by `top` ascending.
/// 2. `entry[i].top + entry[i].height == entry[i+1].top`.
/// 3. `total_height` is the last entry's bottom edge, 0 when empty.
#[derive(Debug, Clone, Default)]
pub struct RenderingModel {
    entries: Vec<RenderEntry>,
    total_height: f64,
    tab_lookup: HashMap<u32, usize>,
}

impl RenderingModel {
    /// Build a model in one pass using only a height accessor.
    ///
    /// Heights that are non-finite or negative are treated as 0: the item
    /// occupies no space but keeps its index.
    pub fn build<T, H>(items: &[T], height_of: H) -> Self
    where
        H: Fn(&T) -> f64,
    {
        Self::build_inner(items, &height_of, None)
    }

    /// Build a model with both a height accessor and a tab-index accessor
    /// (keyboard mode).
    pub fn build_with_tab_indexes<T, H, I>(items: &[T], height_of: H, tab_index_of: I) -> Self
    where
        H: Fn(&T) -> f64,
        I: Fn(&T) -> Option<u32>,
    {
        Self::build_inner(items, &height_of, Some(&tab_index_of))
    }

    fn build_inner<T>(
        items: &[T],
        height_of: &dyn Fn(&T) -> f64,
        tab_index_of: Option<&dyn Fn(&T) -> Option<u32>>,
    ) -> Self {
        let mut entries = Vec::with_capacity(items.len());
        let mut tab_lookup = HashMap::new();
        let mut top = 0.0_f64;

        for (i, item) in items.iter().enumerate() {
            let height = sanitize_height(height_of(item));
            let tab_index = tab_index_of.and_then(|f| f(item));
            if let Some(tab) = tab_index {
                tab_lookup.insert(tab, i);
            }
            entries.push(RenderEntry {
                top,
                height,
                tab_index,
            });
            top += height;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(items = items.len(), total_height = top, "rendering model rebuilt");

        Self {
            entries,
            total_height: top,
            tab_lookup,
        }
    }

    /// Number of items in the model.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the model holds no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate height of all items (the scrollable content height).
    #[inline]
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    /// Entry at `index`, or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&RenderEntry> {
        self.entries.get(index)
    }

    /// All entries in order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[RenderEntry] {
        &self.entries
    }

    /// Item index owning `tab_index`, if the model knows it.
    #[must_use]
    pub fn index_for_tab(&self, tab_index: u32) -> Option<usize> {
        self.tab_lookup.get(&tab_index).copied()
    }

    /// Tab index of the item at `index`.
    #[must_use]
    pub fn tab_at(&self, index: usize) -> Option<u32> {
        self.entries.get(index).and_then(|e| e.tab_index)
    }

    /// Tab index of the first item.
    #[must_use]
    pub fn first_tab_index(&self) -> Option<u32> {
        self.tab_at(0)
    }

    /// Tab index of the last item.
    #[must_use]
    pub fn last_tab_index(&self) -> Option<u32> {
        self.len().checked_sub(1).and_then(|i| self.tab_at(i))
    }

    /// Clamp an item index into the valid range.
    ///
    /// Returns `None` only for an empty model.
    #[must_use]
    pub fn clamp_index(&self, index: usize) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(index.min(self.len() - 1))
        }
    }
}

/// Missing or malformed heights become 0 rather than corrupting the table.
#[inline]
fn sanitize_height(height: f64) -> f64 {
    if height.is_finite() && height > 0.0 {
        height
    } else {
        0.0
    }
}
