//! Offset → item-index binary search over the geometry table.

use crate::model::RenderingModel;

/// Find the item whose span contains `offset`.
///
/// The offset is clamped to `[0, total_height]` before the search. An offset
/// landing exactly on the boundary between two entries resolves to the
/// **later** entry — the one not yet fully scrolled past. Zero-height entries
/// share their neighbours' boundary and follow the same rule.
///
/// O(log n), zero alloc.
///
/// # Panics
/// Panics if the model is empty; callers guard with [`RenderingModel::is_empty`].
#[must_use]
pub fn find_index_for_offset(model: &RenderingModel, offset: f64) -> usize {
    assert!(!model.is_empty(), "offset search requires a non-empty model");

    let offset = offset.clamp(0.0, model.total_height());
    let entries = model.entries();

    // Last entry whose start is at or before the offset. The first entry
    // starts at 0, so the partition point is always at least 1.
    let split = entries.partition_point(|e| e.top <= offset);
    (split - 1).min(entries.len() - 1)
}
