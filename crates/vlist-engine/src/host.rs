//! Host traits: the injected collaborators the engine drives.
//!
//! The engine never touches a real page or widget tree. The scroll
//! container, the materialized item region and the page-wide tab order are
//! all expressed as traits so hosts can wire in a DOM, a terminal grid or a
//! test fake. All offsets and sizes are main-axis pixels; [`Axis`] tells
//! the host which axis that is.

use vlist_core::VisibleRange;

/// Scroll axis of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Items stack top-to-bottom; offsets are vertical.
    #[default]
    Vertical,
    /// Items flow left-to-right; offsets are horizontal.
    Horizontal,
}

/// The scrollable container the list lives in.
///
/// Implementations report and set the scroll position along the list's
/// axis, and the viewport extent along the same axis.
pub trait Viewport {
    /// Current scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    /// Set the scroll offset. Hosts may clamp further (a native scrollbar
    /// will not exceed its content bounds).
    fn set_scroll_offset(&mut self, offset: f64);

    /// Viewport extent along the scroll axis.
    fn size(&self) -> f64;
}

/// The live region holding the materialized item slice and the two spacers.
pub trait Surface {
    /// Materialize exactly the items in `range.window` and size the two
    /// spacer elements to `range.leading` / `range.trailing`.
    ///
    /// Called only when the range actually changed (field inequality); a
    /// repeated call with an equal range means the engine is deliberately
    /// rewiring after a consistency recheck.
    fn apply_window(&mut self, range: &VisibleRange);

    /// Push authoritative heights onto the materialized elements.
    ///
    /// `heights[i]` belongs to item index `first + i`. Runs one tick after
    /// an apply so freshly inserted elements have committed layout.
    fn sync_item_heights(&mut self, first: usize, heights: &[f64]);

    /// Move input focus to the materialized item with this tab index.
    ///
    /// Returns `false` when no such element exists (e.g. a race with a
    /// pending render); the engine treats that as a silent no-op.
    fn focus_item(&mut self, tab_index: u32) -> bool;

    /// Synthesize an activation (click) on the item with this tab index.
    fn activate_item(&mut self, tab_index: u32) -> bool;

    /// Tab index of the first currently materialized item, if any.
    ///
    /// Used by the periodic consistency recheck to detect handler drift.
    fn first_materialized_tab(&self) -> Option<u32>;
}

/// Page-wide tab-order capability.
///
/// Only the materialized subset of the list exists in the page's tab order
/// at any moment, so Tab/Shift-Tab handling needs an external view of every
/// focusable element currently on the page.
pub trait TabOrder {
    /// Tab indexes of all currently visible focusable elements on the page,
    /// in any order. The navigator sorts them.
    fn visible_tab_indexes(&self) -> Vec<u32>;

    /// Move focus to the page element with this tab index.
    fn focus_tab_index(&mut self, tab_index: u32) -> bool;
}
