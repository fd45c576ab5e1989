#![forbid(unsafe_code)]

//! Geometry core for virtualized scroll lists.
//!
//! This crate holds the pure math of windowing: a cumulative geometry table
//! built from caller-supplied item heights, a binary-search index mapping a
//! pixel offset to an item, the visible-range calculator that sizes the two
//! invisible spacer regions, and the alignment/cut arithmetic used by
//! keyboard navigation. Everything here is synchronous, allocation-light and
//! free of host concerns; the stateful engine lives in `vlist-engine`.
//!
//! # Core invariants
//!
//! 1. Model entries are sorted by `top` and contiguous:
//!    `entry[i].top + entry[i].height == entry[i+1].top`.
//! 2. `total_height` equals the last entry's bottom edge (0 when empty).
//! 3. For any computed range, `leading + sum(heights in window) + trailing
//!    == total_height`.
//! 4. Offsets landing exactly on an entry boundary resolve to the **later**
//!    entry (the one not yet fully scrolled past).

pub mod align;
pub mod index;
pub mod model;
pub mod range;
pub mod snapshot;

pub use align::{Alignment, CutState, cut_state, scroll_target};
pub use index::find_index_for_offset;
pub use model::{RenderEntry, RenderingModel};
pub use range::{VisibleRange, Window, compute_range};
pub use snapshot::ScrollSnapshot;
