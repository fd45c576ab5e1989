//! Last-applied window state with re-render suppression.

use vlist_core::VisibleRange;

/// Tracks the window most recently pushed to the surface.
///
/// The four-field equality check here is the primary guard against render
/// thrashing on high-frequency scroll events: a recompute that lands on an
/// identical range is swallowed before it reaches the host.
#[derive(Debug, Clone, Default)]
pub(crate) struct WindowState {
    current: Option<VisibleRange>,
}

impl WindowState {
    /// The last applied range, if any.
    pub(crate) fn current(&self) -> Option<VisibleRange> {
        self.current
    }

    /// Forget the applied range so the next accept always renders.
    ///
    /// Used after a collection change: indices in the old range may no
    /// longer exist, so equality against it is meaningless.
    pub(crate) fn invalidate(&mut self) {
        self.current = None;
    }

    /// Record `next` as current. Returns `true` when it differs from the
    /// previously applied range (i.e. the surface must re-render).
    pub(crate) fn accept(&mut self, next: VisibleRange) -> bool {
        let changed = self.current != Some(next);
        self.current = Some(next);
        changed
    }
}
