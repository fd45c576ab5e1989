//! Tick-deferred operations.
//!
//! Post-render work (height sync, focus application, scroll restoration)
//! must wait until the host has committed layout. Rather than nesting timer
//! callbacks, the engine queues typed ops with a tick delay and drains the
//! due ones from [`Engine::tick`](crate::engine::Engine::tick). A delay of
//! 0 means "on the next tick".

/// A unit of deferred work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DeferredOp {
    /// Push model heights onto the freshly materialized elements.
    SyncItemHeights,
    /// Move input focus to the item with this tab index.
    FocusItem(u32),
    /// Release the keyboard guard that blocks input while a focus lands.
    ReleaseFocusGuard,
    /// Restore the scroll offset captured before the last apply, if the
    /// spacer resize moved it.
    RestoreScroll(f64),
}

/// FIFO queue of deferred ops with per-op tick delays.
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    pending: Vec<(u32, DeferredOp)>,
}

impl TaskQueue {
    /// Queue `op` to run after `delay_ticks` further ticks (0 = next tick).
    pub(crate) fn schedule(&mut self, op: DeferredOp, delay_ticks: u32) {
        self.pending.push((delay_ticks, op));
    }

    /// Remove and return all ops due this tick, aging the rest.
    pub(crate) fn drain_due(&mut self) -> Vec<DeferredOp> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(delay, op)| {
            if *delay == 0 {
                due.push(*op);
                false
            } else {
                *delay -= 1;
                true
            }
        });
        due
    }

    /// Drop everything (teardown).
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    /// Whether any op is queued.
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_runs_on_next_drain() {
        let mut queue = TaskQueue::default();
        queue.schedule(DeferredOp::SyncItemHeights, 0);
        assert_eq!(queue.drain_due(), vec![DeferredOp::SyncItemHeights]);
        assert!(queue.is_empty());
    }

    #[test]
    fn delayed_ops_age_across_drains() {
        let mut queue = TaskQueue::default();
        queue.schedule(DeferredOp::FocusItem(7), 1);
        assert!(queue.drain_due().is_empty());
        assert_eq!(queue.drain_due(), vec![DeferredOp::FocusItem(7)]);
    }

    #[test]
    fn due_ops_preserve_schedule_order() {
        let mut queue = TaskQueue::default();
        queue.schedule(DeferredOp::SyncItemHeights, 0);
        queue.schedule(DeferredOp::FocusItem(3), 0);
        queue.schedule(DeferredOp::ReleaseFocusGuard, 0);
        assert_eq!(
            queue.drain_due(),
            vec![
                DeferredOp::SyncItemHeights,
                DeferredOp::FocusItem(3),
                DeferredOp::ReleaseFocusGuard
            ]
        );
    }

    #[test]
    fn clear_discards_pending_work() {
        let mut queue = TaskQueue::default();
        queue.schedule(DeferredOp::RestoreScroll(40.0), 2);
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.drain_due().is_empty());
    }
}
