//! Engine assembly: owns the model and drives the hosts.
//!
//! The engine is the single writer for everything it owns. Hosts forward
//! scroll, resize, focus and key events in; the engine recomputes the
//! visible range, pushes window updates to the surface, and defers
//! post-render work (height sync, focus, scroll restoration) to the next
//! [`Engine::tick`]. All entry points take `now` from the caller so tests
//! control time.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use vlist_core::{
    Alignment, RenderingModel, ScrollSnapshot, VisibleRange, compute_range, scroll_target,
};

use crate::bridge::{ChannelRegistry, EngineEvent, EventBus, ScrollInbox, SubscriberId};
use crate::event::KeyEvent;
use crate::host::{Axis, Surface, TabOrder, Viewport};
use crate::keyboard::{FocusState, KeyboardNavigator, NavCtx};
use crate::tasks::{DeferredOp, TaskQueue};
use crate::window::WindowState;

/// How often the materialized window is checked against the surface.
const RECHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Engine construction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No viewport host was supplied.
    MissingViewport,
    /// No surface host was supplied.
    MissingSurface,
    /// Keyboard mode was enabled without a tab-order host.
    MissingTabOrder,
    /// Keyboard mode was enabled without a tab-index accessor.
    MissingTabAccessor,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingViewport => write!(f, "engine requires a viewport host"),
            Self::MissingSurface => write!(f, "engine requires a surface host"),
            Self::MissingTabOrder => write!(f, "keyboard mode requires a tab-order host"),
            Self::MissingTabAccessor => write!(f, "keyboard mode requires a tab-index accessor"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Placeholder tab order for engines without keyboard mode.
struct NoTabOrder;

impl TabOrder for NoTabOrder {
    fn visible_tab_indexes(&self) -> Vec<u32> {
        Vec::new()
    }
    fn focus_tab_index(&mut self, _tab_index: u32) -> bool {
        false
    }
}

/// Builder for [`Engine`].
///
/// A viewport and a surface are always required; keyboard mode additionally
/// needs a tab-order host and a tab-index accessor.
pub struct EngineBuilder<T> {
    viewport: Option<Box<dyn Viewport>>,
    surface: Option<Box<dyn Surface>>,
    tab_order: Option<Box<dyn TabOrder>>,
    height_of: Box<dyn Fn(&T) -> f64>,
    tab_index_of: Option<Box<dyn Fn(&T) -> Option<u32>>>,
    key_mode: bool,
    axis: Axis,
}

impl<T> EngineBuilder<T> {
    /// Start a builder with the item height accessor.
    pub fn new<H>(height_of: H) -> Self
    where
        H: Fn(&T) -> f64 + 'static,
    {
        Self {
            viewport: None,
            surface: None,
            tab_order: None,
            height_of: Box::new(height_of),
            tab_index_of: None,
            key_mode: false,
            axis: Axis::default(),
        }
    }

    /// Supply the scroll container host.
    #[must_use]
    pub fn viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Some(Box::new(viewport));
        self
    }

    /// Supply the materialized-region host.
    #[must_use]
    pub fn surface(mut self, surface: impl Surface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Supply the page-wide tab-order host (keyboard mode).
    #[must_use]
    pub fn tab_order(mut self, tab_order: impl TabOrder + 'static) -> Self {
        self.tab_order = Some(Box::new(tab_order));
        self
    }

    /// Supply the stable tab-index accessor (keyboard mode).
    #[must_use]
    pub fn tab_index_of<I>(mut self, tab_index_of: I) -> Self
    where
        I: Fn(&T) -> Option<u32> + 'static,
    {
        self.tab_index_of = Some(Box::new(tab_index_of));
        self
    }

    /// Enable keyboard navigation.
    #[must_use]
    pub fn key_mode(mut self, enabled: bool) -> Self {
        self.key_mode = enabled;
        self
    }

    /// Set the scroll axis reported to hosts.
    #[must_use]
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Validate the configuration and assemble the engine.
    pub fn build(self) -> Result<Engine<T>, ConfigError> {
        let viewport = self.viewport.ok_or(ConfigError::MissingViewport)?;
        let surface = self.surface.ok_or(ConfigError::MissingSurface)?;

        let tab_order = if self.key_mode {
            if self.tab_index_of.is_none() {
                return Err(ConfigError::MissingTabAccessor);
            }
            self.tab_order.ok_or(ConfigError::MissingTabOrder)?
        } else {
            self.tab_order.unwrap_or(Box::new(NoTabOrder))
        };

        Ok(Engine {
            viewport,
            surface,
            tab_order,
            height_of: self.height_of,
            tab_index_of: self.tab_index_of,
            key_mode: self.key_mode,
            axis: self.axis,
            model: RenderingModel::default(),
            window: WindowState::default(),
            navigator: KeyboardNavigator::default(),
            tasks: TaskQueue::default(),
            bus: EventBus::default(),
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            applying: false,
            dead: false,
            last_item_visible: false,
            last_recheck: None,
        })
    }
}

impl<T> fmt::Debug for EngineBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("key_mode", &self.key_mode)
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}

/// The windowing engine for one list instance.
pub struct Engine<T> {
    viewport: Box<dyn Viewport>,
    surface: Box<dyn Surface>,
    tab_order: Box<dyn TabOrder>,
    height_of: Box<dyn Fn(&T) -> f64>,
    tab_index_of: Option<Box<dyn Fn(&T) -> Option<u32>>>,
    key_mode: bool,
    axis: Axis,
    model: RenderingModel,
    window: WindowState,
    navigator: KeyboardNavigator,
    tasks: TaskQueue,
    bus: EventBus,
    inbox: ScrollInbox,
    applying: bool,
    dead: bool,
    last_item_visible: bool,
    last_recheck: Option<Instant>,
}

impl<T> Engine<T> {
    /// Rebuild the geometry model from a new item collection.
    ///
    /// Replace-entire-model semantics: the previous window is invalidated
    /// so the next apply always renders, and the bottom-visibility edge is
    /// re-armed so tail loading fires again for the new data.
    pub fn set_items(&mut self, items: &[T], now: Instant) {
        if self.dead {
            return;
        }
        self.model = match &self.tab_index_of {
            Some(tab_index_of) => RenderingModel::build_with_tab_indexes(
                items,
                &*self.height_of,
                |item| tab_index_of(item),
            ),
            None => RenderingModel::build(items, &*self.height_of),
        };
        tracing::debug!(
            items = self.model.len(),
            total_height = self.model.total_height(),
            "collection replaced"
        );
        self.window.invalidate();
        self.last_item_visible = false;
        self.resync(now);
    }

    /// The viewport scrolled. Ignored while the engine itself is applying
    /// a window (spacer resizes echo as scroll events on some hosts).
    pub fn handle_scroll(&mut self, now: Instant) {
        if self.dead || self.applying {
            return;
        }
        self.resync(now);
    }

    /// The viewport was resized.
    pub fn handle_resize(&mut self, now: Instant) {
        if self.dead {
            return;
        }
        self.resync(now);
    }

    /// Forward a key event to the navigator. Returns `true` when the key
    /// was consumed by a scroll move.
    pub fn handle_key(&mut self, event: KeyEvent, now: Instant) -> bool {
        if self.dead || !self.key_mode {
            return false;
        }
        let mut ctx = NavCtx {
            model: &self.model,
            viewport: &mut *self.viewport,
            surface: &mut *self.surface,
            tab_order: &mut *self.tab_order,
            tasks: &mut self.tasks,
            window: self.window.current().and_then(|r| r.window),
        };
        let moved = self.navigator.handle_key(event, now, &mut ctx);
        if moved {
            self.resync(now);
        }
        moved
    }

    /// An item was clicked.
    pub fn on_item_click(&mut self, tab_index: u32) {
        if self.dead || !self.key_mode {
            return;
        }
        self.navigator.on_item_click(tab_index, &mut self.tasks);
    }

    /// An item received host focus.
    pub fn on_item_focus(&mut self, tab_index: u32) {
        if self.dead || !self.key_mode {
            return;
        }
        let window = self.window.current().and_then(|r| r.window);
        self.navigator
            .on_item_focus(tab_index, &self.model, window, &mut self.tasks);
    }

    /// Focus landed somewhere on the page; `target` is the tab index of
    /// the newly focused element, if it has one.
    pub fn on_document_focus(&mut self, target: Option<u32>) {
        if self.dead || !self.key_mode {
            return;
        }
        self.navigator.on_document_focus(target, &self.model);
    }

    /// Scroll the item at `index` into view. Out-of-range indexes are
    /// ignored.
    pub fn scroll_to(&mut self, index: usize, alignment: Alignment, now: Instant) {
        if self.dead || index >= self.model.len() {
            return;
        }
        let target = scroll_target(&self.model, index, alignment, self.viewport.size());
        self.viewport.set_scroll_offset(target);
        self.resync(now);
    }

    /// Force a re-render of the current window even if the range is
    /// unchanged.
    pub fn refresh(&mut self, now: Instant) {
        if self.dead {
            return;
        }
        self.window.invalidate();
        self.resync(now);
    }

    /// Subscribe to engine events.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&EngineEvent) + 'static,
    {
        self.bus.subscribe(callback)
    }

    /// Remove an event subscription.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Bind this engine's scroll inbox to a named channel.
    pub fn register_channel(&self, registry: &mut ChannelRegistry, id: impl Into<String>) {
        registry.register(id, &self.inbox);
    }

    /// Advance one cooperative turn: drain inbound scroll requests, run
    /// due deferred ops, and run the periodic consistency recheck.
    pub fn tick(&mut self, now: Instant) {
        if self.dead {
            return;
        }

        let requests: Vec<_> = self.inbox.borrow_mut().drain(..).collect();
        for request in requests {
            self.scroll_to(request.index, request.alignment, now);
        }

        for op in self.tasks.drain_due() {
            match op {
                DeferredOp::SyncItemHeights => self.sync_item_heights(),
                DeferredOp::FocusItem(tab_index) => {
                    if !self.surface.focus_item(tab_index) {
                        tracing::trace!(tab_index, "focus target not materialized, skipped");
                    }
                    self.tasks.schedule(DeferredOp::ReleaseFocusGuard, 1);
                }
                DeferredOp::ReleaseFocusGuard => self.navigator.release_focus_guard(),
                DeferredOp::RestoreScroll(offset) => {
                    self.viewport.set_scroll_offset(offset);
                    self.resync(now);
                }
            }
        }

        if self.key_mode {
            match self.last_recheck {
                None => self.last_recheck = Some(now),
                Some(last) if now.duration_since(last) >= RECHECK_INTERVAL => {
                    self.last_recheck = Some(now);
                    self.recheck_consistency(now);
                }
                Some(_) => {}
            }
        }
    }

    /// Tear the engine down. Every later call becomes a no-op, pending
    /// deferred work is dropped, and any registered channel goes dead.
    pub fn unmount(&mut self) {
        self.dead = true;
        self.tasks.clear();
        self.inbox = Rc::new(RefCell::new(VecDeque::new()));
        tracing::debug!("engine unmounted");
    }

    /// The last applied visible range.
    #[must_use]
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.window.current()
    }

    /// Current focus state.
    #[must_use]
    pub fn focus_state(&self) -> FocusState {
        self.navigator.state()
    }

    /// The current geometry model.
    #[must_use]
    pub fn model(&self) -> &RenderingModel {
        &self.model
    }

    /// The scroll axis this instance was configured with.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Recompute the visible range from the live viewport and apply it.
    fn resync(&mut self, now: Instant) {
        let offset = self.viewport.scroll_offset();
        let range = compute_range(&self.model, offset, self.viewport.size());
        self.apply(range, offset, now);
    }

    fn apply(&mut self, range: VisibleRange, offset: f64, now: Instant) {
        if !self.window.accept(range) {
            return;
        }
        tracing::trace!(
            leading = range.leading,
            trailing = range.trailing,
            window = ?range.window,
            "window applied"
        );

        self.applying = true;
        self.surface.apply_window(&range);
        self.applying = false;

        // Resizing the spacers can move a native scrollbar; put the user's
        // position back on the next tick, after layout settles.
        let after = self.viewport.scroll_offset();
        if after != offset {
            self.tasks.schedule(DeferredOp::RestoreScroll(offset), 0);
        }
        if range.window.is_some() {
            self.tasks.schedule(DeferredOp::SyncItemHeights, 0);
        }

        match ScrollSnapshot::capture(&self.model, &range, offset, self.viewport.size(), now) {
            Some(snapshot) => {
                self.bus.emit(&EngineEvent::RangeChanged(snapshot));
                let visible = snapshot.last_item_visible(&self.model);
                if visible && !self.last_item_visible {
                    self.bus.emit(&EngineEvent::LastItemVisible);
                }
                self.last_item_visible = visible;
            }
            None => self.last_item_visible = false,
        }

        if self.key_mode {
            self.navigator
                .refocus_if_visible(&self.model, range.window, &mut self.tasks);
        }
    }

    fn sync_item_heights(&mut self) {
        let Some(window) = self.window.current().and_then(|r| r.window) else {
            return;
        };
        let heights: Vec<f64> = (window.first..=window.last)
            .filter_map(|i| self.model.entry(i).map(|e| e.height))
            .collect();
        self.surface.sync_item_heights(window.first, &heights);
    }

    /// Compare the surface's first materialized item against the model;
    /// a mismatch means the host rewired elements behind our back, so the
    /// window is force-reapplied.
    fn recheck_consistency(&mut self, now: Instant) {
        let Some(window) = self.window.current().and_then(|r| r.window) else {
            return;
        };
        let expected = self.model.tab_at(window.first);
        if expected.is_some() && self.surface.first_materialized_tab() != expected {
            tracing::debug!("materialized window drifted from model, reapplying");
            self.window.invalidate();
            self.resync(now);
        }
    }
}

impl<T> fmt::Debug for Engine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("items", &self.model.len())
            .field("key_mode", &self.key_mode)
            .field("axis", &self.axis)
            .field("dead", &self.dead)
            .finish_non_exhaustive()
    }
}
