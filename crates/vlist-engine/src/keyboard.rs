//! Keyboard-navigation state machine.
//!
//! Focus is tracked logically by stable tab index, not by element identity:
//! the focused item may be unmounted at any moment by a scroll, so the
//! navigator remembers its tab index and re-applies focus once the item is
//! materialized again. Directional keys first run a reposition check on the
//! focused item; if it has drifted out of view the key only scrolls it back
//! and is otherwise swallowed.
//!
//! Every handled key arms a short debounce so key auto-repeat cannot outrun
//! the render/focus cycle.

use std::time::{Duration, Instant};

use vlist_core::{
    Alignment, CutState, RenderingModel, Window, cut_state, find_index_for_offset, scroll_target,
};

use crate::event::{Key, KeyEvent};
use crate::host::{Surface, TabOrder, Viewport};
use crate::tasks::{DeferredOp, TaskQueue};

/// Minimum spacing between handled key events.
pub(crate) const KEY_DEBOUNCE: Duration = Duration::from_millis(30);

/// Externally observable focus state of the list component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    /// The component does not hold input focus.
    #[default]
    Idle,
    /// An item of the list holds logical focus.
    Focused {
        /// Tab index of the focused item.
        tab_index: u32,
    },
}

/// Mutable collaborators a key dispatch is allowed to touch.
///
/// Borrowed field-by-field from the engine so the navigator never holds the
/// engine itself.
pub(crate) struct NavCtx<'a> {
    pub model: &'a RenderingModel,
    pub viewport: &'a mut dyn Viewport,
    pub surface: &'a mut dyn Surface,
    pub tab_order: &'a mut dyn TabOrder,
    pub tasks: &'a mut TaskQueue,
    pub window: Option<Window>,
}

/// The keyboard-navigation state machine.
#[derive(Debug, Default)]
pub(crate) struct KeyboardNavigator {
    component_focus: bool,
    focused_tab: Option<u32>,
    waiting_for_focus: bool,
    blocked_until: Option<Instant>,
}

impl KeyboardNavigator {
    /// Current focus state.
    pub(crate) fn state(&self) -> FocusState {
        match (self.component_focus, self.focused_tab) {
            (true, Some(tab_index)) => FocusState::Focused { tab_index },
            _ => FocusState::Idle,
        }
    }

    /// Tab index of the logically focused item, if any.
    ///
    /// Outlives component focus: a remembered tab index lets focus resume
    /// on the same item when the user tabs back into the list.
    pub(crate) fn focused_tab(&self) -> Option<u32> {
        self.focused_tab
    }

    /// Lift the guard armed when a deferred focus was scheduled.
    pub(crate) fn release_focus_guard(&mut self) {
        self.waiting_for_focus = false;
    }

    /// Handle a key event. Returns `true` when the scroll offset changed
    /// and the caller must recompute the window.
    pub(crate) fn handle_key(
        &mut self,
        event: KeyEvent,
        now: Instant,
        ctx: &mut NavCtx<'_>,
    ) -> bool {
        if self.waiting_for_focus || self.is_blocked(now) {
            return false;
        }
        let moved = self.dispatch(event, ctx);
        self.blocked_until = Some(now + KEY_DEBOUNCE);
        moved
    }

    /// An item was clicked.
    pub(crate) fn on_item_click(&mut self, tab_index: u32, tasks: &mut TaskQueue) {
        if self.focused_tab != Some(tab_index) {
            self.focused_tab = Some(tab_index);
            self.defer_focus_op(tasks, tab_index);
        }
        self.component_focus = true;
    }

    /// An item received host focus (e.g. the user tabbed into the list).
    ///
    /// When the component already held focus, or the remembered item no
    /// longer exists, the newly focused item is adopted. Otherwise focus is
    /// steered back to the remembered item.
    pub(crate) fn on_item_focus(
        &mut self,
        tab_index: u32,
        model: &RenderingModel,
        window: Option<Window>,
        tasks: &mut TaskQueue,
    ) {
        let last_virtual = window.and_then(|w| model.tab_at(w.last));
        let adopt = match self.focused_tab {
            None => true,
            Some(current) => {
                self.component_focus
                    || model.first_tab_index().is_none_or(|first| current < first)
                    || last_virtual.is_none_or(|last| current > last)
            }
        };

        if adopt {
            self.focused_tab = Some(tab_index);
        } else if let Some(current) = self.focused_tab {
            self.defer_focus_op(tasks, current);
        }
        self.component_focus = true;
    }

    /// Focus moved somewhere on the page; drop component focus when the
    /// target lies outside the list's tab-index range.
    pub(crate) fn on_document_focus(&mut self, target: Option<u32>, model: &RenderingModel) {
        let (Some(tab), Some(first), Some(last)) =
            (target, model.first_tab_index(), model.last_tab_index())
        else {
            self.component_focus = false;
            return;
        };
        if tab < first || tab > last {
            self.component_focus = false;
        }
    }

    /// Re-apply focus to the remembered item if it is materialized.
    ///
    /// Called after a window render; a scroll may have unmounted and
    /// remounted the focused element.
    pub(crate) fn refocus_if_visible(
        &mut self,
        model: &RenderingModel,
        window: Option<Window>,
        tasks: &mut TaskQueue,
    ) {
        if !self.component_focus || model.is_empty() {
            return;
        }
        let (Some(tab), Some(w)) = (self.focused_tab, window) else {
            return;
        };
        let in_window = model.tab_at(w.first).is_some_and(|first| tab >= first)
            && model.tab_at(w.last).is_some_and(|last| tab <= last);
        if in_window {
            self.defer_focus_op(tasks, tab);
        }
    }

    fn is_blocked(&self, now: Instant) -> bool {
        self.blocked_until.is_some_and(|until| now < until)
    }

    fn defer_focus_op(&mut self, tasks: &mut TaskQueue, tab_index: u32) {
        self.waiting_for_focus = true;
        tasks.schedule(DeferredOp::FocusItem(tab_index), 0);
    }

    fn move_to(&self, ctx: &mut NavCtx<'_>, index: usize, alignment: Alignment) {
        let target = scroll_target(ctx.model, index, alignment, ctx.viewport.size());
        ctx.viewport.set_scroll_offset(target);
    }

    /// Scroll the focused item back into view when it drifted out.
    ///
    /// Fully outside the window recenters it; merely clipped nudges it to
    /// the nearer edge.
    fn reposition_if_needed(&mut self, tab_index: u32, ctx: &mut NavCtx<'_>) -> bool {
        let Some(index) = ctx.model.index_for_tab(tab_index) else {
            return false;
        };
        let Some(window) = ctx.window else {
            return false;
        };

        if !window.contains(index) {
            self.move_to(ctx, index, Alignment::Center);
            return true;
        }
        match cut_state(
            ctx.model,
            index,
            ctx.viewport.scroll_offset(),
            ctx.viewport.size(),
        ) {
            CutState::Above => {
                self.move_to(ctx, index, Alignment::Start);
                true
            }
            CutState::Below => {
                self.move_to(ctx, index, Alignment::End);
                true
            }
            CutState::Visible => false,
        }
    }

    fn dispatch(&mut self, event: KeyEvent, ctx: &mut NavCtx<'_>) -> bool {
        if event.key.is_directional() && self.component_focus {
            if let Some(tab) = self.focused_tab {
                if self.reposition_if_needed(tab, ctx) {
                    return true;
                }
            }
        }

        match event.key {
            Key::Up => self.step(ctx, -1),
            Key::Down => self.step(ctx, 1),
            Key::Home => self.jump_home(ctx),
            Key::End => self.jump_end(ctx),
            Key::PageUp => self.page(ctx, -1.0),
            Key::PageDown => self.page(ctx, 1.0),
            Key::Space => {
                if let Some(tab) = self.focused_tab {
                    ctx.surface.activate_item(tab);
                }
                false
            }
            Key::Tab => {
                self.leave_along_tab_order(ctx, event.shift());
                false
            }
            Key::Escape => {
                self.component_focus = false;
                self.focused_tab = None;
                false
            }
            Key::Left | Key::Right => false,
        }
    }

    /// Move focus one item up (`direction < 0`) or down (`direction > 0`).
    fn step(&mut self, ctx: &mut NavCtx<'_>, direction: isize) -> bool {
        let Some(tab) = self.focused_tab else {
            return false;
        };

        let at_boundary = if direction < 0 {
            ctx.model.first_tab_index().is_none_or(|first| tab <= first)
        } else {
            ctx.model.last_tab_index().is_none_or(|last| tab >= last)
        };
        if at_boundary {
            return false;
        }

        let Some(index) = ctx.model.index_for_tab(tab) else {
            return false;
        };
        let next = if direction < 0 {
            index.saturating_sub(1)
        } else {
            (index + 1).min(ctx.model.len() - 1)
        };
        let Some(next_tab) = ctx.model.tab_at(next) else {
            return false;
        };
        self.focused_tab = Some(next_tab);

        let outside = ctx.window.is_none_or(|w| {
            if direction < 0 {
                next < w.first
            } else {
                next > w.last
            }
        });
        let clipped = if direction < 0 {
            CutState::Above
        } else {
            CutState::Below
        };
        let cut = cut_state(
            ctx.model,
            next,
            ctx.viewport.scroll_offset(),
            ctx.viewport.size(),
        );
        if outside || cut == clipped {
            self.move_to(ctx, next, Alignment::Center);
            return true;
        }

        self.defer_focus_op(ctx.tasks, next_tab);
        false
    }

    fn jump_home(&mut self, ctx: &mut NavCtx<'_>) -> bool {
        let Some(tab) = ctx.model.first_tab_index() else {
            return false;
        };
        self.focused_tab = Some(tab);
        self.move_to(ctx, 0, Alignment::Start);
        self.defer_focus_op(ctx.tasks, tab);
        true
    }

    fn jump_end(&mut self, ctx: &mut NavCtx<'_>) -> bool {
        let Some(tab) = ctx.model.last_tab_index() else {
            return false;
        };
        self.focused_tab = Some(tab);
        self.move_to(ctx, ctx.model.len() - 1, Alignment::End);
        self.defer_focus_op(ctx.tasks, tab);
        true
    }

    /// Move focus one viewport toward the start (`sign < 0`) or end.
    fn page(&mut self, ctx: &mut NavCtx<'_>, sign: f64) -> bool {
        let Some(tab) = self.focused_tab else {
            return false;
        };
        let Some(index) = ctx.model.index_for_tab(tab) else {
            return false;
        };
        let Some(entry) = ctx.model.entry(index) else {
            return false;
        };

        let viewport = ctx.viewport.size();
        let position = if sign < 0.0 {
            (entry.bottom() - viewport).max(0.0)
        } else {
            (entry.top + viewport).min(ctx.model.total_height())
        };
        let target = find_index_for_offset(ctx.model, position);
        let Some(target_tab) = ctx.model.tab_at(target) else {
            return false;
        };

        self.focused_tab = Some(target_tab);
        self.move_to(ctx, target, Alignment::Start);
        self.defer_focus_op(ctx.tasks, target_tab);
        true
    }

    /// Tab/Shift-Tab: hand focus to the neighboring page element along the
    /// page-wide tab order, wrapping around when the list sits at an end.
    fn leave_along_tab_order(&mut self, ctx: &mut NavCtx<'_>, backward: bool) {
        if ctx.model.is_empty() {
            return;
        }
        let mut tabs = ctx.tab_order.visible_tab_indexes();
        if tabs.is_empty() {
            return;
        }
        tabs.sort_unstable();

        let position = |tab: Option<u32>| -> isize {
            tab.and_then(|t| tabs.iter().position(|&x| x == t))
                .map_or(-1, |p| p as isize)
        };
        let first_ptr = position(ctx.window.and_then(|w| ctx.model.tab_at(w.first)));
        let last_ptr = position(ctx.window.and_then(|w| ctx.model.tab_at(w.last)));
        let end = tabs.len() as isize - 1;

        let target = if backward {
            if first_ptr > 0 {
                Some(tabs[(first_ptr - 1) as usize])
            } else if last_ptr < end {
                Some(tabs[tabs.len() - 1])
            } else {
                None
            }
        } else if last_ptr < end {
            Some(tabs[(last_ptr + 1) as usize])
        } else if first_ptr > 0 {
            Some(tabs[0])
        } else {
            None
        };

        if let Some(next) = target {
            self.component_focus = false;
            ctx.tab_order.focus_tab_index(next);
        }
    }
}
