#![forbid(unsafe_code)]

//! Stateful windowing engine for virtualized scroll lists.
//!
//! `vlist-core` supplies the pure geometry; this crate owns everything with
//! state or side effects: the host traits standing in for the scroll
//! container and the materialized item region, the window renderer with its
//! re-render suppression, scroll synchronization with offset restoration,
//! the keyboard-navigation state machine, the external event bridge, and
//! the tick-driven deferred task queue that replaces nested timer callbacks.
//!
//! Execution is single-threaded and cooperative: the host forwards scroll,
//! resize, focus and key events into the engine and drives
//! [`Engine::tick`] once per macrotask turn. Nothing blocks; deferred work
//! (post-render height sync, focus application, scroll restoration) runs on
//! the next tick.

pub mod bridge;
pub mod engine;
pub mod event;
pub mod host;
pub mod keyboard;
pub mod tasks;
pub mod window;

pub use bridge::{ChannelRegistry, EngineEvent, EventBus, ScrollInbox, ScrollRequest, SubscriberId};
pub use engine::{ConfigError, Engine, EngineBuilder};
pub use event::{Key, KeyEvent, Modifiers};
pub use host::{Axis, Surface, TabOrder, Viewport};
pub use keyboard::FocusState;
