#![forbid(unsafe_code)]

//! Virtualized scroll-list facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the pure geometry from `vlist-core` and the stateful engine
//! from `vlist-engine`, and offers a lightweight prelude for day-to-day
//! usage.

use std::fmt;

// --- Geometry re-exports ----------------------------------------------------

pub use vlist_core::{
    Alignment, CutState, RenderEntry, RenderingModel, ScrollSnapshot, VisibleRange, Window,
    compute_range, cut_state, find_index_for_offset, scroll_target,
};

// --- Engine re-exports ------------------------------------------------------

pub use vlist_engine::{
    Axis, ChannelRegistry, Engine, EngineBuilder, EngineEvent, EventBus, FocusState, Key,
    KeyEvent, Modifiers, ScrollInbox, ScrollRequest, SubscriberId, Surface, TabOrder, Viewport,
};

// --- Errors -----------------------------------------------------------------

/// Top-level error type for vlist apps.
#[derive(Debug)]
pub enum Error {
    /// Engine construction was rejected.
    Config(vlist_engine::ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<vlist_engine::ConfigError> for Error {
    fn from(err: vlist_engine::ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for vlist APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ----------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, Axis, Engine, EngineBuilder, EngineEvent, Error, FocusState, Key, KeyEvent,
        Modifiers, RenderingModel, Result, ScrollRequest, Surface, TabOrder, Viewport,
        VisibleRange, Window,
    };

    pub use crate::{core, engine};
}

pub use vlist_core as core;
pub use vlist_engine as engine;
