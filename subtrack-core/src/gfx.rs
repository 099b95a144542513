//! Graphics engine capability interface and the prerendered-font cache.
//!
//! The session never draws anything itself: it creates a window on the
//! engine, hands the window to decoders, and asks the engine to execute
//! pending draws once per scheduler tick. Concrete engines (Wayland,
//! framebuffer, test doubles) live outside this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A render target created by a [`GfxEngine`] and handed to decoders.
pub trait GfxWindow: Send + Sync {
    /// Current drawable size in pixels.
    fn size(&self) -> (u32, u32);
}

/// The rendering backend a session drives.
pub trait GfxEngine: Send + Sync {
    /// Create a window on the engine's display.
    fn create_window(&self) -> Arc<dyn GfxWindow>;

    /// Make the window eligible for composition.
    fn attach(&self, window: &Arc<dyn GfxWindow>);

    /// Remove the window from composition.
    fn detach(&self, window: &Arc<dyn GfxWindow>);

    /// Execute all pending draw operations. Called once per scheduler
    /// tick from the render thread.
    fn execute(&self);
}

// ── FontCache ────────────────────────────────────────────────────

/// Cache key: font face plus pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub face: String,
    pub size_px: u32,
}

/// Cache of prerendered font atlases, keyed by face and size.
///
/// Shared by `Arc` between the session and the active closed-caption
/// decoder; the session allocates a fresh cache on every CC selection
/// so stale atlases from a previous service do not accumulate.
#[derive(Debug, Default)]
pub struct FontCache {
    atlases: Mutex<HashMap<FontKey, u64>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an atlas handle, rendering (and caching) it on a miss.
    pub fn get_or_render(&self, key: FontKey, render: impl FnOnce() -> u64) -> u64 {
        let mut atlases = self
            .atlases
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *atlases.entry(key).or_insert_with(render)
    }

    pub fn len(&self) -> usize {
        self.atlases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
