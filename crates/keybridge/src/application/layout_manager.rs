//! Layout lifecycle: resolution, runtime switching, and indicator feedback.
//!
//! The [`LayoutManager`] owns the active [`Layout`] and the rotation of
//! available layout names.  It resolves scan codes to output actions, cycles
//! to the next layout when asked, and drives the indicator light: a steady
//! fill in the active layout's color, plus a short flicker on every ordinary
//! key resolution as press feedback.
//!
//! Layout switching is commit-on-success: when loading the next layout's
//! resource fails, the rotation index still advances (so repeated presses of
//! the swap key eventually reach a loadable layout) but the in-memory
//! mapping is left untouched and keeps remapping.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use keybridge_core::{Layout, OutputKey, Rgb};

/// How long the indicator dims during the per-keypress flicker.
const FLICKER_DURATION: Duration = Duration::from_millis(60);

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Loads layout definitions by name from some backing store.
pub trait LayoutStore: Send {
    /// Loads the layout named `name`.
    fn load(&self, name: &str) -> Result<Layout, StoreError>;
}

/// Error type for layout store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No resource exists for the requested layout name.
    #[error("layout '{0}' not found")]
    NotFound(String),

    /// The resource exists but could not be read.
    #[error("failed to read layout '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource exists but is not a valid layout definition.
    #[error("failed to parse layout '{name}': {reason}")]
    Parse { name: String, reason: String },
}

/// An indicator light the manager drives for visual feedback.
///
/// Implementations must tolerate being called from the polling loop on every
/// keypress; they should never block beyond the flicker sleep the manager
/// itself performs.
pub trait Indicator: Send + Sync {
    /// Sets the overall brightness, `0.0` (off) to `1.0` (full).
    fn set_brightness(&self, level: f32);

    /// Fills the indicator with a solid color.
    fn fill(&self, color: Rgb);
}

// ── Resolution outcome ────────────────────────────────────────────────────────

/// What a scan code resolves to under the active layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward this output key to the sink.
    Emit(OutputKey),
    /// The reserved swap code: cycle layouts, never forward.
    LayoutSwitch,
}

// ── Manager ───────────────────────────────────────────────────────────────────

/// Error type for layout manager construction.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The configured rotation is empty.
    #[error("no layouts configured")]
    NoLayouts,

    /// The configured default layout is not part of the rotation.
    #[error("default layout '{0}' is not in the available rotation")]
    DefaultNotAvailable(String),
}

/// Owns the active layout and the rotation of available layouts.
pub struct LayoutManager {
    active: Layout,
    available: Vec<String>,
    active_index: usize,
    swap_code: u8,
    brightness: f32,
    flicker: Duration,
    store: Box<dyn LayoutStore>,
    indicator: Arc<dyn Indicator>,
}

impl LayoutManager {
    /// Creates a manager with `default` active and `available` as the
    /// rotation order.
    ///
    /// The default layout is loaded immediately.  If its resource fails to
    /// load the manager starts on an unmapped passthrough fallback and logs
    /// a warning rather than refusing to start; a later switch back to the
    /// name retries the load.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NoLayouts`] when `available` is empty, and
    /// [`LayoutError::DefaultNotAvailable`] when `default` is missing from
    /// the rotation.
    pub fn new(
        default: &str,
        available: Vec<String>,
        swap_code: u8,
        brightness: f32,
        store: Box<dyn LayoutStore>,
        indicator: Arc<dyn Indicator>,
    ) -> Result<Self, LayoutError> {
        if available.is_empty() {
            return Err(LayoutError::NoLayouts);
        }
        let active_index = available
            .iter()
            .position(|name| name == default)
            .ok_or_else(|| LayoutError::DefaultNotAvailable(default.to_string()))?;

        let mut manager = Self {
            active: Layout::passthrough(default),
            available,
            active_index,
            swap_code,
            brightness: brightness.clamp(0.0, 1.0),
            flicker: FLICKER_DURATION,
            store,
            indicator,
        };
        manager.indicator.set_brightness(manager.brightness);
        if !manager.load_active() {
            warn!(layout = default, "default layout failed to load, starting as passthrough");
            manager.indicator.fill(manager.active.indicator_color);
        }
        Ok(manager)
    }

    /// Overrides how long the per-keypress flicker holds the indicator dark.
    ///
    /// Tests pass [`Duration::ZERO`] so lookups do not sleep.
    pub fn with_flicker(mut self, duration: Duration) -> Self {
        self.flicker = duration;
        self
    }

    /// The name of the layout currently remapping keys.
    pub fn active_name(&self) -> &str {
        &self.active.name
    }

    /// The reserved scan code that cycles layouts.
    pub fn swap_code(&self) -> u8 {
        self.swap_code
    }

    /// Resolves a scan code under the active layout.
    ///
    /// The reserved swap code always resolves to [`KeyAction::LayoutSwitch`],
    /// regardless of any mapping entry for it.  Every other code flickers the
    /// indicator as feedback and resolves through the layout.
    pub fn lookup(&self, code: u8) -> KeyAction {
        if code == self.swap_code {
            return KeyAction::LayoutSwitch;
        }
        self.flicker();
        KeyAction::Emit(self.active.resolve(code))
    }

    /// Advances the rotation and activates the next layout.
    ///
    /// The rotation index always advances, wrapping past the end.  The
    /// in-memory mapping is only replaced when the next layout's resource
    /// loads successfully; on failure the previous mapping stays active
    /// under the new index so the rotation is never stuck.
    pub fn switch_to_next(&mut self) {
        self.active_index = (self.active_index + 1) % self.available.len();
        let next = self.available[self.active_index].clone();
        debug!(layout = %next, "switching layout");
        if !self.load_active() {
            warn!(
                layout = %next,
                still_active = %self.active.name,
                "layout failed to load, keeping previous mapping"
            );
        }
    }

    /// Loads the layout at `active_index` and commits it on success.
    ///
    /// Returns `false` when the load failed; the active layout is untouched
    /// in that case.
    fn load_active(&mut self) -> bool {
        let name = &self.available[self.active_index];
        match self.store.load(name) {
            Ok(layout) => {
                info!(layout = %layout.name, mapped_keys = layout.mapping.len(), "layout active");
                self.indicator.fill(layout.indicator_color);
                self.active = layout;
                true
            }
            Err(e) => {
                warn!(layout = %name, error = %e, "layout load failed");
                false
            }
        }
    }

    /// Dims the indicator briefly, then restores the configured brightness.
    fn flicker(&self) {
        self.indicator.set_brightness(0.0);
        std::thread::sleep(self.flicker);
        self.indicator.set_brightness(self.brightness);
    }
}
