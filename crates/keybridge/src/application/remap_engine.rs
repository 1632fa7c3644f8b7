//! Frame processing: decode, diff, remap, emit, commit.
//!
//! The [`RemapEngine`] is the heart of the bridge.  Each polled report is
//! decoded and diffed against the last *committed* frame; the resulting
//! edges are remapped through the [`LayoutManager`] and forwarded to the
//! [`OutputSink`].  Releases are always emitted before presses so a key
//! moving between frames can never be held twice.
//!
//! Commit is all-or-nothing: the engine stores the new frame as its
//! previous state only after every emission succeeded.  When the sink
//! rejects an event the frame is abandoned mid-way and the next poll
//! re-derives the same edges against the old state, which retries the
//! emission naturally.

use std::sync::Arc;

use thiserror::Error;
use tracing::{trace, warn};

use keybridge_core::{diff, BootReport, KeyState, OutputKey};

use super::layout_manager::{KeyAction, LayoutManager};

// ── Collaborator trait ────────────────────────────────────────────────────────

/// The virtual keyboard the engine emits remapped keys on.
pub trait OutputSink: Send {
    /// Emits a key-down event.
    fn press(&self, key: OutputKey) -> Result<(), SinkError>;

    /// Emits a key-up event.
    fn release(&self, key: OutputKey) -> Result<(), SinkError>;

    /// Releases every key the sink currently considers held.
    fn release_all(&self) -> Result<(), SinkError>;
}

/// Error type for virtual keyboard emission.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The virtual device rejected the event.
    #[error("virtual keyboard write failed: {0}")]
    Device(String),
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Translates polled reports into remapped press/release events.
pub struct RemapEngine {
    /// The last committed frame.  Never contains the swap code.
    state: KeyState,
    /// Whether the swap key was down in the last committed frame.  Because
    /// the swap code is excluded from `state`, it re-diffs as a press edge
    /// on every poll while held; this flag gates the switch to the true
    /// down edge.
    swap_held: bool,
    layouts: LayoutManager,
    sink: Arc<dyn OutputSink>,
}

impl RemapEngine {
    pub fn new(layouts: LayoutManager, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            state: KeyState::empty(),
            swap_held: false,
            layouts,
            sink,
        }
    }

    /// The name of the layout currently remapping keys.
    pub fn active_layout(&self) -> &str {
        self.layouts.active_name()
    }

    /// Processes one polled report.
    ///
    /// Emission order within the frame: modifier releases, key releases,
    /// modifier presses, key presses; keys in ascending scan-code order.
    /// The swap code is swallowed — its press cycles layouts instead of
    /// emitting, and it is excluded from the committed state so no release
    /// edge for it can ever fire.
    ///
    /// # Errors
    ///
    /// Propagates [`SinkError`] from the sink.  The previous state is left
    /// uncommitted in that case; the next call retries the same edges.
    pub fn process_frame(&mut self, report: &BootReport) -> Result<(), SinkError> {
        let mut new_state = report.decode();
        let edges = diff(&self.state, &new_state);
        if edges.is_empty() {
            // Identical frames cannot contain the swap code (it is never
            // committed), so a held swap has been released by now.
            self.swap_held = false;
            return Ok(());
        }
        trace!(?edges, "frame edges");

        for modifier in &edges.released_modifiers {
            self.sink.release(modifier.output_key())?;
        }
        for &code in &edges.released_keys {
            match self.layouts.lookup(code) {
                KeyAction::Emit(OutputKey::Unknown) => {}
                KeyAction::Emit(key) => self.sink.release(key)?,
                // The swap code is never committed, so no release edge for
                // it exists; a remapped alias of it is simply dropped.
                KeyAction::LayoutSwitch => {}
            }
        }
        for modifier in &edges.pressed_modifiers {
            self.sink.press(modifier.output_key())?;
        }
        for &code in &edges.pressed_keys {
            match self.layouts.lookup(code) {
                KeyAction::Emit(OutputKey::Unknown) => {
                    warn!(code = format_args!("{code:#04x}"), "no output key for scan code, dropping");
                }
                KeyAction::Emit(key) => self.sink.press(key)?,
                // Only the down edge switches; a held swap key re-appears
                // as a press edge every poll because it is never committed.
                KeyAction::LayoutSwitch => {
                    if !self.swap_held {
                        self.layouts.switch_to_next();
                    }
                }
            }
        }

        // Commit.  The swap code must not appear in the stored frame so no
        // release edge for it can ever fire; its held/released state lives
        // in `swap_held` instead.
        self.swap_held = new_state.pressed.remove(&self.layouts.swap_code());
        self.state = new_state;
        Ok(())
    }

    /// Releases everything and forgets the held state.
    ///
    /// Called when the physical keyboard detaches or the daemon shuts down,
    /// since the device can no longer deliver its own release edges.
    pub fn release_all(&mut self) -> Result<(), SinkError> {
        self.sink.release_all()?;
        self.state = KeyState::empty();
        self.swap_held = false;
        Ok(())
    }
}
