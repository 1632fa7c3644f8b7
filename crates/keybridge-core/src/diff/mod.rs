//! Key-state edge detection between consecutive polling frames.
//!
//! Boot-protocol keyboards report *state*, not events: every report lists
//! what is currently held.  To drive a press/release output sink the daemon
//! must diff each new frame against the previous one and act only on the
//! edges.  [`diff`] is that comparison, kept pure so it can be tested
//! exhaustively without hardware; the caller commits the new [`KeyState`]
//! only after all edge-driven actions succeed.

use std::collections::BTreeSet;

use crate::report::Modifier;

/// The committed state of the most recently processed frame.
///
/// Exactly one live instance exists per remap engine.  It is replaced
/// wholesale at the end of a successful cycle and left untouched when a
/// cycle fails, so the next diff is still computed against known-good state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Modifier bitmask from the frame.
    pub modifier_mask: u8,
    /// Scan codes held in the frame.  A `BTreeSet` keeps iteration (and
    /// therefore emission order) deterministic.
    pub pressed: BTreeSet<u8>,
}

impl KeyState {
    /// An empty state: nothing held, no modifiers.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The press/release edges between two consecutive frames.
///
/// Each list is ordered deterministically: modifiers in bitmask bit order,
/// keys in ascending scan-code order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameEdges {
    /// Modifiers held now but not in the previous frame.
    pub pressed_modifiers: Vec<Modifier>,
    /// Modifiers held in the previous frame but not now.
    pub released_modifiers: Vec<Modifier>,
    /// Scan codes held now but not in the previous frame.
    pub pressed_keys: Vec<u8>,
    /// Scan codes held in the previous frame but not now.
    pub released_keys: Vec<u8>,
}

impl FrameEdges {
    /// Returns `true` when the two frames were identical.
    pub fn is_empty(&self) -> bool {
        self.pressed_modifiers.is_empty()
            && self.released_modifiers.is_empty()
            && self.pressed_keys.is_empty()
            && self.released_keys.is_empty()
    }
}

/// Computes the edges between the previous committed state and a newly
/// decoded frame.
///
/// Pure function: neither argument is modified, and calling it twice with
/// the same inputs yields the same edges.
pub fn diff(old: &KeyState, new: &KeyState) -> FrameEdges {
    let pressed_modifiers = Modifier::ALL
        .into_iter()
        .filter(|m| new.modifier_mask & m.bit() != 0 && old.modifier_mask & m.bit() == 0)
        .collect();
    let released_modifiers = Modifier::ALL
        .into_iter()
        .filter(|m| old.modifier_mask & m.bit() != 0 && new.modifier_mask & m.bit() == 0)
        .collect();

    let pressed_keys = new.pressed.difference(&old.pressed).copied().collect();
    let released_keys = old.pressed.difference(&new.pressed).copied().collect();

    FrameEdges {
        pressed_modifiers,
        released_modifiers,
        pressed_keys,
        released_keys,
    }
}
