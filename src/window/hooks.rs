//! Cancellable "before" hooks.
//!
//! Each hook kind owns a list of listeners. Raising a hook calls every
//! listener in registration order and reports whether any of them asked for
//! the operation to be cancelled.

use std::collections::BTreeMap;
use std::fmt;

use super::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookKind {
    /// Before each pointer move of a move gesture is applied.
    Move,
    /// Before each resize, including the one raised by maximize/restore.
    Resize,
    Minimize,
    Maximize,
    Restore,
    Show,
    Hide,
    Close,
    Activate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Cancel,
}

impl Propagation {
    pub fn is_cancelled(self) -> bool {
        self == Propagation::Cancel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(WindowId) -> Propagation>;

#[derive(Default)]
pub struct Hooks {
    listeners: BTreeMap<HookKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<HookKind, usize> = self
            .listeners
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("Hooks").field("listeners", &counts).finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&mut self, kind: HookKind, listener: F) -> ListenerId
    where
        F: FnMut(WindowId) -> Propagation + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                drop(list.remove(pos));
                return true;
            }
        }
        false
    }

    /// Every listener runs even after one has cancelled.
    pub fn raise(&mut self, kind: HookKind, window: WindowId) -> Propagation {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return Propagation::Continue;
        };
        let mut outcome = Propagation::Continue;
        for (_, listener) in list.iter_mut() {
            if listener(window).is_cancelled() {
                outcome = Propagation::Cancel;
            }
        }
        if outcome.is_cancelled() {
            tracing::debug!(window_id = %window, hook = ?kind, "hook cancelled");
        }
        outcome
    }

    pub fn listener_count(&self, kind: HookKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}
