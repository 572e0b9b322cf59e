use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default bound on the number of undo steps
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// A value cell with bounded, linear undo/redo.
///
/// Every accepted change pushes the previous value onto `past`. Setting a
/// value equal to the current one records nothing. Snapshots are compared
/// with `PartialEq`, so freshly rebuilt but identical values are still
/// recognized as unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History<T> {
    /// Oldest first
    past: VecDeque<T>,
    current: T,
    /// Nearest redo first
    future: VecDeque<T>,
    max_history: usize,
}

impl<T: Clone + PartialEq> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_max_history(initial, DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_history(initial: T, max_history: usize) -> Self {
        History {
            past: VecDeque::new(),
            current: initial,
            future: VecDeque::new(),
            max_history,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn past(&self) -> &VecDeque<T> {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<T> {
        &self.future
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Change the bound, evicting the oldest entries if it shrank
    pub fn set_max_history(&mut self, max_history: usize) {
        self.max_history = max_history;
        self.trim_past();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Commit a new value. Returns false (and leaves both stacks alone) if
    /// `next` equals the current value.
    pub fn set_state(&mut self, next: T) -> bool {
        if next == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, next);
        self.past.push_back(previous);
        self.trim_past();
        self.future.clear();
        true
    }

    /// Commit the result of applying `f` to the current value
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.current);
        self.set_state(next)
    }

    /// Step back one entry. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let undone = std::mem::replace(&mut self.current, previous);
        self.future.push_front(undone);
        true
    }

    /// Step forward one entry. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, next);
        self.past.push_back(previous);
        self.trim_past();
        true
    }

    /// Replace the current value and forget all history. Not undoable;
    /// used when loading state.
    pub fn reset(&mut self, value: T) {
        self.current = value;
        self.past.clear();
        self.future.clear();
    }

    fn trim_past(&mut self) {
        while self.past.len() > self.max_history {
            self.past.pop_front();
        }
    }
}
