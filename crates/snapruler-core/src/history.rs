//! Bounded undo/redo history of full snapshots.

use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Undo/redo stacks holding whole-state snapshots.
///
/// The caller owns the live state; `record` is called with the state as it was
/// before a mutation, and `undo`/`redo` exchange the live state with a stored one.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Undo history stack (oldest at the front).
    undo_stack: VecDeque<T>,
    /// Redo history stack.
    redo_stack: Vec<T>,
    /// Maximum undo depth.
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_limit(MAX_UNDO_HISTORY)
    }
}

impl<T> History<T> {
    /// Create a history with the default depth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history keeping at most `limit` undo states.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(limit.min(MAX_UNDO_HISTORY) + 1),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Push a pre-mutation snapshot (call before making changes).
    pub fn record(&mut self, snapshot: T) {
        self.undo_stack.push_back(snapshot);

        // Limit undo history size
        if self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }

        // A new change invalidates anything that could be redone
        self.redo_stack.clear();
    }

    /// Undo: store `current` for redo and return the state to restore.
    /// Hands `current` back as `Err` if there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Result<T, T> {
        match self.undo_stack.pop_back() {
            Some(snapshot) => {
                self.redo_stack.push(current);
                Ok(snapshot)
            }
            None => Err(current),
        }
    }

    /// Redo: store `current` for undo and return the state to restore.
    pub fn redo(&mut self, current: T) -> Result<T, T> {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                self.undo_stack.push_back(current);
                Ok(snapshot)
            }
            None => Err(current),
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
