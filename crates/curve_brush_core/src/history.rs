// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brush-local undo/redo history.
//!
//! The brush keeps its own bounded stack of curve snapshots instead of
//! pushing into the host's native undo system. Each stroke records the
//! state before and after painting; undo steps back one entry and restores
//! the curves from the entry below it.

use crate::snapshot::{RestoreReport, StrokeSnapshot};
use crate::store::CurveStore;
use std::collections::VecDeque;
use thiserror::Error;

/// Maximum undo history depth
pub const MAX_UNDO_STATES: usize = 32;

/// History errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Fewer than two entries recorded
    #[error("Nothing to undo")]
    NothingToUndo,

    /// No undone entry to re-apply
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// History statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Entries on the undo stack
    pub undo_count: usize,
    /// Entries available for redo
    pub redo_count: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Bounded stack of curve snapshots
#[derive(Debug)]
pub struct UndoHistory {
    /// Recorded states, oldest first
    entries: VecDeque<StrokeSnapshot>,
    /// States popped by undo, most recent last
    redo_stack: Vec<StrokeSnapshot>,
    /// Maximum history depth
    max_depth: usize,
}

impl UndoHistory {
    /// Create a history holding [`MAX_UNDO_STATES`] entries
    pub fn new() -> Self {
        Self::with_max_depth(MAX_UNDO_STATES)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_depth.min(MAX_UNDO_STATES) + 1),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a state, evicting the oldest entry past the depth limit.
    ///
    /// Recording a new state discards anything available for redo.
    pub fn push(&mut self, snapshot: StrokeSnapshot) {
        self.redo_stack.clear();
        self.entries.push_back(snapshot);
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }
    }

    /// Drop the current state and restore the one below it
    pub fn undo(&mut self, store: &mut dyn CurveStore) -> Result<RestoreReport> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        let current = self.entries.pop_back().ok_or(HistoryError::NothingToUndo)?;
        self.redo_stack.push(current);

        let previous = self.entries.back().ok_or(HistoryError::NothingToUndo)?;
        Ok(previous.restore(store))
    }

    /// Re-apply the most recently undone state
    pub fn redo(&mut self, store: &mut dyn CurveStore) -> Result<RestoreReport> {
        let snapshot = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        let report = snapshot.restore(store);

        self.entries.push_back(snapshot);
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }
        Ok(report)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.entries.len() >= 2
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Most recent state
    pub fn top(&self) -> Option<&StrokeSnapshot> {
        self.entries.back()
    }

    /// Recorded states, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &StrokeSnapshot> {
        self.entries.iter()
    }

    /// Number of recorded states
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no state is recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.redo_stack.clear();
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.entries.len(),
            redo_count: self.redo_stack.len(),
            max_depth: self.max_depth,
        }
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}
