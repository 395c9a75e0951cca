// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history built on graph snapshots.

use crate::edit::{EditError, GraphEdit};
use crate::graph::QcGraph;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Maximum undo history depth
const MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// The edit itself was rejected
    #[error("Edit rejected: {0}")]
    Edit(#[from] EditError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Serialized graph state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Serialized graph
    pub data: Vec<u8>,
}

impl StateSnapshot {
    /// Snapshot a graph
    pub fn capture(graph: &QcGraph) -> Result<Self> {
        Ok(Self {
            data: bincode::serialize(graph)?,
        })
    }

    /// Rebuild the graph stored in this snapshot
    pub fn restore(&self) -> Result<QcGraph> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// One recorded edit
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Human-readable description
    pub description: String,
    /// State before the edit (for undo)
    pub before: StateSnapshot,
    /// State after the edit (for redo)
    pub after: StateSnapshot,
}

impl HistoryEntry {
    /// Memory used by both snapshots
    pub fn memory_size(&self) -> usize {
        self.before.size() + self.after.size()
    }
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    max_depth: usize,
    memory_used: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
            memory_used: 0,
        }
    }

    /// Record a committed edit
    pub fn commit(&mut self, entry: HistoryEntry) {
        self.redo_stack.clear();

        self.memory_used += entry.memory_size();
        self.undo_stack.push_back(entry);

        while self.undo_stack.len() > self.max_depth {
            if let Some(old) = self.undo_stack.pop_front() {
                self.memory_used = self.memory_used.saturating_sub(old.memory_size());
            }
        }
    }

    /// Graph state the next undo returns to.
    ///
    /// The entry stays on the undo stack until [`Self::undo`] moves it.
    pub fn undo_target(&self) -> Result<QcGraph> {
        self.undo_stack
            .back()
            .ok_or(HistoryError::NothingToUndo)?
            .before
            .restore()
    }

    /// Graph state the next redo returns to
    pub fn redo_target(&self) -> Result<QcGraph> {
        self.redo_stack
            .back()
            .ok_or(HistoryError::NothingToRedo)?
            .after
            .restore()
    }

    /// Move the most recent edit onto the redo stack
    pub fn undo(&mut self) -> Result<&HistoryEntry> {
        let entry = self.undo_stack.pop_back().ok_or(HistoryError::NothingToUndo)?;
        self.memory_used = self.memory_used.saturating_sub(entry.memory_size());
        self.redo_stack.push_back(entry);
        self.redo_stack.back().ok_or(HistoryError::NothingToUndo)
    }

    /// Move the most recently undone edit back onto the undo stack
    pub fn redo(&mut self) -> Result<&HistoryEntry> {
        let entry = self.redo_stack.pop_back().ok_or(HistoryError::NothingToRedo)?;
        self.memory_used += entry.memory_size();
        self.undo_stack.push_back(entry);
        self.undo_stack.back().ok_or(HistoryError::NothingToRedo)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Bytes held by the undo stack
    pub fn memory_used(&self) -> usize {
        self.memory_used
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.description.as_str())
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|e| e.description.as_str())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.memory_used = 0;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// A graph under editing, with undo/redo
#[derive(Debug)]
pub struct EditSession {
    graph: QcGraph,
    history: History,
}

impl EditSession {
    /// Start editing `graph` with empty history
    pub fn new(graph: QcGraph) -> Self {
        Self {
            graph,
            history: History::new(),
        }
    }

    /// The graph in its current state
    pub fn graph(&self) -> &QcGraph {
        &self.graph
    }

    /// History of this session
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply an edit and record it. Rejected edits are not recorded.
    pub fn apply(&mut self, edit: &GraphEdit) -> Result<()> {
        let before = StateSnapshot::capture(&self.graph)?;
        edit.apply(&mut self.graph)?;
        let after = StateSnapshot::capture(&self.graph)?;

        self.history.commit(HistoryEntry {
            description: edit.description(),
            before,
            after,
        });
        Ok(())
    }

    /// Revert the most recent edit.
    ///
    /// If the snapshot cannot be decoded, neither the graph nor the history
    /// changes.
    pub fn undo(&mut self) -> Result<()> {
        let restored = self.history.undo_target()?;
        let entry = self.history.undo()?;
        tracing::debug!(description = %entry.description, "undo");
        self.graph = restored;
        Ok(())
    }

    /// Re-apply the most recently undone edit
    pub fn redo(&mut self) -> Result<()> {
        let restored = self.history.redo_target()?;
        let entry = self.history.redo()?;
        tracing::debug!(description = %entry.description, "redo");
        self.graph = restored;
        Ok(())
    }

    /// Finish editing and hand back the graph
    pub fn into_graph(self) -> QcGraph {
        self.graph
    }
}
