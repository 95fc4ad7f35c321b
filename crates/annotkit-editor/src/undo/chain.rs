//! Undo chain
//!
//! Entries before the cursor can be undone, entries at or after it can be
//! redone. Recording a new entry drops everything after the cursor.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// One undoable action
#[derive(Debug, Clone)]
pub struct UndoEntry<S> {
    pub description: String,
    /// Monotonic order of recording, never reused.
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    before: S,
    after: Option<S>,
}

impl<S> UndoEntry<S> {
    /// State to restore when undoing.
    pub fn before(&self) -> &S {
        &self.before
    }

    /// State to restore when redoing; set once the entry has been undone.
    pub fn after(&self) -> Option<&S> {
        self.after.as_ref()
    }
}

/// Ordered snapshots with a cursor
#[derive(Debug, Clone)]
pub struct UndoChain<S> {
    entries: VecDeque<UndoEntry<S>>,
    cursor: usize,
    max_depth: usize,
    next_index: u64,
}

impl<S> UndoChain<S> {
    /// Chain holding at most `max_depth` undoable entries (at least one).
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_depth: max_depth.max(1),
            next_index: 0,
        }
    }

    /// Append an entry at the cursor, dropping the redo tail and the oldest
    /// entries beyond the depth limit.
    pub fn record(&mut self, description: impl Into<String>, before: S) -> &UndoEntry<S> {
        self.entries.truncate(self.cursor);
        self.entries.push_back(UndoEntry {
            description: description.into(),
            index: self.next_index,
            timestamp: Utc::now(),
            before,
            after: None,
        });
        self.next_index += 1;
        self.cursor = self.entries.len();
        self.trim_to_depth(self.max_depth);
        &self.entries[self.cursor - 1]
    }

    /// Entry the next undo will reverse.
    pub fn peek_undo(&self) -> Option<&UndoEntry<S>> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Entry the next redo will reapply.
    pub fn peek_redo(&self) -> Option<&UndoEntry<S>> {
        self.entries.get(self.cursor)
    }

    /// Move the cursor back one entry, remembering `after` for redo.
    ///
    /// Without an `after` state the entry cannot be redone, so it and the
    /// rest of the tail are dropped. Returns the entry's description.
    pub fn step_back(&mut self, after: Option<S>) -> Option<String> {
        let index = self.cursor.checked_sub(1)?;
        let description = self.entries[index].description.clone();
        self.cursor = index;
        match after {
            Some(state) => self.entries[index].after = Some(state),
            None => self.entries.truncate(index),
        }
        Some(description)
    }

    /// Move the cursor forward over a redoable entry.
    pub fn step_forward(&mut self) -> Option<String> {
        let entry = self.entries.get(self.cursor)?;
        entry.after.as_ref()?;
        let description = entry.description.clone();
        self.cursor += 1;
        Some(description)
    }

    /// Remove the most recent entry if it is the last one in the chain.
    pub fn discard_last(&mut self) -> bool {
        if self.cursor == 0 || self.cursor != self.entries.len() {
            return false;
        }
        self.entries.pop_back();
        self.cursor -= 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.peek_redo().is_some_and(|e| e.after.is_some())
    }

    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.peek_undo().map(|e| e.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.peek_redo().map(|e| e.description.as_str())
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        self.trim_to_depth(self.max_depth);
    }

    /// Drop the oldest undoable entries until at most `depth` remain.
    pub fn trim_to_depth(&mut self, depth: usize) {
        while self.cursor > depth {
            self.entries.pop_front();
            self.cursor -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptions of every entry, oldest first.
    pub fn full_history(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.description.as_str()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &UndoEntry<S>> {
        self.entries.iter()
    }
}
