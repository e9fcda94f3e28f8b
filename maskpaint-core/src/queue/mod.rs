//! # History
//!
//! Linear undo/redo of [`Action`]s applied to a [`Document`]. Performing a new action after
//! undoing forgets the undone ones, there is no branching. Stroke painting is not recorded here,
//! see [`crate::state::Layer::remove_last_stroke`].
//!
//! The history lives as long as the process. Nothing is persisted.

mod session;

pub use session::{Session, SessionError};

use crate::commands::{Action, ActionError, DoUndo};
use crate::state::Document;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

#[derive(Debug, Default)]
pub struct HistoryManager {
    /// Oldest at the front, so the limit can evict from there.
    undo: VecDeque<Box<dyn Action>>,
    /// Most recently undone last.
    redo: Vec<Box<dyn Action>>,
    limit: Option<NonZeroUsize>,
}

impl HistoryManager {
    /// An unbounded history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Keep at most `limit` undoable actions, forgetting the oldest. `None` for unbounded.
    #[must_use]
    pub fn with_limit(limit: Option<NonZeroUsize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
    #[must_use]
    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }
    /// Run an action and record it. On error nothing is recorded and the redo stack is kept.
    pub fn execute(
        &mut self,
        document: &mut Document,
        action: impl Action + 'static,
    ) -> Result<(), ActionError> {
        self.execute_boxed(document, Box::new(action))
    }
    pub fn execute_boxed(
        &mut self,
        document: &mut Document,
        mut action: Box<dyn Action>,
    ) -> Result<(), ActionError> {
        DoUndo::Do.apply(action.as_mut(), document)?;
        log::debug!("history: {}", action.description());
        if !self.redo.is_empty() {
            log::trace!("history: forgetting {} undone actions", self.redo.len());
            self.redo.clear();
        }
        self.undo.push_back(action);
        self.evict();
        Ok(())
    }
    /// Revert the most recent action. `Ok(false)` if there is nothing to undo.
    ///
    /// If the action fails to revert, it stays on the undo stack and the error is returned.
    pub fn undo(&mut self, document: &mut Document) -> Result<bool, ActionError> {
        let Some(mut action) = self.undo.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = DoUndo::Undo.apply(action.as_mut(), document) {
            log::warn!("history: failed to undo {}: {err}", action.description());
            self.undo.push_back(action);
            return Err(err);
        }
        log::debug!("history: undid {}", action.description());
        self.redo.push(action);
        Ok(true)
    }
    /// Re-apply the most recently undone action. `Ok(false)` if there is nothing to redo.
    ///
    /// If the action fails to apply, it stays on the redo stack and the error is returned.
    pub fn redo(&mut self, document: &mut Document) -> Result<bool, ActionError> {
        let Some(mut action) = self.redo.pop() else {
            return Ok(false);
        };
        if let Err(err) = DoUndo::Do.apply(action.as_mut(), document) {
            log::warn!("history: failed to redo {}: {err}", action.description());
            self.redo.push(action);
            return Err(err);
        }
        log::debug!("history: redid {}", action.description());
        self.undo.push_back(action);
        Ok(true)
    }
    /// Undo up to `count` actions, returning how many were undone.
    /// Stops at the first error.
    pub fn undo_n(&mut self, document: &mut Document, count: usize) -> Result<usize, ActionError> {
        for done in 0..count {
            if !self.undo(document)? {
                return Ok(done);
            }
        }
        Ok(count)
    }
    /// Redo up to `count` actions, returning how many were redone.
    /// Stops at the first error.
    pub fn redo_n(&mut self, document: &mut Document, count: usize) -> Result<usize, ActionError> {
        for done in 0..count {
            if !self.redo(document)? {
                return Ok(done);
            }
        }
        Ok(count)
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
    #[must_use]
    pub fn undo_description(&self) -> Option<String> {
        self.undo.back().map(|action| action.description())
    }
    #[must_use]
    pub fn redo_description(&self) -> Option<String> {
        self.redo.last().map(|action| action.description())
    }
    /// Descriptions of every undoable action, most recent first.
    pub fn undo_history(&self) -> impl Iterator<Item = String> + '_ {
        self.undo.iter().rev().map(|action| action.description())
    }
    /// Number of undoable actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.undo.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.redo.is_empty()
    }
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
    fn evict(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.undo.len() > limit.get() {
            if let Some(oldest) = self.undo.pop_front() {
                log::trace!("history: evicted {}", oldest.description());
            }
        }
    }
}
