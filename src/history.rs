// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear undo/redo history with selection capture.

use std::collections::BTreeSet;

use tracing::debug;

use crate::model::{Change, Document, ObjectId};
use crate::transaction::{CompoundOp, Op, SelectionOp, TransactionManager};

/// Keeps the undo and redo stacks and folds selection moves into each
/// transaction.
///
/// The four `transaction_*` hooks must be wired to the transaction
/// lifecycle (see [`EditingContext`]): a selection snapshot is taken when a
/// transaction begins, and if the selection moved by the time the
/// transaction seals, a [`SelectionOp`] joins the transaction so the move
/// undoes and redoes together with the data changes that caused it.
///
/// [`EditingContext`]: crate::context::EditingContext
#[derive(Debug, Default)]
pub struct HistoryManager {
    done: Vec<CompoundOp>,
    undone: Vec<CompoundOp>,
    starting_selection: Option<BTreeSet<ObjectId>>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Sealed transactions, oldest first.
    pub fn done(&self) -> &[CompoundOp] {
        &self.done
    }

    /// Undone transactions awaiting redo, oldest first.
    pub fn undone(&self) -> &[CompoundOp] {
        &self.undone
    }

    /// Hook for transaction start: remembers the selection for the diff at
    /// sealing time.
    pub fn transaction_began(&mut self, doc: &Document) {
        self.starting_selection = Some(doc.selection().clone());
    }

    /// Hook for the sealing transaction, called while it is still open so
    /// the captured selection move is part of the same undo step.
    pub fn transaction_ending(&mut self, doc: &Document, txn: &mut TransactionManager) {
        let Some(start) = self.starting_selection.as_ref() else {
            return;
        };
        if start != doc.selection() {
            txn.append(Op::Selection(SelectionOp::new(start.clone(), doc.selection().clone())));
        }
    }

    /// Hook for a sealed transaction: new edits invalidate redo history.
    pub fn transaction_ended(&mut self, transaction: CompoundOp) {
        self.starting_selection = None;
        self.undone.clear();
        self.done.push(transaction);
    }

    /// Hook for a cancelled transaction: nothing was committed, so the
    /// starting selection is restored directly.
    pub fn transaction_cancelled(&mut self, doc: &mut Document) {
        if let Some(start) = self.starting_selection.take() {
            doc.set_selection(start);
        }
    }

    /// Undoes the most recent sealed transaction, returning the changes it
    /// caused; empty when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Vec<Change> {
        let Some(mut transaction) = self.done.pop() else {
            return Vec::new();
        };
        debug!(name = transaction.name(), "undo");
        let changes = transaction.undo(doc);
        self.undone.push(transaction);
        changes
    }

    /// Redoes the most recently undone transaction; empty when there is
    /// nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> Vec<Change> {
        let Some(mut transaction) = self.undone.pop() else {
            return Vec::new();
        };
        debug!(name = transaction.name(), "redo");
        let changes = transaction.redo(doc);
        self.done.push(transaction);
        changes
    }
}
