// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editing mediator: one document plus its transaction and history
//! managers, with synchronous change broadcast.

use std::collections::BTreeSet;

use crate::event::EventHub;
use crate::history::HistoryManager;
use crate::model::{Change, Document, ObjectId, PropValue, Template, Value};
use crate::transaction::{CompoundOp, TransactionManager};

/// Transaction lifecycle notifications, mirrored to UI listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEvent {
    Began,
    Ending,
    Ended,
    Cancelled,
    DidUndo,
    DidRedo,
}

/// Owns one [`Document`] and routes every mutation through the transaction
/// manager and the change hub, exactly once, synchronously.
///
/// Domain schemas sit on top of this type: they call the mutators here
/// instead of touching the document directly, so every edit is observable
/// and, inside a transaction, undoable. Mutations outside a transaction
/// still broadcast but leave no undo record.
#[derive(Debug)]
pub struct EditingContext {
    doc: Document,
    txn: TransactionManager,
    history: HistoryManager,
    changed: EventHub<Change>,
    lifecycle: EventHub<TransactionEvent>,
}

impl EditingContext {
    pub fn new(templates: &'static [&'static Template]) -> Self {
        Self {
            doc: Document::new(templates),
            txn: TransactionManager::new(),
            history: HistoryManager::new(),
            changed: EventHub::new(),
            lifecycle: EventHub::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Escape hatch for load and clone plumbing. Mutations through this
    /// handle bypass change broadcast and undo recording.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn transaction_manager(&self) -> &TransactionManager {
        &self.txn
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Hub for per-mutation [`Change`] broadcast.
    pub fn change_events(&mut self) -> &mut EventHub<Change> {
        &mut self.changed
    }

    /// Hub for [`TransactionEvent`] broadcast.
    pub fn transaction_events(&mut self) -> &mut EventHub<TransactionEvent> {
        &mut self.lifecycle
    }

    // ---- mutation ---------------------------------------------------------

    pub fn construct(&mut self, type_name: &str) -> ObjectId {
        self.doc.construct(type_name)
    }

    pub fn set_value(&mut self, item: ObjectId, prop: &str, value: Option<Value>) {
        let change = self.doc.set_value(item, prop, value);
        self.dispatch(change);
    }

    pub fn set_reference(&mut self, item: ObjectId, prop: &str, target: Option<ObjectId>) {
        let change = self.doc.set_reference(item, prop, target);
        self.dispatch(change);
    }

    pub fn insert_child(&mut self, item: ObjectId, prop: &str, index: usize, child: ObjectId) {
        let change = self.doc.insert_child(item, prop, index, child);
        self.dispatch(change);
    }

    pub fn append_child(&mut self, item: ObjectId, prop: &str, child: ObjectId) {
        let change = self.doc.append_child(item, prop, child);
        self.dispatch(change);
    }

    pub fn remove_child(&mut self, item: ObjectId, prop: &str, child: ObjectId) {
        let change = self.doc.remove_child(item, prop, child);
        self.dispatch(change);
    }

    pub fn remove_child_at(&mut self, item: ObjectId, prop: &str, index: usize) {
        let change = self.doc.remove_child_at(item, prop, index);
        self.dispatch(change);
    }

    fn dispatch(&mut self, change: Change) {
        self.txn.on_changed(&self.doc, change.clone());
        self.changed.emit(&change);
    }

    // ---- transactions -----------------------------------------------------

    /// Opens a transaction. Panics when one is already open.
    pub fn begin_transaction(&mut self, name: &str) {
        self.txn.begin(name);
        self.history.transaction_began(&self.doc);
        self.lifecycle.emit(&TransactionEvent::Began);
    }

    /// Seals the open transaction into the undo history and returns it.
    /// Panics when none is open.
    pub fn end_transaction(&mut self) -> &CompoundOp {
        self.lifecycle.emit(&TransactionEvent::Ending);
        self.history.transaction_ending(&self.doc, &mut self.txn);
        let transaction = self.txn.end();
        self.history.transaction_ended(transaction);
        self.lifecycle.emit(&TransactionEvent::Ended);
        self.history.done().last().expect("transaction pushed above")
    }

    /// Rolls the open transaction back and discards it. Panics when none
    /// is open.
    pub fn cancel_transaction(&mut self) {
        let changes = self.txn.cancel(&mut self.doc);
        for change in &changes {
            self.changed.emit(change);
        }
        self.lifecycle.emit(&TransactionEvent::DidUndo);
        self.history.transaction_cancelled(&mut self.doc);
        self.lifecycle.emit(&TransactionEvent::Cancelled);
    }

    /// Undoes the most recent sealed transaction, re-broadcasting the
    /// changes it rolls back. Does nothing with an empty undo stack.
    pub fn undo(&mut self) {
        if !self.history.can_undo() {
            return;
        }
        let changes = self.history.undo(&mut self.doc);
        for change in &changes {
            self.changed.emit(change);
        }
        self.lifecycle.emit(&TransactionEvent::DidUndo);
    }

    /// Redoes the most recently undone transaction. Does nothing with an
    /// empty redo stack.
    pub fn redo(&mut self) {
        if !self.history.can_redo() {
            return;
        }
        let changes = self.history.redo(&mut self.doc);
        for change in &changes {
            self.changed.emit(change);
        }
        self.lifecycle.emit(&TransactionEvent::DidRedo);
    }

    /// The value `(item, prop)` had when the open transaction began.
    pub fn old_value(&self, item: ObjectId, prop: &str) -> PropValue {
        self.txn.old_value(&self.doc, item, prop)
    }

    // ---- selection --------------------------------------------------------

    pub fn selection(&self) -> &BTreeSet<ObjectId> {
        self.doc.selection()
    }

    /// Replaces the selection. Selection moves are not part of the change
    /// stream; the history manager captures them at transaction
    /// boundaries.
    pub fn set_selection(&mut self, selection: BTreeSet<ObjectId>) {
        self.doc.set_selection(selection);
    }
}
