// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Transactions: self-inverting ops, coalescing, and the open-transaction
//! state machine.
//!
//! The [`TransactionManager`] observes [`Change`] records while a
//! transaction is open and folds them into one [`CompoundOp`] with the
//! coalescing rules documented on [`TransactionManager::on_changed`].

use std::collections::{BTreeMap, BTreeSet};
use std::mem;

use tracing::{debug, trace};

use crate::model::{Change, Document, ObjectId, PropValue, PropertyKind};

/// One recorded mutation, wrapped with self-inverting undo behavior.
///
/// `undo` applies the inverse primitive through the document and keeps the
/// [`Change`] the document returned — which is exactly the op's new
/// inverse, so `redo` is simply a second `undo`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeOp {
    change: Change,
}

impl ChangeOp {
    pub fn new(change: Change) -> Self {
        Self { change }
    }

    pub fn change(&self) -> &Change {
        &self.change
    }

    /// Reverses the recorded mutation, returning the [`Change`] it caused
    /// for re-broadcast to listeners.
    pub fn undo(&mut self, doc: &mut Document) -> Change {
        let applied = match &self.change {
            Change::ValueChanged { item, prop, old_value } => {
                doc.set_prop_value(*item, prop, old_value.clone())
            }
            Change::ChildInserted { item, prop, index } => doc.remove_child_at(*item, prop, *index),
            Change::ChildRemoved { item, prop, index, child } => {
                doc.insert_child(*item, prop, *index, *child)
            }
        };
        self.change = applied.clone();
        applied
    }

    pub fn redo(&mut self, doc: &mut Document) -> Change {
        self.undo(doc)
    }
}

/// Restores the selection as of transaction start (undo) or end (redo).
///
/// Swaps its endpoints on every `undo`, keeping the redo-is-second-undo
/// contract uniform with [`ChangeOp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOp {
    before: BTreeSet<ObjectId>,
    after: BTreeSet<ObjectId>,
}

impl SelectionOp {
    pub fn new(before: BTreeSet<ObjectId>, after: BTreeSet<ObjectId>) -> Self {
        Self { before, after }
    }

    pub fn undo(&mut self, doc: &mut Document) {
        doc.set_selection(self.before.clone());
        mem::swap(&mut self.before, &mut self.after);
    }

    pub fn redo(&mut self, doc: &mut Document) {
        self.undo(doc);
    }
}

/// One entry of a [`CompoundOp`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Change(ChangeOp),
    Selection(SelectionOp),
}

impl Op {
    /// Reverses this op. Document mutations are returned for re-broadcast;
    /// selection restores are silent.
    pub fn undo(&mut self, doc: &mut Document) -> Option<Change> {
        match self {
            Self::Change(op) => Some(op.undo(doc)),
            Self::Selection(op) => {
                op.undo(doc);
                None
            }
        }
    }

    pub fn redo(&mut self, doc: &mut Document) -> Option<Change> {
        self.undo(doc)
    }
}

/// A named, ordered group of ops undone and redone as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundOp {
    name: String,
    ops: Vec<Op>,
}

impl CompoundOp {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ops: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Undoes every op in reverse order, so later structural edits unwind
    /// before the edits they depend on.
    pub fn undo(&mut self, doc: &mut Document) -> Vec<Change> {
        let mut changes = Vec::with_capacity(self.ops.len());
        for op in self.ops.iter_mut().rev() {
            changes.extend(op.undo(doc));
        }
        changes
    }

    /// Redoes every op in the original order.
    pub fn redo(&mut self, doc: &mut Document) -> Vec<Change> {
        let mut changes = Vec::with_capacity(self.ops.len());
        for op in self.ops.iter_mut() {
            changes.extend(op.redo(doc));
        }
        changes
    }
}

/// Records the open transaction, if any.
///
/// State machine: idle, then [`begin`] opens a transaction, then exactly
/// one of [`end`] (sealed, handed to the caller) or [`cancel`] (rolled
/// back, discarded) returns to idle. Only one transaction can be open at a
/// time and beginning another while open panics: silently replacing it
/// would drop recorded undo state.
///
/// Mutations arriving while idle are not recorded — "transacted" versus
/// "untransacted" editing is the caller's policy choice.
///
/// [`begin`]: TransactionManager::begin
/// [`end`]: TransactionManager::end
/// [`cancel`]: TransactionManager::cancel
#[derive(Debug, Default)]
pub struct TransactionManager {
    open: Option<OpenTransaction>,
}

#[derive(Debug)]
struct OpenTransaction {
    compound: CompoundOp,
    snapshots: BTreeMap<(ObjectId, &'static str), PropValue>,
}

enum Coalesce {
    Merge { pos: usize, earliest: PropValue },
    Cancel { pos: usize },
}

impl TransactionManager {
    pub fn new() -> Self {
        Self { open: None }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The transaction being recorded, when one is open.
    pub fn transaction(&self) -> Option<&CompoundOp> {
        self.open.as_ref().map(|open| &open.compound)
    }

    /// Opens a transaction named `name`. Panics when one is already open.
    pub fn begin(&mut self, name: &str) {
        if self.open.is_some() {
            panic!("transaction already open");
        }
        debug!(name, "transaction began");
        self.open = Some(OpenTransaction {
            compound: CompoundOp::new(name),
            snapshots: BTreeMap::new(),
        });
    }

    /// Seals and returns the open transaction. Panics with none open.
    pub fn end(&mut self) -> CompoundOp {
        let open = self.open.take().unwrap_or_else(|| panic!("no open transaction"));
        debug!(name = open.compound.name(), ops = open.compound.len(), "transaction ended");
        open.compound
    }

    /// Rolls the open transaction back and discards it, returning the
    /// rollback changes for re-broadcast. Panics with none open.
    ///
    /// The transaction leaves the open slot before the rollback runs, so
    /// the rollback's own mutations are not recorded again.
    pub fn cancel(&mut self, doc: &mut Document) -> Vec<Change> {
        let mut open = self.open.take().unwrap_or_else(|| panic!("no open transaction"));
        debug!(name = open.compound.name(), ops = open.compound.len(), "transaction cancelled");
        open.compound.undo(doc)
    }

    /// Appends `op` to the open transaction without coalescing.
    ///
    /// For ops that do not arrive through the change stream, such as the
    /// history manager's selection capture. Panics with none open.
    pub fn append(&mut self, op: Op) {
        let open = self.open.as_mut().unwrap_or_else(|| panic!("no open transaction"));
        open.compound.push(op);
    }

    /// Entry point for the change stream. Does nothing while idle.
    ///
    /// Snapshots keep the first-seen old value per (item, property), so
    /// [`old_value`] answers "as of transaction start" no matter how often
    /// a property is rewritten. A newly inserted child has every scalar and
    /// reference property snapshotted at once, so undo can fully
    /// reconstruct it.
    ///
    /// Recording scans the ops already in the transaction front to back and
    /// stops at the first match:
    /// - a second write to the same (item, property) replaces the earlier
    ///   op with one merged op carrying the earliest old value;
    /// - an insert followed by a remove of the same (item, property, index)
    ///   cancels both, as does a remove followed by an insert.
    ///
    /// [`old_value`]: TransactionManager::old_value
    pub fn on_changed(&mut self, doc: &Document, change: Change) {
        let Some(open) = self.open.as_mut() else {
            return;
        };

        match &change {
            Change::ValueChanged { item, prop, old_value } => {
                open.snapshots.entry((*item, prop)).or_insert_with(|| old_value.clone());
            }
            Change::ChildInserted { item, prop, index } => {
                let child = doc.child_at(*item, prop, *index);
                let template = doc.object(child).template();
                for property in template.properties() {
                    match property.kind() {
                        PropertyKind::Scalar | PropertyKind::Reference => {
                            let current = doc.prop_value(child, property.name());
                            open.snapshots.entry((child, property.name())).or_insert(current);
                        }
                        PropertyKind::ChildList | PropertyKind::Id => {}
                    }
                }
            }
            Change::ChildRemoved { .. } => {}
        }

        open.record(change);
    }

    /// The value `(item, prop)` had when the open transaction began,
    /// falling back to the current value when the property was never
    /// touched (or no transaction is open).
    pub fn old_value(&self, doc: &Document, item: ObjectId, prop: &str) -> PropValue {
        if let Some(open) = &self.open {
            if let Some(property) = doc.object(item).template().property(prop) {
                if let Some(value) = open.snapshots.get(&(item, property.name())) {
                    return value.clone();
                }
            }
        }
        doc.prop_value(item, prop)
    }
}

impl OpenTransaction {
    fn record(&mut self, change: Change) {
        let mut action = None;
        for (pos, op) in self.compound.ops.iter().enumerate() {
            let Op::Change(existing) = op else {
                continue;
            };
            match (existing.change(), &change) {
                (
                    Change::ValueChanged { item, prop, old_value },
                    Change::ValueChanged { item: new_item, prop: new_prop, .. },
                ) if item == new_item && prop == new_prop => {
                    action = Some(Coalesce::Merge { pos, earliest: old_value.clone() });
                    break;
                }
                (
                    Change::ChildInserted { item, prop, index },
                    Change::ChildRemoved { item: new_item, prop: new_prop, index: new_index, .. },
                ) if item == new_item && prop == new_prop && index == new_index => {
                    action = Some(Coalesce::Cancel { pos });
                    break;
                }
                (
                    Change::ChildRemoved { item, prop, index, .. },
                    Change::ChildInserted { item: new_item, prop: new_prop, index: new_index },
                ) if item == new_item && prop == new_prop && index == new_index => {
                    action = Some(Coalesce::Cancel { pos });
                    break;
                }
                _ => {}
            }
        }

        match action {
            Some(Coalesce::Merge { pos, earliest }) => {
                trace!(item = %change.item(), prop = change.prop(), "merged repeated write");
                self.compound.ops.remove(pos);
                let Change::ValueChanged { item, prop, .. } = change else {
                    unreachable!("merge only matches value writes")
                };
                self.compound.push(Op::Change(ChangeOp::new(Change::ValueChanged {
                    item,
                    prop,
                    old_value: earliest,
                })));
            }
            Some(Coalesce::Cancel { pos }) => {
                trace!(item = %change.item(), prop = change.prop(), "insert/remove cancelled out");
                self.compound.ops.remove(pos);
            }
            None => self.compound.push(Op::Change(ChangeOp::new(change))),
        }
    }
}
