// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::ObjectId;
use super::template::{PropertyKind, Template};
use super::value::{PropValue, Value};

/// Backing storage for one declared property; the variant always matches
/// the descriptor kind at the same template position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    Scalar(Option<Value>),
    Reference(Option<ObjectId>),
    Children(Vec<ObjectId>),
    Id,
}

impl Slot {
    fn empty(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Scalar => Self::Scalar(None),
            PropertyKind::Reference => Self::Reference(None),
            PropertyKind::ChildList => Self::Children(Vec::new()),
            PropertyKind::Id => Self::Id,
        }
    }
}

/// A node or edge in the object graph.
///
/// Identity is the arena id. `parent` is a weak back-reference, established
/// by child insertion and cleared by removal, never owned. Reads are public;
/// all mutation goes through [`Document`] so change reporting cannot be
/// skipped.
///
/// Unknown property names and kind mismatches are programmer errors and
/// panic.
///
/// [`Document`]: super::document::Document
#[derive(Debug, Clone, PartialEq)]
pub struct DataObject {
    id: ObjectId,
    parent: Option<ObjectId>,
    template: &'static Template,
    slots: Vec<Slot>,
}

impl DataObject {
    pub(crate) fn new(id: ObjectId, template: &'static Template) -> Self {
        let slots = template.properties().iter().map(|p| Slot::empty(p.kind())).collect();
        Self { id, parent: None, template, slots }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn template(&self) -> &'static Template {
        self.template
    }

    /// Current value of a scalar property, `None` when unset.
    pub fn scalar(&self, prop: &str) -> Option<&Value> {
        match self.slot(prop) {
            Slot::Scalar(value) => value.as_ref(),
            _ => panic!("property '{prop}' of '{}' is not a scalar", self.template.type_name()),
        }
    }

    /// Target id of a reference property, `None` when unset.
    pub fn reference(&self, prop: &str) -> Option<ObjectId> {
        match self.slot(prop) {
            Slot::Reference(target) => *target,
            _ => panic!("property '{prop}' of '{}' is not a reference", self.template.type_name()),
        }
    }

    /// Children of a child-list property, in order.
    pub fn children(&self, prop: &str) -> &[ObjectId] {
        match self.slot(prop) {
            Slot::Children(children) => children,
            _ => panic!("property '{prop}' of '{}' is not a child list", self.template.type_name()),
        }
    }

    /// Current value of a scalar or reference property, kind attached.
    pub fn prop_value(&self, prop: &str) -> PropValue {
        match self.slot(prop) {
            Slot::Scalar(value) => PropValue::Scalar(value.clone()),
            Slot::Reference(target) => PropValue::Reference(*target),
            _ => panic!(
                "property '{prop}' of '{}' holds neither a scalar nor a reference",
                self.template.type_name()
            ),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    pub(crate) fn scalar_slot_mut(&mut self, prop: &str) -> &mut Option<Value> {
        let type_name = self.template.type_name();
        match self.slot_mut(prop) {
            Slot::Scalar(value) => value,
            _ => panic!("property '{prop}' of '{type_name}' is not a scalar"),
        }
    }

    pub(crate) fn reference_slot_mut(&mut self, prop: &str) -> &mut Option<ObjectId> {
        let type_name = self.template.type_name();
        match self.slot_mut(prop) {
            Slot::Reference(target) => target,
            _ => panic!("property '{prop}' of '{type_name}' is not a reference"),
        }
    }

    pub(crate) fn children_slot_mut(&mut self, prop: &str) -> &mut Vec<ObjectId> {
        let type_name = self.template.type_name();
        match self.slot_mut(prop) {
            Slot::Children(children) => children,
            _ => panic!("property '{prop}' of '{type_name}' is not a child list"),
        }
    }

    fn slot(&self, prop: &str) -> &Slot {
        let index = self.position(prop);
        &self.slots[index]
    }

    fn slot_mut(&mut self, prop: &str) -> &mut Slot {
        let index = self.position(prop);
        &mut self.slots[index]
    }

    fn position(&self, prop: &str) -> usize {
        self.template.position(prop).unwrap_or_else(|| {
            panic!("unknown property '{prop}' on type '{}'", self.template.type_name())
        })
    }
}
