// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The owning arena for one object graph.

use std::collections::{BTreeMap, BTreeSet};

use super::change::Change;
use super::ids::ObjectId;
use super::object::DataObject;
use super::template::Template;
use super::value::{PropValue, Value};

/// Owns every [`DataObject`] of one document and hands out stable ids.
///
/// Parent pointers and reference properties are stored as ids and resolved
/// through this arena, so the cyclic parent/child graph needs no shared
/// ownership. Every primitive mutator applies its mutation and returns the
/// matching [`Change`] record exactly once, synchronously; recording and
/// broadcast are the caller's business (see [`EditingContext`]).
///
/// Unknown ids, unknown properties, kind mismatches, and out-of-range list
/// indices are programmer errors and panic. A reference whose target id is
/// not (or no longer) in the arena is not an error; it resolves to nothing.
///
/// [`EditingContext`]: crate::context::EditingContext
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    templates: &'static [&'static Template],
    objects: BTreeMap<ObjectId, DataObject>,
    selection: BTreeSet<ObjectId>,
    next_id: u64,
}

impl Document {
    /// Creates an empty document over `templates`.
    ///
    /// Panics when two templates share a type name or one template declares
    /// two properties with the same name; the schema is fixed at definition
    /// time and a collision is a bug in the embedding domain.
    pub fn new(templates: &'static [&'static Template]) -> Self {
        for (index, template) in templates.iter().enumerate() {
            if templates[..index].iter().any(|t| t.type_name() == template.type_name()) {
                panic!("duplicate template type '{}'", template.type_name());
            }
            let properties = template.properties();
            for (pos, property) in properties.iter().enumerate() {
                if properties[..pos].iter().any(|p| p.name() == property.name()) {
                    panic!(
                        "duplicate property '{}' on type '{}'",
                        property.name(),
                        template.type_name()
                    );
                }
            }
        }

        Self {
            templates,
            objects: BTreeMap::new(),
            selection: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn template(&self, type_name: &str) -> Option<&'static Template> {
        self.templates.iter().copied().find(|t| t.type_name() == type_name)
    }

    /// Creates a fresh, empty object of `type_name` and returns its id.
    ///
    /// Panics on an unknown type name.
    pub fn construct(&mut self, type_name: &str) -> ObjectId {
        let template = self
            .template(type_name)
            .unwrap_or_else(|| panic!("unknown template type '{type_name}'"));

        let id = ObjectId::from_raw(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, DataObject::new(id, template));
        id
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&DataObject> {
        self.objects.get(&id)
    }

    /// Like [`Document::get`], but panics on an unknown id.
    pub fn object(&self, id: ObjectId) -> &DataObject {
        self.objects.get(&id).unwrap_or_else(|| panic!("unknown object id {id}"))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Ids of every live object, ascending.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn parent_of(&self, item: ObjectId) -> Option<ObjectId> {
        self.object(item).parent()
    }

    // ---- scalar and reference slots ---------------------------------------

    /// Writes a scalar property, returning the change (with the replaced
    /// value attached).
    pub fn set_value(&mut self, item: ObjectId, prop: &str, value: Option<Value>) -> Change {
        let prop = self.prop_name(item, prop);
        let slot = self.object_mut(item).scalar_slot_mut(prop);
        let old = std::mem::replace(slot, value);
        Change::ValueChanged { item, prop, old_value: PropValue::Scalar(old) }
    }

    /// Retargets a reference property, returning the change.
    pub fn set_reference(&mut self, item: ObjectId, prop: &str, target: Option<ObjectId>) -> Change {
        let prop = self.prop_name(item, prop);
        let slot = self.object_mut(item).reference_slot_mut(prop);
        let old = std::mem::replace(slot, target);
        Change::ValueChanged { item, prop, old_value: PropValue::Reference(old) }
    }

    /// Writes a scalar-or-reference slot with the kind carried by `value`.
    pub fn set_prop_value(&mut self, item: ObjectId, prop: &str, value: PropValue) -> Change {
        match value {
            PropValue::Scalar(value) => self.set_value(item, prop, value),
            PropValue::Reference(target) => self.set_reference(item, prop, target),
        }
    }

    /// Current value of a scalar-or-reference slot, kind attached.
    pub fn prop_value(&self, item: ObjectId, prop: &str) -> PropValue {
        self.object(item).prop_value(prop)
    }

    /// Resolves a reference property to the live target object, `None` when
    /// the reference is unset or dangling.
    pub fn resolve_reference(&self, item: ObjectId, prop: &str) -> Option<&DataObject> {
        let target = self.object(item).reference(prop)?;
        self.get(target)
    }

    // ---- child lists ------------------------------------------------------

    /// Inserts `child` at `index`, establishing its parent back-reference.
    pub fn insert_child(&mut self, item: ObjectId, prop: &str, index: usize, child: ObjectId) -> Change {
        let prop = self.prop_name(item, prop);
        if !self.contains(child) {
            panic!("unknown object id {child}");
        }
        let children = self.object_mut(item).children_slot_mut(prop);
        if index > children.len() {
            panic!("child index {index} out of range for '{prop}' (len {})", children.len());
        }
        children.insert(index, child);
        self.object_mut(child).set_parent(Some(item));
        Change::ChildInserted { item, prop, index }
    }

    pub fn append_child(&mut self, item: ObjectId, prop: &str, child: ObjectId) -> Change {
        let index = self.children(item, prop).len();
        self.insert_child(item, prop, index, child)
    }

    /// Removes the child at `index`, clearing its parent back-reference.
    pub fn remove_child_at(&mut self, item: ObjectId, prop: &str, index: usize) -> Change {
        let prop = self.prop_name(item, prop);
        let children = self.object_mut(item).children_slot_mut(prop);
        if index >= children.len() {
            panic!("child index {index} out of range for '{prop}' (len {})", children.len());
        }
        let child = children.remove(index);
        self.object_mut(child).set_parent(None);
        Change::ChildRemoved { item, prop, index, child }
    }

    /// Removes `child` wherever it sits in the list. Panics when absent.
    pub fn remove_child(&mut self, item: ObjectId, prop: &str, child: ObjectId) -> Change {
        let index = self
            .index_of(item, prop, child)
            .unwrap_or_else(|| panic!("object {child} is not a child of {item} under '{prop}'"));
        self.remove_child_at(item, prop, index)
    }

    pub fn children(&self, item: ObjectId, prop: &str) -> &[ObjectId] {
        self.object(item).children(prop)
    }

    pub fn child_at(&self, item: ObjectId, prop: &str, index: usize) -> ObjectId {
        let children = self.children(item, prop);
        *children.get(index).unwrap_or_else(|| {
            panic!("child index {index} out of range for '{prop}' (len {})", children.len())
        })
    }

    pub fn index_of(&self, item: ObjectId, prop: &str, child: ObjectId) -> Option<usize> {
        self.children(item, prop).iter().position(|&c| c == child)
    }

    // ---- selection --------------------------------------------------------

    pub fn selection(&self) -> &BTreeSet<ObjectId> {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: BTreeSet<ObjectId>) {
        self.selection = selection;
    }

    // ---- internals --------------------------------------------------------

    fn object_mut(&mut self, id: ObjectId) -> &mut DataObject {
        self.objects.get_mut(&id).unwrap_or_else(|| panic!("unknown object id {id}"))
    }

    /// The template's own `&'static` spelling of `prop`, validating that
    /// the property exists.
    fn prop_name(&self, item: ObjectId, prop: &str) -> &'static str {
        let template = self.object(item).template();
        template.property(prop).map(|p| p.name()).unwrap_or_else(|| {
            panic!("unknown property '{prop}' on type '{}'", template.type_name())
        })
    }
}
