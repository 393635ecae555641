// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Clone, serialize, and deserialize over template-reflected object graphs.
//!
//! All three walk an object's [`Template`] property list and never inspect
//! concrete types. Serialization produces a plain json record; where that
//! record goes (file, clipboard, wire) stays with the caller.
//!
//! [`Template`]: crate::model::Template

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Map};

use crate::model::{Document, ObjectId, PropertyKind, Value};

/// Deep-copies `items` (and their owned subtrees) inside `doc`, returning
/// the top-level copies in order.
///
/// `map` is filled with every `original -> copy` pair, top-level and
/// nested, so the caller can re-select or re-parent the copies afterwards.
/// After all items are built, a second pass remaps reference properties:
/// references into the copied set point at the copies; references leaving
/// the set keep pointing at the originals.
pub fn copy_items(
    doc: &mut Document,
    items: &[ObjectId],
    map: &mut BTreeMap<ObjectId, ObjectId>,
) -> Vec<ObjectId> {
    let copies = items.iter().map(|&item| copy_item(doc, item, map)).collect::<Vec<_>>();

    let copy_ids = map.values().copied().collect::<Vec<_>>();
    for copy in copy_ids {
        remap_references(doc, copy, map);
    }
    copies
}

fn copy_item(
    doc: &mut Document,
    item: ObjectId,
    map: &mut BTreeMap<ObjectId, ObjectId>,
) -> ObjectId {
    let template = doc.object(item).template();
    let copy = doc.construct(template.type_name());
    map.insert(item, copy);

    for property in template.properties() {
        match property.kind() {
            PropertyKind::Scalar | PropertyKind::Reference => {
                let value = doc.prop_value(item, property.name());
                doc.set_prop_value(copy, property.name(), value);
            }
            PropertyKind::ChildList => {
                let children = doc.children(item, property.name()).to_vec();
                for child in children {
                    let child_copy = copy_item(doc, child, map);
                    doc.append_child(copy, property.name(), child_copy);
                }
            }
            PropertyKind::Id => {}
        }
    }
    copy
}

fn remap_references(doc: &mut Document, copy: ObjectId, map: &BTreeMap<ObjectId, ObjectId>) {
    let template = doc.object(copy).template();
    for property in template.properties() {
        if property.kind() != PropertyKind::Reference {
            continue;
        }
        let Some(target) = doc.object(copy).reference(property.name()) else {
            continue;
        };
        if let Some(&mapped) = map.get(&target) {
            doc.set_reference(copy, property.name(), Some(mapped));
        }
    }
}

/// Serializes `item` and its owned subtree into a plain json record.
///
/// The record carries the template type name under `"type"`, id properties
/// as raw ids, set scalars verbatim (unset scalars are omitted), set
/// references as the target's raw id, and child lists as arrays of
/// records.
pub fn serialize(doc: &Document, item: ObjectId) -> serde_json::Value {
    let object = doc.object(item);
    let template = object.template();

    let mut record = Map::new();
    record.insert("type".to_owned(), json!(template.type_name()));
    for property in template.properties() {
        let name = property.name();
        match property.kind() {
            PropertyKind::Id => {
                record.insert(name.to_owned(), json!(item.as_raw()));
            }
            PropertyKind::Scalar => {
                if let Some(value) = object.scalar(name) {
                    let raw = serde_json::to_value(value).expect("scalar values are plain json");
                    record.insert(name.to_owned(), raw);
                }
            }
            PropertyKind::Reference => {
                if let Some(target) = object.reference(name) {
                    record.insert(name.to_owned(), json!(target.as_raw()));
                }
            }
            PropertyKind::ChildList => {
                let children = object
                    .children(name)
                    .iter()
                    .map(|&child| serialize(doc, child))
                    .collect::<Vec<_>>();
                record.insert(name.to_owned(), serde_json::Value::Array(children));
            }
        }
    }
    serde_json::Value::Object(record)
}

/// Errors for records that cannot be rebuilt.
///
/// Malformed input is a data error, not a programmer error: records arrive
/// from files and clipboards the embedding application does not control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    NotARecord,
    MissingType,
    UnknownType { type_name: String },
    InvalidId { prop: &'static str },
    InvalidScalar { prop: &'static str },
    InvalidReference { prop: &'static str },
    InvalidChildList { prop: &'static str },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARecord => f.write_str("record must be a json object"),
            Self::MissingType => f.write_str("record is missing its 'type' field"),
            Self::UnknownType { type_name } => write!(f, "record has unknown type '{type_name}'"),
            Self::InvalidId { prop } => {
                write!(f, "id property '{prop}' must be an unsigned integer")
            }
            Self::InvalidScalar { prop } => {
                write!(f, "scalar property '{prop}' must be a string, number, or bool")
            }
            Self::InvalidReference { prop } => {
                write!(f, "reference property '{prop}' must be an unsigned integer")
            }
            Self::InvalidChildList { prop } => {
                write!(f, "child list property '{prop}' must be an array")
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// Rebuilds an object graph from a [`serialize`] record, returning the new
/// root.
///
/// Two passes. The first constructs the tree, copies scalars, maps the
/// record's old ids to the freshly constructed objects, and parks raw
/// reference ids unresolved. The second walks the new tree and resolves
/// every reference through that map — the split is what lets a reference
/// point forward to a sibling that had not been constructed yet. A
/// reference whose target is not part of the record tree rebuilds as
/// unset.
pub fn deserialize(doc: &mut Document, raw: &serde_json::Value) -> Result<ObjectId, RecordError> {
    let mut map = BTreeMap::new();
    let root = build_tree(doc, raw, &mut map)?;
    resolve_references(doc, root, &map);
    Ok(root)
}

fn build_tree(
    doc: &mut Document,
    raw: &serde_json::Value,
    map: &mut BTreeMap<u64, ObjectId>,
) -> Result<ObjectId, RecordError> {
    let record = raw.as_object().ok_or(RecordError::NotARecord)?;
    let type_name = record
        .get("type")
        .and_then(|value| value.as_str())
        .ok_or(RecordError::MissingType)?;
    let template = doc
        .template(type_name)
        .ok_or_else(|| RecordError::UnknownType { type_name: type_name.to_owned() })?;

    let item = doc.construct(type_name);
    for property in template.properties() {
        let name = property.name();
        let Some(value) = record.get(name) else {
            continue;
        };
        match property.kind() {
            PropertyKind::Id => {
                let old = value.as_u64().ok_or(RecordError::InvalidId { prop: name })?;
                map.insert(old, item);
            }
            PropertyKind::Scalar => {
                if value.is_null() {
                    continue;
                }
                let scalar = serde_json::from_value::<Value>(value.clone())
                    .map_err(|_| RecordError::InvalidScalar { prop: name })?;
                doc.set_value(item, name, Some(scalar));
            }
            PropertyKind::Reference => {
                if value.is_null() {
                    continue;
                }
                let old = value.as_u64().ok_or(RecordError::InvalidReference { prop: name })?;
                // Parked unresolved; the second pass rewrites it.
                doc.set_reference(item, name, Some(ObjectId::from_raw(old)));
            }
            PropertyKind::ChildList => {
                let children = value.as_array().ok_or(RecordError::InvalidChildList { prop: name })?;
                for child_raw in children {
                    let child = build_tree(doc, child_raw, map)?;
                    doc.append_child(item, name, child);
                }
            }
        }
    }
    Ok(item)
}

fn resolve_references(doc: &mut Document, item: ObjectId, map: &BTreeMap<u64, ObjectId>) {
    let template = doc.object(item).template();
    for property in template.properties() {
        let name = property.name();
        match property.kind() {
            PropertyKind::Reference => {
                if let Some(parked) = doc.object(item).reference(name) {
                    let resolved = map.get(&parked.as_raw()).copied();
                    doc.set_reference(item, name, resolved);
                }
            }
            PropertyKind::ChildList => {
                let children = doc.children(item, name).to_vec();
                for child in children {
                    resolve_references(doc, child, map);
                }
            }
            PropertyKind::Scalar | PropertyKind::Id => {}
        }
    }
}

#[cfg(test)]
mod tests;
