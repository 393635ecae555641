// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use rstest::{fixture, rstest};

use crate::model::fixtures;
use crate::model::{Document, ObjectId, Value};

use super::{copy_items, deserialize, serialize, RecordError};

struct ChartRig {
    doc: Document,
    chart: ObjectId,
    source: ObjectId,
    sink: ObjectId,
    inner: ObjectId,
    wire: ObjectId,
}

/// A three-level chart with a cross-reference:
///
/// ```text
/// chart "main"
/// ├─ wires: [wire (src -> inner, dst -> sink)]
/// └─ items: [source ─ items: [inner], sink]
/// ```
#[fixture]
fn rig() -> ChartRig {
    let mut doc = fixtures::document();
    let chart = doc.construct("chart");
    let source = doc.construct("node");
    let sink = doc.construct("node");
    let inner = doc.construct("node");
    let wire = doc.construct("wire");

    doc.set_value(chart, "name", Some(Value::from("main")));
    doc.set_value(source, "label", Some(Value::from("source")));
    doc.set_value(source, "x", Some(Value::from(1.0)));
    doc.set_value(sink, "label", Some(Value::from("sink")));
    doc.set_value(inner, "label", Some(Value::from("inner")));
    doc.set_reference(wire, "src", Some(inner));
    doc.set_reference(wire, "dst", Some(sink));
    doc.set_value(wire, "kind", Some(Value::from("data")));

    doc.append_child(chart, "wires", wire);
    doc.append_child(chart, "items", source);
    doc.append_child(chart, "items", sink);
    doc.append_child(source, "items", inner);

    ChartRig { doc, chart, source, sink, inner, wire }
}

#[rstest]
fn clone_remaps_references_inside_the_copied_set(mut rig: ChartRig) {
    let mut map = BTreeMap::new();
    let copies = copy_items(&mut rig.doc, &[rig.chart], &mut map);

    assert_eq!(copies.len(), 1);
    let chart_copy = copies[0];
    let wire_copy = rig.doc.children(chart_copy, "wires")[0];
    let source_copy = rig.doc.children(chart_copy, "items")[0];
    let sink_copy = rig.doc.children(chart_copy, "items")[1];
    let inner_copy = rig.doc.children(source_copy, "items")[0];

    assert_eq!(map.get(&rig.source), Some(&source_copy));
    assert_eq!(map.get(&rig.inner), Some(&inner_copy));
    assert_eq!(rig.doc.object(wire_copy).reference("src"), Some(inner_copy));
    assert_eq!(rig.doc.object(wire_copy).reference("dst"), Some(sink_copy));
    assert_eq!(rig.doc.object(inner_copy).scalar("label"), Some(&Value::from("inner")));
    assert_eq!(rig.doc.parent_of(inner_copy), Some(source_copy));
}

#[rstest]
fn clone_keeps_references_leaving_the_copied_set(mut rig: ChartRig) {
    // Copy the wire alone: both endpoints stay outside the copied set.
    let mut map = BTreeMap::new();
    let copies = copy_items(&mut rig.doc, &[rig.wire], &mut map);

    let wire_copy = copies[0];
    assert_ne!(wire_copy, rig.wire);
    assert_eq!(rig.doc.object(wire_copy).reference("src"), Some(rig.inner));
    assert_eq!(rig.doc.object(wire_copy).reference("dst"), Some(rig.sink));
}

#[rstest]
fn clone_leaves_the_originals_untouched(mut rig: ChartRig) {
    let objects_before = rig.doc.len();
    let mut map = BTreeMap::new();
    let copies = copy_items(&mut rig.doc, &[rig.chart], &mut map);

    assert_eq!(rig.doc.len(), objects_before + map.len());
    assert_eq!(rig.doc.object(rig.wire).reference("src"), Some(rig.inner));
    assert_eq!(rig.doc.children(rig.chart, "items").len(), 2);
    // Top-level copies come out unparented.
    assert_eq!(rig.doc.parent_of(copies[0]), None);
}

#[rstest]
fn serialized_record_carries_types_ids_and_set_scalars(rig: ChartRig) {
    let record = serialize(&rig.doc, rig.chart);

    assert_eq!(record["type"], "chart");
    assert_eq!(record["name"], "main");
    assert_eq!(record["id"], rig.chart.as_raw());

    let items = record["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "node");
    assert_eq!(items[0]["label"], "source");
    assert_eq!(items[0]["x"], 1.0);
    // Unset scalars are omitted.
    assert!(items[0].get("y").is_none());

    let wires = record["wires"].as_array().expect("wires array");
    assert_eq!(wires[0]["src"], rig.inner.as_raw());
    assert_eq!(wires[0]["dst"], rig.sink.as_raw());
    assert_eq!(wires[0]["kind"], "data");
}

#[rstest]
fn round_trip_rebuilds_an_isomorphic_graph(mut rig: ChartRig) {
    let record = serialize(&rig.doc, rig.chart);
    let root = deserialize(&mut rig.doc, &record).expect("deserialize");

    assert_ne!(root, rig.chart);
    let doc = &rig.doc;
    assert_eq!(doc.object(root).scalar("name"), Some(&Value::from("main")));

    let items = doc.children(root, "items");
    assert_eq!(items.len(), 2);
    let new_source = items[0];
    let new_sink = items[1];
    assert_eq!(doc.object(new_source).scalar("label"), Some(&Value::from("source")));
    assert_eq!(doc.object(new_source).scalar("x"), Some(&Value::from(1.0)));
    assert_eq!(doc.object(new_sink).scalar("label"), Some(&Value::from("sink")));

    let new_inner = doc.children(new_source, "items")[0];
    assert_eq!(doc.object(new_inner).scalar("label"), Some(&Value::from("inner")));
    assert_eq!(doc.parent_of(new_inner), Some(new_source));

    // The chart template lists wires before items, so the wire is rebuilt
    // before the nodes its references point at.
    let new_wire = doc.children(root, "wires")[0];
    assert_eq!(doc.object(new_wire).reference("src"), Some(new_inner));
    assert_eq!(doc.object(new_wire).reference("dst"), Some(new_sink));
}

#[rstest]
fn reference_to_an_object_outside_the_record_rebuilds_unset(mut rig: ChartRig) {
    // Serializing the wire alone loses its endpoints.
    let record = serialize(&rig.doc, rig.wire);
    let new_wire = deserialize(&mut rig.doc, &record).expect("deserialize");

    assert_eq!(rig.doc.object(new_wire).reference("src"), None);
    assert_eq!(rig.doc.object(new_wire).reference("dst"), None);
    assert_eq!(rig.doc.object(new_wire).scalar("kind"), Some(&Value::from("data")));
}

#[test]
fn deserialize_rejects_non_records() {
    let mut doc = fixtures::document();
    assert_eq!(deserialize(&mut doc, &serde_json::json!(42)), Err(RecordError::NotARecord));
}

#[test]
fn deserialize_rejects_missing_or_unknown_types() {
    let mut doc = fixtures::document();
    assert_eq!(deserialize(&mut doc, &serde_json::json!({})), Err(RecordError::MissingType));
    assert_eq!(
        deserialize(&mut doc, &serde_json::json!({"type": "gadget"})),
        Err(RecordError::UnknownType { type_name: "gadget".to_owned() })
    );
}

#[test]
fn deserialize_rejects_malformed_fields() {
    let mut doc = fixtures::document();
    assert_eq!(
        deserialize(&mut doc, &serde_json::json!({"type": "wire", "src": "nope"})),
        Err(RecordError::InvalidReference { prop: "src" })
    );
    assert_eq!(
        deserialize(&mut doc, &serde_json::json!({"type": "chart", "items": 5})),
        Err(RecordError::InvalidChildList { prop: "items" })
    );
    assert_eq!(
        deserialize(&mut doc, &serde_json::json!({"type": "node", "x": {"bad": true}})),
        Err(RecordError::InvalidScalar { prop: "x" })
    );
}
