// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use galatea::model::{Document, ObjectId, Property, Template, Value};

pub static CHART: Template = Template::new(
    "chart",
    &[
        Property::id("id"),
        Property::scalar("name"),
        Property::child_list("wires"),
        Property::child_list("items"),
    ],
);

pub static NODE: Template = Template::new(
    "node",
    &[
        Property::id("id"),
        Property::scalar("x"),
        Property::scalar("y"),
        Property::scalar("label"),
        Property::child_list("items"),
    ],
);

pub static WIRE: Template = Template::new(
    "wire",
    &[
        Property::id("id"),
        Property::reference("src"),
        Property::reference("dst"),
        Property::scalar("kind"),
    ],
);

pub static SCHEMA: [&Template; 3] = [&CHART, &NODE, &WIRE];

/// A flat chart with `nodes` labelled nodes and `wires` cross-references.
pub fn chart(nodes: usize, wires: usize) -> (Document, ObjectId) {
    assert!(nodes >= 2, "chart fixture needs >= 2 nodes");

    let mut doc = Document::new(&SCHEMA);
    let chart = doc.construct("chart");
    doc.set_value(chart, "name", Some(Value::from("bench")));

    let mut node_ids = Vec::with_capacity(nodes);
    for idx in 0..nodes {
        let node = doc.construct("node");
        doc.set_value(node, "x", Some(Value::from((idx % 64) as f64)));
        doc.set_value(node, "y", Some(Value::from((idx / 64) as f64)));
        doc.set_value(node, "label", Some(Value::from(format!("bench_node_{idx:05}"))));
        doc.append_child(chart, "items", node);
        node_ids.push(node);
    }

    for idx in 0..wires {
        let from_index = (idx.wrapping_mul(7)) % node_ids.len();
        let mut to_index = (idx.wrapping_mul(7).wrapping_add(3)) % node_ids.len();
        if to_index == from_index {
            to_index = (to_index + 1) % node_ids.len();
        }
        let wire = doc.construct("wire");
        doc.set_reference(wire, "src", Some(node_ids[from_index]));
        doc.set_reference(wire, "dst", Some(node_ids[to_index]));
        doc.set_value(wire, "kind", Some(Value::from("data")));
        doc.append_child(chart, "wires", wire);
    }

    (doc, chart)
}

pub fn chart_nodes(doc: &Document, chart: ObjectId) -> Vec<ObjectId> {
    doc.children(chart, "items").to_vec()
}
