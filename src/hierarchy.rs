// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parent-pointer tree algorithms used by domain schemas to keep
//! structural invariants.

use std::collections::BTreeSet;

use crate::model::{Document, ObjectId};

/// The chain `[item, parent, grandparent, ..]` up to and including the
/// root.
pub fn lineage(doc: &Document, item: ObjectId) -> Vec<ObjectId> {
    let mut chain = vec![item];
    let mut current = item;
    while let Some(parent) = doc.object(current).parent() {
        chain.push(parent);
        current = parent;
    }
    chain
}

/// The lowest common ancestor of `items`; `None` when they span disjoint
/// trees or `items` is empty. More than two items fold pairwise.
pub fn lowest_common_ancestor(doc: &Document, items: &[ObjectId]) -> Option<ObjectId> {
    let (&first, rest) = items.split_first()?;
    rest.iter().try_fold(first, |acc, &item| lca_pair(doc, acc, item))
}

fn lca_pair(doc: &Document, a: ObjectId, b: ObjectId) -> Option<ObjectId> {
    let lineage_a = lineage(doc, a);
    let lineage_b = lineage(doc, b);

    // Walk both chains from equal height until they coincide.
    let skip_a = lineage_a.len().saturating_sub(lineage_b.len());
    let skip_b = lineage_b.len().saturating_sub(lineage_a.len());
    lineage_a[skip_a..]
        .iter()
        .zip(&lineage_b[skip_b..])
        .find(|(x, y)| x == y)
        .map(|(&x, _)| x)
}

/// Whether any strict ancestor of `item` is in `set`.
pub fn ancestor_in_set(doc: &Document, item: ObjectId, set: &BTreeSet<ObjectId>) -> bool {
    let mut current = item;
    while let Some(parent) = doc.object(current).parent() {
        if set.contains(&parent) {
            return true;
        }
        current = parent;
    }
    false
}

/// Filters `items` down to those with no ancestor in `set` — collapsing a
/// selection to its outermost elements before a group copy or delete.
pub fn reduce_to_roots(
    doc: &Document,
    items: &[ObjectId],
    set: &BTreeSet<ObjectId>,
) -> Vec<ObjectId> {
    items.iter().copied().filter(|&item| !ancestor_in_set(doc, item, set)).collect()
}
