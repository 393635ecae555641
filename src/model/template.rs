// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Property descriptors and per-type templates.
//!
//! Templates are process-wide constants: each domain type declares one
//! `static` [`Template`] listing its properties, shared by every instance
//! of the type and never mutated afterwards.

/// The kind of accessor a [`Property`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A plain value stored directly on the owner.
    Scalar,
    /// The id of another object, resolved through the document arena.
    Reference,
    /// An ordered, exclusively owned list of child objects.
    ChildList,
    /// Read-only accessor for the owner's own id.
    Id,
}

/// A named, typed accessor descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    name: &'static str,
    kind: PropertyKind,
}

impl Property {
    pub const fn scalar(name: &'static str) -> Self {
        Self { name, kind: PropertyKind::Scalar }
    }

    pub const fn reference(name: &'static str) -> Self {
        Self { name, kind: PropertyKind::Reference }
    }

    pub const fn child_list(name: &'static str) -> Self {
        Self { name, kind: PropertyKind::ChildList }
    }

    pub const fn id(name: &'static str) -> Self {
        Self { name, kind: PropertyKind::Id }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }
}

/// The fixed property list for one object type.
#[derive(Debug, PartialEq, Eq)]
pub struct Template {
    type_name: &'static str,
    properties: &'static [Property],
}

impl Template {
    pub const fn new(type_name: &'static str, properties: &'static [Property]) -> Self {
        Self { type_name, properties }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn properties(&self) -> &'static [Property] {
        self.properties
    }

    pub fn property(&self, name: &str) -> Option<Property> {
        self.properties.iter().find(|p| p.name == name).copied()
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }
}
