// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared test schema: a minimal dataflow-chart domain.

use super::document::Document;
use super::template::{Property, Template};

pub(crate) static CHART: Template = Template::new(
    "chart",
    &[
        Property::id("id"),
        Property::scalar("name"),
        Property::child_list("wires"),
        Property::child_list("items"),
    ],
);

pub(crate) static NODE: Template = Template::new(
    "node",
    &[
        Property::id("id"),
        Property::scalar("x"),
        Property::scalar("y"),
        Property::scalar("label"),
        Property::child_list("items"),
    ],
);

pub(crate) static WIRE: Template = Template::new(
    "wire",
    &[
        Property::id("id"),
        Property::reference("src"),
        Property::reference("dst"),
        Property::scalar("kind"),
    ],
);

pub(crate) static SCHEMA: [&Template; 3] = [&CHART, &NODE, &WIRE];

pub(crate) fn document() -> Document {
    Document::new(&SCHEMA)
}
