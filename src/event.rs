// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synchronous event broadcast.
//!
//! Handlers run in registration order with no error isolation: a panicking
//! handler aborts the rest of the dispatch, which is the wanted fail-fast
//! behavior for internal consistency bugs.

use std::fmt;
use std::rc::Rc;

/// A subscriber to an [`EventHub`].
///
/// Handler identity is the `Rc` allocation: registering a clone of an
/// already-registered handler is a no-op, and removal must be given a clone
/// of the original registration.
pub type Handler<E> = Rc<dyn Fn(&E)>;

pub struct EventHub<E> {
    handlers: Vec<Handler<E>>,
}

impl<E> EventHub<E> {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Registers `handler`. Registering the same handler twice keeps one.
    pub fn add_handler(&mut self, handler: &Handler<E>) {
        if self.handlers.iter().any(|h| Rc::ptr_eq(h, handler)) {
            return;
        }
        self.handlers.push(handler.clone());
    }

    /// Unregisters `handler`; unknown handlers are ignored.
    pub fn remove_handler(&mut self, handler: &Handler<E>) {
        self.handlers.retain(|h| !Rc::ptr_eq(h, handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Invokes every handler with `event`, in registration order.
    pub fn emit(&self, event: &E) {
        for handler in &self.handlers {
            handler(event);
        }
    }
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub").field("handlers", &self.handlers.len()).finish()
    }
}
