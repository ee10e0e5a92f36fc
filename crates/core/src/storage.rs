// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-slot storages and their roles in the item pipeline.

use crate::priority::Priority;
use serde::{Deserialize, Serialize};

/// Where a storage sits in a workstation's pipeline.
///
/// The role is fixed at creation and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageRole {
    /// Raw input staged outside the workstation (EIS).
    ExternalInput,
    /// Recipe requirement; declares its ingredient via `accepts` (IIS).
    InternalInput,
    /// Recipe output; declares its product via `accepts`, filled when
    /// processing completes (IOS).
    InternalOutput,
    /// Sink for finished output (EOS).
    ExternalOutput,
}

crate::simple_display! {
    StorageRole {
        ExternalInput => "external_input",
        InternalInput => "internal_input",
        InternalOutput => "internal_output",
        ExternalOutput => "external_output",
    }
}

/// One slot of capacity one.
///
/// `accepts` restricts the slot to a single item type (`None` takes
/// anything). Whenever `accepts` is set and the slot is occupied, the
/// contents match it; [`Storage::put`] refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage<Id, It> {
    pub role: StorageRole,
    /// The only item type this slot permits. `None` accepts anything.
    pub accepts: Option<It>,
    /// Contents; `Some` iff the slot holds a unit.
    pub item: Option<It>,
    pub priority: Priority,
    /// Set once the slot is wired into a workstation.
    pub workstation: Option<Id>,
}

impl<Id, It: PartialEq> Storage<Id, It> {
    /// Empty, unowned slot with normal priority.
    pub fn new(role: StorageRole) -> Self {
        Self { role, accepts: None, item: None, priority: Priority::Normal, workstation: None }
    }

    crate::setters! {
        set {
            priority: Priority,
        }
        option {
            accepts: It,
            item: It,
        }
    }

    pub fn has_item(&self) -> bool {
        self.item.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    /// Whether a unit of `item` may be placed here right now.
    pub fn can_accept(&self, item: &It) -> bool {
        self.item.is_none() && self.accepts.as_ref().is_none_or(|accepted| accepted == item)
    }

    /// Place a unit. Refuses an occupied slot or a type the slot does not
    /// permit.
    #[must_use]
    pub fn put(&mut self, item: It) -> bool {
        if !self.can_accept(&item) {
            return false;
        }
        self.item = Some(item);
        true
    }

    /// Take the held unit out of the slot.
    pub fn take(&mut self) -> Option<It> {
        self.item.take()
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
