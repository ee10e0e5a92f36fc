// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring transport routes between two storages.

use crate::priority::Priority;
use serde::{Deserialize, Serialize};

/// A standing order to ferry one unit of `item` from `from` to `to`.
///
/// The route is ready whenever the source holds the item, the destination
/// can take it, and no worker is already serving it. It re-qualifies after
/// every completed run; routes are removed only by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transport<Id, It> {
    pub from: Id,
    pub to: Id,
    pub item: It,
    pub priority: Priority,
    pub active_worker: Option<Id>,
}

impl<Id, It> Transport<Id, It> {
    pub fn new(from: Id, to: Id, item: It) -> Self {
        Self { from, to, item, priority: Priority::Normal, active_worker: None }
    }

    crate::setters! {
        set {
            priority: Priority,
        }
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
