// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orphan items dropped into the world.

use serde::{Deserialize, Serialize};

/// An item not held by any storage, awaiting delivery to an empty external
/// input slot that accepts its type. Created by the host, removed once
/// delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingItem<Id, It> {
    pub item: It,
    /// Worker currently ferrying this item, if any.
    pub assigned_worker: Option<Id>,
}

impl<Id, It> DanglingItem<Id, It> {
    pub fn new(item: It) -> Self {
        Self { item, assigned_worker: None }
    }
}
