// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Priority levels governing selection order.

use serde::{Deserialize, Serialize};

/// Severity tag carried by workstations, storages, and transports.
///
/// Totally ordered with `Critical` greatest. The scheduler and the slot
/// selectors prefer higher priorities and break ties on the smallest id.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

crate::simple_display! {
    Priority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Critical => "critical",
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
