// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Marker bounds for the host's opaque identifier and item types.

use std::fmt;
use std::hash::Hash;

/// What the engine needs from a host identifier: equality, hashing, and a
/// total order. The order backs every smallest-id tiebreak, so it must be
/// stable for the lifetime of the entity. `Debug` is consumed only by
/// diagnostics (`dump_state`, log fields).
pub trait EntityId: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> EntityId for T {}

/// What the engine needs from the host's item type: a finite enumeration
/// compared by equality. `Debug` is consumed only by diagnostics.
pub trait ItemKind: Clone + Eq + fmt::Debug {}

impl<T: Clone + Eq + fmt::Debug> ItemKind for T {}
