// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation errors for entity creation and wiring.

use pw_core::StorageRole;
use std::fmt;
use thiserror::Error;

/// Rejections surfaced when entities are created, removed, or wired.
///
/// Runtime notifications never error: stale or unknown events answer `false`
/// and leave state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError<Id: fmt::Debug> {
    #[error("duplicate id {id:?}")]
    DuplicateId { id: Id },

    #[error("unknown storage {id:?}")]
    UnknownStorage { id: Id },

    #[error("unknown workstation {id:?}")]
    UnknownWorkstation { id: Id },

    #[error("storage {id:?} declares no item type for role {role}")]
    MissingAccepts { id: Id, role: StorageRole },

    #[error("storage {id:?} has role {actual}, slot list needs {expected}")]
    RoleMismatch { id: Id, expected: StorageRole, actual: StorageRole },

    #[error("storage {id:?} already belongs to workstation {owner:?}")]
    StorageOwned { id: Id, owner: Id },
}
