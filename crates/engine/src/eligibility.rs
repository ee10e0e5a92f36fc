// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workstation eligibility: can it progress right now?
//!
//! A workstation is eligible when at least one of three conditions holds,
//! checked in the order that also picks a fresh worker's first step:
//!
//! 1. FLUSH: a staged output can move to an external sink.
//! 2. PRODUCE: every recipe input is staged and every output slot is clear.
//! 3. PICKUP: staged external input exists for an empty recipe slot and
//!    output space is reachable.
//!
//! Producers (no external inputs, no recipe inputs) are eligible whenever an
//! output slot is clear or FLUSH holds. A workstation with neither recipe
//! inputs nor outputs has nothing to do and stays Blocked forever.

use crate::Engine;
use pw_core::{
    EngineHooks, EntityId, ItemKind, StatusChange, StepType, Storage, Workstation,
    WorkstationStatus,
};
use tracing::debug;

impl<Id, It, H> Engine<Id, It, H>
where
    Id: EntityId,
    It: ItemKind,
    H: EngineHooks<Id, It>,
{
    /// Resolve a slot list against the store, silently dropping stale ids.
    pub(crate) fn resolved<'a>(
        &'a self,
        ids: &'a [Id],
    ) -> impl Iterator<Item = (&'a Id, &'a Storage<Id, It>)> + 'a {
        ids.iter().filter_map(|id| self.storages.get(id).map(|storage| (id, storage)))
    }

    /// FLUSH: some staged output can move to an external sink.
    pub(crate) fn flush_ready(&self, ws: &Workstation<Id>) -> bool {
        self.resolved(&ws.ios).any(|(_, ios)| {
            ios.item
                .as_ref()
                .is_some_and(|item| self.resolved(&ws.eos).any(|(_, eos)| eos.can_accept(item)))
        })
    }

    /// PRODUCE: every recipe input staged, every output slot clear.
    pub(crate) fn produce_ready(&self, ws: &Workstation<Id>) -> bool {
        self.resolved(&ws.iis).all(|(_, slot)| slot.has_item())
            && self.resolved(&ws.ios).all(|(_, slot)| slot.is_empty())
    }

    /// PICKUP: staged input exists for an empty recipe slot, and output
    /// space is reachable.
    pub(crate) fn pickup_feasible(&self, ws: &Workstation<Id>) -> bool {
        self.output_space_reachable(ws)
            && self.resolved(&ws.eis).any(|(_, eis)| {
                eis.item
                    .as_ref()
                    .is_some_and(|item| self.resolved(&ws.iis).any(|(_, iis)| iis.can_accept(item)))
            })
    }

    /// A workstation with no external sinks ends its cycle at Process, so
    /// output space is vacuously reachable.
    fn output_space_reachable(&self, ws: &Workstation<Id>) -> bool {
        let mut eos = self.resolved(&ws.eos).peekable();
        eos.peek().is_none() || eos.any(|(_, slot)| slot.is_empty())
    }

    /// Whether the workstation can progress (drives Queued vs Blocked).
    pub(crate) fn eligible(&self, ws: &Workstation<Id>) -> bool {
        let has_eis = self.resolved(&ws.eis).next().is_some();
        let has_iis = self.resolved(&ws.iis).next().is_some();
        let has_ios = self.resolved(&ws.ios).next().is_some();
        if !has_iis && !has_ios {
            return false;
        }
        if !has_eis && !has_iis {
            // producer
            return self.flush_ready(ws) || self.resolved(&ws.ios).any(|(_, s)| s.is_empty());
        }
        self.flush_ready(ws) || self.produce_ready(ws) || self.pickup_feasible(ws)
    }

    /// First step a newly arrived (or resuming) worker runs: FLUSH over
    /// PRODUCE over PICKUP. `None` means nothing can progress.
    pub(crate) fn entry_step(&self, ws: &Workstation<Id>) -> Option<StepType> {
        if self.flush_ready(ws) {
            return Some(StepType::Store);
        }
        let has_eis = self.resolved(&ws.eis).next().is_some();
        let has_iis = self.resolved(&ws.iis).next().is_some();
        if !has_eis && !has_iis {
            let space = self.resolved(&ws.ios).any(|(_, s)| s.is_empty());
            return space.then_some(StepType::Process);
        }
        if self.produce_ready(ws) {
            return Some(StepType::Process);
        }
        if self.pickup_feasible(ws) {
            return Some(StepType::Pickup);
        }
        None
    }

    /// Highest-priority external input whose item some empty recipe slot
    /// accepts; ties broken by smallest id.
    pub(crate) fn select_eis(&self, ws: &Workstation<Id>) -> Option<Id> {
        self.resolved(&ws.eis)
            .filter(|(_, eis)| {
                eis.item
                    .as_ref()
                    .is_some_and(|item| self.resolved(&ws.iis).any(|(_, iis)| iis.can_accept(item)))
            })
            .min_by(|(a_id, a), (b_id, b)| b.priority.cmp(&a.priority).then_with(|| a_id.cmp(b_id)))
            .map(|(id, _)| id.clone())
    }

    /// Highest-priority empty external sink accepting `item`; ties broken by
    /// smallest id.
    pub(crate) fn select_eos(&self, ws: &Workstation<Id>, item: &It) -> Option<Id> {
        self.resolved(&ws.eos)
            .filter(|(_, eos)| eos.can_accept(item))
            .min_by(|(a_id, a), (b_id, b)| b.priority.cmp(&a.priority).then_with(|| a_id.cmp(b_id)))
            .map(|(id, _)| id.clone())
    }

    /// Smallest-id empty recipe slot accepting `item`.
    pub(crate) fn select_iis(&self, ws: &Workstation<Id>, item: &It) -> Option<Id> {
        self.resolved(&ws.iis).filter(|(_, iis)| iis.can_accept(item)).map(|(id, _)| id).min().cloned()
    }

    /// Recompute Blocked/Queued for one workstation and announce a change.
    /// Active workstations are left alone until they release their worker.
    pub(crate) fn refresh_status(&mut self, id: &Id) -> bool {
        let Some(ws) = self.workstations.get(id) else {
            return false;
        };
        if ws.status == WorkstationStatus::Active {
            return false;
        }
        let next = if ws.enabled && self.eligible(ws) {
            WorkstationStatus::Queued
        } else {
            WorkstationStatus::Blocked
        };
        if ws.status == next {
            return false;
        }
        let priority = ws.priority;
        if let Some(ws) = self.workstations.get_mut(id) {
            ws.status = next;
        }
        debug!(workstation = ?id, status = %next, "workstation status");
        let payload = StatusChange { workstation: id.clone(), priority };
        match next {
            WorkstationStatus::Queued => self.hooks.workstation_queued(payload),
            WorkstationStatus::Blocked => self.hooks.workstation_blocked(payload),
            WorkstationStatus::Active => {}
        }
        true
    }

    /// A storage changed: re-evaluate every workstation wired to it.
    /// Transports are stateless and re-checked by the next scheduler pass.
    pub(crate) fn fan_out(&mut self, storage_id: &Id) {
        let affected: Vec<Id> = self
            .workstations
            .iter()
            .filter(|(_, ws)| {
                ws.eis.contains(storage_id)
                    || ws.iis.contains(storage_id)
                    || ws.ios.contains(storage_id)
                    || ws.eos.contains(storage_id)
            })
            .map(|(id, _)| id.clone())
            .collect();
        for ws_id in affected {
            self.refresh_status(&ws_id);
        }
    }
}

#[cfg(test)]
#[path = "eligibility_tests.rs"]
mod tests;
