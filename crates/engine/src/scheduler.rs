// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The assignment pass: bind idle workers to the highest-priority ready work.
//!
//! Level-triggered: a pass inspects the whole world, and a second pass with
//! no intervening event finds nothing left to do. Active work is never
//! preempted.

use crate::Engine;
use pw_core::{
    Assignment, CarryPhase, EngineHooks, EntityId, ItemKind, PickupDanglingStarted, StatusChange,
    StorageRole, Transport, TransportStarted, WorkerAssigned, WorkerChoice, WorkerState,
    WorkstationStatus,
};
use std::cmp::{Ordering, Reverse};
use tracing::{debug, trace};

/// One schedulable unit. Ordering ties go workstations over transports over
/// dangling deliveries, then smallest id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Work<Id> {
    Workstation(Id),
    Transport(Id),
    Dangling(Id),
}

impl<Id, It, H> Engine<Id, It, H>
where
    Id: EntityId,
    It: ItemKind,
    H: EngineHooks<Id, It>,
{
    /// One assignment pass over everything pending. Returns whether any
    /// binding happened.
    pub(crate) fn run_scheduler(&mut self) -> bool {
        let pending = self.pending_work();
        trace!(pending = pending.len(), "scheduler pass");
        let mut changed = false;
        for work in pending {
            let idle: Vec<Id> = self
                .workers
                .iter()
                .filter(|(_, worker)| worker.is_idle())
                .map(|(id, _)| id.clone())
                .collect();
            if idle.is_empty() {
                break;
            }
            let target = match &work {
                Work::Workstation(id) => Some(id.clone()),
                Work::Transport(_) | Work::Dangling(_) => None,
            };
            let worker_id = match self.hooks.find_best_worker(target.as_ref(), &idle) {
                WorkerChoice::Auto => match self.default_pick(target.as_ref(), &idle) {
                    Some(worker_id) => worker_id,
                    None => continue,
                },
                WorkerChoice::Pick(worker_id) if idle.contains(&worker_id) => worker_id,
                WorkerChoice::Pick(_) | WorkerChoice::Skip => continue,
            };
            changed |= match work {
                Work::Workstation(ws_id) => self.bind_workstation(&ws_id, &worker_id),
                Work::Transport(route_id) => self.bind_transport(&route_id, &worker_id),
                Work::Dangling(item_id) => self.bind_dangling(&item_id, &worker_id),
            };
        }
        changed
    }

    /// Everything assignable right now, highest priority first.
    fn pending_work(&self) -> Vec<Work<Id>> {
        let mut items: Vec<(Reverse<pw_core::Priority>, u8, Id, Work<Id>)> = Vec::new();
        for (id, ws) in &self.workstations {
            if ws.status == WorkstationStatus::Queued {
                items.push((Reverse(ws.priority), 0, id.clone(), Work::Workstation(id.clone())));
            }
        }
        for (id, transport) in &self.transports {
            if self.transport_ready(transport) {
                items.push((Reverse(transport.priority), 1, id.clone(), Work::Transport(id.clone())));
            }
        }
        for (id, orphan) in &self.dangling {
            if orphan.assigned_worker.is_none() {
                if let Some(target) = self.dangling_target(&orphan.item) {
                    let priority =
                        self.storages.get(&target).map(|s| s.priority).unwrap_or_default();
                    items.push((Reverse(priority), 2, id.clone(), Work::Dangling(id.clone())));
                }
            }
        }
        items.sort();
        items.into_iter().map(|(_, _, _, work)| work).collect()
    }

    /// A route is ready when unserved, its source holds the routed item, and
    /// its destination can take it.
    fn transport_ready(&self, transport: &Transport<Id, It>) -> bool {
        transport.active_worker.is_none()
            && self
                .storages
                .get(&transport.from)
                .is_some_and(|s| s.item.as_ref() == Some(&transport.item))
            && self.storages.get(&transport.to).is_some_and(|s| s.can_accept(&transport.item))
    }

    /// Best delivery slot for an orphan: an empty accepting external input
    /// that no in-flight delivery has latched; highest priority, smallest id.
    pub(crate) fn dangling_target(&self, item: &It) -> Option<Id> {
        self.storages
            .iter()
            .filter(|&(id, storage)| {
                storage.role == StorageRole::ExternalInput
                    && storage.can_accept(item)
                    && !self.eis_reserved(id)
            })
            .min_by(|(a_id, a), (b_id, b)| b.priority.cmp(&a.priority).then_with(|| a_id.cmp(b_id)))
            .map(|(id, _)| id.clone())
    }

    fn eis_reserved(&self, storage_id: &Id) -> bool {
        self.workers
            .values()
            .any(|w| w.dangling_task.as_ref().is_some_and(|task| &task.target == storage_id))
    }

    /// Engine default when the host answers `Auto`: nearest candidate by the
    /// distance oracle (unmeasured distances last), ties and no-oracle cases
    /// by smallest id.
    fn default_pick(&self, target: Option<&Id>, idle: &[Id]) -> Option<Id> {
        match (&self.distance, target) {
            (Some(distance), Some(target)) => idle
                .iter()
                .min_by(|a, b| match (distance(a, target), distance(b, target)) {
                    (Some(x), Some(y)) => {
                        x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b))
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.cmp(b),
                })
                .cloned(),
            _ => idle.first().cloned(),
        }
    }

    /// Bind a worker to a queued workstation and start its entry step.
    /// Hook order: `worker_assigned`, `workstation_activated`, then the
    /// entry step's `*_started`.
    fn bind_workstation(&mut self, ws_id: &Id, worker_id: &Id) -> bool {
        let entry = {
            let Some(ws) = self.workstations.get(ws_id) else {
                return false;
            };
            if ws.status != WorkstationStatus::Queued {
                return false;
            }
            self.entry_step(ws)
        };
        let Some(step) = entry else {
            self.refresh_status(ws_id);
            return false;
        };
        let priority = {
            let Some(ws) = self.workstations.get_mut(ws_id) else {
                return false;
            };
            ws.assigned_worker = Some(worker_id.clone());
            ws.status = WorkstationStatus::Active;
            ws.process_timer = 0;
            ws.priority
        };
        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.state = WorkerState::Working;
            worker.assignment = Some(Assignment::Workstation { workstation: ws_id.clone() });
        }
        debug!(worker = ?worker_id, workstation = ?ws_id, step = %step, "worker assigned");
        self.hooks.worker_assigned(WorkerAssigned {
            worker: worker_id.clone(),
            workstation: ws_id.clone(),
        });
        self.hooks
            .workstation_activated(StatusChange { workstation: ws_id.clone(), priority });
        if !self.enter_step(ws_id, worker_id, step) {
            // the entry evaporated between eligibility and now
            self.release_workstation_worker(ws_id, worker_id);
        }
        true
    }

    fn bind_transport(&mut self, route_id: &Id, worker_id: &Id) -> bool {
        let (from, to, item) = {
            let Some(transport) = self.transports.get_mut(route_id) else {
                return false;
            };
            if transport.active_worker.is_some() {
                return false;
            }
            transport.active_worker = Some(worker_id.clone());
            (transport.from.clone(), transport.to.clone(), transport.item.clone())
        };
        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.state = WorkerState::Working;
            worker.assignment =
                Some(Assignment::Transport { route: route_id.clone(), phase: CarryPhase::Pickup });
        }
        debug!(worker = ?worker_id, route = ?route_id, "transport started");
        self.hooks.transport_started(TransportStarted {
            worker: worker_id.clone(),
            from,
            to,
            item,
        });
        true
    }

    fn bind_dangling(&mut self, item_id: &Id, worker_id: &Id) -> bool {
        // target re-derived here: an earlier binding in this pass may have
        // reserved the slot found at gather time
        let target = {
            let Some(orphan) = self.dangling.get(item_id) else {
                return false;
            };
            if orphan.assigned_worker.is_some() {
                return false;
            }
            match self.dangling_target(&orphan.item) {
                Some(target) => target,
                None => return false,
            }
        };
        if let Some(orphan) = self.dangling.get_mut(item_id) {
            orphan.assigned_worker = Some(worker_id.clone());
        }
        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.state = WorkerState::Working;
            worker.assignment =
                Some(Assignment::Dangling { item: item_id.clone(), phase: CarryPhase::Pickup });
            worker.dangling_task =
                Some(pw_core::DanglingTask { item: item_id.clone(), target: target.clone() });
        }
        debug!(worker = ?worker_id, item = ?item_id, target = ?target, "dangling pickup started");
        self.hooks.pickup_dangling_started(PickupDanglingStarted {
            worker: worker_id.clone(),
            item: item_id.clone(),
            target_eis: target,
        });
        true
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
