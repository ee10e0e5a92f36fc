// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity creation, removal, and late wiring.
//!
//! Creation is the only fallible surface: duplicate ids, undeclared recipe
//! item types, and role mismatches are rejected before any state moves.
//! Removal is always legal; whatever still references the removed id falls
//! out of eligibility on the next re-evaluation.

use crate::{Engine, EngineError};
use pw_core::{
    DanglingItem, EngineHooks, EntityId, ItemKind, Storage, StorageRole, Transport, Worker,
    Workstation, WorkstationConfig,
};
use tracing::debug;

impl<Id, It, H> Engine<Id, It, H>
where
    Id: EntityId,
    It: ItemKind,
    H: EngineHooks<Id, It>,
{
    /// Register a worker. New workers start idle and are offered work
    /// immediately.
    pub fn add_worker(&mut self, id: Id) -> Result<(), EngineError<Id>> {
        if self.workers.contains_key(&id) {
            return Err(EngineError::DuplicateId { id });
        }
        debug!(worker = ?id, "worker added");
        self.workers.insert(id, Worker::new());
        self.run_scheduler();
        Ok(())
    }

    /// Remove a worker, releasing whatever it was doing. Unknown ids are a
    /// no-op.
    pub fn remove_worker(&mut self, id: &Id) -> bool {
        if !self.workers.contains_key(id) {
            return false;
        }
        self.unbind_worker(id);
        self.workers.remove(id);
        debug!(worker = ?id, "worker removed");
        self.run_scheduler();
        true
    }

    /// Register a storage slot. Ownership is only ever granted through
    /// workstation wiring, so any incoming owner mark is dropped.
    pub fn add_storage(&mut self, id: Id, storage: Storage<Id, It>) -> Result<(), EngineError<Id>> {
        if self.storages.contains_key(&id) {
            return Err(EngineError::DuplicateId { id });
        }
        let mut storage = storage;
        storage.workstation = None;
        debug!(storage = ?id, role = %storage.role, "storage added");
        self.storages.insert(id.clone(), storage);
        self.fan_out(&id);
        self.run_scheduler();
        Ok(())
    }

    /// Remove a storage slot. References from workstations and transports
    /// are left dangling and drop out of eligibility on the next pass.
    pub fn remove_storage(&mut self, id: &Id) -> bool {
        if self.storages.remove(id).is_none() {
            return false;
        }
        debug!(storage = ?id, "storage removed");
        self.fan_out(id);
        self.run_scheduler();
        true
    }

    /// Register a workstation wired to existing storages.
    ///
    /// Every listed storage must exist, carry the role its list implies, and
    /// be unowned; internal slots must declare their item type. Nothing is
    /// mutated unless the whole configuration validates.
    pub fn add_workstation(
        &mut self,
        id: Id,
        config: WorkstationConfig<Id>,
    ) -> Result<(), EngineError<Id>> {
        if self.workstations.contains_key(&id) {
            return Err(EngineError::DuplicateId { id });
        }
        self.validate_slots(&config.eis, StorageRole::ExternalInput)?;
        self.validate_slots(&config.iis, StorageRole::InternalInput)?;
        self.validate_slots(&config.ios, StorageRole::InternalOutput)?;
        self.validate_slots(&config.eos, StorageRole::ExternalOutput)?;

        for storage_id in
            config.eis.iter().chain(&config.iis).chain(&config.ios).chain(&config.eos)
        {
            if let Some(storage) = self.storages.get_mut(storage_id) {
                storage.workstation = Some(id.clone());
            }
        }
        debug!(workstation = ?id, "workstation added");
        self.workstations.insert(id.clone(), Workstation::new(config));
        self.refresh_status(&id);
        self.run_scheduler();
        Ok(())
    }

    /// Remove a workstation, releasing its worker and disowning its slots.
    /// Slot contents stay where they are.
    pub fn remove_workstation(&mut self, id: &Id) -> bool {
        let Some(ws) = self.workstations.get(id) else {
            return false;
        };
        let worker = ws.assigned_worker.clone();
        let slots: Vec<Id> =
            ws.eis.iter().chain(&ws.iis).chain(&ws.ios).chain(&ws.eos).cloned().collect();
        if let Some(worker_id) = worker {
            if let Some(w) = self.workers.get_mut(&worker_id) {
                w.release();
            }
            self.hooks.worker_released(pw_core::WorkerReleased {
                worker: worker_id,
                workstation: id.clone(),
            });
        }
        for storage_id in &slots {
            if let Some(storage) = self.storages.get_mut(storage_id) {
                storage.workstation = None;
            }
        }
        self.workstations.remove(id);
        debug!(workstation = ?id, "workstation removed");
        self.run_scheduler();
        true
    }

    /// Register a recurring transport route between two existing storages.
    pub fn add_transport(
        &mut self,
        id: Id,
        transport: Transport<Id, It>,
    ) -> Result<(), EngineError<Id>> {
        if self.transports.contains_key(&id) {
            return Err(EngineError::DuplicateId { id });
        }
        for endpoint in [&transport.from, &transport.to] {
            if !self.storages.contains_key(endpoint) {
                return Err(EngineError::UnknownStorage { id: endpoint.clone() });
            }
        }
        let mut transport = transport;
        transport.active_worker = None;
        debug!(route = ?id, "transport added");
        self.transports.insert(id, transport);
        self.run_scheduler();
        Ok(())
    }

    /// Remove a transport route, aborting any run in flight.
    pub fn remove_transport(&mut self, id: &Id) -> bool {
        let Some(worker) = self.transports.get(id).map(|t| t.active_worker.clone()) else {
            return false;
        };
        if let Some(worker_id) = worker {
            self.unbind_worker(&worker_id);
        }
        self.transports.remove(id);
        debug!(route = ?id, "transport removed");
        self.run_scheduler();
        true
    }

    /// Drop an orphan item into the world. It is offered for delivery
    /// immediately and on every later pass until an accepting slot frees up.
    pub fn add_dangling_item(&mut self, id: Id, item: It) -> Result<(), EngineError<Id>> {
        if self.dangling.contains_key(&id) {
            return Err(EngineError::DuplicateId { id });
        }
        debug!(item = ?id, "dangling item added");
        self.dangling.insert(id, DanglingItem::new(item));
        self.run_scheduler();
        Ok(())
    }

    /// Remove an orphan item, freeing its carrier if one is en route.
    pub fn remove_dangling_item(&mut self, id: &Id) -> bool {
        let Some(worker) = self.dangling.get(id).map(|d| d.assigned_worker.clone()) else {
            return false;
        };
        if let Some(worker_id) = worker {
            if let Some(w) = self.workers.get_mut(&worker_id) {
                w.release();
            }
        }
        self.dangling.remove(id);
        debug!(item = ?id, "dangling item removed");
        self.run_scheduler();
        true
    }

    /// Wire an existing storage into an existing workstation after the fact.
    pub fn attach_storage(
        &mut self,
        storage_id: &Id,
        ws_id: &Id,
        role: StorageRole,
    ) -> Result<(), EngineError<Id>> {
        if !self.workstations.contains_key(ws_id) {
            return Err(EngineError::UnknownWorkstation { id: ws_id.clone() });
        }
        self.validate_slots(std::slice::from_ref(storage_id), role)?;
        if let Some(storage) = self.storages.get_mut(storage_id) {
            storage.workstation = Some(ws_id.clone());
        }
        if let Some(ws) = self.workstations.get_mut(ws_id) {
            match role {
                StorageRole::ExternalInput => ws.eis.push(storage_id.clone()),
                StorageRole::InternalInput => ws.iis.push(storage_id.clone()),
                StorageRole::InternalOutput => ws.ios.push(storage_id.clone()),
                StorageRole::ExternalOutput => ws.eos.push(storage_id.clone()),
            }
        }
        debug!(storage = ?storage_id, workstation = ?ws_id, role = %role, "storage attached");
        self.refresh_status(ws_id);
        self.run_scheduler();
        Ok(())
    }

    fn validate_slots(&self, ids: &[Id], role: StorageRole) -> Result<(), EngineError<Id>> {
        for id in ids {
            let storage = self
                .storages
                .get(id)
                .ok_or_else(|| EngineError::UnknownStorage { id: id.clone() })?;
            if storage.role != role {
                return Err(EngineError::RoleMismatch {
                    id: id.clone(),
                    expected: role,
                    actual: storage.role,
                });
            }
            let internal = matches!(role, StorageRole::InternalInput | StorageRole::InternalOutput);
            if internal && storage.accepts.is_none() {
                return Err(EngineError::MissingAccepts { id: id.clone(), role });
            }
            if let Some(owner) = &storage.workstation {
                return Err(EngineError::StorageOwned { id: id.clone(), owner: owner.clone() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
