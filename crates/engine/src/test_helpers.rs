// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixtures shared by the engine unit tests.

use crate::Engine;
use pw_core::{RecordingHooks, Storage, StorageRole, WorkstationConfig};

/// Item vocabulary for the tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Good {
    Flour,
    Bread,
    Veg,
    Meat,
    Stew,
}

pub type TestEngine = Engine<u32, Good, RecordingHooks>;

/// Empty engine with a recording hook sink.
pub fn engine() -> TestEngine {
    Engine::new(RecordingHooks::new())
}

/// Flour mill wired 1(EIS, holds Flour) → 2(IIS, accepts Flour) →
/// 3(IOS, accepts Bread) → 4(EOS); workstation 100; no workers.
/// The hook log starts clean.
pub fn mill() -> TestEngine {
    mill_with_duration(0)
}

pub fn mill_with_duration(process_duration: u32) -> TestEngine {
    let mut engine = engine();
    engine.add_storage(1, Storage::new(StorageRole::ExternalInput).item(Good::Flour)).unwrap();
    engine.add_storage(2, Storage::new(StorageRole::InternalInput).accepts(Good::Flour)).unwrap();
    engine.add_storage(3, Storage::new(StorageRole::InternalOutput).accepts(Good::Bread)).unwrap();
    engine.add_storage(4, Storage::new(StorageRole::ExternalOutput)).unwrap();
    engine
        .add_workstation(
            100,
            WorkstationConfig::builder()
                .eis([1])
                .iis([2])
                .ios([3])
                .eos([4])
                .process_duration(process_duration)
                .build(),
        )
        .unwrap();
    engine.hooks_mut().clear();
    engine
}

/// Two-ingredient kitchen: EIS 1 holds Veg, EIS 2 holds Meat, IIS 5 accepts
/// Veg, IIS 6 accepts Meat, IOS 3 produces Stew, EOS 4; workstation 100.
pub fn kitchen() -> TestEngine {
    let mut engine = engine();
    engine.add_storage(1, Storage::new(StorageRole::ExternalInput).item(Good::Veg)).unwrap();
    engine.add_storage(2, Storage::new(StorageRole::ExternalInput).item(Good::Meat)).unwrap();
    engine.add_storage(5, Storage::new(StorageRole::InternalInput).accepts(Good::Veg)).unwrap();
    engine.add_storage(6, Storage::new(StorageRole::InternalInput).accepts(Good::Meat)).unwrap();
    engine.add_storage(3, Storage::new(StorageRole::InternalOutput).accepts(Good::Stew)).unwrap();
    engine.add_storage(4, Storage::new(StorageRole::ExternalOutput)).unwrap();
    engine
        .add_workstation(
            100,
            WorkstationConfig::builder().eis([1, 2]).iis([5, 6]).ios([3]).eos([4]).build(),
        )
        .unwrap();
    engine.hooks_mut().clear();
    engine
}

/// Producer: IOS 3 produces Bread, EOS 4; workstation 100; no inputs at all.
pub fn bakery() -> TestEngine {
    let mut engine = engine();
    engine.add_storage(3, Storage::new(StorageRole::InternalOutput).accepts(Good::Bread)).unwrap();
    engine.add_storage(4, Storage::new(StorageRole::ExternalOutput)).unwrap();
    engine
        .add_workstation(100, WorkstationConfig::builder().ios([3]).eos([4]).build())
        .unwrap();
    engine.hooks_mut().clear();
    engine
}
