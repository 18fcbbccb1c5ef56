#![allow(dead_code)]

use carto_ui::host::{HostCall, RecordingMap};
use carto_ui::types::Image;
use carto_ui::{HostHandle, HostProvider, Scheduler};
use std::cell::RefCell;
use std::rc::Rc;

/// A recording engine already provided to the tree, plus a scheduler to drive bindings
pub struct Harness {
    pub map: Rc<RefCell<RecordingMap>>,
    pub provider: HostProvider,
    pub host: HostHandle,
    pub scheduler: Scheduler,
}

pub fn setup() -> Harness {
    let map = RecordingMap::shared();
    let mut provider = HostProvider::new();
    let host = provider.provide(map.clone());
    Harness {
        map,
        provider,
        host,
        scheduler: Scheduler::new(),
    }
}

impl Harness {
    pub fn take_calls(&self) -> Vec<HostCall> {
        self.map.borrow_mut().take_calls()
    }
}

pub fn tile() -> Image {
    Image::solid(4, 4, [200, 180, 120, 255])
}
