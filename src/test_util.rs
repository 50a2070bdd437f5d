//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};
use std::sync::{Arc, Once};

use crate::Component;

/// Initializes the logger once for the whole test binary.
pub(crate) fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(env_logger::init);
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[component(uuid = "6a1f4f2e-9f93-4db0-8c11-0d1fca2a2b01", archec_as(crate))]
pub(crate) struct Position {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[component(uuid = "6a1f4f2e-9f93-4db0-8c11-0d1fca2a2b02", archec_as(crate))]
pub(crate) struct Velocity {
    pub(crate) dx: f32,
    pub(crate) dy: f32,
}

/// A component that owns heap memory, for destructor coverage.
#[derive(Component, Debug, Clone, PartialEq)]
#[component(uuid = "6a1f4f2e-9f93-4db0-8c11-0d1fca2a2b03", archec_as(crate))]
pub(crate) struct Label(pub(crate) String);

/// A zero-sized marker component.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[component(uuid = "6a1f4f2e-9f93-4db0-8c11-0d1fca2a2b04", archec_as(crate))]
pub(crate) struct Tag;

/// Increments a shared counter when dropped.
#[derive(Component, Debug)]
#[component(uuid = "6a1f4f2e-9f93-4db0-8c11-0d1fca2a2b05", archec_as(crate))]
pub(crate) struct DropTally(pub(crate) Arc<AtomicUsize>);

impl Drop for DropTally {
    fn drop(&mut self) {
        self.0.fetch_add(1, Relaxed);
    }
}
