// Test utilities used across `edsm-scanner-cli` unit tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use edsm_scanner_lib::{
    Result, SystemBody, SystemDetails, SystemId, SystemLookup, SystemPoint, SystemRef,
};

/// A system on the x axis with a known body count.
pub fn system(id: u64, name: &str, x: f64, body_count: u32) -> SystemRef {
    let mut system = SystemRef::new(Some(SystemId::new(id)), name, SystemPoint::new(x, 0.0, 0.0));
    system.distance = x;
    system.body_count = Some(body_count);
    system
}

/// Lookup answering sphere queries from a fixed table.
#[derive(Default)]
pub struct StaticLookup {
    spheres: HashMap<String, Vec<SystemRef>>,
    bodies: HashMap<String, Vec<SystemBody>>,
    detail_calls: AtomicUsize,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sphere(mut self, name: &str, systems: Vec<SystemRef>) -> Self {
        self.spheres.insert(name.to_lowercase(), systems);
        self
    }

    /// Number of planets returned when `name`'s details are fetched.
    pub fn discovered(self, name: &str, bodies: usize) -> Self {
        let planets = (0..bodies)
            .map(|i| SystemBody {
                name: format!("{} {}", name, i + 1),
                body_type: "Planet".to_string(),
                ..SystemBody::default()
            })
            .collect();
        self.bodies(name, planets)
    }

    /// Exact bodies returned when `name`'s details are fetched.
    pub fn bodies(mut self, name: &str, bodies: Vec<SystemBody>) -> Self {
        self.bodies.insert(name.to_lowercase(), bodies);
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

impl SystemLookup for StaticLookup {
    fn search_nearby(&self, name: &str, _radius: f64) -> Result<Vec<SystemRef>> {
        Ok(self
            .spheres
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_details(&self, system: &SystemRef) -> Result<SystemDetails> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let bodies = self
            .bodies
            .get(&system.name.to_lowercase())
            .cloned()
            .unwrap_or_default();
        Ok(SystemDetails {
            system: system.clone(),
            body_count: system.body_count,
            bodies: Some(bodies),
            url: format!("test://{}", system.name),
        })
    }
}
