//! Common test utilities: an in-memory lookup service and recording observers.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use edsm_scanner_lib::{
    Error, ProgressObserver, Result, ScanEvent, ScanObserver, SystemDetails, SystemId,
    SystemLookup, SystemPoint, SystemRef,
};

/// Build a system with an identity at the given coordinates.
#[allow(dead_code)]
pub fn system(id: u64, name: &str, x: f64, y: f64, z: f64) -> SystemRef {
    SystemRef::new(Some(SystemId::new(id)), name, SystemPoint::new(x, y, z))
}

/// Lookup service answering from canned sphere results.
///
/// Radius-specific answers registered with [`MockLookup::sphere_at`] take
/// precedence over the generic ones from [`MockLookup::sphere`].
#[derive(Default)]
pub struct MockLookup {
    spheres: HashMap<String, Vec<SystemRef>>,
    sized_spheres: HashMap<(String, u64), Vec<SystemRef>>,
    failing_searches: HashSet<String>,
    failing_details: HashSet<String>,
    detail_delay: Duration,
    searches: Mutex<Vec<(String, f64)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    detail_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sphere(mut self, name: &str, systems: Vec<SystemRef>) -> Self {
        self.spheres.insert(name.to_lowercase(), systems);
        self
    }

    pub fn sphere_at(mut self, name: &str, radius: f64, systems: Vec<SystemRef>) -> Self {
        self.sized_spheres
            .insert((name.to_lowercase(), radius.to_bits()), systems);
        self
    }

    pub fn failing_search(mut self, name: &str) -> Self {
        self.failing_searches.insert(name.to_lowercase());
        self
    }

    pub fn failing_details(mut self, name: &str) -> Self {
        self.failing_details.insert(name.to_lowercase());
        self
    }

    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = delay;
        self
    }

    /// Every sphere query made so far, in order.
    pub fn searches(&self) -> Vec<(String, f64)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

impl SystemLookup for MockLookup {
    fn search_nearby(&self, name: &str, radius: f64) -> Result<Vec<SystemRef>> {
        self.searches
            .lock()
            .unwrap()
            .push((name.to_string(), radius));

        let key = name.to_lowercase();
        if self.failing_searches.contains(&key) {
            return Err(Error::Lookup {
                message: format!("search for {name} failed"),
            });
        }

        let systems = self
            .sized_spheres
            .get(&(key.clone(), radius.to_bits()))
            .or_else(|| self.spheres.get(&key))
            .cloned()
            .unwrap_or_default();
        Ok(systems)
    }

    fn fetch_details(&self, system: &SystemRef) -> Result<SystemDetails> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.detail_delay.is_zero() {
            thread::sleep(self.detail_delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_details.contains(&system.name.to_lowercase()) {
            return Err(Error::Lookup {
                message: format!("details for {} failed", system.name),
            });
        }

        Ok(SystemDetails {
            system: system.clone(),
            body_count: system.body_count,
            bodies: Some(Vec::new()),
            url: format!("mock://{}", system.name),
        })
    }
}

/// Records scan milestones.
#[allow(dead_code)]
#[derive(Default)]
pub struct EventRecorder {
    events: Mutex<Vec<ScanEvent>>,
}

#[allow(dead_code)]
impl EventRecorder {
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn escalations(&self) -> Vec<(f64, f64)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ScanEvent::RadiusEscalated { from, to, .. } => Some((from, to)),
                _ => None,
            })
            .collect()
    }
}

impl ScanObserver for EventRecorder {
    fn on_event(&self, event: &ScanEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Records progress updates.
#[allow(dead_code)]
#[derive(Default)]
pub struct ProgressRecorder {
    updates: Mutex<Vec<usize>>,
    finished: Mutex<Vec<(usize, usize)>>,
}

#[allow(dead_code)]
impl ProgressRecorder {
    pub fn updates(&self) -> Vec<usize> {
        self.updates.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<(usize, usize)> {
        self.finished.lock().unwrap().clone()
    }
}

impl ProgressObserver for ProgressRecorder {
    fn on_progress(&self, completed: usize, _total: usize) {
        self.updates.lock().unwrap().push(completed);
    }

    fn on_finished(&self, completed: usize, total: usize) {
        self.finished.lock().unwrap().push((completed, total));
    }
}
