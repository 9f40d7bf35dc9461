//! Observer hooks for scan milestones and detail-fetch progress.
//!
//! The resolver and fetcher never print anything; callers decide how to render
//! these events. [`TracingObserver`] forwards them to `tracing`, and
//! [`NoopObserver`] discards them.

use tracing::{debug, info, warn};

/// Milestones emitted while resolving systems.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// A resolution run started.
    SearchStarted {
        origin: String,
        destination: Option<String>,
        radius: f64,
    },
    /// Both ends of a corridor were found.
    EndpointsResolved {
        origin: String,
        destination: String,
        distance: f64,
    },
    /// The corridor search continues from `name`.
    HopSelected {
        name: String,
        distance_to_destination: f64,
        radius: f64,
    },
    /// The search revisited a sphere and widened its radius.
    RadiusEscalated { at: String, from: f64, to: f64 },
    /// A query added `new` previously unseen systems.
    SystemsDiscovered { new: usize, total: usize },
    /// The destination fell inside the latest sphere.
    DestinationReached { total: usize },
    /// The search stopped early because enough systems were found.
    MaxResultsReached { total: usize, limit: usize },
    /// The resolution run finished successfully.
    SearchCompleted { total: usize },
}

/// Receives [`ScanEvent`]s from the resolver.
pub trait ScanObserver: Send + Sync {
    fn on_event(&self, event: &ScanEvent);
}

/// Receives counter updates from a [`crate::progress::ProgressTracker`].
pub trait ProgressObserver: Send + Sync {
    /// Called after every increment with the new completed count.
    fn on_progress(&self, completed: usize, total: usize);

    /// Called exactly once when the tracked operation ends, successfully or not.
    fn on_finished(&self, completed: usize, total: usize);
}

impl<F> ScanObserver for F
where
    F: Fn(&ScanEvent) + Send + Sync,
{
    fn on_event(&self, event: &ScanEvent) {
        self(event)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn on_event(&self, _event: &ScanEvent) {}
}

impl ProgressObserver for NoopObserver {
    fn on_progress(&self, _completed: usize, _total: usize) {}

    fn on_finished(&self, _completed: usize, _total: usize) {}
}

/// Observer that turns events into structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_event(&self, event: &ScanEvent) {
        match event {
            ScanEvent::SearchStarted {
                origin,
                destination,
                radius,
            } => info!(
                origin = %origin,
                destination = destination.as_deref().unwrap_or("-"),
                radius,
                "searching for systems"
            ),
            ScanEvent::EndpointsResolved {
                origin,
                destination,
                distance,
            } => info!(
                origin = %origin,
                destination = %destination,
                distance = distance.round(),
                "resolved route endpoints"
            ),
            ScanEvent::HopSelected {
                name,
                distance_to_destination,
                radius,
            } => debug!(
                hop = %name,
                remaining = distance_to_destination.round(),
                radius,
                "continuing search"
            ),
            ScanEvent::RadiusEscalated { at, from, to } => {
                warn!(at = %at, from, to, "search revisited a sphere; widening radius")
            }
            ScanEvent::SystemsDiscovered { new, total } => {
                debug!(new, total, "merged sphere results")
            }
            ScanEvent::DestinationReached { total } => info!(total, "destination reached"),
            ScanEvent::MaxResultsReached { total, limit } => {
                info!(total, limit, "maximum result count reached")
            }
            ScanEvent::SearchCompleted { total } => info!(total, "found systems"),
        }
    }
}

impl ProgressObserver for TracingObserver {
    fn on_progress(&self, completed: usize, total: usize) {
        debug!(completed, total, "scanned systems");
    }

    fn on_finished(&self, completed: usize, total: usize) {
        info!(completed, total, "finished scanning systems");
    }
}
