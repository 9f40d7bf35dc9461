use std::sync::Arc;

use crate::error::Result;
use crate::system::{SystemDetails, SystemRef};

/// Radius-bounded lookup service consulted by the resolver and the fetcher.
///
/// Implementations own transport concerns (HTTP, auth, rate limiting,
/// timeouts). Calls may block; the detail fetcher invokes
/// [`SystemLookup::fetch_details`] from several threads at once.
pub trait SystemLookup: Send + Sync {
    /// Systems within `radius` light-years of the system called `name`.
    ///
    /// An unknown name yields an empty list rather than an error.
    fn search_nearby(&self, name: &str, radius: f64) -> Result<Vec<SystemRef>>;

    /// Bodies and provenance for a single system.
    fn fetch_details(&self, system: &SystemRef) -> Result<SystemDetails>;
}

impl<T: SystemLookup + ?Sized> SystemLookup for &T {
    fn search_nearby(&self, name: &str, radius: f64) -> Result<Vec<SystemRef>> {
        (**self).search_nearby(name, radius)
    }

    fn fetch_details(&self, system: &SystemRef) -> Result<SystemDetails> {
        (**self).fetch_details(system)
    }
}

impl<T: SystemLookup + ?Sized> SystemLookup for Arc<T> {
    fn search_nearby(&self, name: &str, radius: f64) -> Result<Vec<SystemRef>> {
        (**self).search_nearby(name, radius)
    }

    fn fetch_details(&self, system: &SystemRef) -> Result<SystemDetails> {
        (**self).fetch_details(system)
    }
}
