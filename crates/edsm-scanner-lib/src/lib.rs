//! EDSM scanner library entry points.
//!
//! This crate resolves the star systems around an origin, or along the
//! corridor between an origin and a destination, by walking radius-bounded
//! sphere queries against a [`SystemLookup`] service. Resolved systems can then
//! be hydrated with their bodies through a bounded-concurrency
//! [`DetailFetcher`]. Higher-level consumers (the CLI) should only depend on the
//! items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod edsm;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod geometry;
pub mod journey;
pub mod lookup;
pub mod observer;
pub mod progress;
pub mod resolver;
pub mod system;

pub use config::{ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_SEARCH_RADIUS, MAX_SEARCH_RADIUS};
pub use edsm::{EdsmClient, EdsmConfig};
pub use error::{Error, Result};
pub use fetcher::DetailFetcher;
pub use filter::{
    find_field, matches_all, matches_any_body, matching_bodies, BodyFilter, FieldFilter,
    FieldKind, Filter, Queryable, QueryableField, BODY_FIELDS, SYSTEM_FIELDS,
};
pub use geometry::{distance, distance_to_route, sphere_contains};
pub use journey::{journey_length, plot_journey, JourneyStop};
pub use lookup::SystemLookup;
pub use observer::{NoopObserver, ProgressObserver, ScanEvent, ScanObserver, TracingObserver};
pub use progress::ProgressTracker;
pub use resolver::{DiscoveredSystems, ResolvedSystem, RouteResolver};
pub use system::{BodyRing, SystemBody, SystemDetails, SystemId, SystemPoint, SystemRef};
