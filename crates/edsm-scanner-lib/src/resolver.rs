//! System resolution around an origin or along a corridor to a destination.
//!
//! This module provides:
//! - [`RouteResolver`] - drives sphere queries against a [`SystemLookup`]
//! - [`ResolvedSystem`] - a discovered system measured from the origin
//! - [`DiscoveredSystems`] - identity-keyed, insertion-ordered system set
//!
//! # Corridor search
//!
//! A single sphere query rarely spans the gap between two distant systems. The
//! resolver walks from the origin toward the destination: each step queries a
//! sphere around the system (from the previous sphere) that lies closest to the
//! destination, until the destination falls inside the latest sphere. When the
//! walk returns to a sphere it already queried, the radius is widened once to
//! the escalation ceiling; a second revisit at the ceiling is fatal.
//!
//! # Example
//!
//! ```ignore
//! use edsm_scanner_lib::{EdsmClient, RouteResolver};
//!
//! let client = EdsmClient::from_env()?;
//! let systems = RouteResolver::new(&client).resolve("Sol", Some("Colonia"), 100.0, 500)?;
//! for resolved in systems.iter().take(10) {
//!     println!("{}", resolved.system);
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::{ScanConfig, MAX_SEARCH_RADIUS};
use crate::error::{Error, Result};
use crate::geometry::{distance_to_route, sphere_contains};
use crate::lookup::SystemLookup;
use crate::observer::{NoopObserver, ScanEvent, ScanObserver};
use crate::system::{fuzzy_name_matches, SystemId, SystemRef};

/// Number of name suggestions attached to not-found errors.
const SUGGESTION_LIMIT: usize = 3;

/// A discovered system together with metrics derived after resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSystem {
    pub system: SystemRef,
    /// Distance from the resolved origin, in light-years.
    pub distance_from_origin: f64,
    /// Perpendicular distance from the origin-destination line, when a
    /// destination was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_deviation: Option<f64>,
}

impl ResolvedSystem {
    /// Measure `system` from `origin` without touching the lookup's distance.
    pub fn from_origin(origin: &SystemRef, system: SystemRef) -> Self {
        let distance_from_origin = origin.coords.distance_to(&system.coords);
        Self {
            system,
            distance_from_origin,
            route_deviation: None,
        }
    }
}

/// Systems keyed by identity, kept in the order they were first seen.
///
/// Systems without an identity are never considered duplicates.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredSystems {
    systems: Vec<SystemRef>,
    index: HashMap<SystemId, usize>,
}

impl DiscoveredSystems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `batch` into the set and return how many systems were new.
    ///
    /// A system already present keeps its earlier entry.
    pub fn merge<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = SystemRef>,
    {
        let before = self.systems.len();
        for system in batch {
            match system.id {
                Some(id) => {
                    if self.index.contains_key(&id) {
                        continue;
                    }
                    self.index.insert(id, self.systems.len());
                    self.systems.push(system);
                }
                None => self.systems.push(system),
            }
        }
        self.systems.len() - before
    }

    pub fn get(&self, id: SystemId) -> Option<&SystemRef> {
        self.index.get(&id).map(|&idx| &self.systems[idx])
    }

    pub fn contains(&self, id: SystemId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemRef> {
        self.systems.iter()
    }

    pub fn into_vec(self) -> Vec<SystemRef> {
        self.systems
    }
}

/// One sphere query already performed.
#[derive(Debug)]
struct Sphere {
    center: SystemRef,
    radius: f64,
    systems: Vec<SystemRef>,
}

/// Resolves systems near an origin or along an origin-destination corridor.
pub struct RouteResolver<L> {
    lookup: L,
    observer: Arc<dyn ScanObserver>,
    escalation_ceiling: f64,
}

impl<L: SystemLookup> RouteResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            observer: Arc::new(NoopObserver),
            escalation_ceiling: MAX_SEARCH_RADIUS,
        }
    }

    /// Receive milestones while resolving.
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Radius used when the corridor search has to widen its spheres.
    pub fn with_escalation_ceiling(mut self, ceiling: f64) -> Self {
        self.escalation_ceiling = ceiling;
        self
    }

    /// Resolve using the radius, result limit and escalation ceiling from
    /// `config`. The ceiling in `config` takes precedence over the one set with
    /// [`RouteResolver::with_escalation_ceiling`].
    pub fn resolve_with(
        &self,
        origin: &str,
        destination: Option<&str>,
        config: &ScanConfig,
    ) -> Result<Vec<ResolvedSystem>> {
        self.search(
            origin,
            destination,
            config.radius,
            config.max_results,
            config.escalation_ceiling,
        )
    }

    /// Resolve the systems around `origin`, or along the corridor to
    /// `destination` when one is given.
    ///
    /// Without a destination the systems are ordered by distance from the
    /// origin. With one, they are ordered by deviation from the straight line
    /// between the endpoints, so truncating the result keeps the tightest
    /// corridor. Every failure discards the partial search.
    pub fn resolve(
        &self,
        origin: &str,
        destination: Option<&str>,
        radius: f64,
        max_results: usize,
    ) -> Result<Vec<ResolvedSystem>> {
        self.search(origin, destination, radius, max_results, self.escalation_ceiling)
    }

    fn search(
        &self,
        origin: &str,
        destination: Option<&str>,
        radius: f64,
        max_results: usize,
        ceiling: f64,
    ) -> Result<Vec<ResolvedSystem>> {
        self.observer.on_event(&ScanEvent::SearchStarted {
            origin: origin.to_string(),
            destination: destination.map(str::to_string),
            radius,
        });

        let resolved = match destination {
            None => self.resolve_nearby(origin, radius)?,
            Some(destination) => {
                self.resolve_corridor(origin, destination, radius, max_results, ceiling)?
            }
        };

        self.observer.on_event(&ScanEvent::SearchCompleted {
            total: resolved.len(),
        });
        Ok(resolved)
    }

    fn resolve_nearby(&self, origin_name: &str, radius: f64) -> Result<Vec<ResolvedSystem>> {
        let systems = self.lookup.search_nearby(origin_name, radius)?;
        let origin = find_named(&systems, origin_name)
            .cloned()
            .ok_or_else(|| Error::OriginNotFound {
                name: origin_name.to_string(),
                suggestions: suggestions(origin_name, &systems),
            })?;

        let mut resolved: Vec<ResolvedSystem> = systems
            .into_iter()
            .map(|system| ResolvedSystem::from_origin(&origin, system))
            .collect();
        resolved.sort_by(|a, b| {
            a.distance_from_origin
                .partial_cmp(&b.distance_from_origin)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(resolved)
    }

    fn resolve_corridor(
        &self,
        origin_name: &str,
        destination_name: &str,
        radius: f64,
        max_results: usize,
        ceiling: f64,
    ) -> Result<Vec<ResolvedSystem>> {
        let initial = self.lookup.search_nearby(origin_name, radius)?;
        let origin = find_named(&initial, origin_name)
            .cloned()
            .ok_or_else(|| Error::OriginNotFound {
                name: origin_name.to_string(),
                suggestions: suggestions(origin_name, &initial),
            })?;

        let destination_systems = self.lookup.search_nearby(destination_name, radius)?;
        let destination = find_named(&destination_systems, destination_name)
            .cloned()
            .ok_or_else(|| Error::DestinationNotFound {
                name: destination_name.to_string(),
                suggestions: suggestions(destination_name, &destination_systems),
            })?;

        self.observer.on_event(&ScanEvent::EndpointsResolved {
            origin: origin.name.clone(),
            destination: destination.name.clone(),
            distance: origin.coords.distance_to(&destination.coords),
        });

        let mut discovered = DiscoveredSystems::new();
        let added = discovered.merge(initial.iter().cloned());
        self.report_discovered(added, &discovered);

        let mut centers = vec![origin.name.clone()];
        let mut current = Sphere {
            center: origin.clone(),
            radius,
            systems: initial,
        };
        let mut working_radius = radius;

        loop {
            if discovered.len() >= max_results {
                self.observer.on_event(&ScanEvent::MaxResultsReached {
                    total: discovered.len(),
                    limit: max_results,
                });
                break;
            }

            if sphere_contains(&current.center.coords, current.radius, &destination.coords) {
                let added = discovered.merge(destination_systems);
                self.report_discovered(added, &discovered);
                self.observer.on_event(&ScanEvent::DestinationReached {
                    total: discovered.len(),
                });
                break;
            }

            let next = closest_to(&current.systems, &destination)
                .cloned()
                .ok_or_else(|| Error::NoRouteFound {
                    name: current.center.name.clone(),
                    radius: current.radius,
                })?;

            if centers.iter().any(|center| next.matches_name(center)) {
                if working_radius >= ceiling {
                    return Err(Error::RouteStuck {
                        radius: working_radius,
                    });
                }
                self.observer.on_event(&ScanEvent::RadiusEscalated {
                    at: next.name.clone(),
                    from: working_radius,
                    to: ceiling,
                });
                working_radius = ceiling;
            } else {
                working_radius = radius;
            }

            self.observer.on_event(&ScanEvent::HopSelected {
                name: next.name.clone(),
                distance_to_destination: next.coords.distance_to(&destination.coords),
                radius: working_radius,
            });

            let results = self.lookup.search_nearby(&next.name, working_radius)?;
            if results.is_empty() {
                return Err(Error::NoRouteFound {
                    name: next.name,
                    radius: working_radius,
                });
            }

            let added = discovered.merge(results.iter().cloned());
            self.report_discovered(added, &discovered);

            centers.push(next.name.clone());
            current = Sphere {
                center: next,
                radius: working_radius,
                systems: results,
            };
        }

        debug!(spheres = centers.len(), "corridor search finished");

        let mut ranked: Vec<ResolvedSystem> = discovered
            .into_vec()
            .into_iter()
            .map(|system| {
                let deviation = distance_to_route(&origin, &destination, &system);
                let mut resolved = ResolvedSystem::from_origin(&origin, system);
                resolved.route_deviation = Some(deviation);
                resolved
            })
            .collect();
        ranked.sort_by(|a, b| {
            a.route_deviation
                .partial_cmp(&b.route_deviation)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(ranked)
    }

    fn report_discovered(&self, added: usize, discovered: &DiscoveredSystems) {
        self.observer.on_event(&ScanEvent::SystemsDiscovered {
            new: added,
            total: discovered.len(),
        });
    }
}

fn find_named<'a>(systems: &'a [SystemRef], name: &str) -> Option<&'a SystemRef> {
    systems.iter().find(|system| system.matches_name(name))
}

fn closest_to<'a>(systems: &'a [SystemRef], target: &SystemRef) -> Option<&'a SystemRef> {
    systems.iter().min_by(|a, b| {
        let da = a.coords.distance_to(&target.coords);
        let db = b.coords.distance_to(&target.coords);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn suggestions(name: &str, systems: &[SystemRef]) -> Vec<String> {
    fuzzy_name_matches(
        name,
        systems.iter().map(|system| system.name.as_str()),
        SUGGESTION_LIMIT,
    )
}
