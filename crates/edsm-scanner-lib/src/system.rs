use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Stable identity of a star system (EDSM `id64`).
///
/// This is the only key used to decide whether two lookups describe the same
/// system; every deduplicating container is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(u64);

impl SystemId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cartesian coordinates for a star system, in light-years.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SystemPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        crate::geometry::distance(self, other)
    }
}

/// Identity and basic metrics for one star system, as reported by a lookup.
///
/// Equality only considers [`SystemRef::id`]: two references with the same
/// identity are the same system even when their distances differ, and a
/// reference without an identity never equals anything (not even itself).
#[derive(Debug, Clone, Serialize)]
pub struct SystemRef {
    pub id: Option<SystemId>,
    pub name: String,
    pub coords: SystemPoint,
    /// Distance reported by the lookup call that produced this reference.
    pub distance: f64,
    /// Expected number of bodies, when known.
    pub body_count: Option<u32>,
}

impl SystemRef {
    pub fn new(id: Option<SystemId>, name: impl Into<String>, coords: SystemPoint) -> Self {
        Self {
            id,
            name: name.into(),
            coords,
            distance: 0.0,
            body_count: None,
        }
    }

    /// Case-insensitive comparison against a user supplied system name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// True when both references carry the same identity.
    pub fn same_system(&self, other: &SystemRef) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl PartialEq for SystemRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_system(other)
    }
}

impl fmt::Display for SystemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:.2}ly] (", self.name, self.distance)?;
        match self.body_count {
            Some(count) => write!(f, "{} bodies)", count),
            None => f.write_str("? bodies)"),
        }
    }
}

/// A ring around a body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyRing {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ring_type: String,
}

/// A discovered body (star or planet) inside a system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemBody {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub body_type: String,
    pub sub_type: Option<String>,
    /// Distance from the arrival point, in light-seconds.
    pub distance_to_arrival: Option<f64>,
    pub is_landable: Option<bool>,
    pub gravity: Option<f64>,
    pub surface_temperature: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub atmosphere_type: Option<String>,
    pub terraforming_state: Option<String>,
    pub reserve_level: Option<String>,
    pub rings: Option<Vec<BodyRing>>,
}

impl SystemBody {
    pub fn is_star(&self) -> bool {
        self.body_type.eq_ignore_ascii_case("star")
    }

    /// Stars of class K, G, B, F, O, A or M can be fuel-scooped.
    pub fn is_scoopable(&self) -> bool {
        if !self.is_star() {
            return false;
        }
        let Some(sub_type) = self.sub_type.as_deref() else {
            return false;
        };
        let mut chars = sub_type.chars();
        let class_matches = chars.next().is_some_and(|c| "KGBFOAM".contains(c));
        class_matches && chars.next().is_none_or(char::is_whitespace)
    }

    pub fn ring_types(&self) -> impl Iterator<Item = &str> {
        self.rings
            .iter()
            .flatten()
            .map(|ring| ring.ring_type.as_str())
    }
}

/// A [`SystemRef`] hydrated with its discovered bodies.
#[derive(Debug, Clone, Serialize)]
pub struct SystemDetails {
    pub system: SystemRef,
    /// Expected body count reported alongside the bodies.
    pub body_count: Option<u32>,
    /// `None` when the bodies were never fetched or the service knows none.
    pub bodies: Option<Vec<SystemBody>>,
    /// Provenance URL of the details.
    pub url: String,
}

impl SystemDetails {
    /// Details for a system whose bodies were not fetched.
    pub fn unresolved(system: SystemRef) -> Self {
        let body_count = system.body_count;
        Self {
            system,
            body_count,
            bodies: None,
            url: String::new(),
        }
    }

    pub fn id(&self) -> Option<SystemId> {
        self.system.id
    }

    pub fn discovered_bodies(&self) -> Option<usize> {
        self.bodies.as_ref().map(Vec::len)
    }

    pub fn discovered_stars(&self) -> Option<usize> {
        self.bodies
            .as_ref()
            .map(|bodies| bodies.iter().filter(|b| b.is_star()).count())
    }

    /// `Some` only when an expected count is known and bodies were fetched.
    pub fn is_fully_discovered(&self) -> Option<bool> {
        let expected = self.body_count.filter(|&count| count > 0)?;
        let discovered = self.discovered_bodies()?;
        Some(expected as usize <= discovered)
    }
}

impl fmt::Display for SystemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.system.fmt(f)
    }
}

/// Suggest names from `candidates` that look like `name`, best match first.
pub fn fuzzy_name_matches<'a, I>(name: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = name.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| {
            let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
            (score, candidate)
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut suggestions: Vec<String> = Vec::new();
    for (_, candidate) in scored {
        if suggestions.len() >= limit {
            break;
        }
        if !suggestions.iter().any(|s| s == candidate) {
            suggestions.push(candidate.to_string());
        }
    }
    suggestions
}
