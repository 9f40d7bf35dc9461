//! Blocking [`SystemLookup`] implementation backed by the EDSM web API.
//!
//! Two endpoints are used:
//! - `api-v1/sphere-systems` for radius queries (EDSM caps the radius at 100 ly)
//! - `api-system-v1/bodies` for per-system bodies
//!
//! EDSM answers queries for unknown systems with an empty JSON object rather
//! than an error; both endpoints map that to "no data".

use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::lookup::SystemLookup;
use crate::system::{SystemBody, SystemDetails, SystemId, SystemPoint, SystemRef};

/// Public EDSM endpoint.
pub const DEFAULT_API_BASE: &str = "https://www.edsm.net";

const API_BASE_ENV: &str = "EDSM_API_BASE";
const TIMEOUT_ENV: &str = "EDSM_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`EdsmClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdsmConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for EdsmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EdsmConfig {
    /// Read overrides from `EDSM_API_BASE` and `EDSM_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from a variable source such as the process environment.
    ///
    /// Blank values are ignored. Timeouts that are not a whole number of
    /// seconds fall back to the default.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = var(API_BASE_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let timeout = var(TIMEOUT_ENV)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Self { base_url, timeout }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// HTTP client for EDSM.
#[derive(Debug, Clone)]
pub struct EdsmClient {
    client: Client,
    base_url: String,
}

impl EdsmClient {
    pub fn new(config: EdsmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::new(EdsmConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, ?query, "querying EDSM");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()?
            .error_for_status()?;
        Ok(response.json::<Value>()?)
    }
}

impl SystemLookup for EdsmClient {
    fn search_nearby(&self, name: &str, radius: f64) -> Result<Vec<SystemRef>> {
        let body = self.get_json(
            "api-v1/sphere-systems",
            &[
                ("systemName", name.to_string()),
                ("radius", radius.to_string()),
                ("showId", "1".to_string()),
                ("showCoordinates", "1".to_string()),
            ],
        )?;
        parse_sphere_systems(body)
    }

    fn fetch_details(&self, system: &SystemRef) -> Result<SystemDetails> {
        let query = match system.id {
            Some(id) => ("systemId64", id.to_string()),
            None => ("systemName", system.name.clone()),
        };
        let body = self.get_json("api-system-v1/bodies", &[query])?;
        parse_bodies(system, body)
    }
}

fn user_agent() -> String {
    format!("edsm-scanner-lib/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SphereSystem {
    name: String,
    #[serde(default)]
    distance: f64,
    body_count: Option<u32>,
    id64: Option<u64>,
    coords: Option<SystemPoint>,
}

impl SphereSystem {
    /// `None` when EDSM has no coordinates for the system; such a system
    /// cannot be placed relative to the route.
    fn into_system_ref(self) -> Option<SystemRef> {
        let Some(coords) = self.coords else {
            warn!(system = %self.name, "dropping system without coordinates");
            return None;
        };
        Some(SystemRef {
            id: self.id64.map(SystemId::new),
            name: self.name,
            coords,
            distance: self.distance,
            body_count: self.body_count,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BodiesResponse {
    body_count: Option<u32>,
    bodies: Option<Vec<SystemBody>>,
    #[serde(default)]
    url: String,
}

pub(crate) fn parse_sphere_systems(body: Value) -> Result<Vec<SystemRef>> {
    if !body.is_array() {
        return Ok(Vec::new());
    }
    let raw: Vec<SphereSystem> = serde_json::from_value(body)?;
    Ok(raw
        .into_iter()
        .filter_map(SphereSystem::into_system_ref)
        .collect())
}

pub(crate) fn parse_bodies(system: &SystemRef, body: Value) -> Result<SystemDetails> {
    let is_empty_object = body.as_object().is_some_and(|map| map.is_empty());
    if is_empty_object || body.is_array() || body.is_null() {
        return Ok(SystemDetails::unresolved(system.clone()));
    }
    let raw: BodiesResponse = serde_json::from_value(body)?;
    Ok(SystemDetails {
        system: system.clone(),
        body_count: raw.body_count.or(system.body_count),
        bodies: raw.bodies,
        url: raw.url,
    })
}
