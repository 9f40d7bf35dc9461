//! Scan orchestration: resolve, hydrate, filter, truncate, order.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use edsm_scanner_lib::{
    matches_all, matching_bodies, plot_journey, BodyFilter, DetailFetcher, FieldFilter,
    ResolvedSystem, RouteResolver, ScanConfig, SystemDetails, SystemLookup, TracingObserver,
};

/// Everything one invocation of the scanner asks for.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub origin: String,
    pub destination: Option<String>,
    pub config: ScanConfig,
    /// Fetch bodies even when no filter needs them.
    pub include_bodies: bool,
    pub filters: Vec<FieldFilter>,
    /// Keep systems with at least one body matching all of these.
    pub body_filters: Vec<BodyFilter>,
    /// Reorder the output as a nearest-neighbour journey from the origin.
    pub plot_journey: bool,
}

impl ScanOptions {
    fn needs_details(&self) -> bool {
        self.include_bodies || self.is_filtered()
    }

    fn is_filtered(&self) -> bool {
        !self.filters.is_empty() || !self.body_filters.is_empty()
    }
}

/// One line of scanner output.
#[derive(Debug, Clone)]
pub struct ScanRow {
    pub resolved: ResolvedSystem,
    /// Present when bodies were fetched.
    pub details: Option<SystemDetails>,
    /// Names of the bodies that satisfied the body filters.
    pub matching_bodies: Vec<String>,
    /// Distance from the previous row when the journey was plotted.
    pub journey_leg: Option<f64>,
}

impl ScanRow {
    pub fn new(resolved: ResolvedSystem, details: Option<SystemDetails>) -> Self {
        Self {
            resolved,
            details,
            matching_bodies: Vec::new(),
            journey_leg: None,
        }
    }
}

/// Run a scan against `lookup`.
///
/// Without filters the resolved list is truncated before any details are
/// fetched. With filters every resolved system is hydrated, filtered, and only
/// then truncated. Plotting the journey reorders whatever is left.
pub fn run_scan<L: SystemLookup>(lookup: L, options: &ScanOptions) -> Result<Vec<ScanRow>> {
    let resolver = RouteResolver::new(&lookup).with_observer(Arc::new(TracingObserver));
    let mut resolved = resolver
        .resolve_with(
            &options.origin,
            options.destination.as_deref(),
            &options.config,
        )
        .with_context(|| match &options.destination {
            Some(destination) => {
                format!("failed to resolve systems between {} and {destination}", options.origin)
            }
            None => format!("failed to resolve systems around {}", options.origin),
        })?;

    let start = resolved
        .iter()
        .find(|r| r.system.matches_name(&options.origin))
        .or_else(|| resolved.first())
        .map(|r| r.system.coords)
        .unwrap_or_default();

    let rows = if options.needs_details() {
        hydrate(&lookup, resolved, options)?
    } else {
        resolved.truncate(options.config.max_results);
        resolved
            .into_iter()
            .map(|resolved| ScanRow::new(resolved, None))
            .collect()
    };

    if !options.plot_journey {
        return Ok(rows);
    }
    Ok(plot_journey(start, rows, |row| row.resolved.system.coords)
        .into_iter()
        .map(|stop| ScanRow {
            journey_leg: Some(stop.leg_distance),
            ..stop.item
        })
        .collect())
}

fn hydrate<L: SystemLookup>(
    lookup: &L,
    mut resolved: Vec<ResolvedSystem>,
    options: &ScanOptions,
) -> Result<Vec<ScanRow>> {
    if !options.is_filtered() {
        resolved.truncate(options.config.max_results);
    }

    let references: Vec<_> = resolved.iter().map(|r| r.system.clone()).collect();
    let details = DetailFetcher::new(lookup)
        .with_observer(Arc::new(TracingObserver))
        .fetch_all(&references, options.config.concurrency)
        .context("failed to fetch system details")?;

    let rows: Vec<ScanRow> = resolved
        .into_iter()
        .zip(details)
        .filter(|(_, details)| matches_all(&options.filters, details))
        .filter_map(|(resolved, details)| {
            let mut row = ScanRow::new(resolved, None);
            if !options.body_filters.is_empty() {
                row.matching_bodies = matching_bodies(&options.body_filters, &details)
                    .into_iter()
                    .map(|body| body.name.clone())
                    .collect();
                if row.matching_bodies.is_empty() {
                    return None;
                }
            }
            row.details = Some(details);
            Some(row)
        })
        .take(options.config.max_results)
        .collect();

    if options.is_filtered() {
        info!(
            matched = rows.len(),
            system_filters = options.filters.len(),
            body_filters = options.body_filters.len(),
            "applied filters"
        );
    }
    Ok(rows)
}
