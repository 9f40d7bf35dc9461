/// Largest sphere radius the lookup service accepts, in light-years.
pub const MAX_SEARCH_RADIUS: f64 = 100.0;

/// Default base radius for sphere queries, in light-years.
pub const DEFAULT_SEARCH_RADIUS: f64 = 100.0;

/// Default number of detail lookups allowed in flight.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Tunables for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Base search radius in light-years.
    pub radius: f64,
    /// Stop the corridor search once this many distinct systems are known.
    pub max_results: usize,
    /// Maximum detail lookups in flight.
    pub concurrency: usize,
    /// Radius the corridor search escalates to when it revisits a sphere.
    pub escalation_ceiling: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_SEARCH_RADIUS,
            max_results: usize::MAX,
            concurrency: DEFAULT_CONCURRENCY,
            escalation_ceiling: MAX_SEARCH_RADIUS,
        }
    }
}

impl ScanConfig {
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_escalation_ceiling(mut self, ceiling: f64) -> Self {
        self.escalation_ceiling = ceiling;
        self
    }
}
