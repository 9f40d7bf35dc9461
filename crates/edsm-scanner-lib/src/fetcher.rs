//! Bounded-concurrency detail fan-out.
//!
//! [`DetailFetcher::fetch_all`] hydrates every reference through the lookup
//! service on a dedicated rayon pool sized to the concurrency limit, so at most
//! that many calls are in flight. The operation is all-or-nothing: every fetch
//! runs to completion, and if any failed the first error in input order is
//! returned instead of the partial results.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use crate::config::DEFAULT_CONCURRENCY;
use crate::error::{Error, Result};
use crate::lookup::SystemLookup;
use crate::observer::{NoopObserver, ProgressObserver};
use crate::progress::ProgressTracker;
use crate::system::{SystemDetails, SystemRef};

/// Fetches [`SystemDetails`] for many systems in parallel.
pub struct DetailFetcher<L> {
    lookup: L,
    observer: Arc<dyn ProgressObserver>,
}

impl<L: SystemLookup> DetailFetcher<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Receive progress updates while fetching.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fetch with the default concurrency limit.
    pub fn fetch_all_default(&self, references: &[SystemRef]) -> Result<Vec<SystemDetails>> {
        self.fetch_all(references, DEFAULT_CONCURRENCY)
    }

    /// Fetch details for every reference, returned in input order.
    ///
    /// A limit of zero is treated as one. Progress advances once per finished
    /// fetch, whether it succeeded or not, and the observer is always told when
    /// the fan-out ends.
    pub fn fetch_all(
        &self,
        references: &[SystemRef],
        concurrency_limit: usize,
    ) -> Result<Vec<SystemDetails>> {
        let tracker = ProgressTracker::new(references.len(), Arc::clone(&self.observer));
        let _finish = FinishOnDrop(&tracker);

        if references.is_empty() {
            return Ok(Vec::new());
        }

        // rayon treats zero threads as "one per core"
        let workers = concurrency_limit.max(1).min(references.len());
        debug!(
            systems = references.len(),
            workers,
            limit = concurrency_limit.max(1),
            "fetching system details"
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("edsm-details-{index}"))
            .build()?;

        let outcomes: Vec<Result<SystemDetails>> = pool.install(|| {
            references
                .par_iter()
                .map(|reference| {
                    let _completion = CompleteOnDrop(&tracker);
                    self.lookup.fetch_details(reference)
                })
                .collect()
        });

        let mut details = Vec::with_capacity(outcomes.len());
        let mut first_error = None;
        for (reference, outcome) in references.iter().zip(outcomes) {
            match outcome {
                Ok(fetched) => details.push(fetched),
                Err(source) => {
                    warn!(system = %reference.name, error = %source, "detail fetch failed");
                    first_error.get_or_insert(Error::DetailFetchFailed {
                        name: reference.name.clone(),
                        source: Box::new(source),
                    });
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(details),
        }
    }
}

/// Counts one completed fetch, even if the lookup panicked.
struct CompleteOnDrop<'a>(&'a ProgressTracker);

impl Drop for CompleteOnDrop<'_> {
    fn drop(&mut self) {
        self.0.increment();
    }
}

struct FinishOnDrop<'a>(&'a ProgressTracker);

impl Drop for FinishOnDrop<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}
