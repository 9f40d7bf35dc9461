//! EDSM scanner CLI library.
//!
//! This crate holds the orchestration and output formatting behind the
//! `edsm-scanner` binary so both can be tested without a network.

pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
