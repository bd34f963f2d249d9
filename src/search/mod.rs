//! Per-region template search.
//!
//! The region matcher scans one template at one scale over a region's pixels
//! and reports every placement clearing the threshold.

pub(crate) mod region;

pub use region::{match_template_in_region, MatchParams};
