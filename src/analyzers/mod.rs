//! Courier scoring: segment benchmarks, eligibility tiers and insights.
//!
//! Everything here is a pure function of a [`crate::records::RecordStore`]
//! snapshot. Benchmarks are computed once per data refresh; eligibility and
//! insights are computed per selected courier.

pub mod benchmark;
pub mod eligibility;
pub mod insights;
pub mod types;
pub mod utility;
