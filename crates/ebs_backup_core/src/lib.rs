//! Shared EBS snapshot automation primitives.
//!
//! This crate owns the request/response contracts, the backup eligibility
//! rule, and the description/notification text formats used by both
//! workflows. It intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod eligibility;
pub mod naming;
