//! AWS-oriented adapters and handlers for EBS snapshot automation.
//!
//! This crate owns runtime integration details (Lambda handlers, EC2 and SNS
//! adapters, configuration and logging). Handlers depend only on the adapter
//! traits so they can run against in-memory fakes.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
