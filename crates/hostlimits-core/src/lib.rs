//! hostlimits-core: shared error types and cgroup mode detection for hostlimits
//!
//! This crate provides the pieces every hostlimits crate builds on:
//! - Error types and Result alias
//! - Detection of the unified (cgroup v2) hierarchy at `/sys/fs/cgroup`

pub mod cgroup;
pub mod error;

pub use cgroup::{CGROUP_ROOT, CgroupMode};
pub use error::{HostError, Result};
