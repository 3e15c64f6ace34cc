//! Cgroup hierarchy detection
//!
//! Tells whether the control-group filesystem at [`CGROUP_ROOT`] is the
//! unified (cgroup v2) hierarchy by comparing its `statfs` magic number.

use crate::{HostError, Result};
use log::debug;
use nix::sys::statfs::{FsType, statfs};
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[cfg(target_env = "musl")]
const CGROUP2_SUPER_MAGIC: FsType = FsType(0x63677270);
#[cfg(not(target_env = "musl"))]
use nix::sys::statfs::CGROUP2_SUPER_MAGIC;

/// Well-known mount point of the control-group filesystem
pub const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// Returns true if `fs_type` is the cgroup2 filesystem magic
pub fn is_unified_fs_type(fs_type: FsType) -> bool {
    fs_type == CGROUP2_SUPER_MAGIC
}

/// Check whether `/sys/fs/cgroup` is mounted as the unified hierarchy.
///
/// An `Err` means detection was inconclusive (path missing, not mounted,
/// permission denied). It does not mean the host runs the legacy layout.
pub fn detect() -> Result<bool> {
    detect_at(CGROUP_ROOT)
}

/// Same as [`detect`] for an arbitrary mount point. Issues a single `statfs`.
pub fn detect_at<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let stat = statfs(path).map_err(|source| HostError::CgroupProbe {
        path: path.to_path_buf(),
        source,
    })?;
    let fs_type = stat.filesystem_type();
    debug!("{} has filesystem type {:#x}", path.display(), fs_type.0);
    Ok(is_unified_fs_type(fs_type))
}

/// Outcome of a cgroup probe, with inconclusive results kept distinct
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CgroupMode {
    /// cgroup v2, all controllers in one hierarchy
    Unified,
    /// Anything else mounted at the cgroup root
    Legacy,
    /// The probe itself failed
    Unknown(String),
}

impl CgroupMode {
    pub fn probe() -> Self {
        Self::probe_at(CGROUP_ROOT)
    }

    pub fn probe_at<P: AsRef<Path>>(path: P) -> Self {
        match detect_at(path) {
            Ok(true) => CgroupMode::Unified,
            Ok(false) => CgroupMode::Legacy,
            Err(e) => CgroupMode::Unknown(e.to_string()),
        }
    }

    /// Only a successful probe of a cgroup2 mount counts as unified
    pub fn is_unified(&self) -> bool {
        matches!(self, CgroupMode::Unified)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CgroupMode::Unknown(_))
    }
}

impl fmt::Display for CgroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CgroupMode::Unified => write!(f, "unified (cgroup v2)"),
            CgroupMode::Legacy => write!(f, "legacy (cgroup v1)"),
            CgroupMode::Unknown(reason) => write!(f, "unknown: {}", reason),
        }
    }
}
