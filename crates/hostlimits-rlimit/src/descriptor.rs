//! Limit values and their `name=cur:max` encoding

use hostlimits_core::{HostError, Result};
use nix::sys::resource::Resource;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Resource kinds negotiated for a new process, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LimitKind {
    /// Open file descriptors (RLIMIT_NOFILE)
    #[serde(rename = "nofile")]
    OpenFiles,
    /// Processes per user (RLIMIT_NPROC)
    #[serde(rename = "nproc")]
    Processes,
}

impl LimitKind {
    pub const ALL: [LimitKind; 2] = [LimitKind::OpenFiles, LimitKind::Processes];

    /// ulimit name used in descriptors
    pub fn name(&self) -> &'static str {
        match self {
            LimitKind::OpenFiles => "nofile",
            LimitKind::Processes => "nproc",
        }
    }

    pub fn resource(&self) -> Resource {
        match self {
            LimitKind::OpenFiles => Resource::RLIMIT_NOFILE,
            LimitKind::Processes => Resource::RLIMIT_NPROC,
        }
    }

    pub fn resource_name(&self) -> &'static str {
        match self {
            LimitKind::OpenFiles => "RLIMIT_NOFILE",
            LimitKind::Processes => "RLIMIT_NPROC",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nofile" => Some(LimitKind::OpenFiles),
            "nproc" => Some(LimitKind::Processes),
            _ => None,
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (soft, hard) resource limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimitPair {
    pub current: u64,
    pub maximum: u64,
}

impl LimitPair {
    pub const fn new(current: u64, maximum: u64) -> Self {
        Self { current, maximum }
    }

    /// Both soft and hard set to `value`
    pub const fn symmetric(value: u64) -> Self {
        Self::new(value, value)
    }
}

/// One negotiated limit, rendered as `<name>=<current>:<maximum>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitDescriptor {
    pub kind: LimitKind,
    pub limit: LimitPair,
}

impl LimitDescriptor {
    pub fn new(kind: LimitKind, limit: LimitPair) -> Self {
        Self { kind, limit }
    }
}

impl fmt::Display for LimitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}:{}",
            self.kind, self.limit.current, self.limit.maximum
        )
    }
}

impl FromStr for LimitDescriptor {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HostError::InvalidDescriptor(s.to_string());

        let (name, values) = s.split_once('=').ok_or_else(invalid)?;
        let kind = LimitKind::from_name(name).ok_or_else(invalid)?;
        let (current, maximum) = values.split_once(':').ok_or_else(invalid)?;
        let current = current.parse::<u64>().map_err(|_| invalid())?;
        let maximum = maximum.parse::<u64>().map_err(|_| invalid())?;
        if current > maximum {
            return Err(invalid());
        }

        Ok(Self::new(kind, LimitPair::new(current, maximum)))
    }
}

impl Serialize for LimitDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
