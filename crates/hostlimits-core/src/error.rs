//! Error types for host limit queries

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for hostlimits operations
pub type Result<T> = std::result::Result<T, HostError>;

/// Errors that can occur while probing host configuration
#[derive(Error, Debug)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("statfs({}) failed: {source}", .path.display())]
    CgroupProbe {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },

    #[error("Invalid pid_max value: {0:?}")]
    InvalidPidMax(String),

    #[error("rlimit({resource}) call failed: {source}")]
    Rlimit {
        resource: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("Invalid limit descriptor: {0}")]
    InvalidDescriptor(String),
}
