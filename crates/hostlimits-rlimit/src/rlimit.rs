//! setrlimit-based default limit negotiation
//!
//! Picks a candidate limit from `/proc/sys/kernel/pid_max`, tries to apply it
//! to the current process for each [`LimitKind`], and falls back once to
//! [`DEFAULT_MAX`] when the kernel refuses.

use crate::descriptor::{LimitDescriptor, LimitKind, LimitPair};
use hostlimits_core::{HostError, Result};
use log::debug;
use nix::sys::resource::{getrlimit, setrlimit};
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback soft and hard limit (2^20).
///
/// Many platforms reject RLIM_INFINITY for RLIMIT_NOFILE, and 2^20 matches the
/// kernel's default `fs.nr_open` ceiling.
pub const DEFAULT_MAX: u64 = 1_048_576;

/// Kernel's configured process-ID ceiling
pub const PID_MAX_PATH: &str = "/proc/sys/kernel/pid_max";

const FALLBACK: LimitPair = LimitPair::symmetric(DEFAULT_MAX);

/// Applies a limit to some process
pub trait LimitSetter {
    fn set_limit(&self, kind: LimitKind, limit: LimitPair) -> Result<()>;
}

/// The calling process's own resource limits
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLimits;

impl ProcessLimits {
    /// Read back the limit currently in effect
    pub fn current(&self, kind: LimitKind) -> Result<LimitPair> {
        let (current, maximum) =
            getrlimit(kind.resource()).map_err(|source| HostError::Rlimit {
                resource: kind.resource_name(),
                source,
            })?;
        Ok(LimitPair::new(current, maximum))
    }
}

impl LimitSetter for ProcessLimits {
    /// Process-wide and irreversible without privilege once the hard limit drops.
    fn set_limit(&self, kind: LimitKind, limit: LimitPair) -> Result<()> {
        setrlimit(kind.resource(), limit.current, limit.maximum).map_err(|source| {
            HostError::Rlimit {
                resource: kind.resource_name(),
                source,
            }
        })
    }
}

/// Read `pid_max`. Exactly one trailing newline is accepted, and the rest
/// must be plain decimal digits (no sign, no whitespace).
pub fn read_pid_max<P: AsRef<Path>>(path: P) -> Result<u64> {
    let content = fs::read_to_string(path)?;
    let value = content.strip_suffix('\n').unwrap_or(&content);
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HostError::InvalidPidMax(value.to_string()));
    }
    value
        .parse::<u64>()
        .map_err(|_| HostError::InvalidPidMax(value.to_string()))
}

/// Negotiates default `nofile`/`nproc` limits.
///
/// [`negotiate`](Negotiator::negotiate) mutates the limits of whatever the
/// setter targets; with the default [`ProcessLimits`] that is the calling
/// process itself.
#[derive(Debug, Clone)]
pub struct Negotiator<S = ProcessLimits> {
    pid_max_path: PathBuf,
    setter: S,
}

impl Negotiator<ProcessLimits> {
    pub fn new() -> Self {
        Self {
            pid_max_path: PathBuf::from(PID_MAX_PATH),
            setter: ProcessLimits,
        }
    }
}

impl Default for Negotiator<ProcessLimits> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LimitSetter> Negotiator<S> {
    pub fn with_pid_max_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.pid_max_path = path.into();
        self
    }

    pub fn with_setter<T: LimitSetter>(self, setter: T) -> Negotiator<T> {
        Negotiator {
            pid_max_path: self.pid_max_path,
            setter,
        }
    }

    pub fn pid_max_path(&self) -> &Path {
        &self.pid_max_path
    }

    pub fn setter(&self) -> &S {
        &self.setter
    }

    /// `(pid_max, pid_max)` if readable, otherwise `(DEFAULT_MAX, DEFAULT_MAX)`
    pub fn candidate(&self) -> LimitPair {
        match read_pid_max(&self.pid_max_path) {
            Ok(pid_max) => LimitPair::symmetric(pid_max),
            Err(e) => {
                debug!(
                    "Using default limit {}: {}: {}",
                    DEFAULT_MAX,
                    self.pid_max_path.display(),
                    e
                );
                FALLBACK
            }
        }
    }

    /// Apply the candidate limit to every kind and report what was applied.
    ///
    /// Never fails. A kind the setter refuses at both the candidate and the
    /// fallback value is left untouched and omitted from the result, so the
    /// returned list has zero, one or two entries, `nofile` first.
    pub fn negotiate(&self) -> Vec<LimitDescriptor> {
        let candidate = self.candidate();
        debug!("Candidate limit {}:{}", candidate.current, candidate.maximum);
        LimitKind::ALL
            .iter()
            .filter_map(|&kind| self.apply(kind, candidate))
            .collect()
    }

    fn apply(&self, kind: LimitKind, candidate: LimitPair) -> Option<LimitDescriptor> {
        let first = match self.setter.set_limit(kind, candidate) {
            Ok(()) => return Some(LimitDescriptor::new(kind, candidate)),
            Err(e) => e,
        };
        debug!("{} {}:{} rejected: {}", kind, candidate.current, candidate.maximum, first);

        match self.setter.set_limit(kind, FALLBACK) {
            Ok(()) => Some(LimitDescriptor::new(kind, FALLBACK)),
            Err(e) => {
                debug!("{} left unchanged: {}", kind, e);
                None
            }
        }
    }
}

/// Negotiate with the host defaults and render the descriptors.
///
/// Raises the calling process's own `RLIMIT_NOFILE` and `RLIMIT_NPROC`.
pub fn default_process_limits() -> Vec<String> {
    Negotiator::new()
        .negotiate()
        .iter()
        .map(ToString::to_string)
        .collect()
}
