//! hostlimits-rlimit: default ulimits for a process about to be launched
//!
//! Raises the calling process's `RLIMIT_NOFILE` and `RLIMIT_NPROC` to the
//! host's `pid_max` (or a fixed 2^20 fallback) and reports what stuck as
//! `nofile=<cur>:<max>` / `nproc=<cur>:<max>` descriptors.
//!
//! # Side effects
//!
//! Negotiation changes the limits of the *calling* process, not only those of a
//! future child. The change lasts until the process exits. Do not run two
//! negotiations concurrently in one process.
//!
//! # Example
//!
//! ```no_run
//! let limits = hostlimits_rlimit::default_process_limits();
//! for limit in &limits {
//!     println!("--ulimit {}", limit);
//! }
//! ```

pub mod descriptor;
pub mod rlimit;

pub use descriptor::{LimitDescriptor, LimitKind, LimitPair};
pub use rlimit::{
    DEFAULT_MAX, LimitSetter, Negotiator, PID_MAX_PATH, ProcessLimits, default_process_limits,
    read_pid_max,
};
