use clap::{Parser, Subcommand};
use hostlimits_core::CGROUP_ROOT;
use hostlimits_rlimit::PID_MAX_PATH;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hostlimits-ctl")]
#[command(version, about = "Report cgroup mode and default ulimits for new processes", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Is /sys/fs/cgroup the unified hierarchy?
    hostlimits-ctl cgroup

    # Raise this process's nofile/nproc and print the resulting ulimits
    hostlimits-ctl ulimits
    hostlimits-ctl --json ulimits --pid-max /tmp/pid_max

    # Everything at once
    hostlimits-ctl check
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Detect whether the cgroup root is the unified (v2) hierarchy
    Cgroup {
        /// Cgroup mount point to probe
        #[arg(long, value_name = "PATH", default_value = CGROUP_ROOT)]
        cgroup_root: PathBuf,
    },

    /// Negotiate default nofile/nproc ulimits
    Ulimits {
        /// File holding the kernel pid_max
        #[arg(long, value_name = "PATH", default_value = PID_MAX_PATH)]
        pid_max: PathBuf,
    },

    /// Report cgroup mode, negotiated ulimits and effective limits
    Check {
        /// Cgroup mount point to probe
        #[arg(long, value_name = "PATH", default_value = CGROUP_ROOT)]
        cgroup_root: PathBuf,

        /// File holding the kernel pid_max
        #[arg(long, value_name = "PATH", default_value = PID_MAX_PATH)]
        pid_max: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cgroup_defaults_to_well_known_root() {
        let cli = Cli::try_parse_from(["hostlimits-ctl", "cgroup"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Cgroup {
                cgroup_root: PathBuf::from("/sys/fs/cgroup")
            }
        );
        assert!(!cli.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hostlimits-ctl",
            "ulimits",
            "--pid-max",
            "/tmp/pid_max",
            "--json",
            "-v",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Ulimits {
                pid_max: PathBuf::from("/tmp/pid_max")
            }
        );
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["hostlimits-ctl"]).is_err());
    }

    #[test]
    fn check_accepts_both_paths() {
        let cli = Cli::try_parse_from([
            "hostlimits-ctl",
            "check",
            "--cgroup-root",
            "/mnt/cgroup",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Check {
                cgroup_root: PathBuf::from("/mnt/cgroup"),
                pid_max: PathBuf::from("/proc/sys/kernel/pid_max"),
            }
        );
    }
}
