use console::style;
use hostlimits_core::CgroupMode;
use hostlimits_rlimit::{LimitDescriptor, LimitKind, Negotiator, ProcessLimits};
use log::{debug, info, warn};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

type CmdResult = Result<(), Box<dyn Error>>;

/// Limit in effect after negotiation, as read back with getrlimit
#[derive(Debug, Serialize)]
struct EffectiveLimit {
    kind: LimitKind,
    current: u64,
    maximum: u64,
}

#[derive(Debug, Serialize)]
struct Report {
    cgroup: CgroupMode,
    ulimits: Vec<LimitDescriptor>,
    effective: Vec<EffectiveLimit>,
}

fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn mark(ok: bool) -> String {
    if ok {
        format!("{}", style("[✓]").green())
    } else {
        format!("{}", style("[✗]").red())
    }
}

pub fn show_cgroup(root: &Path, json: bool) -> CmdResult {
    info!("Probing {}", root.display());
    let mode = CgroupMode::probe_at(root);

    if json {
        print_json(&mode)?;
    } else {
        println!("{} {}: {}", mark(mode.is_unified()), root.display(), mode);
    }

    if !mode.is_known() {
        return Err(format!("cgroup mode of {} could not be determined", root.display()).into());
    }
    Ok(())
}

fn negotiate(pid_max: &Path) -> Vec<LimitDescriptor> {
    debug!("Reading pid_max from {}", pid_max.display());
    let limits = Negotiator::new().with_pid_max_path(pid_max).negotiate();
    if limits.len() < LimitKind::ALL.len() {
        warn!("Some limits could not be raised; keeping current values for those");
    }
    limits
}

pub fn show_ulimits(pid_max: &Path, json: bool) -> CmdResult {
    let limits = negotiate(pid_max);

    if json {
        return print_json(&limits);
    }
    for limit in &limits {
        println!("{}", limit);
    }
    Ok(())
}

pub fn check(cgroup_root: &Path, pid_max: &Path, json: bool) -> CmdResult {
    info!("Checking host limits");
    let cgroup = CgroupMode::probe_at(cgroup_root);
    let ulimits = negotiate(pid_max);

    let mut effective = Vec::new();
    for kind in LimitKind::ALL {
        match ProcessLimits.current(kind) {
            Ok(limit) => effective.push(EffectiveLimit {
                kind,
                current: limit.current,
                maximum: limit.maximum,
            }),
            Err(e) => warn!("{}", e),
        }
    }

    let report = Report {
        cgroup,
        ulimits,
        effective,
    };
    if json {
        return print_json(&report);
    }

    println!("Checking host limits...\n");
    println!("{} Cgroup: {}", mark(report.cgroup.is_unified()), report.cgroup);
    for kind in LimitKind::ALL {
        match report.ulimits.iter().find(|d| d.kind == kind) {
            Some(d) => println!("{} {}", mark(true), d),
            None => println!("{} {} not raised", mark(false), kind),
        }
    }

    println!("\nEffective limits:");
    for limit in &report.effective {
        println!("  {:7} {}:{}", limit.kind.name(), limit.current, limit.maximum);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_cgroup_on_plain_directory_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        assert!(show_cgroup(dir.path(), false).is_ok());
        assert!(show_cgroup(dir.path(), true).is_ok());
    }

    #[test]
    fn show_cgroup_on_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-cgroup");
        let err = show_cgroup(&missing, false).unwrap_err();
        assert!(err.to_string().contains("could not be determined"));
    }

    #[test]
    fn report_serializes_descriptors_as_strings() {
        let report = Report {
            cgroup: CgroupMode::Unified,
            ulimits: vec!["nofile=131072:131072".parse().unwrap()],
            effective: vec![EffectiveLimit {
                kind: LimitKind::Processes,
                current: 1024,
                maximum: 4096,
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cgroup"], "unified");
        assert_eq!(json["ulimits"][0], "nofile=131072:131072");
        assert_eq!(json["effective"][0]["kind"], "nproc");
        assert_eq!(json["effective"][0]["maximum"], 4096);
    }
}
