//! hostlimits-ctl - Report host cgroup mode and default ulimits

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use console::style;

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose);

    let result = match &cli.command {
        Commands::Cgroup { cgroup_root } => commands::show_cgroup(cgroup_root, cli.json),
        Commands::Ulimits { pid_max } => commands::show_ulimits(pid_max, cli.json),
        Commands::Check {
            cgroup_root,
            pid_max,
        } => commands::check(cgroup_root, pid_max, cli.json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}
