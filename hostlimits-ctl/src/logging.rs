use console::style;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Filter used when RUST_LOG is unset
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Initialize logger based on verbose flag. An explicit RUST_LOG takes precedence.
pub fn init_logger(verbose: bool) {
    let env = Env::default().filter_or("RUST_LOG", default_filter(verbose));

    let mut builder = Builder::from_env(env);
    builder.format(|buf, record| {
        let level = match record.level() {
            Level::Error => format!("{}", style("ERROR").red().bold()),
            Level::Warn => format!("{}", style("WARN ").yellow().bold()),
            Level::Info => format!("{}", style("INFO ").green()),
            Level::Debug => format!("{}", style("DEBUG").cyan()),
            Level::Trace => format!("{}", style("TRACE").dim()),
        };
        writeln!(buf, "{} [{}] {}", level, record.target(), record.args())
    });
    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_defaults_to_debug() {
        assert_eq!(default_filter(true), "debug");
        assert_eq!(default_filter(false), "warn");
    }
}
