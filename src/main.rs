#![forbid(unsafe_code)]

mod constants;
mod daemon;
mod gtkrc;
mod keymap;
mod notify;
mod xsettings;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{Level as TraceLevel, error, info};
use tracing_subscriber::FmtSubscriber;

use daemon::ReloadOutcome;

/// Tell running GTK applications to pick up changed theme settings without a
/// restart: legacy GTK 2 clients via an X11 ClientMessage, everything newer
/// via a regenerated xsettingsd config and a SIGHUP to the daemon.
#[derive(Debug, Parser)]
#[command(name = "gtk-refresh", version)]
struct Args {
    /// Source settings.ini (default: the per-user gtk-3.0 settings file)
    #[arg(long, value_name = "PATH")]
    rc_file: Option<PathBuf>,

    /// Do not rewrite the xsettingsd config
    #[arg(long)]
    skip_config: bool,

    /// Do not signal or launch xsettingsd
    #[arg(long)]
    skip_signal: bool,

    /// Print the key/type mapping table as JSON and exit, no side effects
    #[arg(long)]
    dump_keymap: bool,

    /// Exit 0 even when a pipeline failed (for login scripts)
    #[arg(long)]
    force: bool,
}

#[derive(Serialize)]
struct KeymapDump {
    version: u32,
    mappings: &'static [keymap::KeyMapping],
}

/// Modern pipeline: regenerate the xsettingsd config from settings.ini, then
/// give the daemon a chance to reload it. Both halves are independently
/// skippable. The reload step is passed in so the flow can be driven
/// without touching /proc or PATH.
fn run_modern_pipeline(
    args: &Args,
    reload_daemon: impl FnOnce() -> Result<ReloadOutcome>,
) -> Result<()> {
    if args.skip_config {
        info!("Skipping xsettingsd config rewrite (--skip-config)");
    } else {
        let rc_path = args.rc_file.clone().unwrap_or_else(gtkrc::default_rc_path);
        // A missing or unreadable source is a skip, not a failure: the
        // daemon may still need the reload signal below
        if let Some(entries) = gtkrc::read_settings_group(&rc_path) {
            let lines = xsettings::translate(&entries);
            xsettings::write_config(&xsettings::default_config_path(), &lines)?;
        }
    }

    if args.skip_signal {
        info!("Skipping daemon signaling (--skip-signal)");
        return Ok(());
    }

    match reload_daemon()? {
        ReloadOutcome::Signaled(pid) => {
            info!(pid = pid, "xsettingsd reloaded");
            Ok(())
        }
        ReloadOutcome::Spawned => {
            info!("xsettingsd started fresh, it reads the new config on its own");
            Ok(())
        }
        ReloadOutcome::Unavailable => {
            anyhow::bail!("xsettingsd is neither running nor installed; the config has no consumer")
        }
    }
}

/// Fold per-pipeline failures into the exit code: bit 0 legacy, bit 1
/// modern. The force flag collapses everything to success.
fn exit_code(legacy_failed: bool, modern_failed: bool, force: bool) -> i32 {
    if force {
        return 0;
    }
    (legacy_failed as i32) | ((modern_failed as i32) << 1)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if args.dump_keymap {
        let dump = KeymapDump {
            version: keymap::KEYMAP_VERSION,
            mappings: keymap::KEYMAP,
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    // Both pipelines always run; a failure in one never blocks the other
    let legacy_failed = notify::notify_legacy_clients()
        .inspect_err(|e| error!(error = format!("{e:#}"), "Legacy notification pipeline failed"))
        .is_err();

    let modern_failed = run_modern_pipeline(&args, daemon::reload_daemon)
        .inspect_err(|e| error!(error = format!("{e:#}"), "xsettingsd pipeline failed"))
        .is_err();

    std::process::exit(exit_code(legacy_failed, modern_failed, args.force));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_bits() {
        assert_eq!(exit_code(false, false, false), 0);
        assert_eq!(exit_code(true, false, false), 1);
        assert_eq!(exit_code(false, true, false), 2);
        assert_eq!(exit_code(true, true, false), 3);
    }

    #[test]
    fn test_exit_code_force_collapses_failures() {
        assert_eq!(exit_code(true, false, true), 0);
        assert_eq!(exit_code(false, true, true), 0);
        assert_eq!(exit_code(true, true, true), 0);
        assert_eq!(exit_code(false, false, true), 0);
    }

    #[test]
    fn test_modern_pipeline_signals_daemon_when_section_missing() {
        use std::cell::Cell;
        use std::io::Write;

        // Source file exists but has no [Settings] group: the config rewrite
        // is skipped, the reload step must still run
        let mut rc = tempfile::NamedTempFile::new().unwrap();
        writeln!(rc, "[Other]\nkey = value").unwrap();
        let args = Args::parse_from([
            "gtk-refresh",
            "--rc-file",
            rc.path().to_str().unwrap(),
        ]);

        let reloaded = Cell::new(false);
        let result = run_modern_pipeline(&args, || {
            reloaded.set(true);
            Ok(ReloadOutcome::Signaled(42))
        });
        assert!(result.is_ok());
        assert!(reloaded.get());
    }

    #[test]
    fn test_modern_pipeline_fails_when_daemon_unavailable() {
        let args = Args::parse_from(["gtk-refresh", "--skip-config"]);
        let result = run_modern_pipeline(&args, || Ok(ReloadOutcome::Unavailable));
        assert!(result.is_err());
    }

    #[test]
    fn test_modern_pipeline_skip_signal_never_invokes_reload() {
        use std::cell::Cell;

        let args = Args::parse_from(["gtk-refresh", "--skip-config", "--skip-signal"]);
        let reloaded = Cell::new(false);
        let result = run_modern_pipeline(&args, || {
            reloaded.set(true);
            Ok(ReloadOutcome::Signaled(1))
        });
        assert!(result.is_ok());
        assert!(!reloaded.get());
    }

    #[test]
    fn test_args_parse_defaults() {
        let args = Args::parse_from(["gtk-refresh"]);
        assert!(!args.skip_config);
        assert!(!args.skip_signal);
        assert!(!args.force);
        assert!(args.rc_file.is_none());
    }

    #[test]
    fn test_args_parse_flags() {
        let args = Args::parse_from(["gtk-refresh", "--skip-signal", "--force", "--rc-file", "/tmp/settings.ini"]);
        assert!(args.skip_signal);
        assert!(args.force);
        assert_eq!(args.rc_file, Some(PathBuf::from("/tmp/settings.ini")));
    }
}
