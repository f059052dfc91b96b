//! xsettingsd supervision
//!
//! Finds the running daemon and sends it SIGHUP so it re-reads the config
//! just written. If it is not running but installed, a fresh instance is
//! launched detached; it reads the new config on startup, so no signal is
//! needed. Neither running nor installed fails the modern pipeline: the
//! generated config would have no consumer.

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::{debug, info};

use crate::constants::xsettingsd;

/// How the daemon was given its chance to reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A running instance was found and sent SIGHUP
    Signaled(i32),
    /// No instance was running; a fresh one was launched detached
    Spawned,
    /// Daemon neither running nor found on PATH
    Unavailable,
}

/// Signal the running daemon, or launch it if absent but installed.
pub fn reload_daemon() -> Result<ReloadOutcome> {
    if let Some(pid) = find_running(Path::new("/proc"), xsettingsd::PROCESS_NAME) {
        kill(Pid::from_raw(pid), Signal::SIGHUP)
            .context(format!("Failed to send SIGHUP to {} (pid {pid})", xsettingsd::PROCESS_NAME))?;
        info!(pid = pid, process = xsettingsd::PROCESS_NAME, "Sent SIGHUP to running daemon");
        return Ok(ReloadOutcome::Signaled(pid));
    }

    let path_var = env::var_os("PATH").unwrap_or_default();
    match find_in_path(xsettingsd::PROCESS_NAME, &path_var) {
        Some(executable) => {
            spawn_detached(&executable)?;
            info!(executable = %executable.display(), "Daemon was not running, launched a fresh instance");
            Ok(ReloadOutcome::Spawned)
        }
        None => Ok(ReloadOutcome::Unavailable),
    }
}

/// Scan proc_root for a process whose comm matches `name` exactly.
/// First match wins; enumeration order is whatever the kernel gives us.
fn find_running(proc_root: &Path, name: &str) -> Option<i32> {
    let entries = match fs::read_dir(proc_root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %proc_root.display(), error = %e, "Cannot enumerate processes");
            return None;
        }
    };

    for entry in entries.flatten() {
        let Ok(pid) = entry.file_name().to_string_lossy().parse::<i32>() else {
            continue;
        };
        // comm is the executable name, truncated by the kernel to 15 bytes;
        // "xsettingsd" fits untruncated
        let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
            continue;
        };
        if comm.trim_end() == name {
            debug!(pid = pid, name = %name, "Found running daemon");
            return Some(pid);
        }
    }
    None
}

/// Locate an executable by exact name on a PATH-style variable.
fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    for dir in env::split_paths(path_var) {
        let candidate = dir.join(name);
        let Ok(metadata) = fs::metadata(&candidate) else {
            continue;
        };
        if metadata.is_file() && metadata.permissions().mode() & 0o111 != 0 {
            return Some(candidate);
        }
    }
    None
}

/// Launch the daemon detached: own process group, cwd at /, stdio closed.
/// The child is not waited on; it outlives this process. It does stay in
/// the caller's session: a full setsid would need an unsafe pre_exec hook,
/// which this crate forbids.
fn spawn_detached(executable: &Path) -> Result<()> {
    Command::new(executable)
        .current_dir("/")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .context(format!("Failed to launch {}", executable.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fake_proc_entry(proc_root: &Path, pid: u32, comm: &str) {
        let dir = proc_root.join(pid.to_string());
        fs::create_dir(&dir).unwrap();
        let mut file = fs::File::create(dir.join("comm")).unwrap();
        // the kernel terminates comm with a newline
        writeln!(file, "{comm}").unwrap();
    }

    #[test]
    fn test_find_running_exact_match() {
        let proc_root = tempfile::tempdir().unwrap();
        fake_proc_entry(proc_root.path(), 100, "bash");
        fake_proc_entry(proc_root.path(), 200, "xsettingsd");
        assert_eq!(find_running(proc_root.path(), "xsettingsd"), Some(200));
    }

    #[test]
    fn test_find_running_rejects_prefix_match() {
        let proc_root = tempfile::tempdir().unwrap();
        fake_proc_entry(proc_root.path(), 300, "xsettingsd2");
        fake_proc_entry(proc_root.path(), 301, "xsettings");
        assert_eq!(find_running(proc_root.path(), "xsettingsd"), None);
    }

    #[test]
    fn test_find_running_skips_non_pid_entries() {
        let proc_root = tempfile::tempdir().unwrap();
        fs::create_dir(proc_root.path().join("self")).unwrap();
        assert_eq!(find_running(proc_root.path(), "xsettingsd"), None);
    }

    #[test]
    fn test_find_running_missing_proc_root() {
        assert_eq!(find_running(Path::new("/nonexistent-proc"), "xsettingsd"), None);
    }

    #[test]
    fn test_find_in_path_executable_bit_required() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("xsettingsd");
        fs::write(&exe, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o644)).unwrap();

        let path_var = env::join_paths([dir.path()]).unwrap();
        assert_eq!(find_in_path("xsettingsd", &path_var), None);

        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_in_path("xsettingsd", &path_var), Some(exe));
    }

    #[test]
    fn test_find_in_path_first_dir_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        for dir in [&first, &second] {
            let exe = dir.path().join("xsettingsd");
            fs::write(&exe, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(
            find_in_path("xsettingsd", &path_var),
            Some(first.path().join("xsettingsd"))
        );
    }

    #[test]
    fn test_find_in_path_empty_path() {
        assert_eq!(find_in_path("xsettingsd", OsStr::new("")), None);
    }
}
