//! Source settings file parsing
//!
//! Reads the GLib key-file at ~/.config/gtk-3.0/settings.ini and extracts the
//! [Settings] group as an ordered list of raw key/value pairs. Problems with
//! the file are recoverable: the modern pipeline skips the config rewrite and
//! still signals the daemon.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::constants::gtkrc;

/// Default per-user settings.ini location
pub fn default_rc_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(gtkrc::APP_DIR);
    path.push(gtkrc::FILENAME);
    path
}

/// Read the [Settings] group from a key-file.
///
/// Returns `None` when the file cannot be read or the group is absent; both
/// are logged and treated as a skip, never an abort. Entry order follows the
/// file.
pub fn read_settings_group(path: &Path) -> Option<Vec<(String, String)>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read settings file, skipping config rewrite");
            return None;
        }
    };

    match parse_group(&contents, gtkrc::SETTINGS_GROUP) {
        Some(entries) => {
            debug!(path = %path.display(), entries = entries.len(), "Parsed settings group");
            Some(entries)
        }
        None => {
            warn!(path = %path.display(), group = gtkrc::SETTINGS_GROUP, "Settings file has no such group, skipping config rewrite");
            None
        }
    }
}

/// Extract one group of a key-file as ordered (key, value) pairs.
///
/// Comment lines (# or ;) and blank lines are ignored. Lines without '=' in
/// the wanted group are ignored as malformed. Returns `None` if the group
/// header never appears.
fn parse_group(contents: &str, group: &str) -> Option<Vec<(String, String)>> {
    let header = format!("[{group}]");
    let mut in_group = false;
    let mut found = false;
    let mut entries = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            in_group = line == header;
            found |= in_group;
            continue;
        }
        if !in_group {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                entries.push((key.trim().to_string(), value.trim().to_string()));
            }
            None => {
                debug!(line = %line, "Ignoring malformed settings line");
            }
        }
    }

    found.then_some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_group_basic() {
        let contents = "[Settings]\ngtk-theme-name = Adwaita\ngtk-cursor-blink=true\n";
        let entries = parse_group(contents, "Settings").unwrap();
        assert_eq!(
            entries,
            vec![
                ("gtk-theme-name".to_string(), "Adwaita".to_string()),
                ("gtk-cursor-blink".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_group_preserves_order() {
        let contents = "[Settings]\nz-key = 1\na-key = 2\nm-key = 3\n";
        let entries = parse_group(contents, "Settings").unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z-key", "a-key", "m-key"]);
    }

    #[test]
    fn test_parse_group_skips_comments_and_blanks() {
        let contents = "[Settings]\n# comment\n; also comment\n\ngtk-font-name = Sans 10\n";
        let entries = parse_group(contents, "Settings").unwrap();
        assert_eq!(entries, vec![("gtk-font-name".to_string(), "Sans 10".to_string())]);
    }

    #[test]
    fn test_parse_group_stops_at_next_group() {
        let contents = "[Settings]\ngtk-font-name = Sans 10\n[Other]\nignored = yes\n";
        let entries = parse_group(contents, "Settings").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_parse_group_missing_group() {
        assert!(parse_group("[Other]\nkey = value\n", "Settings").is_none());
        assert!(parse_group("", "Settings").is_none());
    }

    #[test]
    fn test_parse_group_value_containing_equals() {
        let contents = "[Settings]\ngtk-color-scheme = fg_color:#fff=bg\n";
        let entries = parse_group(contents, "Settings").unwrap();
        assert_eq!(entries[0].1, "fg_color:#fff=bg");
    }

    #[test]
    fn test_read_settings_group_unreadable_file() {
        let path = Path::new("/nonexistent/gtk-3.0/settings.ini");
        assert!(read_settings_group(path).is_none());
    }

    #[test]
    fn test_read_settings_group_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[Settings]").unwrap();
        writeln!(file, "gtk-cursor-blink = true").unwrap();
        let entries = read_settings_group(file.path()).unwrap();
        assert_eq!(entries, vec![("gtk-cursor-blink".to_string(), "true".to_string())]);
    }
}
