//! Settings translation and xsettingsd config generation
//!
//! Turns the raw [Settings] entries into typed xsettingsd config lines using
//! the static key table, then rewrites the daemon config wholesale. Entries
//! that cannot be mapped or encoded are dropped, never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::constants::{encoding, xsettingsd};
use crate::keymap::{self, SettingType};

/// Default per-user xsettingsd.conf location
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(xsettingsd::APP_DIR);
    path.push(xsettingsd::FILENAME);
    path
}

/// Translate source entries into xsettingsd config lines, preserving source
/// order. Unmapped keys are passed over; mapped keys whose value cannot be
/// encoded for their type are dropped with a warning.
pub fn translate(entries: &[(String, String)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, raw) in entries {
        let Some(mapping) = keymap::lookup(key) else {
            debug!(key = %key, "No xsettings mapping for key, passing over");
            continue;
        };
        match encode(mapping.setting_type, raw) {
            Some(value) => lines.push(format!("{} {}", mapping.xsettings_name, value)),
            None => {
                warn!(key = %key, value = %raw, setting_type = ?mapping.setting_type, "Value not encodable for its type, dropping entry");
            }
        }
    }
    lines
}

/// Encode one raw value for its semantic type.
fn encode(setting_type: SettingType, raw: &str) -> Option<String> {
    match setting_type {
        SettingType::Bool => {
            let truthy = encoding::TRUTHY.contains(&raw);
            Some(if truthy { "1" } else { "0" }.to_string())
        }
        SettingType::Str => Some(format!("\"{}\"", raw.replace('"', "\\\""))),
        // Enum properties travel as their numeric encoding
        SettingType::Int | SettingType::Enum => raw.trim().parse::<i32>().ok().map(|v| v.to_string()),
    }
}

/// Render the full config file: two fixed header comments plus one line per
/// entry, newline-terminated. No timestamp, so output is stable across runs.
pub fn render(lines: &[String]) -> String {
    let mut out = String::new();
    for header in xsettingsd::HEADER {
        out.push_str(header);
        out.push('\n');
    }
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Whole-file rewrite of the daemon config (truncate and write).
pub fn write_config(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, render(lines))
        .context(format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), entries = lines.len(), "Wrote xsettingsd config");
    Ok(())
}
