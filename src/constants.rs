//! Application-wide constants
//!
//! Single source of truth for the atom names, file locations and daemon
//! identifiers used throughout the tool.

/// X11 atom names used by the legacy notification walker
pub mod atoms {
    /// ICCCM window state property; its presence marks a client window
    pub const WM_STATE: &str = "WM_STATE";

    /// ClientMessage type GTK 2 clients watch for to re-read rc files
    pub const GTK_READ_RCFILES: &str = "_GTK_READ_RCFILES";

    /// Window title property, queried for diagnostics only
    pub const WM_NAME: &str = "WM_NAME";
}

/// Source settings file constants
pub mod gtkrc {
    /// Subdirectory of the user config dir holding settings.ini
    pub const APP_DIR: &str = "gtk-3.0";

    /// Key-file name
    pub const FILENAME: &str = "settings.ini";

    /// Group holding the toolkit display preferences
    pub const SETTINGS_GROUP: &str = "Settings";
}

/// xsettingsd daemon constants
pub mod xsettingsd {
    /// Exact executable name, as it appears in /proc/<pid>/comm
    pub const PROCESS_NAME: &str = "xsettingsd";

    /// Subdirectory of the user config dir holding the daemon config
    pub const APP_DIR: &str = "xsettingsd";

    /// Daemon config file name
    pub const FILENAME: &str = "xsettingsd.conf";

    /// Fixed header written at the top of every generated config
    pub const HEADER: [&str; 2] = [
        "# This file is managed by gtk-refresh.",
        "# Manual changes will be overwritten on the next run.",
    ];
}

/// Value encoding constants
pub mod encoding {
    /// Raw strings treated as boolean true; everything else is false
    pub const TRUTHY: [&str; 3] = ["1", "true", "TRUE"];
}

/// Diagnostic output limits
pub mod diag {
    /// Maximum window name length echoed in walker log lines
    pub const NAME_TRUNCATE: usize = 32;
}
