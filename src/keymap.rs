//! Static mapping from GTK settings keys to XSettings names and types
//!
//! Earlier revisions asked a live GtkSettings instance for the type of each
//! property. The table below replaces that introspection with a versioned
//! constant covering the known GTK/XSettings bridge, so the translator works
//! without a running toolkit and can be tested in isolation.

use serde::Serialize;

/// Semantic type of a settings value, driving its encoding in the
/// xsettingsd config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// Encoded as integer 1/0
    Bool,
    /// Encoded double-quoted, internal quotes escaped
    Str,
    /// Encoded as a decimal integer
    Int,
    /// GTK enum properties; encoded via their numeric value
    Enum,
}

/// One row of the key mapping table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KeyMapping {
    /// Source key as it appears in settings.ini
    pub gtk_key: &'static str,
    /// Destination name in the XSettings namespace
    pub xsettings_name: &'static str,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
}

const fn map(gtk_key: &'static str, xsettings_name: &'static str, setting_type: SettingType) -> KeyMapping {
    KeyMapping { gtk_key, xsettings_name, setting_type }
}

/// Table version, bumped whenever entries are added or retyped
pub const KEYMAP_VERSION: u32 = 2;

/// The known GTK -> XSettings key bridge. Keys absent from this table are
/// passed over by the translator, never rejected.
pub const KEYMAP: &[KeyMapping] = &[
    map("gtk-cursor-blink", "Net/CursorBlink", SettingType::Bool),
    map("gtk-cursor-blink-time", "Net/CursorBlinkTime", SettingType::Int),
    map("gtk-cursor-blink-timeout", "Net/CursorBlinkTimeout", SettingType::Int),
    map("gtk-double-click-distance", "Net/DoubleClickDistance", SettingType::Int),
    map("gtk-double-click-time", "Net/DoubleClickTime", SettingType::Int),
    map("gtk-dnd-drag-threshold", "Net/DndDragThreshold", SettingType::Int),
    map("gtk-enable-event-sounds", "Net/EnableEventSounds", SettingType::Bool),
    map("gtk-enable-input-feedback-sounds", "Net/EnableInputFeedbackSounds", SettingType::Bool),
    map("gtk-icon-theme-name", "Net/IconThemeName", SettingType::Str),
    map("gtk-fallback-icon-theme", "Net/FallbackIconTheme", SettingType::Str),
    map("gtk-sound-theme-name", "Net/SoundThemeName", SettingType::Str),
    map("gtk-theme-name", "Net/ThemeName", SettingType::Str),
    map("gtk-alternative-button-order", "Gtk/AlternativeButtonOrder", SettingType::Bool),
    map("gtk-alternative-sort-arrows", "Gtk/AlternativeSortArrows", SettingType::Bool),
    map("gtk-button-images", "Gtk/ButtonImages", SettingType::Bool),
    map("gtk-can-change-accels", "Gtk/CanChangeAccels", SettingType::Bool),
    map("gtk-color-palette", "Gtk/ColorPalette", SettingType::Str),
    map("gtk-color-scheme", "Gtk/ColorScheme", SettingType::Str),
    map("gtk-cursor-theme-name", "Gtk/CursorThemeName", SettingType::Str),
    map("gtk-cursor-theme-size", "Gtk/CursorThemeSize", SettingType::Int),
    map("gtk-decoration-layout", "Gtk/DecorationLayout", SettingType::Str),
    map("gtk-dialogs-use-header", "Gtk/DialogsUseHeader", SettingType::Bool),
    map("gtk-enable-accels", "Gtk/EnableAccels", SettingType::Bool),
    map("gtk-enable-animations", "Gtk/EnableAnimations", SettingType::Bool),
    map("gtk-enable-mnemonics", "Gtk/EnableMnemonics", SettingType::Bool),
    map("gtk-enable-primary-paste", "Gtk/EnablePrimaryPaste", SettingType::Bool),
    map("gtk-font-name", "Gtk/FontName", SettingType::Str),
    map("gtk-im-module", "Gtk/IMModule", SettingType::Str),
    map("gtk-key-theme-name", "Gtk/KeyThemeName", SettingType::Str),
    map("gtk-menu-bar-accel", "Gtk/MenuBarAccel", SettingType::Str),
    map("gtk-menu-images", "Gtk/MenuImages", SettingType::Bool),
    map("gtk-modules", "Gtk/Modules", SettingType::Str),
    map("gtk-overlay-scrolling", "Gtk/OverlayScrolling", SettingType::Bool),
    map("gtk-primary-button-warps-slider", "Gtk/PrimaryButtonWarpsSlider", SettingType::Bool),
    map("gtk-recent-files-enabled", "Gtk/RecentFilesEnabled", SettingType::Bool),
    map("gtk-recent-files-max-age", "Gtk/RecentFilesMaxAge", SettingType::Int),
    map("gtk-shell-shows-app-menu", "Gtk/ShellShowsAppMenu", SettingType::Bool),
    map("gtk-shell-shows-desktop", "Gtk/ShellShowsDesktop", SettingType::Bool),
    map("gtk-shell-shows-menubar", "Gtk/ShellShowsMenubar", SettingType::Bool),
    map("gtk-titlebar-double-click", "Gtk/TitlebarDoubleClick", SettingType::Str),
    map("gtk-titlebar-middle-click", "Gtk/TitlebarMiddleClick", SettingType::Str),
    map("gtk-titlebar-right-click", "Gtk/TitlebarRightClick", SettingType::Str),
    map("gtk-toolbar-icon-size", "Gtk/ToolbarIconSize", SettingType::Enum),
    map("gtk-toolbar-style", "Gtk/ToolbarStyle", SettingType::Enum),
    map("gtk-xft-antialias", "Xft/Antialias", SettingType::Int),
    map("gtk-xft-dpi", "Xft/DPI", SettingType::Int),
    map("gtk-xft-hinting", "Xft/Hinting", SettingType::Int),
    map("gtk-xft-hintstyle", "Xft/HintStyle", SettingType::Str),
    map("gtk-xft-rgba", "Xft/RGBA", SettingType::Str),
];

/// Look up the mapping for a source key, if one exists
pub fn lookup(gtk_key: &str) -> Option<&'static KeyMapping> {
    KEYMAP.iter().find(|m| m.gtk_key == gtk_key)
}
