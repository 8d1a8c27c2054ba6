//! Colour theme for the dxterm TUI.
//!
//! Themes are TOML files embedded with [`include_str!`] and parsed through the
//! `config` crate, so the binary works without any files on disk.
//!
//! Each coding system gets its own style so ICD-11 and NAMASTE codes are easy
//! to tell apart in the diagnosis list and the suggestion popup.

use config::{Config, File, FileFormat};
use dxterm_core::CodingSystem;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    reversed: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        for (on, modifier) in [
            (self.bold, Modifier::BOLD),
            (self.dim, Modifier::DIM),
            (self.italic, Modifier::ITALIC),
            (self.reversed, Modifier::REVERSED),
        ] {
            if on {
                style = style.add_modifier(modifier);
            }
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
    command_bar: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawPopup {
    border: RawStyle,
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawCodes {
    icd11: RawStyle,
    ayurveda: RawStyle,
    siddha: RawStyle,
    unani: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    info: RawStyle,
    success: RawStyle,
    error: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawRows {
    selected: RawStyle,
    placeholder: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    borders: RawBorders,
    popup: RawPopup,
    codes: RawCodes,
    status: RawStatus,
    rows: RawRows,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Severity of the inline status message under the patient header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Pre-resolved ratatui styles; no allocation at render time.
#[derive(Debug, Clone)]
pub struct Theme {
    pub border_focused: Style,
    pub border_unfocused: Style,
    pub border_command_bar: Style,

    pub popup_border: Style,
    /// The highlighted suggestion.
    pub popup_highlight: Style,

    pub code_icd11: Style,
    pub code_ayurveda: Style,
    pub code_siddha: Style,
    pub code_unani: Style,

    pub status_info: Style,
    pub status_success: Style,
    pub status_error: Style,

    pub row_selected: Style,
    /// Blank rows and empty-input hints.
    pub row_placeholder: Style,
}

impl Theme {
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a theme by the name used in `[ui] theme` and `:theme`.
    /// Unknown names fall back to the default theme.
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Self::load_gruvbox_dark(),
            _ => Self::load_default(),
        }
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            popup_border: raw.popup.border.into_style(),
            popup_highlight: raw.popup.highlight.into_style(),
            code_icd11: raw.codes.icd11.into_style(),
            code_ayurveda: raw.codes.ayurveda.into_style(),
            code_siddha: raw.codes.siddha.into_style(),
            code_unani: raw.codes.unani.into_style(),
            status_info: raw.status.info.into_style(),
            status_success: raw.status.success.into_style(),
            status_error: raw.status.error.into_style(),
            row_selected: raw.rows.selected.into_style(),
            row_placeholder: raw.rows.placeholder.into_style(),
        })
    }

    pub fn code_style(&self, system: CodingSystem) -> Style {
        match system {
            CodingSystem::Icd11 => self.code_icd11,
            CodingSystem::Ayurveda => self.code_ayurveda,
            CodingSystem::Siddha => self.code_siddha,
            CodingSystem::Unani => self.code_unani,
        }
    }

    pub fn status_style(&self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info => self.status_info,
            StatusKind::Success => self.status_success,
            StatusKind::Error => self.status_error,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Named terminal colours, `#rrggbb`, or `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => s["indexed:".len()..].parse().ok().map(Color::Indexed),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
