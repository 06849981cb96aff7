//! Settings file handling.
//!
//! Loads, validates, and merges `frame.toml`. Layering is flat: stock
//! defaults are overridden by the user's file, and command-line flags are
//! applied on top of the result by the binary.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! ratio = "1:1"              # "W:H" or "auto"
//! orientation = "portrait"   # or "landscape"
//!
//! [frame]
//! border_px = 4              # inner border thickness at export size, 0..=200
//! zoom_pct = 95              # photo scale relative to fit, 30..=150
//!
//! [frame.outer_background]
//! enabled = true
//! color = "#FFFFFF"
//!
//! [frame.inner_border]
//! enabled = true
//! color = "#000000"
//!
//! [export]
//! long_edge = 1800           # pixels on the longer output side, 1..=8192
//! quality = 95               # JPEG quality 1..=100
//!
//! [preview]
//! long_side = 680
//! redraw_delay_ms = 50
//! input_commit_delay_ms = 600
//!
//! [cache]
//! max_decoded_images = 32
//! ```
//!
//! ## Partial Configuration
//!
//! Files are sparse. Override just the values you want:
//!
//! ```toml
//! [frame.inner_border]
//! enabled = false
//! ```
//!
//! Unknown keys are rejected to catch typos early. Values out of range in a
//! file are an error; the interactive setters clamp instead.

use crate::color::{Rgb, is_valid_hex};
use crate::composite::FrameStyle;
use crate::imaging::Quality;
use crate::imaging::calculations::{MAX_LONG_EDGE, PREVIEW_LONG_SIDE};
use crate::ratio::{Orientation, RatioSpec};
use crate::session::DEFAULT_MAX_DECODED;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Long-edge export sizes offered as presets.
pub const SIZE_PRESETS: &[u32] = &[1200, 1800, 2400, 3000, 4000];
pub const DEFAULT_LONG_EDGE: u32 = 1800;

pub const MAX_BORDER_PX: u32 = 200;
pub const MIN_ZOOM_PCT: u32 = 30;
pub const MAX_ZOOM_PCT: u32 = 150;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings loaded from `frame.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub ratio: RatioSpec,
    pub orientation: Orientation,
    pub frame: FrameConfig,
    pub export: ExportConfig,
    pub preview: PreviewConfig,
    pub cache: CacheConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ratio: RatioSpec::Fixed(1, 1),
            orientation: Orientation::Portrait,
            frame: FrameConfig::default(),
            export: ExportConfig::default(),
            preview: PreviewConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.frame.validate()?;
        if !(1..=MAX_LONG_EDGE).contains(&self.export.long_edge) {
            return Err(ConfigError::Validation(format!(
                "export.long_edge must be 1-{MAX_LONG_EDGE}"
            )));
        }
        if !(1..=100).contains(&self.export.quality) {
            return Err(ConfigError::Validation(
                "export.quality must be 1-100".into(),
            ));
        }
        if self.preview.long_side == 0 {
            return Err(ConfigError::Validation("preview.long_side must be > 0".into()));
        }
        if self.cache.max_decoded_images == 0 {
            return Err(ConfigError::Validation(
                "cache.max_decoded_images must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// An optional solid fill: the outer background or the inner border.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fill {
    pub enabled: bool,
    pub color: String,
}

impl Fill {
    fn new(color: &str) -> Self {
        Self {
            enabled: true,
            color: color.to_string(),
        }
    }

    /// The paint color when enabled.
    pub fn paint(&self, fallback: Rgb) -> Option<Rgb> {
        self.enabled.then(|| Rgb::from_hex_or(&self.color, fallback))
    }

    /// Replace the color if `hex` is a valid `#RRGGBB` value.
    ///
    /// Returns whether the color was accepted; invalid input leaves the
    /// previous color in place.
    pub fn set_color(&mut self, hex: &str) -> bool {
        let hex = hex.trim();
        if !is_valid_hex(hex) {
            return false;
        }
        self.color = hex.to_string();
        true
    }
}

/// Frame parameters shared by the preview and every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    border_px: u32,
    zoom_pct: u32,
    pub outer_background: Fill,
    pub inner_border: Fill,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            border_px: 4,
            zoom_pct: 95,
            outer_background: Fill::new("#FFFFFF"),
            inner_border: Fill::new("#000000"),
        }
    }
}

impl FrameConfig {
    pub fn border_px(&self) -> u32 {
        self.border_px
    }

    pub fn zoom_pct(&self) -> u32 {
        self.zoom_pct
    }

    /// Zoom as a multiplier on the fit scale.
    pub fn zoom(&self) -> f64 {
        self.zoom_pct as f64 / 100.0
    }

    /// Set the border thickness, clamped to `0..=200`.
    pub fn set_border_px(&mut self, px: i64) {
        self.border_px = px.clamp(0, MAX_BORDER_PX as i64) as u32;
    }

    /// Set the zoom percentage, clamped to `30..=150`.
    pub fn set_zoom_pct(&mut self, pct: i64) {
        self.zoom_pct = pct.clamp(MIN_ZOOM_PCT as i64, MAX_ZOOM_PCT as i64) as u32;
    }

    /// Paint parameters at export scale.
    pub fn style(&self) -> FrameStyle {
        FrameStyle {
            background: self.outer_background.paint(Rgb::WHITE),
            border: self.inner_border.paint(Rgb::BLACK),
            border_px: self.border_px,
            zoom: self.zoom(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.border_px > MAX_BORDER_PX {
            return Err(ConfigError::Validation(format!(
                "frame.border_px must be 0-{MAX_BORDER_PX}"
            )));
        }
        if !(MIN_ZOOM_PCT..=MAX_ZOOM_PCT).contains(&self.zoom_pct) {
            return Err(ConfigError::Validation(format!(
                "frame.zoom_pct must be {MIN_ZOOM_PCT}-{MAX_ZOOM_PCT}"
            )));
        }
        for (key, fill) in [
            ("outer_background", &self.outer_background),
            ("inner_border", &self.inner_border),
        ] {
            if !is_valid_hex(&fill.color) {
                return Err(ConfigError::Validation(format!(
                    "frame.{key}.color must be #RRGGBB, got {:?}",
                    fill.color
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub long_edge: u32,
    pub quality: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            long_edge: DEFAULT_LONG_EDGE,
            quality: Quality::default().value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub long_side: u32,
    pub redraw_delay_ms: u64,
    pub input_commit_delay_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            long_side: PREVIEW_LONG_SIDE,
            redraw_delay_ms: 50,
            input_commit_delay_ms: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub max_decoded_images: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_decoded_images: DEFAULT_MAX_DECODED,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Settings::default()).expect("default settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a settings file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(file: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Settings, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `file`, falling back to stock defaults when it is
/// absent.
pub fn load_config(file: &Path) -> Result<Settings, ConfigError> {
    let overlay = load_raw_config(file)?;
    if overlay.is_some() {
        tracing::debug!(path = %file.display(), "loaded settings file");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `frame.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Frame Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Output aspect ratio: "W:H" (e.g. "4:5", "16:9") or "auto" to follow
# each photo's own dimensions.
ratio = "1:1"

# "portrait" puts the long side of the ratio vertically, "landscape"
# horizontally.
orientation = "portrait"

# ---------------------------------------------------------------------------
# Frame
# ---------------------------------------------------------------------------
[frame]
# Inner border thickness in pixels at export size (0-200).
border_px = 4

# Photo scale relative to the largest size that fits (30-150).
# The photo never grows past the area inside the margin.
zoom_pct = 95

# Solid background behind the photo. Disabled backgrounds export as
# transparent PNG instead of JPEG.
[frame.outer_background]
enabled = true
color = "#FFFFFF"

# Filled rectangle hugging the photo.
[frame.inner_border]
enabled = true
color = "#000000"

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Pixels on the longer output side, at most 8192.
# Presets: 1200, 1800, 2400, 3000, 4000.
long_edge = 1800

# JPEG quality (1 = worst, 100 = best).
quality = 95

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Width of the preview canvas in pixels.
long_side = 680

# Delay before a changed setting redraws the preview.
redraw_delay_ms = 50

# Delay before typed numeric input is committed.
input_commit_delay_ms = 600

# ---------------------------------------------------------------------------
# Cache
# ---------------------------------------------------------------------------
[cache]
# Decoded photos kept in memory; the oldest is dropped first.
max_decoded_images = 32
"##
}
