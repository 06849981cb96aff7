//! Aspect-ratio specifications and the working-ratio resolver.
//!
//! A [`RatioSpec`] is what the user picked: a fixed `W:H` token or `auto`.
//! [`resolve`] turns it into the *working ratio* for one render, measuring
//! the current photo when the spec is `auto` and finally swapping the pair so
//! its long side follows the [`Orientation`].
//!
//! Interactive parsing ([`RatioSpec::parse`]) never fails. Anything that is
//! not `auto` or a positive `<digits>:<digits>` pair (ASCII or full-width
//! colon) becomes the `3:4` default, so a malformed value can't leave the
//! editor without a ratio. Settings files go through the strict
//! [`RatioSpec::try_parse`] instead and reject the same input.

use crate::imaging::ImageBackend;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Ratio used whenever nothing better is known.
pub const DEFAULT_RATIO: (u32, u32) = (3, 4);

/// Ratio tokens offered as presets, in display order.
pub const RATIO_PRESETS: &[&str] = &[
    "1:1", "2:3", "3:5", "3:4", "4:5", "5:7", "9:16", "16:9", "21:9", "auto",
];

/// A user-selected aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RatioSpec {
    /// Fixed `width:height`, both non-zero.
    Fixed(u32, u32),
    /// Follow each photo's own dimensions.
    Auto,
}

impl RatioSpec {
    /// Parse a ratio token, falling back to `3:4` on anything malformed.
    pub fn parse(token: &str) -> Self {
        Self::try_parse(token).unwrap_or(Self::Fixed(DEFAULT_RATIO.0, DEFAULT_RATIO.1))
    }

    /// Strict parse: `None` unless the token is `auto` or a positive pair.
    pub fn try_parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token == "auto" {
            return Some(Self::Auto);
        }
        let (w, h) = token.split_once([':', '：'])?;
        let w = parse_digits(w.trim())?;
        let h = parse_digits(h.trim())?;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Self::Fixed(w, h))
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl Default for RatioSpec {
    fn default() -> Self {
        Self::Fixed(1, 1)
    }
}

/// Strict conversion used when reading settings files.
impl TryFrom<String> for RatioSpec {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_parse(&s).ok_or_else(|| format!("invalid ratio {s:?}, expected \"W:H\" or \"auto\""))
    }
}

impl From<RatioSpec> for String {
    fn from(spec: RatioSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for RatioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(w, h) => write!(f, "{w}:{h}"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

/// Frame orientation. The long side of the working ratio follows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }

    /// Swap `(w, h)` when its order disagrees with the orientation.
    ///
    /// Landscape yields `w >= h`, portrait yields `h >= w`. Zero sides are
    /// raised to 1.
    pub fn normalize(self, (w, h): (u32, u32)) -> (u32, u32) {
        let (w, h) = (w.max(1), h.max(1));
        match self {
            Self::Landscape if w < h => (h, w),
            Self::Portrait if w > h => (h, w),
            _ => (w, h),
        }
    }
}

/// Resolve the working ratio for one render.
///
/// For [`RatioSpec::Auto`] the current photo's natural dimensions are probed
/// through the session cache. A missing photo or a failed probe is not an
/// error here; it resolves to [`DEFAULT_RATIO`].
pub fn resolve(
    backend: &impl ImageBackend,
    session: &mut Session,
    spec: RatioSpec,
    orientation: Orientation,
    current_image: Option<&Path>,
) -> (u32, u32) {
    let raw = match spec {
        RatioSpec::Fixed(w, h) => (w, h),
        RatioSpec::Auto => match current_image {
            Some(path) => match session.probe_dimensions(backend, path) {
                Ok(dims) => (dims.width, dims.height),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "dimension probe failed, using default ratio");
                    DEFAULT_RATIO
                }
            },
            None => DEFAULT_RATIO,
        },
    };
    orientation.normalize(raw)
}
