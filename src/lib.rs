//! # Photo Frame
//!
//! Puts photos into clean frames: a solid background, an optional border
//! hugging the photo, and a safety margin, at a chosen aspect ratio and
//! export size. The same render path draws a small interactive preview and
//! the full-size files written by a batch export.
//!
//! # Architecture
//!
//! ```text
//! ratio::resolve ─► calculations::target_size / preview_size
//!                         │
//!                         ▼
//! Session (probe + decode caches) ─► composite::render ─► Surface
//!                                                           │
//!                       export::export_all ◄────────────────┘
//!                       (encode ─► PhotoStore)
//! ```
//!
//! Every step is synchronous. Caches live in a [`session::Session`] the
//! caller owns, and timers (input commit, redraw debounce) are deadlines
//! compared against a caller-supplied `Instant`, so the interactive
//! [`editor::Editor`] runs the same under any event loop and in tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ratio`] | `W:H` / `auto` ratio specs, orientation, working-ratio resolution |
//! | [`imaging`] | Layout math, drawing surfaces, the `ImageBackend` trait and its `image`-crate implementation |
//! | [`composite`] | One frame render: background → border → photo |
//! | [`export`] | Serial batch export, `PhotoStore` persistence, progress events |
//! | [`palette`] | Dominant-color extraction and color presets |
//! | [`session`] | Dimension-probe and decoded-image caches |
//! | [`input`] | Debounced numeric fields and the redraw debouncer |
//! | [`editor`] | Interactive editing session tying the above together |
//! | [`color`] | Hex / RGB / HSL conversions and the picker grid |
//! | [`config`] | `frame.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Photo Never Leaves the Margin
//!
//! Zoom scales the photo relative to the largest size that fits inside the
//! margin. Zooming out shrinks it; zooming in is capped at that fit, so a
//! frame never crops its photo and the border always stays visible.
//!
//! ## JPEG or PNG by Background
//!
//! A frame with a solid background is fully opaque and exports as JPEG. With
//! the background disabled the surroundings are transparent, and the export
//! switches to PNG to keep them that way.
//!
//! ## Failures Stay Local
//!
//! An unreadable photo renders as a neutral placeholder, and a failed save
//! is recorded in the export summary. Neither stops the rest of the batch.

pub mod color;
pub mod composite;
pub mod config;
pub mod editor;
pub mod export;
pub mod imaging;
pub mod input;
pub mod output;
pub mod palette;
pub mod ratio;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
