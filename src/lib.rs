//! Shadow casting engine for a design-tool plugin.
//!
//! The user sculpts a layered drop or inner shadow by dragging a virtual light
//! around a virtual target in a small preview. This crate owns everything
//! between the raw pointer offsets emitted by that preview and the shadow
//! layers written back to the host: drag state machines, axis snapping, scene
//! reconciliation, background tinting, and the multi-layer synthesis itself.
//! The host runtime (selection events, effect storage, notifications) and the
//! widget tree stay outside; they exchange plain data with this crate.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`scene`] | Scene record and the single owner of light/target/background state |
//! | [`shadow`] | Multi-layer shadow synthesis and its CSS / host-effect renderings |
//! | [`input`] | Drag state machines for light position, brightness, elevation |
//! | [`snap`] | Center / horizontal / vertical axis snapping |
//! | [`color`] | RGBA/HSL conversions and background-derived shadow tint |
//! | [`geometry`] | Points, angles, distances, normalization, aspect-fit resize |
//! | [`schedule`] | Throttle and debounce scheduling with explicit clocks |
//! | [`params`] | Validation for numeric parameter entry |
//! | [`selection`] | Host selection classification |
//! | [`persist`] | Per-node stored shadow data and restore outcomes |
//! | [`host`] | Host message protocol and the node session lifecycle |
//! | [`config`] | Tunable presentation parameters |
//! | [`consts`] | Shared numeric constants (sizes, floors, timings) |

pub mod color;
pub mod config;
pub mod consts;
pub mod geometry;
pub mod host;
pub mod input;
pub mod params;
pub mod persist;
pub mod scene;
pub mod schedule;
pub mod selection;
pub mod shadow;
pub mod snap;

/// Stable machine-readable code for errors surfaced to the user.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}
