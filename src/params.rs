//! Validation for typed numeric entry.
//!
//! Values outside their range are rejected, never clamped. The caller keeps
//! its last valid value and lets the input control show the rejection.

#[cfg(test)]
#[path = "params_test.rs"]
mod params_test;

use std::fmt;

use crate::ErrorCode;

/// A numeric field the user can type into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamField {
    Azimuth,
    Distance,
    Brightness,
    Elevation,
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Azimuth => "azimuth",
            Self::Distance => "distance",
            Self::Brightness => "brightness",
            Self::Elevation => "elevation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange { field: ParamField, value: f64, min: f64, max: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: ParamField },
    #[error("{field} is not a number: {raw:?}")]
    Unparseable { field: ParamField, raw: String },
}

impl ErrorCode for ParamError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "E_OUT_OF_RANGE",
            Self::NotFinite { .. } | Self::Unparseable { .. } => "E_NOT_A_NUMBER",
        }
    }
}

pub const AZIMUTH_MAX: f64 = 360.0;
pub const PERCENT_MAX: f64 = 100.0;

/// Parse raw text from an input control.
///
/// # Errors
///
/// [`ParamError::Unparseable`] when the text is not a number,
/// [`ParamError::NotFinite`] for `NaN` or infinities.
pub fn parse_field(field: ParamField, raw: &str) -> Result<f64, ParamError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ParamError::Unparseable { field, raw: raw.to_owned() })?;
    if value.is_finite() { Ok(value) } else { Err(ParamError::NotFinite { field }) }
}

/// Azimuth in degrees, `0..=360`.
///
/// # Errors
///
/// See [`check_range`].
pub fn validate_azimuth(value: f64) -> Result<f64, ParamError> {
    check_range(ParamField::Azimuth, value, 0.0, AZIMUTH_MAX)
}

/// Distance in preview pixels, `0..=max`.
///
/// # Errors
///
/// See [`check_range`].
pub fn validate_distance(value: f64, max: f64) -> Result<f64, ParamError> {
    check_range(ParamField::Distance, value, 0.0, max)
}

/// Percentage `0..=100`, returned as a fraction `0..=1`.
///
/// # Errors
///
/// See [`check_range`].
pub fn validate_percent(field: ParamField, percent: f64) -> Result<f64, ParamError> {
    check_range(field, percent, 0.0, PERCENT_MAX).map(|p| p / PERCENT_MAX)
}

/// Accept `value` if it lies in `min..=max`.
///
/// # Errors
///
/// [`ParamError::NotFinite`] for `NaN` or infinities, [`ParamError::OutOfRange`]
/// otherwise when outside the range.
pub fn check_range(field: ParamField, value: f64, min: f64, max: f64) -> Result<f64, ParamError> {
    if !value.is_finite() {
        return Err(ParamError::NotFinite { field });
    }
    if value < min || value > max {
        tracing::debug!(%field, value, min, max, "numeric entry rejected");
        return Err(ParamError::OutOfRange { field, value, min, max });
    }
    Ok(value)
}
