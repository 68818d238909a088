//! Shadow settings stored on a design node.
//!
//! The payload is JSON written under [`PLUGIN_DATA_KEY`] when the user applies
//! a shadow, and read back when the node is selected again. Records written by
//! older releases lack `lightPosition` and `previewBounds`; they still load and
//! restore what they can.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::{Deserialize, Serialize};

use crate::ErrorCode;
use crate::consts::{PERSISTED_FORMAT_VERSION, PLUGIN_DATA_KEY};
use crate::geometry::{Point, Size};
use crate::scene::BackgroundPreference;
use crate::shadow::ShadowKind;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("stored shadow data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored shadow data is missing `{0}`")]
    MissingField(&'static str),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "E_MALFORMED_DATA",
            Self::MissingField(_) => "E_MISSING_FIELD",
        }
    }
}

/// Scene parameters plus what is needed to put the preview back as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredRecord")]
pub struct PersistedShadowData {
    pub azimuth: f64,
    pub distance: f64,
    pub elevation: f64,
    pub brightness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Where `background_color` came from; only a custom background is restored as a color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_preference: Option<BackgroundPreference>,
    /// User-picked shadow color overriding the derived tint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_type: Option<ShadowKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_bounds: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Wire shape with every field optional, checked into [`PersistedShadowData`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    azimuth: Option<f64>,
    distance: Option<f64>,
    elevation: Option<f64>,
    brightness: Option<f64>,
    #[serde(alias = "color")]
    background_color: Option<String>,
    background_preference: Option<BackgroundPreference>,
    shadow_color: Option<String>,
    shadow_type: Option<ShadowKind>,
    light_position: Option<Point>,
    preview_bounds: Option<Size>,
    version: Option<u32>,
}

impl PersistedShadowData {
    /// Parse a stored payload.
    ///
    /// # Errors
    ///
    /// [`PersistError::Malformed`] when the text is not a JSON object of the
    /// expected shape; [`PersistError::MissingField`] when one of the four
    /// scene parameters is absent.
    pub fn parse(raw: &str) -> Result<Self, PersistError> {
        let record: StoredRecord = serde_json::from_str(raw)?;
        Self::try_from(record)
    }

    /// Parse leniently: unreadable data is logged and treated as absent.
    #[must_use]
    pub fn load(raw: Option<&str>) -> Option<Self> {
        let raw = raw.filter(|s| !s.trim().is_empty())?;
        match Self::parse(raw) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), key = PLUGIN_DATA_KEY, "stored shadow data unreadable; starting fresh");
                None
            }
        }
    }

    /// Serialize for storage, stamped with the current format version.
    ///
    /// # Errors
    ///
    /// [`PersistError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        let stamped = Self { version: Some(PERSISTED_FORMAT_VERSION), ..self.clone() };
        Ok(serde_json::to_string(&stamped)?)
    }

    /// How completely this record can be restored.
    #[must_use]
    pub fn restore_outcome(&self) -> RestoreOutcome {
        let newer = self.version.is_some_and(|v| v > PERSISTED_FORMAT_VERSION);
        if self.light_position.is_none() || newer {
            RestoreOutcome::Partial
        } else {
            RestoreOutcome::Full
        }
    }
}

impl TryFrom<StoredRecord> for PersistedShadowData {
    type Error = PersistError;

    fn try_from(record: StoredRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            azimuth: record.azimuth.ok_or(PersistError::MissingField("azimuth"))?,
            distance: record.distance.ok_or(PersistError::MissingField("distance"))?,
            elevation: record.elevation.ok_or(PersistError::MissingField("elevation"))?,
            brightness: record.brightness.ok_or(PersistError::MissingField("brightness"))?,
            background_color: record.background_color,
            background_preference: record.background_preference,
            shadow_color: record.shadow_color,
            shadow_type: record.shadow_type,
            light_position: record.light_position,
            preview_bounds: record.preview_bounds,
            version: record.version,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Full,
    /// Some fields were missing or unknown; defaults were used for them.
    Partial,
}

impl RestoreOutcome {
    /// Notification shown to the user after restoring.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Full => "Restored previous shadow settings.",
            Self::Partial => "Couldn't restore all previous shadow settings due to a newer version. Sorry!",
        }
    }
}
