//! Editor tuning parameters.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Grid spacing in scene units.
pub const GRID_SIZE: f64 = 10.0;

/// Number of undo snapshots kept before the oldest is evicted.
pub const MAX_UNDO_HISTORY: usize = 200;

/// Constants that shape editing behaviour.
///
/// Missing fields fall back to their defaults when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid spacing used for every position snap.
    pub grid_size: f64,
    /// Maximum number of undo snapshots.
    pub history_limit: usize,
    /// Offset applied on both axes to duplicated elements.
    pub duplicate_offset: f64,
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Relative zoom change per wheel notch or zoom command.
    pub zoom_step: f64,
    /// Screen-space margin kept around content by zoom-to-fit.
    pub fit_padding: f64,
    /// Scene-space radius within which a click hits a connector.
    pub port_hit_radius: f64,
    /// Scene-space distance within which a click hits a wire.
    pub wire_hit_tolerance: f64,
    /// Label given to elements created with the text tool.
    pub text_label: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            history_limit: MAX_UNDO_HISTORY,
            duplicate_offset: 20.0,
            min_zoom: 0.2,
            max_zoom: 5.0,
            zoom_step: 0.1,
            fit_padding: 40.0,
            port_hit_radius: 6.0,
            wire_hit_tolerance: 4.0,
            text_label: "Text".to_string(),
        }
    }
}

impl EditorConfig {
    /// Check that every value can drive snapping and zooming.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("grid_size", self.grid_size),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_step", self.zoom_step),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let non_negative = [
            ("duplicate_offset", self.duplicate_offset),
            ("fit_padding", self.fit_padding),
            ("port_hit_radius", self.port_hit_radius),
            ("wire_hit_tolerance", self.wire_hit_tolerance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvertedZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }
}
