use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// All solver parameters in one struct.
/// Serializable so presets can be kept as JSON next to the photographs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    // -- Segmentation stage --
    /// Photographs whose longer side exceeds this are downscaled first.
    pub max_image_dimension: u32,
    /// How the foreground mask is computed.
    pub mask: MaskMethod,
    /// Radius of the open/close pass that cleans the mask. 0 = off.
    pub mask_cleanup_radius: u8,
    /// Blobs with fewer foreground pixels than this are discarded.
    pub min_piece_size: u32,
    /// Border (pixels) kept around each cut-out piece.
    pub piece_padding: u32,
    /// Color painted over background pixels inside a piece's cut-out.
    pub fill_color: [u8; 3],

    // -- Corner detection --
    pub corners: CornerMethod,
    /// Coarse turning-angle window, as a fraction of the contour length.
    /// The fine window is a third of it.
    pub corner_window: f64,
    /// Minimum corner spacing, as a fraction of the mask diagonal.
    pub min_corner_spacing: f64,
    /// Minimum corner sharpness (degrees) for a quadrilateral candidate.
    pub quad_candidate_threshold: f64,
    /// Candidates kept per image quadrant by the quadrilateral search.
    pub quad_candidates_per_quadrant: usize,
    /// Half-width of the local-maximum window, as a fraction of contour length.
    pub polar_peak_window: f64,
    /// A radius peak must rise this far (fraction of the mean radius) above
    /// the lowest radius in its window.
    pub polar_peak_prominence: f64,

    // -- Matching --
    /// Nearest-point search window, percent of the longer contour.
    pub window_percent: f64,
    /// Endpoint-distance differences below this count as zero.
    pub endpoint_ignore_threshold: f64,
    /// Scores at or above this are never used for assembly.
    pub match_keep_threshold: f64,

    // -- Runtime --
    /// Run per-piece and per-pair work on the rayon pool.
    pub parallel: bool,
    /// Send diagnostic images (masks, corner overlays) to the progress sink.
    pub debug_images: bool,
}

/// Foreground mask strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskMethod {
    /// Distance from the dominant (background) color.
    BackgroundColor { tolerance: f64 },
    /// Otsu's method on luma.
    Otsu,
}

/// Corner location strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerMethod {
    /// Binary search over the corner sharpness threshold.
    Features,
    /// Most rectangular quadrilateral over one candidate per quadrant.
    MaxQuad,
    /// Radius peaks of the contour around its centroid.
    Polar,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: 4000,
            mask: MaskMethod::BackgroundColor { tolerance: 60.0 },
            mask_cleanup_radius: 2,
            min_piece_size: 1000,
            piece_padding: 4,
            fill_color: [128, 128, 128],
            corners: CornerMethod::Polar,
            corner_window: 0.06,
            min_corner_spacing: 0.2,
            quad_candidate_threshold: 30.0,
            quad_candidates_per_quadrant: 12,
            polar_peak_window: 0.05,
            polar_peak_prominence: 0.02,
            window_percent: 5.0,
            endpoint_ignore_threshold: 3.0,
            match_keep_threshold: 1.0e6,
            parallel: true,
            debug_images: false,
        }
    }
}

impl SolverConfig {
    /// Load a JSON preset. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, SolveError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SolveError> {
        serde_json::from_str(text).map_err(|e| SolveError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, SolveError> {
        serde_json::to_string_pretty(self).map_err(|e| SolveError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SolverConfig::from_json(r#"{ "min_piece_size": 50, "corners": "max_quad" }"#)
            .unwrap();
        assert_eq!(config.min_piece_size, 50);
        assert_eq!(config.corners, CornerMethod::MaxQuad);
        assert_eq!(config.window_percent, SolverConfig::default().window_percent);
    }

    #[test]
    fn mask_method_round_trips_through_json() {
        let config = SolverConfig {
            mask: MaskMethod::BackgroundColor { tolerance: 12.5 },
            ..SolverConfig::default()
        };
        let text = config.to_json().unwrap();
        assert_eq!(SolverConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SolverConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SolveError::Config(_)));
    }
}
