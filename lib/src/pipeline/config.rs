//! Pipeline configuration.
//!
//! Every default is documented on [`PipelineConfig::default`] and can be
//! overridden through the `with_*` builders or a JSON document:
//!
//! ```json
//! { "target_crs": 32633, "error_policy": "fail_fast", "include_dropoff": true }
//! ```

use crate::preprocessing::distance::EARTH_RADIUS_KM;
use crate::preprocessing::error::{ErrorPolicy, PreprocessingError, PreprocessingResult};
use crate::preprocessing::projection::Crs;
use crate::preprocessing::scaling::{DegeneratePolicy, RangeScaler, RangeScalerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for a [`FeaturePipeline`](super::FeaturePipeline) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Sphere radius for haversine distance, km.
    pub earth_radius_km: f64,
    /// System the input coordinates are expressed in. Must be geographic.
    pub source_crs: Crs,
    /// Planar system coordinates are projected into.
    pub target_crs: Crs,
    /// Degrees beyond the UTM zone half-width tolerated before a point is flagged.
    pub zone_slack_deg: f64,
    pub error_policy: ErrorPolicy,
    pub degenerate_policy: DegeneratePolicy,
    /// Emit dropoff projection, encoding and scaling columns as well.
    pub include_dropoff: bool,
    /// Target range of the scaled columns, `(min, max)`.
    pub scale_range: (f64, f64),
    /// Process rows with rayon. Ignored unless built with the `parallel` feature.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    /// - `earth_radius_km`: 6371.0 (mean Earth radius)
    /// - `source_crs`: EPSG:4326
    /// - `target_crs`: EPSG:32618 (UTM 18N, New York City)
    /// - `zone_slack_deg`: 0.0
    /// - `error_policy`: skip and report
    /// - `degenerate_policy`: map to zero
    /// - `include_dropoff`: false
    /// - `scale_range`: (0.0, 1.0)
    /// - `parallel`: false
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
            source_crs: Crs::Geographic,
            target_crs: Crs::Utm {
                zone: 18,
                north: true,
            },
            zone_slack_deg: 0.0,
            error_policy: ErrorPolicy::default(),
            degenerate_policy: DegeneratePolicy::default(),
            include_dropoff: false,
            scale_range: (0.0, 1.0),
            parallel: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_earth_radius_km(mut self, radius_km: f64) -> Self {
        self.earth_radius_km = radius_km;
        self
    }

    pub fn with_source_crs(mut self, crs: Crs) -> Self {
        self.source_crs = crs;
        self
    }

    pub fn with_target_crs(mut self, crs: Crs) -> Self {
        self.target_crs = crs;
        self
    }

    /// Set the target system by EPSG code.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::UnsupportedCrs`] for unknown codes.
    pub fn with_target_epsg(self, code: u32) -> PreprocessingResult<Self> {
        Ok(self.with_target_crs(Crs::from_epsg(code)?))
    }

    pub fn with_zone_slack_deg(mut self, slack_deg: f64) -> Self {
        self.zone_slack_deg = slack_deg;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    pub fn with_dropoff(mut self, include: bool) -> Self {
        self.include_dropoff = include;
        self
    }

    pub fn with_scale_range(mut self, min: f64, max: f64) -> Self {
        self.scale_range = (min, max);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check value ranges and combinations.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] describing the first
    /// problem found.
    pub fn validate(&self) -> PreprocessingResult<()> {
        if !(self.earth_radius_km.is_finite() && self.earth_radius_km > 0.0) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "earth_radius_km must be finite and positive, got {}",
                self.earth_radius_km
            )));
        }
        if !self.source_crs.is_geographic() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "source_crs must be geographic (EPSG:4326), got {}",
                self.source_crs
            )));
        }
        if self.target_crs.is_geographic() {
            return Err(PreprocessingError::InvalidParameter(
                "target_crs must be a planar system".to_string(),
            ));
        }
        if !(self.zone_slack_deg.is_finite() && self.zone_slack_deg >= 0.0) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "zone_slack_deg must be finite and non-negative, got {}",
                self.zone_slack_deg
            )));
        }
        self.scaler().map(|_| ())
    }

    /// Range scaler described by this configuration.
    pub fn scaler(&self) -> PreprocessingResult<RangeScaler> {
        RangeScaler::from_config(RangeScalerConfig {
            min: self.scale_range.0,
            max: self.scale_range.1,
            degenerate_policy: self.degenerate_policy,
        })
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> PreprocessingResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PreprocessingResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> PreprocessingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
