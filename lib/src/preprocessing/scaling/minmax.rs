//! Range (min-max) scaler.
//!
//! Maps each column linearly onto a target range (default `[0, 1]`):
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min) * (max - min) + min
//! ```
//!
//! The fitted batch's minimum maps to exactly `min` and its maximum to exactly
//! `max`. A column whose minimum equals its maximum is *degenerate*; what
//! happens to it is decided by [`DegeneratePolicy`].
//!
//! # Example
//! ```rust
//! use geofeatures::preprocessing::{DegeneratePolicy, FittedTransformer, RangeScaler, Transformer};
//! use ndarray::array;
//!
//! let data = array![[583_000.0, 4_512_000.0], [586_000.0, 4_505_000.0]];
//! let scaler = RangeScaler::new().with_degenerate_policy(DegeneratePolicy::Zero);
//!
//! let state = scaler.fit(&data).unwrap();
//! let scaled = state.transform(&data).unwrap();
//! assert_eq!(scaled[[0, 0]], 0.0);
//! assert_eq!(scaled[[1, 0]], 1.0);
//! ```

use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// What to do with a column whose fitted range is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Every value in the column maps to the lower bound of the target range.
    #[default]
    Zero,
    /// Fitting fails with [`PreprocessingError::DegenerateScale`].
    Reject,
}

/// Configuration for [`RangeScaler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeScalerConfig {
    /// Lower bound of the target range.
    pub min: f64,
    /// Upper bound of the target range.
    pub max: f64,
    /// Handling of zero-range columns.
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for RangeScalerConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            degenerate_policy: DegeneratePolicy::default(),
        }
    }
}

/// Range scaler (unfitted).
#[derive(Debug, Clone, Default)]
pub struct RangeScaler {
    config: RangeScalerConfig,
}

impl RangeScaler {
    /// Create a scaler targeting `[0, 1]` with [`DegeneratePolicy::Zero`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scaler from an explicit configuration.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] if the range is not
    /// finite or `max <= min`.
    pub fn from_config(config: RangeScalerConfig) -> PreprocessingResult<Self> {
        validate_range(config.min, config.max)?;
        Ok(Self { config })
    }

    /// Set the target range.
    ///
    /// # Panics
    /// Panics if `max <= min` or either bound is not finite. Use
    /// [`RangeScaler::from_config`] for a fallible variant.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        assert!(
            min.is_finite() && max.is_finite() && max > min,
            "max must be greater than min"
        );
        self.config.min = min;
        self.config.max = max;
        self
    }

    /// Set the degenerate column policy.
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.config.degenerate_policy = policy;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &RangeScalerConfig {
        &self.config
    }
}

fn validate_range(min: f64, max: f64) -> PreprocessingResult<()> {
    if min.is_finite() && max.is_finite() && max > min {
        Ok(())
    } else {
        Err(PreprocessingError::InvalidParameter(format!(
            "scale range must be finite with max > min, got [{}, {}]",
            min, max
        )))
    }
}

fn check_finite(data: &Array2<f64>) -> PreprocessingResult<()> {
    match data.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), v)) => Err(PreprocessingError::MissingValues(format!(
            "non-finite value {} at row {}, column {}",
            v, row, col
        ))),
        None => Ok(()),
    }
}

impl Transformer for RangeScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = ScalerState;
    type Fitted = ScalerState;

    fn fit(&self, data: &Array2<f64>) -> PreprocessingResult<ScalerState> {
        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit RangeScaler on empty data".to_string(),
            ));
        }
        check_finite(data)?;

        let data_min: Array1<f64> = data.fold_axis(Axis(0), f64::INFINITY, |&acc, &v| acc.min(v));
        let data_max: Array1<f64> =
            data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &v| acc.max(v));

        let mut degenerate_columns = Vec::new();
        for col in 0..cols {
            if data_max[col] == data_min[col] {
                match self.config.degenerate_policy {
                    DegeneratePolicy::Reject => {
                        return Err(PreprocessingError::DegenerateScale {
                            column: col,
                            value: data_min[col],
                        });
                    }
                    DegeneratePolicy::Zero => {
                        log::warn!(
                            "Column {} has zero range (constant {}); mapping to {}",
                            col,
                            data_min[col],
                            self.config.min
                        );
                        degenerate_columns.push(col);
                    }
                }
            }
        }

        log::debug!(
            "Fitted RangeScaler on {} rows x {} columns ({} degenerate)",
            rows,
            cols,
            degenerate_columns.len()
        );

        Ok(ScalerState {
            config: self.config.clone(),
            data_min: data_min.to_vec(),
            data_max: data_max.to_vec(),
            degenerate_columns,
            n_features: cols,
        })
    }
}

/// Learned min/max per column.
///
/// Owned by the caller. Pass it to [`FittedTransformer::transform`] to scale
/// another batch with exactly the same mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    config: RangeScalerConfig,
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    degenerate_columns: Vec<usize>,
    n_features: usize,
}

impl ScalerState {
    /// Minimum of each column in the fitted batch.
    pub fn data_min(&self) -> &[f64] {
        &self.data_min
    }

    /// Maximum of each column in the fitted batch.
    pub fn data_max(&self) -> &[f64] {
        &self.data_max
    }

    /// `max - min` for each column.
    pub fn data_range(&self) -> Vec<f64> {
        self.data_max
            .iter()
            .zip(&self.data_min)
            .map(|(max, min)| max - min)
            .collect()
    }

    /// Indices of zero-range columns.
    pub fn degenerate_columns(&self) -> &[usize] {
        &self.degenerate_columns
    }

    /// Whether column `col` is degenerate.
    pub fn is_degenerate(&self, col: usize) -> bool {
        self.degenerate_columns.contains(&col)
    }

    /// Configuration the state was fitted with.
    pub fn config(&self) -> &RangeScalerConfig {
        &self.config
    }

    fn check_features(&self, cols: usize) -> PreprocessingResult<()> {
        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }
        Ok(())
    }

    /// Scale a single value of column `col`.
    fn scale_value(&self, col: usize, value: f64) -> f64 {
        let (lo, hi) = (self.config.min, self.config.max);
        if self.is_degenerate(col) {
            return lo;
        }
        let (min, max) = (self.data_min[col], self.data_max[col]);
        // Dividing before multiplying keeps both endpoints exact.
        (value - min) / (max - min) * (hi - lo) + lo
    }

    fn unscale_value(&self, col: usize, value: f64) -> f64 {
        let (lo, hi) = (self.config.min, self.config.max);
        if self.is_degenerate(col) {
            return self.data_min[col];
        }
        let (min, max) = (self.data_min[col], self.data_max[col]);
        (value - lo) / (hi - lo) * (max - min) + min
    }
}

impl FittedTransformer for ScalerState {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = ScalerState;

    fn transform(&self, data: &Array2<f64>) -> PreprocessingResult<Array2<f64>> {
        self.check_features(data.ncols())?;
        check_finite(data)?;

        let mut out = data.clone();
        for (col, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|v| self.scale_value(col, v));
        }
        Ok(out)
    }

    fn inverse_transform(&self, data: &Array2<f64>) -> PreprocessingResult<Array2<f64>> {
        self.check_features(data.ncols())?;

        let mut out = data.clone();
        for (col, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            column.mapv_inplace(|v| self.unscale_value(col, v));
        }
        Ok(out)
    }

    fn extract_params(&self) -> ScalerState {
        self.clone()
    }

    fn from_params(params: ScalerState) -> PreprocessingResult<Self> {
        validate_range(params.config.min, params.config.max)?;
        if params.data_min.len() != params.n_features || params.data_max.len() != params.n_features
        {
            return Err(PreprocessingError::InvalidParameter(format!(
                "scaler state declares {} features but holds {} minima and {} maxima",
                params.n_features,
                params.data_min.len(),
                params.data_max.len()
            )));
        }
        if let Some(col) = (0..params.n_features).find(|&col| {
            let (min, max) = (params.data_min[col], params.data_max[col]);
            !(min.is_finite() && max.is_finite() && min <= max)
        }) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "scaler state column {} has invalid bounds [{}, {}]",
                col, params.data_min[col], params.data_max[col]
            )));
        }

        // Zero-range columns are derived from the bounds, never trusted as stored.
        let degenerate_columns = (0..params.n_features)
            .filter(|&col| params.data_min[col] == params.data_max[col])
            .collect();
        Ok(ScalerState {
            degenerate_columns,
            ..params
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data() -> Array2<f64> {
        array![[0.0, 1.0], [0.0, 1.0], [1.0, 3.0]]
    }

    #[test]
    fn test_range_scaler_fit() {
        let state = RangeScaler::new().fit(&create_test_data()).unwrap();
        assert_eq!(state.data_min(), &[0.0, 1.0]);
        assert_eq!(state.data_max(), &[1.0, 3.0]);
        assert_eq!(state.data_range(), vec![1.0, 2.0]);
        assert!(state.degenerate_columns().is_empty());
        assert_eq!(state.n_features_in(), 2);
    }

    #[test]
    fn test_range_scaler_transform() {
        let data = create_test_data();
        let state = RangeScaler::new().fit(&data).unwrap();
        let scaled = state.transform(&data).unwrap();
        assert_eq!(scaled, array![[0.0, 0.0], [0.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_range_scaler_exact_endpoints_on_large_values() {
        let data = array![[583_960.123, 4_512_345.678], [586_421.5, 4_504_900.25], [585_000.0, 4_508_000.0]];
        let scaled = RangeScaler::new().fit_transform(&data).unwrap().0;
        assert_eq!(scaled[[0, 0]], 0.0);
        assert_eq!(scaled[[1, 0]], 1.0);
        assert_eq!(scaled[[0, 1]], 1.0);
        assert_eq!(scaled[[1, 1]], 0.0);
        assert!(scaled.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_range_scaler_custom_range() {
        let data = create_test_data();
        let state = RangeScaler::new().with_range(-1.0, 1.0).fit(&data).unwrap();
        let scaled = state.transform(&data).unwrap();
        assert_eq!(scaled, array![[-1.0, -1.0], [-1.0, -1.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_range_scaler_inverse_transform() {
        let data = create_test_data();
        let state = RangeScaler::new().fit(&data).unwrap();
        let recovered = state
            .inverse_transform(&state.transform(&data).unwrap())
            .unwrap();
        for (o, r) in data.iter().zip(recovered.iter()) {
            assert!((o - r).abs() < 1e-12, "Expected {}, got {}", o, r);
        }
    }

    #[test]
    fn test_range_scaler_degenerate_zero() {
        let data = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let state = RangeScaler::new().fit(&data).unwrap();
        assert_eq!(state.degenerate_columns(), &[0]);

        let scaled = state.transform(&data).unwrap();
        assert!(scaled.column(0).iter().all(|&v| v == 0.0));
        assert_eq!(scaled[[2, 1]], 1.0);
    }

    #[test]
    fn test_range_scaler_degenerate_reject() {
        let data = array![[5.0, 1.0], [5.0, 2.0]];
        let result = RangeScaler::new()
            .with_degenerate_policy(DegeneratePolicy::Reject)
            .fit(&data);
        assert!(matches!(
            result,
            Err(PreprocessingError::DegenerateScale { column: 0, value }) if value == 5.0
        ));
    }

    #[test]
    fn test_range_scaler_single_row_is_degenerate() {
        let data = array![[3.0, 4.0]];
        let state = RangeScaler::new().fit(&data).unwrap();
        assert_eq!(state.degenerate_columns(), &[0, 1]);
        assert_eq!(state.transform(&data).unwrap(), array![[0.0, 0.0]]);
    }

    #[test]
    fn test_range_scaler_reuses_state_on_new_batch() {
        let state = RangeScaler::new().fit(&array![[0.0], [10.0]]).unwrap();
        let scaled = state.transform(&array![[5.0], [20.0]]).unwrap();
        assert_eq!(scaled, array![[0.5], [2.0]]);
    }

    #[test]
    fn test_range_scaler_feature_mismatch() {
        let state = RangeScaler::new().fit(&create_test_data()).unwrap();
        let result = state.transform(&array![[1.0, 2.0, 3.0]]);
        assert!(matches!(
            result,
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
        assert!(state.inverse_transform(&array![[1.0]]).is_err());
    }

    #[test]
    fn test_range_scaler_empty_data() {
        let result = RangeScaler::new().fit(&Array2::zeros((0, 2)));
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_range_scaler_rejects_nan() {
        let result = RangeScaler::new().fit(&array![[1.0], [f64::NAN]]);
        assert!(matches!(result, Err(PreprocessingError::MissingValues(_))));
    }

    #[test]
    fn test_range_scaler_from_config_invalid() {
        let config = RangeScalerConfig {
            min: 1.0,
            max: 1.0,
            ..Default::default()
        };
        assert!(RangeScaler::from_config(config).is_err());
    }

    #[test]
    #[should_panic(expected = "max must be greater than min")]
    fn test_range_scaler_with_range_panics() {
        let _ = RangeScaler::new().with_range(1.0, 0.0);
    }

    #[test]
    fn test_scaler_state_params_round_trip() {
        let data = create_test_data();
        let state = RangeScaler::new().fit(&data).unwrap();
        let restored = ScalerState::from_params(state.extract_params()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_scaler_state_from_params_inconsistent() {
        let mut state = RangeScaler::new().fit(&create_test_data()).unwrap();
        state.data_max.pop();
        assert!(ScalerState::from_params(state).is_err());
    }

    #[test]
    fn test_scaler_state_from_params_rebuilds_degenerate_columns() {
        let mut state = RangeScaler::new().fit(&create_test_data()).unwrap();
        state.degenerate_columns = vec![7];
        state.data_max[0] = state.data_min[0];

        let restored = ScalerState::from_params(state).unwrap();
        assert_eq!(restored.degenerate_columns(), &[0]);
        let scaled = restored.transform(&array![[0.0, 2.0], [4.0, 3.0]]).unwrap();
        assert!(scaled.iter().all(|v| v.is_finite()));
        assert_eq!(scaled.column(0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(scaled[[0, 1]], 0.5);
    }

    #[test]
    fn test_scaler_state_from_params_invalid_bounds() {
        let mut state = RangeScaler::new().fit(&create_test_data()).unwrap();
        state.data_min[1] = 10.0;
        assert!(matches!(
            ScalerState::from_params(state.clone()),
            Err(PreprocessingError::InvalidParameter(_))
        ));

        state.data_min[1] = f64::NAN;
        assert!(ScalerState::from_params(state).is_err());
    }

    #[test]
    fn test_scaler_state_save_load_file() {
        let data = create_test_data();
        let state = RangeScaler::new().fit(&data).unwrap();

        let temp_file = std::env::temp_dir().join("geofeatures_test_scaler_state.bin");
        state.save_to_file(&temp_file).unwrap();
        let loaded = ScalerState::load_from_file(&temp_file).unwrap();
        std::fs::remove_file(&temp_file).ok();

        assert_eq!(loaded, state);
        assert_eq!(
            loaded.transform(&data).unwrap(),
            state.transform(&data).unwrap()
        );
    }
}
