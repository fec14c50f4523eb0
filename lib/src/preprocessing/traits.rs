//! Core traits for learned transforms.
//!
//! - [`Transformer`]: the unfitted, configurable side. Learns from a batch.
//! - [`FittedTransformer`]: the learned state, ready to apply to any batch and
//!   to be persisted explicitly.
//!
//! Fitting never mutates the transformer: `fit` returns a new fitted value, so
//! learned state is always an owned value the caller passes along.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Example
/// ```rust
/// use geofeatures::preprocessing::{RangeScaler, Transformer, FittedTransformer};
/// use ndarray::array;
///
/// let data = array![[0.0, 10.0], [5.0, 20.0]];
/// let state = RangeScaler::new().fit(&data).unwrap();
/// let scaled = state.transform(&data).unwrap();
/// assert_eq!(scaled[[1, 1]], 1.0);
/// ```
pub trait Transformer: Clone {
    /// Input data type for fitting and transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type.
    type Fitted: FittedTransformer<Params = Self::Params, Input = Self::Input, Output = Self::Output>;

    /// Learn parameters from `data`. Only the presented batch is seen.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if data is empty, contains non-finite
    /// values, or violates a configured policy.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit on `data` and transform it, returning both the output and the state.
    fn fit_transform(
        &self,
        data: &Self::Input,
    ) -> Result<(Self::Output, Self::Fitted), PreprocessingError> {
        let fitted = self.fit(data)?;
        let output = fitted.transform(data)?;
        Ok((output, fitted))
    }
}

/// Trait for fitted transformers.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` use the same encoding as `to_bytes`.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the input shape doesn't match the
    /// fitted feature count or the input contains invalid values.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Reverse the transformation.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Save the fitted state to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted state from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
