//! Per-trip feature record.

use super::columns::{FeatureSchema, TRIP_ID};
use super::state::{Finalized, Open, RecordState};
use crate::dataset::TripId;
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::marker::PhantomData;

/// Trip id plus an ordered mapping from feature name to value.
///
/// While `Open`, stages may add features but never replace one. After
/// [`finalize`](FeatureRecord::finalize) the record is read-only and its
/// fields follow the schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord<S: RecordState = Finalized> {
    trip_id: TripId,
    fields: Vec<(&'static str, f64)>,
    _state: PhantomData<S>,
}

impl FeatureRecord<Open> {
    pub fn new(trip_id: TripId) -> Self {
        Self {
            trip_id,
            fields: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Add a feature.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::FeatureOverwrite`] if `name` is already set.
    pub fn insert(&mut self, name: &'static str, value: f64) -> PreprocessingResult<()> {
        if self.contains(name) {
            return Err(PreprocessingError::FeatureOverwrite {
                trip_id: self.trip_id,
                feature: name,
            });
        }
        self.fields.push((name, value));
        Ok(())
    }

    /// Order fields by `schema` and freeze the record.
    ///
    /// # Errors
    /// - [`PreprocessingError::MissingFeature`] if a schema column was never set.
    /// - [`PreprocessingError::FeatureMismatch`] if the record holds columns
    ///   the schema does not list.
    pub fn finalize(self, schema: &FeatureSchema) -> PreprocessingResult<FeatureRecord<Finalized>> {
        if self.fields.len() > schema.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: schema.len(),
                got_features: self.fields.len(),
            });
        }
        let fields = schema
            .columns()
            .iter()
            .map(|&name| {
                self.get(name)
                    .map(|value| (name, value))
                    .ok_or(PreprocessingError::MissingFeature {
                        trip_id: self.trip_id,
                        feature: name,
                    })
            })
            .collect::<PreprocessingResult<Vec<_>>>()?;

        Ok(FeatureRecord {
            trip_id: self.trip_id,
            fields,
            _state: PhantomData,
        })
    }
}

impl<S: RecordState> FeatureRecord<S> {
    pub fn trip_id(&self) -> TripId {
        self.trip_id
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|&(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| *field == name)
    }

    /// `(name, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.fields.iter().copied()
    }

    /// Number of features, excluding the trip id.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FeatureRecord<Finalized> {
    /// Feature values in schema order.
    pub fn values(&self) -> Vec<f64> {
        self.fields.iter().map(|&(_, value)| value).collect()
    }
}

impl<S: RecordState> Serialize for FeatureRecord<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(TRIP_ID, &self.trip_id)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
