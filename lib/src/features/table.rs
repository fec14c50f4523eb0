//! Finalized output of a pipeline run.

use super::columns::FeatureSchema;
use super::record::FeatureRecord;
use crate::dataset::TripId;
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use ndarray::Array2;
use std::collections::HashMap;
use std::io::Write;

/// One finalized [`FeatureRecord`] per surviving trip, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    schema: FeatureSchema,
    records: Vec<FeatureRecord>,
    index: HashMap<TripId, usize>,
}

impl FeatureTable {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a record.
    ///
    /// # Errors
    /// - [`PreprocessingError::DuplicateTripId`] if the trip is already present.
    /// - [`PreprocessingError::FeatureMismatch`] if the record width differs
    ///   from the schema.
    pub fn push(&mut self, record: FeatureRecord) -> PreprocessingResult<()> {
        if record.len() != self.schema.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.schema.len(),
                got_features: record.len(),
            });
        }
        if self.index.contains_key(&record.trip_id()) {
            return Err(PreprocessingError::DuplicateTripId(record.trip_id()));
        }
        self.index.insert(record.trip_id(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// `trip_id` followed by the feature columns.
    pub fn header(&self) -> Vec<&'static str> {
        self.schema.header()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureRecord> {
        self.records.iter()
    }

    pub fn trip_ids(&self) -> Vec<TripId> {
        self.records.iter().map(|r| r.trip_id()).collect()
    }

    /// Record for a trip.
    pub fn get(&self, trip_id: TripId) -> Option<&FeatureRecord> {
        self.index.get(&trip_id).map(|&i| &self.records[i])
    }

    /// All values of one feature column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let position = self.schema.position(name)?;
        Some(self.records.iter().map(|r| r.values()[position]).collect())
    }

    /// Feature matrix: one row per record, one column per schema feature.
    ///
    /// The trip id is not included; see [`FeatureTable::trip_ids`].
    pub fn to_array(&self) -> Array2<f64> {
        let cols = self.schema.len();
        let mut out = Array2::zeros((self.records.len(), cols));
        for (mut row, record) in out.rows_mut().into_iter().zip(&self.records) {
            for (cell, (_, value)) in row.iter_mut().zip(record.iter()) {
                *cell = value;
            }
        }
        out
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> PreprocessingResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.header())?;
        for record in &self.records {
            let mut row = Vec::with_capacity(record.len() + 1);
            row.push(record.trip_id().to_string());
            row.extend(record.iter().map(|(_, value)| value.to_string()));
            csv_writer.write_record(&row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> PreprocessingResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| PreprocessingError::CsvError(e.to_string()))
    }

    /// Records as a JSON array of objects with `trip_id` first.
    pub fn to_json_string(&self) -> PreprocessingResult<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> PreprocessingResult<()> {
        serde_json::to_writer_pretty(writer, &self.records)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a FeatureRecord;
    type IntoIter = std::slice::Iter<'a, FeatureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
