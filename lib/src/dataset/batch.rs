//! Ordered, id-unique collection of trips.

use super::{Trip, TripId};
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use std::collections::HashSet;

/// Ordered sequence of [`Trip`]s.
///
/// Insertion order is preserved so that output rows line up with input rows.
/// Trip identifiers must be unique within a batch.
#[derive(Debug, Clone, Default)]
pub struct TripBatch {
    trips: Vec<Trip>,
    ids: HashSet<TripId>,
}

impl TripBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty batch with room for `capacity` trips.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            trips: Vec::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
        }
    }

    /// Build a batch from trips, keeping their order.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::DuplicateTripId`] on the first repeated id.
    pub fn from_trips<I>(trips: I) -> PreprocessingResult<Self>
    where
        I: IntoIterator<Item = Trip>,
    {
        let iter = trips.into_iter();
        let mut batch = Self::with_capacity(iter.size_hint().0);
        for trip in iter {
            batch.push(trip)?;
        }
        Ok(batch)
    }

    /// Append a trip.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::DuplicateTripId`] if the id is already present.
    pub fn push(&mut self, trip: Trip) -> PreprocessingResult<()> {
        if !self.ids.insert(trip.id()) {
            return Err(PreprocessingError::DuplicateTripId(trip.id()));
        }
        self.trips.push(trip);
        Ok(())
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the batch holds no trips.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Whether a trip with this id is present.
    pub fn contains(&self, id: TripId) -> bool {
        self.ids.contains(&id)
    }

    /// Trip at position `index`.
    pub fn get(&self, index: usize) -> Option<&Trip> {
        self.trips.get(index)
    }

    /// Trips in insertion order.
    pub fn as_slice(&self) -> &[Trip] {
        &self.trips
    }

    /// Iterate over trips in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }
}

impl<'a> IntoIterator for &'a TripBatch {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}
