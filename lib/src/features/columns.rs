//! Output column names and their fixed order.

use crate::dataset::TripEndpoint;
use serde::Serialize;

/// Identifier column, always first.
pub const TRIP_ID: &str = "trip_id";
/// Great-circle distance between pickup and dropoff.
pub const DISTANCE_KM: &str = "distance_km";

/// Column names produced for one trip endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointColumns {
    pub x_meters: &'static str,
    pub y_meters: &'static str,
    pub lon_sin: &'static str,
    pub lon_cos: &'static str,
    pub lat_sin: &'static str,
    pub lat_cos: &'static str,
    pub x_scaled: &'static str,
    pub y_scaled: &'static str,
}

pub const PICKUP: EndpointColumns = EndpointColumns {
    x_meters: "pickup_x_meters",
    y_meters: "pickup_y_meters",
    lon_sin: "pickup_lon_sin",
    lon_cos: "pickup_lon_cos",
    lat_sin: "pickup_lat_sin",
    lat_cos: "pickup_lat_cos",
    x_scaled: "pickup_x_scaled",
    y_scaled: "pickup_y_scaled",
};

pub const DROPOFF: EndpointColumns = EndpointColumns {
    x_meters: "dropoff_x_meters",
    y_meters: "dropoff_y_meters",
    lon_sin: "dropoff_lon_sin",
    lon_cos: "dropoff_lon_cos",
    lat_sin: "dropoff_lat_sin",
    lat_cos: "dropoff_lat_cos",
    x_scaled: "dropoff_x_scaled",
    y_scaled: "dropoff_y_scaled",
};

impl EndpointColumns {
    pub fn of(endpoint: TripEndpoint) -> &'static EndpointColumns {
        match endpoint {
            TripEndpoint::Pickup => &PICKUP,
            TripEndpoint::Dropoff => &DROPOFF,
        }
    }

    fn in_order(&self) -> [&'static str; 8] {
        [
            self.x_meters,
            self.y_meters,
            self.lon_sin,
            self.lon_cos,
            self.lat_sin,
            self.lat_cos,
            self.x_scaled,
            self.y_scaled,
        ]
    }
}

/// Ordered feature columns of a run, excluding [`TRIP_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    columns: Vec<&'static str>,
    include_dropoff: bool,
}

impl FeatureSchema {
    /// `distance_km`, the pickup columns, then the dropoff columns if requested.
    pub fn new(include_dropoff: bool) -> Self {
        let mut columns = vec![DISTANCE_KM];
        columns.extend(PICKUP.in_order());
        if include_dropoff {
            columns.extend(DROPOFF.in_order());
        }
        Self {
            columns,
            include_dropoff,
        }
    }

    /// Endpoints whose coordinates become features.
    pub fn endpoints(&self) -> &'static [TripEndpoint] {
        if self.include_dropoff {
            &[TripEndpoint::Pickup, TripEndpoint::Dropoff]
        } else {
            &[TripEndpoint::Pickup]
        }
    }

    pub fn includes_dropoff(&self) -> bool {
        self.include_dropoff
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Full header: [`TRIP_ID`] followed by the feature columns.
    pub fn header(&self) -> Vec<&'static str> {
        std::iter::once(TRIP_ID)
            .chain(self.columns.iter().copied())
            .collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
