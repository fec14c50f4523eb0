//! Reference ellipsoid parameters.

use serde::{Deserialize, Serialize};

/// An oblate ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis in metres.
    pub a: f64,
    /// Flattening.
    pub f: f64,
}

impl Ellipsoid {
    /// WGS84 (EPSG:7030).
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// First eccentricity squared, `f(2 - f)`.
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// Signed first eccentricity.
    pub fn es(&self) -> f64 {
        self.f.signum() * self.e2().abs().sqrt()
    }

    /// Third flattening, `f / (2 - f)`.
    pub fn n(&self) -> f64 {
        self.f / (2.0 - self.f)
    }

    /// Semi-minor axis in metres.
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_derived() {
        let e = Ellipsoid::WGS84;
        assert!((e.b() - 6_356_752.314_245).abs() < 1e-3);
        assert!((e.e2() - 0.006_694_379_990_14).abs() < 1e-12);
        assert!((e.es() - 0.081_819_190_842_6).abs() < 1e-12);
    }
}
