//! Ellipsoidal transverse Mercator (Karney 2011, 6th-order Krüger series).
//!
//! Accurate to a few nanometres within a UTM zone and to well under a
//! millimetre several thousand kilometres from the central meridian.
//!
//! Karney, C. F. F. (2011). "Transverse Mercator with an accuracy of a few
//! nanometers". Journal of Geodesy, 85(8), 475-485.

use super::ellipsoid::Ellipsoid;
use super::math_utils::{ang_diff, ang_normalize, polyval, sincosd, tauf, taupf};
use crate::preprocessing::error::{PreprocessingError, PreprocessingResult};
use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_2, PI};

const ORDER: usize = 6;

// Numerators in descending powers of n, last entry is the denominator.
const ALPHA_COEFFS: [&[f64]; ORDER] = [
    &[31564.0, -66675.0, 34440.0, 47250.0, -100800.0, 75600.0, 151200.0],
    &[-1983433.0, 863232.0, 748608.0, -1161216.0, 524160.0, 1935360.0],
    &[670412.0, 406647.0, -533952.0, 184464.0, 725760.0],
    &[6601661.0, -7732800.0, 2230245.0, 7257600.0],
    &[-13675556.0, 3438171.0, 7983360.0],
    &[212378941.0, 319334400.0],
];

const BETA_COEFFS: [&[f64]; ORDER] = [
    &[384796.0, -382725.0, -6720.0, 932400.0, -1612800.0, 1209600.0, 2419200.0],
    &[-1118711.0, 1695744.0, -1174656.0, 258048.0, 80640.0, 3870720.0],
    &[22276.0, -16929.0, -15984.0, 12852.0, 362880.0],
    &[-830251.0, -158400.0, 197865.0, 7257600.0],
    &[-435388.0, 453717.0, 15966720.0],
    &[20648693.0, 638668800.0],
];

const B1_COEFFS: [f64; 5] = [1.0, 4.0, 64.0, 256.0, 256.0];

/// UTM scale factor on the central meridian.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
/// UTM false easting in metres.
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing in the southern hemisphere, in metres.
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Ellipsoid-dependent series coefficients, shared by every zone.
#[derive(Debug, Clone)]
pub struct KruegerSeries {
    es: f64,
    /// Rectifying radius `a·b1`.
    a1: f64,
    alp: [f64; ORDER],
    bet: [f64; ORDER],
}

impl KruegerSeries {
    pub fn new(ellipsoid: &Ellipsoid) -> Self {
        let n = ellipsoid.n();
        let b1 = polyval(&B1_COEFFS[..4], n * n) / (B1_COEFFS[4] * (1.0 + n));

        let mut alp = [0.0; ORDER];
        let mut bet = [0.0; ORDER];
        let mut d = n;
        for l in 0..ORDER {
            let m = ALPHA_COEFFS[l].len() - 1;
            alp[l] = d * polyval(&ALPHA_COEFFS[l][..m], n) / ALPHA_COEFFS[l][m];
            bet[l] = d * polyval(&BETA_COEFFS[l][..m], n) / BETA_COEFFS[l][m];
            d *= n;
        }

        Self {
            es: ellipsoid.es(),
            a1: ellipsoid.a * b1,
            alp,
            bet,
        }
    }
}

impl Default for KruegerSeries {
    fn default() -> Self {
        Self::new(&Ellipsoid::WGS84)
    }
}

/// One transverse Mercator projection: a series plus its zone constants.
#[derive(Debug, Clone)]
pub struct TransverseMercator<'a> {
    series: &'a KruegerSeries,
    central_meridian: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl<'a> TransverseMercator<'a> {
    /// UTM zone `zone` (1..=60) in the given hemisphere.
    pub fn utm(series: &'a KruegerSeries, zone: u8, north: bool) -> Self {
        Self {
            series,
            central_meridian: utm_central_meridian(zone),
            k0: UTM_SCALE_FACTOR,
            false_easting: UTM_FALSE_EASTING,
            false_northing: if north { 0.0 } else { UTM_FALSE_NORTHING_SOUTH },
        }
    }

    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    /// Geographic degrees to `(easting, northing)` in metres.
    pub fn forward(&self, lon: f64, lat: f64) -> PreprocessingResult<(f64, f64)> {
        let tm = self.series;
        let lon_diff = ang_diff(self.central_meridian, lon);

        let latsign = if lat.is_sign_negative() { -1.0 } else { 1.0 };
        let lonsign = if lon_diff.is_sign_negative() { -1.0 } else { 1.0 };
        let lat = lat.abs();
        let lon_diff = lon_diff.abs();

        // Points more than 90° away are mapped through the far side of the cylinder.
        let backside = lon_diff > 90.0;
        let lon_diff = if backside { 180.0 - lon_diff } else { lon_diff };

        let (sphi, cphi) = sincosd(lat);
        let (slam, clam) = sincosd(lon_diff);

        let (xip, etap) = if lat == 90.0 {
            (FRAC_PI_2, 0.0)
        } else {
            let taup = taupf(sphi / cphi, tm.es);
            (taup.atan2(clam), (slam / taup.hypot(clam)).asinh())
        };

        let (c0, s0) = ((2.0 * xip).cos(), (2.0 * xip).sin());
        let (ch0, sh0) = ((2.0 * etap).cosh(), (2.0 * etap).sinh());
        let a = Complex64::new(2.0 * c0 * ch0, -2.0 * s0 * sh0);

        // Clenshaw summation of the sin(2jζ') series.
        let mut y0 = Complex64::new(0.0, 0.0);
        let mut y1 = Complex64::new(0.0, 0.0);
        for j in (0..ORDER).rev() {
            let prev = y0;
            y0 = a * y0 - y1 + tm.alp[j];
            y1 = prev;
        }
        let zeta = Complex64::new(xip, etap) + Complex64::new(s0 * ch0, c0 * sh0) * y0;

        let xi = if backside { PI - zeta.re } else { zeta.re };
        let northing = tm.a1 * self.k0 * xi * latsign + self.false_northing;
        let easting = tm.a1 * self.k0 * zeta.im * lonsign + self.false_easting;

        if !(easting.is_finite() && northing.is_finite()) {
            return Err(PreprocessingError::ProjectionFailed {
                operation: "forward",
                message: format!(
                    "({}, {}) is singular for transverse Mercator centred on {}",
                    lon, latsign * lat, self.central_meridian
                ),
            });
        }
        Ok((easting, northing))
    }

    /// `(easting, northing)` in metres back to geographic `(lon, lat)` degrees.
    pub fn inverse(&self, x: f64, y: f64) -> PreprocessingResult<(f64, f64)> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(PreprocessingError::ProjectionFailed {
                operation: "inverse",
                message: format!("non-finite planar coordinate ({}, {})", x, y),
            });
        }
        let tm = self.series;
        let xi = (y - self.false_northing) / (tm.a1 * self.k0);
        let eta = (x - self.false_easting) / (tm.a1 * self.k0);

        let xisign = if xi.is_sign_negative() { -1.0 } else { 1.0 };
        let etasign = if eta.is_sign_negative() { -1.0 } else { 1.0 };
        let xi = xi.abs();
        let eta = eta.abs();

        let backside = xi > FRAC_PI_2;
        let xi = if backside { PI - xi } else { xi };

        let (c0, s0) = ((2.0 * xi).cos(), (2.0 * xi).sin());
        let (ch0, sh0) = ((2.0 * eta).cosh(), (2.0 * eta).sinh());
        let a = Complex64::new(2.0 * c0 * ch0, -2.0 * s0 * sh0);

        let mut y0 = Complex64::new(0.0, 0.0);
        let mut y1 = Complex64::new(0.0, 0.0);
        for j in (0..ORDER).rev() {
            let prev = y0;
            y0 = a * y0 - y1 - tm.bet[j];
            y1 = prev;
        }
        let zeta = Complex64::new(xi, eta) + Complex64::new(s0 * ch0, c0 * sh0) * y0;
        let (xip, etap) = (zeta.re, zeta.im);

        let s = etap.sinh();
        let c = xip.cos().max(0.0);
        let r = s.hypot(c);

        let (lon, lat) = if r == 0.0 {
            (0.0, 90.0)
        } else {
            let tau = tauf(xip.sin() / r, tm.es);
            (s.atan2(c).to_degrees(), tau.atan().to_degrees())
        };

        let lat = lat * xisign;
        let mut lon = lon * etasign;
        if backside {
            lon = 180.0 - lon;
        }
        Ok((ang_normalize(lon + self.central_meridian), lat))
    }
}

/// Central meridian of UTM zone `zone`, in degrees.
pub fn utm_central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}
