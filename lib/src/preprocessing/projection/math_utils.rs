//! Numerically careful helpers for geodesic series.

/// Error-free sum: returns `(s, t)` with `s = fl(u + v)` and `s + t == u + v` exactly.
#[inline]
pub fn sum_exact(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    let t = -((up - u) + (vpp - v));
    (s, t)
}

/// `e·atanh(e·x)`, continued for negative eccentricity.
#[inline]
pub fn eatanhe(x: f64, es: f64) -> f64 {
    if es > 0.0 {
        es * (es * x).atanh()
    } else if es < 0.0 {
        -es * (-es * x).atan()
    } else {
        0.0
    }
}

/// Tangent of the conformal latitude from the tangent of the geodetic latitude.
#[inline]
pub fn taupf(tau: f64, es: f64) -> f64 {
    let tau1 = tau.hypot(1.0);
    let sig = eatanhe(tau / tau1, es).sinh();
    sig.hypot(1.0) * tau - sig * tau1
}

/// Inverse of [`taupf`] by Newton iteration.
pub fn tauf(taup: f64, es: f64) -> f64 {
    const MAX_ITER: usize = 8;
    let tol = f64::EPSILON.sqrt();

    let e2m = 1.0 - es * es;
    let mut tau = taup / e2m.sqrt();
    let stol = tol * taup.abs().max(1.0);

    for _ in 0..MAX_ITER {
        let taupa = taupf(tau, es);
        let dtau = (taup - taupa) * (1.0 + e2m * tau * tau)
            / (e2m * tau.hypot(1.0) * taupa.hypot(1.0));
        tau += dtau;
        if dtau.abs() < stol {
            break;
        }
    }
    tau
}

/// Reduce an angle in degrees to `[-180, 180)`.
#[inline]
pub fn ang_normalize(x: f64) -> f64 {
    let mut x = x % 360.0;
    if x < -180.0 {
        x += 360.0;
    }
    if x >= 180.0 {
        x -= 360.0;
    }
    x
}

/// `y - x` in degrees, reduced to `[-180, 180)`, without losing precision.
pub fn ang_diff(x: f64, y: f64) -> f64 {
    let (d, t) = sum_exact(ang_normalize(-x), ang_normalize(y));
    ang_normalize(d) + t
}

/// `(sin, cos)` of an angle in degrees, exact at multiples of 90°.
pub fn sincosd(x: f64) -> (f64, f64) {
    let mut r = x % 360.0;
    if r < 0.0 {
        r += 360.0;
    }
    let q = (r / 90.0 + 0.5).floor() as i32;
    r -= 90.0 * f64::from(q);
    let (s, c) = r.to_radians().sin_cos();

    match q & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    }
}

/// Horner evaluation, highest degree coefficient first.
#[inline]
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::projection::ellipsoid::Ellipsoid;

    #[test]
    fn test_taupf_tauf_inverse() {
        let es = Ellipsoid::WGS84.es();
        for lat in [-85.0_f64, -45.0, 0.0, 12.5, 45.0, 85.0] {
            let tau = lat.to_radians().tan();
            let back = tauf(taupf(tau, es), es);
            assert!(
                (tau - back).abs() < 1e-12 * tau.abs().max(1.0),
                "lat={}: {} vs {}",
                lat,
                tau,
                back
            );
        }
    }

    #[test]
    fn test_sincosd_quadrants() {
        assert_eq!(sincosd(90.0), (1.0, 0.0));
        assert_eq!(sincosd(-90.0), (-1.0, 0.0));
        let (s, c) = sincosd(180.0);
        assert_eq!(s.abs(), 0.0);
        assert_eq!(c, -1.0);
    }

    #[test]
    fn test_ang_normalize() {
        assert_eq!(ang_normalize(190.0), -170.0);
        assert_eq!(ang_normalize(-190.0), 170.0);
        assert_eq!(ang_normalize(180.0), -180.0);
        assert_eq!(ang_normalize(45.0), 45.0);
    }

    #[test]
    fn test_ang_diff_across_antimeridian() {
        assert!((ang_diff(179.0, -179.0) - 2.0).abs() < 1e-12);
        assert!((ang_diff(-75.0, -73.9855) - 1.0145).abs() < 1e-12);
    }

    #[test]
    fn test_polyval() {
        // 2x^2 + 3x + 4 at x = 2
        assert_eq!(polyval(&[2.0, 3.0, 4.0], 2.0), 18.0);
        assert_eq!(polyval(&[], 2.0), 0.0);
    }

    #[test]
    fn test_sum_exact() {
        let (s, t) = sum_exact(1.0, 1e-20);
        assert_eq!(s, 1.0);
        assert_eq!(t, 1e-20);
    }
}
