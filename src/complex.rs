//! Scale-safe complex primitives used by every kernel.
//!
//! Magnitudes, quotients and reciprocals factor out the larger component
//! before squaring so that operands near the overflow threshold stay finite.

use num_complex::Complex;

use crate::machine::BesselFloat;

/// `s * a + b` with fused real parts.
#[inline]
pub(crate) fn mul_add<T: BesselFloat>(s: Complex<T>, a: Complex<T>, b: Complex<T>) -> Complex<T> {
    Complex::new(
        s.re.fma(a.re, b.re) - s.im * a.im,
        s.re.fma(a.im, s.im.fma(a.re, b.im)),
    )
}

/// `s * a + b` for a real multiplier.
#[inline]
pub(crate) fn mul_add_scalar<T: BesselFloat>(s: Complex<T>, a: T, b: Complex<T>) -> Complex<T> {
    Complex::new(s.re.fma(a, b.re), s.im.fma(a, b.im))
}

/// `i * c`
#[inline]
pub(crate) fn mul_i<T: BesselFloat>(c: Complex<T>) -> Complex<T> {
    Complex::new(-c.im, c.re)
}

/// `-i * c`
#[inline]
pub(crate) fn mul_neg_i<T: BesselFloat>(c: Complex<T>) -> Complex<T> {
    Complex::new(c.im, -c.re)
}

/// `|z|` without forming `re² + im²`.
#[inline]
pub(crate) fn zabs<T: BesselFloat>(z: Complex<T>) -> T {
    let u = z.re.abs();
    let v = z.im.abs();
    let (big, small) = if u > v { (u, v) } else { (v, u) };
    if big == T::zero() {
        return T::zero();
    }
    let q = small / big;
    big * (T::one() + q * q).sqrt()
}

/// `max(|re|, |im|)`, the cheap magnitude used by scale tests.
#[inline]
pub(crate) fn max_abs<T: BesselFloat>(z: Complex<T>) -> T {
    z.re.abs().max(z.im.abs())
}

/// `a / b` normalised by `1/|b|` first.
///
/// Callers reject `z = 0` before dividing by anything derived from it.
#[inline]
pub(crate) fn zdiv<T: BesselFloat>(a: Complex<T>, b: Complex<T>) -> Complex<T> {
    let bm = T::one() / zabs(b);
    let cc = b.re * bm;
    let cd = b.im * bm;
    Complex::new((a.re * cc + a.im * cd) * bm, (a.im * cc - a.re * cd) * bm)
}

/// `2 / z`, the factor of the three-term recurrence in order.
#[inline]
pub(crate) fn two_over<T: BesselFloat>(z: Complex<T>) -> Complex<T> {
    let raz = T::one() / zabs(z);
    let sr = z.re * raz;
    let si = -z.im * raz;
    Complex::new((sr + sr) * raz, (si + si) * raz)
}

/// Principal square root, `+i sqrt(|x|)` on the whole negative real axis.
pub(crate) fn zsqrt<T: BesselFloat>(a: Complex<T>) -> Complex<T> {
    let zero = T::zero();
    let zm = zabs(a).sqrt();
    if a.im == zero {
        return if a.re > zero {
            Complex::new(a.re.sqrt(), zero)
        } else {
            Complex::new(zero, a.re.abs().sqrt())
        };
    }
    if a.re == zero {
        let h = zm * T::from_f64(core::f64::consts::FRAC_1_SQRT_2);
        return if a.im > zero {
            Complex::new(h, h)
        } else {
            Complex::new(h, -h)
        };
    }
    let theta = a.im.atan2(a.re) * T::from_f64(0.5);
    Complex::new(zm * theta.cos(), zm * theta.sin())
}

/// `exp(a)` as `e^re (cos im, sin im)`.
#[inline]
pub(crate) fn zexp<T: BesselFloat>(a: Complex<T>) -> Complex<T> {
    let m = a.re.exp();
    Complex::new(m * a.im.cos(), m * a.im.sin())
}

/// `(sinh z, cosh z)`.
#[inline]
pub(crate) fn sinh_cosh<T: BesselFloat>(z: Complex<T>) -> (Complex<T>, Complex<T>) {
    let sh = z.re.sinh();
    let ch = z.re.cosh();
    let (sn, cn) = z.im.sin_cos();
    (Complex::new(sh * cn, ch * sn), Complex::new(ch * cn, sh * sn))
}

/// `sin(πx)`, exact at integers and half-integers.
pub(crate) fn sinpi<T: BesselFloat>(x: T) -> T {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let half = T::from_f64(0.5);
    let pi = T::from_f64(core::f64::consts::PI);

    let (ax, sign) = if x < zero { (-x, -one) } else { (x, one) };
    // r in [0, 2)
    let r = ax % two;
    if r == zero || r == one {
        return zero;
    }
    // fold onto [0, 1/2] by sin(π - t) = sin t and sin(π + t) = -sin t
    let (t, s) = if r < one { (r, sign) } else { (r - one, -sign) };
    let t = if t > half { one - t } else { t };
    if t == half {
        return s;
    }
    s * (t * pi).sin()
}

/// `cos(πx)`, exact at integers and half-integers.
pub(crate) fn cospi<T: BesselFloat>(x: T) -> T {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let half = T::from_f64(0.5);
    let pi = T::from_f64(core::f64::consts::PI);

    let r = x.abs() % two;
    // cos(π + t) = -cos t, then cos(π - t) = -cos t
    let (t, s) = if r < one { (r, one) } else { (r - one, -one) };
    let (t, s) = if t > half { (one - t, -s) } else { (t, s) };
    if t == half {
        return zero;
    }
    if t == zero {
        return s;
    }
    s * (t * pi).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::{Complex32, Complex64};

    #[test]
    fn zabs_handles_extremes() {
        assert_eq!(zabs(Complex64::new(0.0, 0.0)), 0.0);
        assert_relative_eq!(zabs(Complex64::new(3.0, -4.0)), 5.0);
        let big = 1.0e300;
        assert_relative_eq!(zabs(Complex64::new(big, big)), big * 2f64.sqrt(), max_relative = 1e-15);
        let tiny = 1.0e-310;
        assert!(zabs(Complex64::new(tiny, tiny)) > 0.0);
        assert_relative_eq!(zabs(Complex32::new(3.0, 4.0)), 5.0f32);
    }

    #[test]
    fn zdiv_matches_naive_quotient() {
        let a = Complex64::new(3.0, 4.0);
        let b = Complex64::new(1.0, 2.0);
        let c = zdiv(a, b);
        assert_relative_eq!(c.re, 2.2, epsilon = 1e-14);
        assert_relative_eq!(c.im, -0.4, epsilon = 1e-14);
    }

    #[test]
    fn zdiv_survives_huge_divisor() {
        let c = zdiv(Complex64::new(1.0, 1.0), Complex64::new(1.0e200, 1.0e200));
        assert_relative_eq!(c.re, 1.0e-200, max_relative = 1e-14);
        assert!(c.im.abs() < 1e-214);
    }

    #[test]
    fn two_over_is_twice_the_reciprocal() {
        let z = Complex64::new(0.3, -1.7);
        let r = two_over(z);
        let expected = Complex64::new(2.0, 0.0) / z;
        assert_relative_eq!(r.re, expected.re, max_relative = 1e-15);
        assert_relative_eq!(r.im, expected.im, max_relative = 1e-15);
    }

    #[test]
    fn zsqrt_branch_cut_takes_upper_side() {
        let r = zsqrt(Complex64::new(-4.0, 0.0));
        assert_eq!(r, Complex64::new(0.0, 2.0));
        let r = zsqrt(Complex64::new(0.0, -2.0));
        assert_relative_eq!(r.re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(r.im, -1.0, epsilon = 1e-15);
        let z = Complex64::new(-1.0, 1e-300);
        assert!(zsqrt(z).im > 0.99);
    }

    #[test]
    fn sinh_cosh_identity() {
        let z = Complex64::new(0.7, -2.3);
        let (s, c) = sinh_cosh(z);
        let one = c * c - s * s;
        assert_relative_eq!(one.re, 1.0, epsilon = 1e-14);
        assert!(one.im.abs() < 1e-14);
        let e = zexp(z);
        assert_relative_eq!((s + c).re, e.re, epsilon = 1e-14);
        assert_relative_eq!((s + c).im, e.im, epsilon = 1e-14);
    }

    #[test]
    fn sinpi_exact_points() {
        for n in -5..=5 {
            assert_eq!(sinpi(n as f64), 0.0);
        }
        assert_eq!(sinpi(0.5_f64), 1.0);
        assert_eq!(sinpi(1.5_f64), -1.0);
        assert_eq!(sinpi(-0.5_f64), -1.0);
        assert_eq!(sinpi(-1.5_f64), 1.0);
        assert_eq!(sinpi(1.5_f32), -1.0);
        assert_relative_eq!(sinpi(1.0_f64 / 6.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(sinpi(0.75_f64), core::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_relative_eq!(sinpi(1.25_f64), -core::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
    }

    #[test]
    fn cospi_exact_points() {
        assert_eq!(cospi(0.0_f64), 1.0);
        assert_eq!(cospi(1.0_f64), -1.0);
        assert_eq!(cospi(-2.0_f64), 1.0);
        for n in -5..=5 {
            assert_eq!(cospi(n as f64 + 0.5), 0.0);
        }
        assert_relative_eq!(cospi(1.0_f64 / 3.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(cospi(0.75_f64), -core::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_relative_eq!(cospi(1.75_f64), core::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_eq!(cospi(1e15_f64 + 0.5), 0.0);
    }
}
