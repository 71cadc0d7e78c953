//! Large-argument expansion of `I_{fnu+k}(z)` for `Re z >= 0`.
//!
//! Used when `|z| > rl` and `|z|` dominates the order (`|z| > fnu²/2`).
//! The expansion in `1/(8z)` is summed for the two highest orders and the
//! run is completed by backward recurrence.

#![allow(clippy::excessive_precision)]

use num_complex::Complex;

use crate::algo::constants::PI;
use crate::complex::{mul_add_scalar, two_over, zabs, zdiv, zexp, zsqrt};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::Scaling;

/// 1/(2π)
const RTPI: f64 = 0.159154943091895336;

pub(crate) fn large_argument<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<(), Error> {
    let zero = T::zero();
    let one = T::one();
    let eight = T::from_f64(8.0);
    let cone = Complex::new(one, zero);
    let n = y.len();

    let az = zabs(z);
    let arm = T::from_f64(1.0e3) * T::MACH_TINY;
    let il = n.min(2);
    let dfnu = fnu + T::from_f64((n - il) as f64);

    // sqrt(1 / (2πz))
    let raz = one / az;
    let mut prefactor = zsqrt(z.conj() * (T::from_f64(RTPI) * raz * raz));
    let growth = if scaling.is_scaled() { Complex::new(zero, z.im) } else { z };
    if growth.re.abs() > lim.elim {
        return Err(Error::Overflow);
    }
    // for long runs exp(z) is applied after the recurrence
    let deferred = growth.re.abs() > lim.alim && n > 2;
    if !deferred {
        prefactor = prefactor * zexp(growth);
    }

    let dnu2 = dfnu + dfnu;
    let mut fdn = if dnu2 > arm.sqrt() { dnu2 * dnu2 } else { zero };
    let ez = z * eight;
    let aez = eight * az;
    let s = lim.tol / aez;
    let jl = order_int(lim.rl + lim.rl)? + 2;

    // exp(iπ(0.5 + fnu + n - il)), reduced to keep the phase exact
    let mut p1 = Complex::new(zero, zero);
    if z.im != zero {
        let inu = order_int(fnu)?;
        let arg = (fnu - T::from_f64(inu as f64)) * T::from_f64(PI);
        let bk = if z.im < zero { -arg.cos() } else { arg.cos() };
        p1 = Complex::new(-arg.sin(), bk);
        if (inu as i64 + (n - il) as i64) % 2 != 0 {
            p1 = -p1;
        }
    }

    for k in 0..il {
        let mut sqk = fdn - one;
        let atol = s * sqk.abs();
        let mut sgn = one;
        let mut alt = cone;
        let mut plain = cone;
        let mut term = cone;
        let mut ak = zero;
        let mut aa = one;
        let mut bb = aez;
        let mut dk = ez;
        let mut converged = false;
        for _ in 0..jl {
            term = zdiv(term, dk) * sqk;
            plain = plain + term;
            sgn = -sgn;
            alt = alt + term * sgn;
            dk = dk + ez;
            aa = aa * sqk.abs() / bb;
            bb = bb + aez;
            ak = ak + eight;
            sqk = sqk - ak;
            if aa <= atol {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(Error::ConvergenceFailure);
        }

        let mut sum = alt;
        if z.re + z.re < lim.elim {
            sum = sum + zexp(-(z + z)) * p1 * plain;
        }
        fdn = fdn + eight * dfnu + T::from_f64(4.0);
        p1 = -p1;
        y[n - il + k] = sum * prefactor;
    }

    if n <= 2 {
        return Ok(());
    }
    let rz = two_over(z);
    let mut ak = T::from_f64((n - 2) as f64);
    for k in (0..n - 2).rev() {
        y[k] = mul_add_scalar(rz * y[k + 1], ak + fnu, y[k + 2]);
        ak = ak - one;
    }
    if deferred {
        let e = zexp(growth);
        for v in y.iter_mut() {
            *v = *v * e;
        }
    }
    Ok(())
}
