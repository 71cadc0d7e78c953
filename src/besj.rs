//! J Bessel function driver.
//!
//! `J_v(z) = exp(iπv/2) I_v(-iz)` for `Im z >= 0` and the conjugate
//! rotation `exp(-iπv/2) I_v(iz)` below the real axis.

use num_complex::Complex;
use tracing::{debug, warn};

use crate::algo::constants::HPI;
use crate::algo::region::binu;
use crate::algo::scaling::rotate_run;
use crate::complex::{mul_i, mul_neg_i, zabs};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::{Accuracy, Scaling};

/// Compute `J_{fnu+j}(z)` for `j = 0, 1, ..., n-1` into `y`.
///
/// # Parameters
/// - `z`: complex argument
/// - `fnu`: starting order, `fnu >= 0`
/// - `scaling`: `Exponential` returns `exp(-|Im z|) J(z)`
/// - `y`: output slice of length `n >= 1`
///
/// # Returns
/// `(nz, status)`: the last `nz` members underflowed to zero.
///
/// # Errors
/// - `InvalidInput`: `fnu < 0` or `n = 0`
/// - `Overflow`: the values overflow
/// - `TotalPrecisionLoss`: `|z|` or the top order beyond the range bound
/// - `ConvergenceFailure`: a kernel failed to converge
pub(crate) fn zbesj<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    let zero = T::zero();
    let n = y.len();
    if n == 0 || !(fnu >= zero) {
        return Err(Error::InvalidInput);
    }
    let lim = Limits::new();
    let az = zabs(z);
    let status = lim.check_range(az, fnu + T::from_f64((n - 1) as f64))?;
    if status == Accuracy::Reduced {
        warn!(fnu = ?fnu, az = ?az, "J: reduced accuracy");
    }

    // exp(iπ fnu/2) from the order's residue mod 4 and its fractional part
    let inu = order_int(fnu)?;
    let inuh = inu / 2;
    let ir = inu - 2 * inuh;
    let arg = (fnu - T::from_f64((inu - ir) as f64)) * T::from_f64(HPI);
    let mut csgn = Complex::new(arg.cos(), arg.sin());
    if inuh % 2 == 1 {
        csgn = -csgn;
    }

    let upper = z.im >= zero;
    let zn = if upper { mul_neg_i(z) } else { mul_i(z) };
    if !upper {
        csgn = csgn.conj();
    }

    let nz = binu(zn, fnu, scaling, y, &lim).inspect_err(|e| {
        warn!(fnu = ?fnu, az = ?az, n, error = %e, "J evaluation failed");
    })?;
    if nz > 0 {
        debug!(nz, "J: trailing members underflow");
    }
    let step: fn(Complex<T>) -> Complex<T> = if upper { mul_i } else { mul_neg_i };
    rotate_run(&mut y[..n - nz], csgn, step, &lim);
    Ok((nz, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn close(a: Complex64, b: Complex64, rel: f64) {
        assert!((a - b).norm() <= rel * b.norm(), "{a} vs {b}");
    }

    #[test]
    fn rejects_bad_input() {
        let z = c(1.0, 0.0);
        assert!(zbesj(z, -1.0, Scaling::Unscaled, &mut [c(0.0, 0.0)]).is_err());
        assert!(zbesj(z, 0.0, Scaling::Unscaled, &mut []).is_err());
    }

    #[test]
    fn real_axis_values() {
        let mut y = [c(0.0, 0.0); 2];
        zbesj(c(1.0, 0.0), 0.0, Scaling::Unscaled, &mut y).unwrap();
        assert_relative_eq!(y[0].re, 0.7651976865579666, max_relative = 1e-14);
        assert_relative_eq!(y[1].re, 0.44005058574493355, max_relative = 1e-14);
        assert!(y[0].im.abs() < 1e-16);
    }

    #[test]
    fn complex_point_both_half_planes() {
        let mut y = [c(0.0, 0.0)];
        zbesj(c(10.0, 20.0), 1.0, Scaling::Unscaled, &mut y).unwrap();
        close(y[0], c(-1.3869150348751683e7, -3.785203660760742e7), 1e-13);
        // J_v(conj z) = conj J_v(z) for real order
        zbesj(c(10.0, -20.0), 1.0, Scaling::Unscaled, &mut y).unwrap();
        close(y[0], c(-1.3869150348751683e7, 3.785203660760742e7), 1e-13);
    }

    #[test]
    fn scaled_removes_imaginary_growth() {
        let z = c(10.0, 20.0);
        let mut u = [c(0.0, 0.0)];
        let mut s = [c(0.0, 0.0)];
        zbesj(z, 1.0, Scaling::Unscaled, &mut u).unwrap();
        zbesj(z, 1.0, Scaling::Exponential, &mut s).unwrap();
        close(s[0], u[0] * (-20.0f64).exp(), 1e-13);
    }
}
