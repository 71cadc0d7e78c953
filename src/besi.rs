//! I Bessel function driver.
//!
//! The run is computed at `z` or, in the left half plane, at `-z` and
//! rotated back with `I_v(-z) = exp(±iπv) I_v(z)`.

use num_complex::Complex;
use tracing::{debug, warn};

use crate::algo::constants::PI;
use crate::algo::region::binu;
use crate::algo::scaling::rotate_run;
use crate::complex::zabs;
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::{Accuracy, Scaling};

/// Compute `I_{fnu+j}(z)` for `j = 0, 1, ..., n-1` into `y`.
///
/// # Parameters
/// - `z`: complex argument
/// - `fnu`: starting order, `fnu >= 0`
/// - `scaling`: `Exponential` returns `exp(-|Re z|) I(z)`
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
pub(crate) fn zbesi<T: BesselFloat>(
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
        warn!(fnu = ?fnu, az = ?az, "I: reduced accuracy");
    }

    let left = z.re < zero;
    let zn = if left { -z } else { z };
    let nz = binu(zn, fnu, scaling, y, &lim).inspect_err(|e| {
        warn!(fnu = ?fnu, az = ?az, n, error = %e, "I evaluation failed");
    })?;
    if nz > 0 {
        debug!(nz, "I: trailing members underflow");
    }
    if left && nz < n {
        debug!("I: rotating back from -z");
        let csgn = reflection_phase(fnu, z.im < zero)?;
        rotate_run(&mut y[..n - nz], csgn, |c| -c, &lim);
    }
    Ok((nz, status))
}

/// `exp(±iπ fnu)` formed from the fractional part of `fnu`.
fn reflection_phase<T: BesselFloat>(fnu: T, lower: bool) -> Result<Complex<T>, Error> {
    let inu = order_int(fnu)?;
    let mut arg = (fnu - T::from_f64(inu as f64)) * T::from_f64(PI);
    if lower {
        arg = -arg;
    }
    let c = Complex::new(arg.cos(), arg.sin());
    Ok(if inu % 2 == 1 { -c } else { c })
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
        assert_eq!(zbesi(z, -1.0, Scaling::Unscaled, &mut [c(0.0, 0.0)]), Err(Error::InvalidInput));
        assert_eq!(zbesi(z, 0.0, Scaling::Unscaled, &mut []), Err(Error::InvalidInput));
    }

    #[test]
    fn small_real_argument() {
        let mut y = [c(0.0, 0.0); 3];
        assert_eq!(zbesi(c(2.0, 0.0), 0.0, Scaling::Unscaled, &mut y), Ok((0, Accuracy::Normal)));
        assert_relative_eq!(y[0].re, 2.2795853023360673, max_relative = 1e-14);
        assert_relative_eq!(y[1].re, 1.590636854637329, max_relative = 1e-14);
        assert_relative_eq!(y[2].re, 0.6889484476987382, max_relative = 1e-14);
    }

    #[test]
    fn fractional_orders_at_complex_point() {
        let mut y = [c(0.0, 0.0); 2];
        zbesi(c(10.0, 5.0), 0.7, Scaling::Unscaled, &mut y).unwrap();
        close(y[0], c(158.677848564593, -2597.298887629614), 1e-13);
        close(y[1], c(265.96258982910695, -2342.002031191648), 1e-13);
    }

    #[test]
    fn left_half_plane_reflection() {
        // integer order: I_n(-z) = (-1)^n I_n(z)
        let mut right = [c(0.0, 0.0); 3];
        let mut left = [c(0.0, 0.0); 3];
        zbesi(c(2.0, 1.0), 0.0, Scaling::Unscaled, &mut right).unwrap();
        zbesi(c(-2.0, -1.0), 0.0, Scaling::Unscaled, &mut left).unwrap();
        close(left[0], right[0], 1e-15);
        close(left[1], -right[1], 1e-15);
        close(left[2], right[2], 1e-15);

        // I_{1/2}(z) = sqrt(2/(πz)) sinh z on the principal branch
        let z = c(-1.5, 0.8);
        let mut y = [c(0.0, 0.0)];
        zbesi(z, 0.5, Scaling::Unscaled, &mut y).unwrap();
        close(y[0], (2.0 / (core::f64::consts::PI * z)).sqrt() * z.sinh(), 1e-14);
    }

    #[test]
    fn scaled_at_thirty() {
        let mut y = [c(0.0, 0.0); 3];
        zbesi(c(30.0, 10.0), 0.0, Scaling::Exponential, &mut y).unwrap();
        close(y[0], c(-0.06522407425244948, -0.028585825836178879), 1e-13);
        close(y[2], c(-0.06080873510178115, -0.028158582132885373), 1e-13);
    }
}
