//! K Bessel function driver.
//!
//! Right half plane through `knu`, left half plane through the analytic
//! continuation, and the uniform expansion once the top order passes `fnul`.

use num_complex::Complex;
use tracing::{debug, warn};

use crate::algo::continuation::continue_k;
use crate::algo::knu::knu;
use crate::algo::overflow::screen;
use crate::algo::uniform_k::large_order_k;
use crate::complex::zabs;
use crate::error::Error;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Accuracy, IkFlag, Scaling};

/// Compute `K_{fnu+j}(z)` for `j = 0, 1, ..., n-1` into `y`.
///
/// # Parameters
/// - `z`: complex argument, `z != 0`
/// - `fnu`: starting order, `fnu >= 0`
/// - `scaling`: `Exponential` returns `exp(z) K(z)`
/// - `y`: output slice of length `n >= 1`
///
/// # Returns
/// `(nz, status)`: `nz` members were set to zero by underflow, `status`
/// tells whether half the digits may be lost.
///
/// # Errors
/// - `InvalidInput`: `z = 0`, `fnu < 0` or `n = 0`
/// - `Overflow`: `|z|` too small or the values overflow
/// - `TotalPrecisionLoss`: `|z|` or the top order beyond the range bound
/// - `ConvergenceFailure`: a kernel failed to converge
pub(crate) fn zbesk<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    let zero = T::zero();
    let n = y.len();
    if n == 0 || !(fnu >= zero) || z == Complex::new(zero, zero) {
        return Err(Error::InvalidInput);
    }
    let lim = Limits::new();
    let az = zabs(z);
    let top = fnu + T::from_f64((n - 1) as f64);
    let status = lim.check_range(az, top)?;
    if status == Accuracy::Reduced {
        warn!(fnu = ?fnu, az = ?az, "K: reduced accuracy");
    }
    let r = besk_run(z, fnu, scaling, y, top, &lim);
    if let Err(e) = r {
        warn!(fnu = ?fnu, az = ?az, n, error = %e, "K evaluation failed");
    }
    Ok((r?, status))
}

fn besk_run<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    top: T,
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let zero = T::zero();
    let one = T::one();
    let az = zabs(z);
    if az < T::from_f64(1.0e3) * T::MACH_TINY {
        return Err(Error::Overflow);
    }

    if top > lim.fnul {
        let mr = if z.re >= zero {
            0
        } else if z.im < zero {
            -1
        } else {
            1
        };
        debug!(fnu = ?fnu, az = ?az, n = y.len(), mr, "K: uniform expansion in order");
        return large_order_k(z, fnu, scaling, mr, y, lim);
    }

    let mut nz = 0;
    if top > T::from_f64(2.0) {
        // K members vanish together, so the screen leaves all or nothing
        let nuf = screen(z, fnu, scaling, IkFlag::K, y, lim)?;
        if nuf > 0 {
            debug!(nuf, "K: whole run underflows");
            if z.re < zero {
                return Err(Error::Overflow);
            }
            return Ok(nuf);
        }
        nz += nuf;
    } else if top > one && az <= lim.tol && -(top * (T::from_f64(0.5) * az).ln()) > lim.elim {
        return Err(Error::Overflow);
    }

    if z.re >= zero {
        debug!(fnu = ?fnu, az = ?az, n = y.len(), "K: right half plane");
        nz += knu(z, fnu, scaling, y, lim)?;
    } else {
        let mr = if z.im < zero { -1 } else { 1 };
        debug!(fnu = ?fnu, az = ?az, n = y.len(), mr, "K: analytic continuation");
        nz += continue_k(z, fnu, scaling, mr, y, lim)?;
    }
    if nz > 0 {
        debug!(nz, "K: members underflow");
    }
    Ok(nz)
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
        let mut buf = [c(0.0, 0.0)];
        assert_eq!(zbesk(c(0.0, 0.0), 0.0, Scaling::Unscaled, &mut buf), Err(Error::InvalidInput));
        assert_eq!(zbesk(c(1.0, 0.0), -1.0, Scaling::Unscaled, &mut buf), Err(Error::InvalidInput));
        assert_eq!(zbesk(c(1.0, 0.0), f64::NAN, Scaling::Unscaled, &mut buf), Err(Error::InvalidInput));
        assert_eq!(zbesk(c(1.0, 0.0), 0.0, Scaling::Unscaled, &mut []), Err(Error::InvalidInput));
    }

    #[test]
    fn integer_orders_at_complex_point() {
        let mut y = [c(0.0, 0.0); 4];
        let (nz, status) = zbesk(c(3.0, 2.0), 0.0, Scaling::Unscaled, &mut y).unwrap();
        assert_eq!((nz, status), (0, Accuracy::Normal));
        close(y[0], c(-0.020787225587429772, -0.024312663567167654), 1e-13);
        close(y[1], c(-0.024809520070151529, -0.025570749056351798), 1e-13);
        close(y[2], c(-0.0401056960986848765, -0.0284808492638987826), 1e-13);
        close(y[3], c(-0.079356839092875281, -0.027180335393067673), 1e-13);
    }

    #[test]
    fn real_axis_small_argument() {
        let mut y = [c(0.0, 0.0); 3];
        zbesk(c(0.5, 0.0), 0.0, Scaling::Unscaled, &mut y).unwrap();
        assert_relative_eq!(y[0].re, 0.92441907122766586, max_relative = 1e-14);
        assert_relative_eq!(y[1].re, 1.6564411200033009, max_relative = 1e-14);
        assert_relative_eq!(y[2].re, 7.5501835512408694, max_relative = 1e-14);
    }

    #[test]
    fn scaled_far_out_and_unscaled_underflow() {
        let mut y = [c(0.0, 0.0); 2];
        zbesk(c(750.0, 0.0), 0.0, Scaling::Exponential, &mut y).unwrap();
        assert_relative_eq!(y[0].re, 0.045756939928889065, max_relative = 1e-14);
        assert_relative_eq!(y[1].re, 0.045787434400828896, max_relative = 1e-14);
        let (nz, _) = zbesk(c(750.0, 0.0), 0.0, Scaling::Unscaled, &mut y).unwrap();
        assert_eq!(nz, 2);
        assert_eq!(y, [c(0.0, 0.0); 2]);
    }

    #[test]
    fn large_order_path() {
        let mut y = [c(0.0, 0.0)];
        zbesk(c(108.0, 36.0), 90.0, Scaling::Unscaled, &mut y).unwrap();
        close(y[0], c(-1.1240518679700672e-34, -1.8122134406829613e-34), 1e-12);
    }

    #[test]
    fn left_half_plane_matches_half_order_closed_form() {
        let z = c(-2.0, 1.5);
        let mut y = [c(0.0, 0.0)];
        zbesk(z, 0.5, Scaling::Unscaled, &mut y).unwrap();
        close(y[0], (core::f64::consts::PI / (2.0 * z)).sqrt() * (-z).exp(), 1e-13);
    }

    #[test]
    fn tiny_argument_overflows() {
        let mut y = [c(0.0, 0.0)];
        assert_eq!(zbesk(c(1e-310, 0.0), 0.0, Scaling::Unscaled, &mut y), Err(Error::Overflow));
    }
}
