//! Hankel function driver.
//!
//! `H^(m)_v(z) = -fmm (2i/π) exp(-fmm iπv/2) K_v(zn)` with
//! `fmm = 3 - 2m` and `zn = -fmm i z`, so `zn` is `-iz` for the first kind
//! and `iz` for the second.

use num_complex::Complex;
use tracing::{debug, warn};

use crate::algo::constants::HPI;
use crate::algo::continuation::continue_k;
use crate::algo::knu::knu;
use crate::algo::overflow::screen;
use crate::algo::scaling::rotate_run;
use crate::algo::uniform_k::large_order_k;
use crate::complex::{mul_i, mul_neg_i, zabs};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::{Accuracy, HankelKind, IkFlag, Scaling};

/// Compute `H^(m)_{fnu+j}(z)` for `j = 0, 1, ..., n-1` into `y`.
///
/// # Parameters
/// - `z`: complex argument, `z != 0`
/// - `fnu`: starting order, `fnu >= 0`
/// - `kind`: first or second kind
/// - `scaling`: `Exponential` returns `exp(∓iz) H^(1,2)(z)`
/// - `y`: output slice of length `n >= 1`
///
/// # Returns
/// `(nz, status)`: `nz` members underflowed to zero.
///
/// # Errors
/// - `InvalidInput`: `z = 0`, `fnu < 0` or `n = 0`
/// - `Overflow`: `|z|` too small or the values overflow
/// - `TotalPrecisionLoss`: `|z|` or the top order beyond the range bound
/// - `ConvergenceFailure`: a kernel failed to converge
pub(crate) fn zbesh<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    kind: HankelKind,
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
        warn!(fnu = ?fnu, az = ?az, ?kind, "H: reduced accuracy");
    }
    let nz = hankel_run(z, fnu, kind, scaling, y, top, &lim).inspect_err(|e| {
        warn!(fnu = ?fnu, az = ?az, n, ?kind, error = %e, "H evaluation failed");
    })?;
    Ok((nz, status))
}

fn hankel_run<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    kind: HankelKind,
    scaling: Scaling,
    y: &mut [Complex<T>],
    top: T,
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let zero = T::zero();
    let one = T::one();
    let az = zabs(z);
    let first = kind == HankelKind::First;
    let mm: i32 = if first { 1 } else { -1 };
    let mut zn = if first { mul_neg_i(z) } else { mul_i(z) };
    if az < T::from_f64(1.0e3) * T::MACH_TINY {
        return Err(Error::Overflow);
    }

    // the negative real axis of the second kind sits on the cut of K at zn
    let on_cut = zn.re == zero && zn.im < zero && !first;
    let mut nz = 0;
    let n = y.len();
    let mut nn = n;

    if top > lim.fnul {
        let mut mr = 0;
        if zn.re < zero || on_cut {
            mr = -mm;
            if on_cut {
                zn = -zn;
            }
        }
        debug!(fnu = ?fnu, az = ?az, n, mr, "H: uniform expansion in order");
        nz += large_order_k(zn, fnu, scaling, mr, y, lim)?;
    } else {
        if top > T::from_f64(2.0) {
            let nuf = screen(zn, fnu, scaling, IkFlag::K, y, lim)?;
            nz += nuf;
            nn -= nuf;
            if nn == 0 {
                debug!(nuf, "H: whole run underflows");
                return if zn.re < zero { Err(Error::Overflow) } else { Ok(nz) };
            }
        } else if top > one && az <= lim.tol && -(top * (T::from_f64(0.5) * az).ln()) > lim.elim {
            return Err(Error::Overflow);
        }
        if zn.re < zero || on_cut {
            debug!(fnu = ?fnu, az = ?az, n, "H: analytic continuation");
            nz = continue_k(zn, fnu, scaling, -mm, &mut y[..nn], lim)?;
        } else {
            debug!(fnu = ?fnu, az = ?az, n, "H: right half plane");
            nz = knu(zn, fnu, scaling, &mut y[..nn], lim)?;
        }
    }
    if nz > 0 {
        debug!(nz, "H: members underflow");
    }

    // exp(-mm iπ fnu/2) * (-mm 2i/π), reduced by the residue of fnu mod 4
    let sgn = if first { -T::from_f64(HPI) } else { T::from_f64(HPI) };
    let inu = order_int(fnu)?;
    let inuh = inu / 2;
    let ir = inu - 2 * inuh;
    let arg = (fnu - T::from_f64((inu - ir) as f64)) * sgn;
    let rhpi = one / sgn;
    let mut csgn = Complex::new(-rhpi * arg.sin(), rhpi * arg.cos());
    if inuh % 2 == 1 {
        csgn = -csgn;
    }
    let step: fn(Complex<T>) -> Complex<T> = if first { mul_neg_i } else { mul_i };
    rotate_run(&mut y[..nn], csgn, step, lim);
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

    fn h(z: Complex64, fnu: f64, kind: HankelKind, n: usize) -> Vec<Complex64> {
        let mut y = vec![c(0.0, 0.0); n];
        zbesh(z, fnu, kind, Scaling::Unscaled, &mut y).unwrap();
        y
    }

    #[test]
    fn rejects_zero_argument() {
        let mut y = [c(0.0, 0.0)];
        assert_eq!(
            zbesh(c(0.0, 0.0), 0.0, HankelKind::First, Scaling::Unscaled, &mut y),
            Err(Error::InvalidInput)
        );
    }

    #[test]
    fn real_axis_splits_into_j_and_y() {
        let h1 = h(c(1.0, 0.0), 0.0, HankelKind::First, 2);
        assert_relative_eq!(h1[0].re, 0.7651976865579666, max_relative = 1e-14);
        assert_relative_eq!(h1[0].im, 0.08825696421567696, max_relative = 1e-13);
        assert_relative_eq!(h1[1].im, -0.7812128213002887, max_relative = 1e-14);
        let h2 = h(c(1.0, 0.0), 0.0, HankelKind::Second, 1);
        close(h2[0], h1[0].conj(), 1e-14);
    }

    #[test]
    fn half_order_closed_form() {
        // H1_{1/2}(z) = -i sqrt(2/(πz)) exp(iz)
        let z = c(2.0, -3.0);
        let h1 = h(z, 0.5, HankelKind::First, 1);
        let e = c(0.0, -1.0) * (2.0 / (core::f64::consts::PI * z)).sqrt() * (c(0.0, 1.0) * z).exp();
        close(h1[0], e, 1e-13);
        let h2 = h(z, 0.5, HankelKind::Second, 1);
        let e = c(0.0, 1.0) * (2.0 / (core::f64::consts::PI * z)).sqrt() * (c(0.0, -1.0) * z).exp();
        close(h2[0], e, 1e-13);
    }

    #[test]
    fn negative_real_axis_second_kind() {
        // H2_{1/2}(-x) on the upper side of the cut
        let z = c(-2.0, 0.0);
        let h2 = h(z, 0.5, HankelKind::Second, 1);
        // sqrt(2/(πz)) at arg z = π
        let root = c(0.0, -core::f64::consts::FRAC_1_PI.sqrt());
        let e = c(0.0, 1.0) * root * (c(0.0, -1.0) * z).exp();
        close(h2[0], e, 1e-13);
    }

    #[test]
    fn scaled_first_kind() {
        let z = c(3.0, 4.0);
        let u = h(z, 1.3, HankelKind::First, 2);
        let mut s = [c(0.0, 0.0); 2];
        zbesh(z, 1.3, HankelKind::First, Scaling::Exponential, &mut s).unwrap();
        let f = (c(0.0, -1.0) * z).exp();
        close(s[0], u[0] * f, 1e-13);
        close(s[1], u[1] * f, 1e-13);
    }
}
