//! `K_{fnu+k}(z)` for `Re z < 0` by analytic continuation from `zn = -z`:
//!
//! `K(z) = exp(-iπ mr fnu) K(zn) - iπ sign(mr) I(zn)`, `mr = ±1`.

use num_complex::Complex;

use crate::algo::asymptotic::large_argument;
use crate::algo::constants::PI;
use crate::algo::knu::knu;
use crate::algo::miller::miller;
use crate::algo::region::binu;
use crate::algo::scaling::{ScaleLevels, ScaleTracker, continuation_underflow};
use crate::algo::series::power_series;
use crate::complex::{max_abs, mul_add, two_over, zabs};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::Scaling;

/// Coefficients of the K and I terms for the lowest order of a run.
struct Rotation<T> {
    /// `exp(-iπ mr fnu)`, alternating in sign with the order.
    cspn: Complex<T>,
    /// `-iπ sign(mr)`, times `exp(i Im z)` when scaled.
    csgn: Complex<T>,
}

impl<T: BesselFloat> Rotation<T> {
    fn new(z: Complex<T>, fnu: T, mr: i32, scaled: bool) -> Result<Self, Error> {
        let zero = T::zero();
        let sgn = if mr > 0 { -T::from_f64(PI) } else { T::from_f64(PI) };
        let mut csgn = Complex::new(zero, sgn);
        if scaled {
            csgn = csgn * Complex::new(z.im.cos(), z.im.sin());
        }
        let inu = order_int(fnu)?;
        let arg = (fnu - T::from_f64(inu as f64)) * sgn;
        let mut cspn = Complex::new(arg.cos(), arg.sin());
        if inu % 2 == 1 {
            cspn = -cspn;
        }
        Ok(Self { cspn, csgn })
    }

    /// Combines one member and steps the K coefficient to the next order.
    #[inline]
    fn combine(&mut self, k: Complex<T>, i: Complex<T>) -> Complex<T> {
        let v = self.cspn * k + self.csgn * i;
        self.cspn = -self.cspn;
        v
    }
}

/// `K_{fnu+k}(z)`, `Re z < 0`, for a run of any length.
///
/// Returns the number of members that underflowed.
pub(crate) fn continue_k<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    mr: i32,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let zero = T::zero();
    let czero = Complex::new(zero, zero);
    let n = y.len();
    let zn = -z;
    let scaled = scaling.is_scaled();

    binu(zn, fnu, scaling, y, lim)?;
    let nn = n.min(2);
    let mut cy = [czero; 2];
    if knu(zn, fnu, scaling, &mut cy[..nn], lim)? != 0 {
        return Err(Error::Overflow);
    }

    let mut rot = Rotation::new(z, fnu, mr, scaled)?;
    let ascle = lim.ascle();
    let mut iuf = 0;
    let mut nz = 0;
    // K terms after the exp(-2z) rescale, kept to restart the recurrence
    let mut sc = [czero; 2];
    for i in 0..nn {
        let (mut c1, mut c2) = (cy[i], y[i]);
        if scaled {
            let t = continuation_underflow(zn, c1, c2, ascle, lim.alim, &mut iuf);
            c1 = t.k_part;
            c2 = t.i_part;
            nz += t.underflow as usize;
            sc[i] = c1;
        }
        y[i] = rot.combine(c1, c2);
    }
    if n <= 2 {
        return Ok(nz);
    }

    // forward recurrence on K(zn)
    let rz = two_over(zn);
    let mut ck = rz * (fnu + T::one());
    let levels = ScaleLevels::new(lim);
    let mut tracker = ScaleTracker::new(levels, levels.level_for(zabs(cy[1])));
    let mut s1 = cy[0] * tracker.scale();
    let mut s2 = cy[1] * tracker.scale();
    let mut settled = false;
    for v in y.iter_mut().skip(2) {
        let st = s2;
        s2 = mul_add(ck, st, s1);
        s1 = st;
        let mut c1 = s2 * tracker.unscale();
        let mut restart = c1;
        let mut c2 = *v;
        if scaled && !settled {
            let t = continuation_underflow(zn, c1, c2, ascle, lim.alim, &mut iuf);
            c1 = t.k_part;
            c2 = t.i_part;
            nz += t.underflow as usize;
            sc = [sc[1], c1];
            // three rescales in a row: carry on with the rescaled K values
            if iuf == 3 {
                settled = true;
                s1 = sc[0] * tracker.scale();
                s2 = sc[1] * tracker.scale();
                restart = sc[1];
            }
        }
        *v = rot.combine(c1, c2);
        ck = ck + rz;
        if tracker.level < 2 && max_abs(c1) > tracker.bound() {
            tracker.raise(&mut s1, &mut s2, restart);
        }
    }
    Ok(nz)
}

/// `K_fnu(z)`, `Re z < 0`, for the Airy functions: one member, order below
/// one, I from the direct methods only.
///
/// Returns the value and whether it underflowed.
pub(crate) fn continue_k_airy<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    mr: i32,
    lim: &Limits<T>,
) -> Result<(Complex<T>, bool), Error> {
    let zero = T::zero();
    let czero = Complex::new(zero, zero);
    let zn = -z;
    let az = zabs(z);
    let mut y = [czero];

    if az <= T::from_f64(2.0) || T::from_f64(0.25) * az * az <= fnu + T::one() {
        power_series(zn, fnu, scaling, &mut y, lim)?;
    } else if az >= lim.rl {
        large_argument(zn, fnu, scaling, &mut y, lim)?;
    } else {
        miller(zn, fnu, scaling, &mut y, lim.tol)?;
    }

    let mut cy = [czero];
    if knu(zn, fnu, scaling, &mut cy, lim)? != 0 {
        return Err(Error::Overflow);
    }

    let scaled = scaling.is_scaled();
    let mut rot = Rotation::new(z, fnu, mr, scaled)?;
    let (mut c1, mut c2) = (cy[0], y[0]);
    let mut underflow = false;
    if scaled {
        let mut iuf = 0;
        let t = continuation_underflow(zn, c1, c2, lim.ascle(), lim.alim, &mut iuf);
        c1 = t.k_part;
        c2 = t.i_part;
        underflow = t.underflow;
    }
    Ok((rot.combine(c1, c2), underflow))
}
