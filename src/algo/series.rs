//! Power series for `I_{fnu+k}(z)` about `z = 0`.
//!
//! Valid for `|z| <= 2 sqrt(fnu + 1)`; the drivers also use it for any
//! `|z| <= 2`. The two highest orders are summed directly and the rest come
//! from backward recurrence.

use num_complex::Complex;

use crate::algo::gamln::gamln;
use crate::algo::scaling::underflows;
use crate::complex::{mul_add_scalar, two_over, zabs, zdiv, zexp};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits};
use crate::types::Scaling;

/// Result of [`power_series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeriesRun {
    /// Trailing members set to zero by underflow.
    pub nz: usize,
    /// False when members underflowed although `|z/2|^2` exceeds their
    /// order: the leading `n - nz` members must then be recomputed by
    /// another method.
    pub complete: bool,
}

/// Fills `y` with `I_{fnu+k}(z)` (times `exp(-|Re z|)` when scaled).
pub(crate) fn power_series<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<SeriesRun, Error> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let czero = Complex::new(zero, zero);
    let cone = Complex::new(one, zero);
    let n = y.len();

    let az = zabs(z);
    let arm = T::from_f64(1.0e3) * T::MACH_TINY;
    if az < arm {
        // I_0(0) = 1, every other order vanishes
        y.fill(czero);
        let mut nz = 0;
        if az != zero {
            nz = if fnu == zero { n - 1 } else { n };
        }
        if fnu == zero {
            y[0] = cone;
        }
        return Ok(SeriesRun { nz, complete: true });
    }

    let hz = z * T::from_f64(0.5);
    let cz = if az > arm.sqrt() { hz * hz } else { czero };
    let acz = zabs(cz);
    let lnhz = hz.ln();

    let mut nz = 0;
    let mut nn = n;
    // Drop trailing orders whose leading term underflows, then sum the top two.
    'orders: loop {
        let top = fnu + T::from_f64((nn - 1) as f64);
        let mut lead = Complex::new(lnhz.re * top - gamln(top + one)?, lnhz.im * top);
        if scaling.is_scaled() {
            lead.re = lead.re - z.re;
        }
        if lead.re <= -lim.elim {
            nz += 1;
            y[nn - 1] = czero;
            if acz > top {
                return Ok(SeriesRun { nz, complete: false });
            }
            nn -= 1;
            if nn == 0 {
                return Ok(SeriesRun { nz, complete: true });
            }
            continue 'orders;
        }

        // near the underflow limit the sums are carried at scale 1/tol
        let near_underflow = lead.re <= -lim.alim;
        let (ss, crscr, ascle) = if near_underflow {
            (one / lim.tol, lim.tol, arm / lim.tol)
        } else {
            (one, one, zero)
        };

        let mut coef = zexp(lead) * ss;
        let atol = lim.tol * acz / (top + one);
        let il = nn.min(2);
        let mut w = [czero; 2];
        for i in 0..il {
            let dfnu = fnu + T::from_f64((nn - 1 - i) as f64);
            let fnup = dfnu + one;
            let mut sum = cone;
            if acz >= lim.tol * fnup {
                let mut term = cone;
                let mut s = fnup;
                let mut step = fnup + two;
                let mut bound = two;
                loop {
                    let rs = one / s;
                    term = term * cz * rs;
                    sum = sum + term;
                    s = s + step;
                    step = step + two;
                    bound = bound * acz * rs;
                    if bound <= atol {
                        break;
                    }
                }
            }
            let val = sum * coef;
            w[i] = val;
            if near_underflow && underflows(val, ascle, lim.tol) {
                nz += 1;
                y[nn - 1] = czero;
                if acz > dfnu {
                    return Ok(SeriesRun { nz, complete: false });
                }
                nn -= 1;
                if nn == 0 {
                    return Ok(SeriesRun { nz, complete: true });
                }
                continue 'orders;
            }
            y[nn - 1 - i] = val * crscr;
            if i + 1 < il {
                coef = zdiv(coef, hz) * dfnu;
            }
        }

        if nn <= 2 {
            return Ok(SeriesRun { nz, complete: true });
        }

        let rz = two_over(z);
        let mut k = nn - 2;
        let mut ak = T::from_f64(k as f64);
        if near_underflow {
            // recur on the scaled pair until the values come on scale
            let (mut s1, mut s2) = (w[0], w[1]);
            while k > 0 {
                let prev = s2;
                s2 = mul_add_scalar(rz * prev, ak + fnu, s1);
                s1 = prev;
                let out = s2 * crscr;
                y[k - 1] = out;
                ak = ak - one;
                k -= 1;
                if zabs(out) > ascle {
                    break;
                }
            }
        }
        while k > 0 {
            y[k - 1] = mul_add_scalar(rz * y[k], ak + fnu, y[k + 1]);
            ak = ak - one;
            k -= 1;
        }
        return Ok(SeriesRun { nz, complete: true });
    }
}
