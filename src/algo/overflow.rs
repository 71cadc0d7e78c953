//! Over- and underflow screening with the leading term of the uniform
//! expansions.
//!
//! Only magnitudes matter here, so the expansion parameters are computed
//! without their series sums.

#![allow(clippy::excessive_precision)]

use num_complex::Complex;

use crate::algo::constants::AIC;
use crate::algo::debye::Debye;
use crate::algo::scaling::underflows;
use crate::algo::turning::Turning;
use crate::complex::{zabs, zexp};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits};
use crate::types::{IkFlag, Scaling};

/// Leading exponent of `I` or `K` at one order.
struct Lead<T> {
    /// `±(zeta2 - zeta1)`, less `zb` when scaled.
    cz: Complex<T>,
    phi: Complex<T>,
    /// Airy argument of the turning-point form.
    arg: Option<Complex<T>>,
}

impl<T: BesselFloat> Lead<T> {
    /// `ln |leading term|`, from the real part of the exponent and the prefactors.
    fn log_size(&self) -> T {
        let mut r = self.cz.re + zabs(self.phi).ln();
        if let Some(arg) = self.arg {
            r = r - T::from_f64(0.25) * zabs(arg).ln() - T::from_f64(AIC);
        }
        r
    }

    /// True when the leading term, scaled by `1/tol`, still underflows.
    fn vanishes(&self, lim: &Limits<T>) -> bool {
        let mut c = self.cz + self.phi.ln();
        if let Some(arg) = self.arg {
            c = c - arg.ln() * T::from_f64(0.25);
            c.re = c.re - T::from_f64(AIC);
        }
        let v = zexp(Complex::new(self.log_size(), c.im)) / lim.tol;
        underflows(v, lim.ascle(), lim.tol)
    }
}

/// Geometry shared by all orders of one screening pass.
struct Screen<T> {
    /// `z` reflected into the right half plane.
    zr: Complex<T>,
    /// Rotated argument for the turning-point form.
    zn: Complex<T>,
    turning: bool,
    scaling: Scaling,
    flag: IkFlag,
}

impl<T: BesselFloat> Screen<T> {
    fn lead(&self, gnu: T, lim: &Limits<T>) -> Lead<T> {
        let (zeta1, zeta2, phi, arg) = if self.turning {
            let t = Turning::new(self.zn, gnu, false, lim.tol);
            (t.zeta1, t.zeta2, t.phi, Some(t.arg))
        } else {
            let d = Debye::new(self.zr, gnu, false, lim.tol);
            (d.zeta1, d.zeta2, d.phi(self.flag), None)
        };
        let mut cz = zeta2 - zeta1;
        if self.scaling.is_scaled() {
            cz = cz - self.zr;
        }
        if self.flag == IkFlag::K {
            cz = -cz;
        }
        Lead { cz, phi, arg }
    }
}

/// Screens `y.len()` members of `I` or `K` at `z` for over- and underflow.
///
/// Returns the number of members set to zero from the top of the run (for
/// I) or of the whole run (for K), or `Error::Overflow` when the first
/// member overflows.
pub(crate) fn screen<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    flag: IkFlag,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let zero = T::zero();
    let one = T::one();
    let czero = Complex::new(zero, zero);
    let n = y.len();

    let zr = if z.re < zero { -z } else { z };
    let turning = z.im.abs() > z.re.abs() * T::from_f64(1.7321);
    let zn = if z.im > zero {
        Complex::new(zr.im, -zr.re)
    } else {
        Complex::new(-zr.im, -zr.re)
    };
    let screen = Screen { zr, zn, turning, scaling, flag };

    let gnu = match flag {
        IkFlag::I => fnu.max(one),
        IkFlag::K => {
            let fnn = T::from_f64(n as f64);
            (fnu + fnn - one).max(fnn)
        }
    };
    let lead = screen.lead(gnu, lim);
    let rcz = lead.cz.re;
    if rcz > lim.elim {
        return Err(Error::Overflow);
    }
    if rcz >= lim.alim {
        if lead.log_size() > lim.elim {
            return Err(Error::Overflow);
        }
    } else if rcz < -lim.elim
        || (rcz <= -lim.alim && (lead.log_size() <= -lim.elim || lead.vanishes(lim)))
    {
        y.fill(czero);
        return Ok(n);
    }
    if flag == IkFlag::K || n == 1 {
        return Ok(0);
    }

    // trim underflowing members off the top of an I run
    let mut nn = n;
    while nn > 0 {
        let lead = screen.lead(fnu + T::from_f64((nn - 1) as f64), lim);
        let rcz = lead.cz.re;
        let gone = rcz < -lim.elim
            || (rcz <= -lim.alim && (lead.log_size() <= -lim.elim || lead.vanishes(lim)));
        if !gone {
            break;
        }
        y[nn - 1] = czero;
        nn -= 1;
    }
    Ok(n - nn)
}
