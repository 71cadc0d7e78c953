//! Airy functions `Ai`, `Bi` and their first derivatives.
//!
//! Inside the unit disc both come from the pair of power series in `z³`.
//! Outside it they are Bessel functions of order 1/3 or 2/3 at
//! `ζ = (2/3) z^{3/2}`: `Ai` through `K` (continued across the imaginary
//! axis when needed) and `Bi` through `I`.

#![allow(clippy::excessive_precision)]

use num_complex::Complex;
use tracing::{debug, warn};

use crate::algo::constants::{PI, TTH};
use crate::algo::continuation::continue_k_airy;
use crate::algo::knu::knu;
use crate::algo::region::binu;
use crate::complex::{zabs, zdiv, zexp, zsqrt};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits};
use crate::types::{Accuracy, AiryDerivative, AiryResult, Scaling};

/// `Ai(0)` and `-Ai'(0)`.
const AI_C1: f64 = 3.55028053887817239e-01;
const AI_C2: f64 = 2.58819403792806798e-01;
/// `1/(π sqrt 3)`
const AI_COEF: f64 = 1.83776298473930683e-01;
/// `Bi(0)` and `Bi'(0)`.
const BI_C1: f64 = 6.14926627446000736e-01;
const BI_C2: f64 = 4.48288357353826359e-01;
/// `1/sqrt 3`
const BI_COEF: f64 = 5.77350269189625765e-01;

/// Which of the two functions a shared step serves.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Ai,
    Bi,
}

impl Kind {
    fn constants<T: BesselFloat>(self) -> (T, T) {
        match self {
            Kind::Ai => (T::from_f64(AI_C1), T::from_f64(AI_C2)),
            Kind::Bi => (T::from_f64(BI_C1), T::from_f64(BI_C2)),
        }
    }

    /// Sign of the odd series: `Ai = c1 f - c2 z g`, `Bi = c1 f + c2 z g`.
    fn odd_sign<T: BesselFloat>(self) -> T {
        match self {
            Kind::Ai => -T::one(),
            Kind::Bi => T::one(),
        }
    }
}

fn fid<T: BesselFloat>(id: AiryDerivative) -> T {
    match id {
        AiryDerivative::Value => T::zero(),
        AiryDerivative::Derivative => T::one(),
    }
}

/// Partial sums `(f, g)` of the even and odd power series in `z³`,
/// normalised to start at one. The derivative series are selected by `fid`.
fn origin_series<T: BesselFloat>(z: Complex<T>, az: T, fid: T, tol: T) -> (Complex<T>, Complex<T>) {
    let one = Complex::new(T::one(), T::zero());
    let aa = az * az;
    if aa < tol / az {
        return (one, one);
    }
    let z3 = z * z * z;
    let az3 = az * aa;
    let (two, three, four) = (T::from_f64(2.0), T::from_f64(3.0), T::from_f64(4.0));
    let mut d1 = (two + fid) * (three + fid + fid);
    let mut d2 = (three - fid - fid) * (four - fid);
    let mut step1 = T::from_f64(24.0) + T::from_f64(9.0) * fid;
    let mut step2 = T::from_f64(30.0) - T::from_f64(9.0) * fid;
    let eighteen = T::from_f64(18.0);

    let (mut f, mut g) = (one, one);
    let (mut t1, mut t2) = (one, one);
    let mut atrm = T::one();
    let mut ad = d1.min(d2);
    for _ in 0..25 {
        t1 = t1 * z3 / d1;
        f = f + t1;
        t2 = t2 * z3 / d2;
        g = g + t2;
        atrm = atrm * az3 / ad;
        d1 = d1 + step1;
        d2 = d2 + step2;
        ad = d1.min(d2);
        if atrm < tol * ad {
            break;
        }
        step1 = step1 + eighteen;
        step2 = step2 + eighteen;
    }
    (f, g)
}

/// `Ai`/`Bi` (or derivative) for `|z| <= 1`, before scaling.
fn near_origin<T: BesselFloat>(z: Complex<T>, az: T, id: AiryDerivative, kind: Kind, tol: T) -> Complex<T> {
    let fid = fid::<T>(id);
    let (c1, c2) = kind.constants::<T>();
    let s = kind.odd_sign::<T>();
    let (f, g) = origin_series(z, az, fid, tol);
    match id {
        AiryDerivative::Value => f * c1 + z * g * (s * c2),
        AiryDerivative::Derivative => g * (s * c2) + z * z * f * (c1 / (T::one() + fid)),
    }
}

/// `(sqrt z, ζ)` with `ζ = (2/3) z sqrt z` placed so that `Re ζ <= 0`
/// whenever `Re z < 0`, and purely imaginary on the negative real axis.
fn zeta<T: BesselFloat>(z: Complex<T>) -> (Complex<T>, Complex<T>) {
    let zero = T::zero();
    let csq = zsqrt(z);
    let mut zta = z * csq * T::from_f64(TTH);
    if z.re < zero {
        zta.re = -zta.re.abs();
    }
    if z.im == zero && z.re <= zero {
        zta.re = zero;
    }
    (csq, zta)
}

/// Range test on `|z|`: beyond `aa^{2/3}` nothing is significant, beyond
/// `aa^{1/3}` half the digits may be lost.
fn range<T: BesselFloat>(az: T, lim: &Limits<T>) -> Result<Accuracy, Error> {
    let aa = lim.significance_bound().powf(T::from_f64(TTH));
    if az > aa {
        return Err(Error::TotalPrecisionLoss);
    }
    Ok(Accuracy::reduced_if(az > aa.sqrt()))
}

/// `Ai(z)` or `Ai'(z)`; scaled by `exp(ζ)` when requested.
pub(crate) fn ai<T: BesselFloat>(
    z: Complex<T>,
    id: AiryDerivative,
    scaling: Scaling,
    lim: &Limits<T>,
) -> Result<AiryResult<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let czero = Complex::new(zero, zero);
    let az = zabs(z);
    let scaled = scaling.is_scaled();

    if az <= one {
        let mut value = near_origin(z, az, id, Kind::Ai, lim.tol);
        if scaled {
            value = value * zexp(z * zsqrt(z) * T::from_f64(TTH));
        }
        return Ok(AiryResult { value, underflow_count: 0, status: Accuracy::Normal });
    }

    let status = range(az, lim)?;
    let fnu = (one + fid::<T>(id)) / T::from_f64(3.0);
    let (csq, zta) = zeta(z);
    let quarter_log = T::from_f64(0.25) * az.ln();
    // unscaled values near the exponent limits are formed at a shifted scale
    let mut sfac = one;

    let k = if zta.re >= zero && z.re > zero {
        if !scaled && zta.re >= lim.alim {
            sfac = one / lim.tol;
            if -zta.re - quarter_log < -lim.elim {
                return Ok(AiryResult { value: czero, underflow_count: 1, status });
            }
        }
        let mut cy = [czero];
        let nz = knu(zta, fnu, scaling, &mut cy, lim)?;
        (cy[0], nz)
    } else {
        if !scaled && -zta.re > lim.alim {
            sfac = lim.tol;
            if -zta.re + quarter_log > lim.elim {
                return Err(Error::Overflow);
            }
        }
        let mr = if z.im < zero { -1 } else { 1 };
        let (v, underflow) = continue_k_airy(zta, fnu, scaling, mr, lim)?;
        (v, underflow as usize)
    };

    let s1 = k.0 * T::from_f64(AI_COEF) * sfac;
    let value = match id {
        AiryDerivative::Value => csq * s1,
        AiryDerivative::Derivative => -(z * s1),
    } / sfac;
    Ok(AiryResult { value, underflow_count: k.1, status })
}

/// `Bi(z)` or `Bi'(z)`; scaled by `exp(-|Re ζ|)` when requested.
pub(crate) fn bi<T: BesselFloat>(
    z: Complex<T>,
    id: AiryDerivative,
    scaling: Scaling,
    lim: &Limits<T>,
) -> Result<AiryResult<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let czero = Complex::new(zero, zero);
    let az = zabs(z);
    let scaled = scaling.is_scaled();

    if az <= one {
        let mut value = near_origin(z, az, id, Kind::Bi, lim.tol);
        if scaled {
            let zta = z * zsqrt(z) * T::from_f64(TTH);
            value = value * (-zta.re.abs()).exp();
        }
        return Ok(AiryResult { value, underflow_count: 0, status: Accuracy::Normal });
    }

    let status = range(az, lim)?;
    let fid = fid::<T>(id);
    let three = T::from_f64(3.0);
    let fnu = (one + fid) / three;
    let (csq, mut zta) = zeta(z);

    let mut sfac = one;
    if !scaled && zta.re.abs() >= lim.alim {
        sfac = lim.tol;
        if zta.re.abs() + T::from_f64(0.25) * az.ln() > lim.elim {
            return Err(Error::Overflow);
        }
    }

    // I at -ζ rotated back by exp(i fmr fnu) off the right half plane
    let mut fmr = zero;
    if !(zta.re >= zero && z.re > zero) {
        fmr = if z.im < zero { -T::from_f64(PI) } else { T::from_f64(PI) };
        zta = -zta;
    }

    let mut lo = [czero];
    binu(zta, fnu, scaling, &mut lo, lim)?;
    let rot = fmr * fnu;
    let s1 = Complex::new(rot.cos(), rot.sin()) * lo[0] * sfac;

    // I_{fnu2-1} from I_{fnu2} and I_{fnu2+1}, fnu2 = (2 - fid)/3
    let fnu2 = (T::from_f64(2.0) - fid) / three;
    let mut hi = [czero; 2];
    binu(zta, fnu2, scaling, &mut hi, lim)?;
    let (h0, h1) = (hi[0] * sfac, hi[1] * sfac);
    let s2 = zdiv(h0, zta) * (fnu2 + fnu2) + h1;
    let rot = fmr * (fnu2 - one);
    let sum = (s1 + Complex::new(rot.cos(), rot.sin()) * s2) * T::from_f64(BI_COEF);

    let value = match id {
        AiryDerivative::Value => csq * sum,
        AiryDerivative::Derivative => z * sum,
    } / sfac;
    Ok(AiryResult { value, underflow_count: 0, status })
}

fn report<T: BesselFloat>(func: &str, z: Complex<T>, r: &Result<AiryResult<T>, Error>) {
    match r {
        Ok(v) if v.underflow_count > 0 => debug!(func, re = ?z.re, im = ?z.im, "airy value underflows"),
        Ok(v) if v.status == Accuracy::Reduced => warn!(func, re = ?z.re, im = ?z.im, "reduced accuracy"),
        Ok(_) => {}
        Err(e) => warn!(func, re = ?z.re, im = ?z.im, error = %e, "airy evaluation failed"),
    }
}

/// `Ai(z)` or `Ai'(z)`.
///
/// # Returns
/// The value, `underflow_count = 1` when the decaying branch underflowed
/// to zero (unscaled only), and the accuracy flag.
///
/// # Errors
/// `Overflow` when the unscaled value is too large, `TotalPrecisionLoss`
/// when `|z|` exceeds the range bound, `ConvergenceFailure` from the
/// underlying K evaluation.
pub(crate) fn zairy<T: BesselFloat>(
    z: Complex<T>,
    id: AiryDerivative,
    scaling: Scaling,
) -> Result<AiryResult<T>, Error> {
    let r = ai(z, id, scaling, &Limits::new());
    report("ai", z, &r);
    r
}

/// `Bi(z)` or `Bi'(z)`.
///
/// # Errors
/// As [`zairy`], with overflow for large `|Re ζ|` in either half plane.
pub(crate) fn zbiry<T: BesselFloat>(
    z: Complex<T>,
    id: AiryDerivative,
    scaling: Scaling,
) -> Result<AiryResult<T>, Error> {
    let r = bi(z, id, scaling, &Limits::new());
    report("bi", z, &r);
    r
}
