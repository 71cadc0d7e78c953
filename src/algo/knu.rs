//! `K_{fnu+k}(z)` in the right half plane.
//!
//! The two lowest orders `K_dnu`, `K_{dnu+1}` with `|dnu| <= 1/2` come from
//! Temme's series when `|z| <= 2` and from Miller's algorithm on the
//! confluent hypergeometric recurrence otherwise. Higher orders follow by
//! forward recurrence with scale tracking. When `exp(-z)` would underflow
//! the recurrence is carried in exponentially scaled form until the
//! members come back on scale.

#![allow(clippy::excessive_precision)]

use num_complex::Complex;

use crate::algo::constants::{HPI, PI, R1M5, RTHPI, TTH};
use crate::algo::gamln::gamln;
use crate::algo::scaling::{ScaleLevels, ScaleTracker, underflows, unscale_k_run};
use crate::complex::{mul_add, sinh_cosh, two_over, zabs, zdiv, zexp, zsqrt};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::Scaling;

/// Iterations of the forward test that picks the Miller start index.
const KMAX: usize = 30;
/// Radius of the small-argument series.
const R1: f64 = 2.0;
/// 6/π
const SPI: f64 = 1.90985931710274403;
/// 2^(7/4)/sqrt(π)
const FPI: f64 = 1.89769999331517738;

/// Expansion of `(1/Γ(1-x) - 1/Γ(1+x)) / 2x` in powers of `x²`.
#[rustfmt::skip]
const CC: [f64; 8] = [
    5.77215664901532861e-01, -4.20026350340952355e-02,
   -4.21977345555443367e-02,  7.21894324666309954e-03,
   -2.15241674114950973e-04, -2.01348547807882387e-05,
    1.13302723198169588e-06,  6.11609510448141582e-09,
];

/// Starting pair for the forward recurrence, carried at `level`.
struct Seed<T> {
    s1: Complex<T>,
    s2: Complex<T>,
    level: usize,
}

/// Fills `y` with `K_{fnu+k}(z)` (times `exp(z)` when scaled), `Re z >= 0`.
///
/// Returns the number of leading members set to zero by underflow; this
/// can only be nonzero on the unscaled path with `Re z > alim`.
pub(crate) fn knu<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let half = T::from_f64(0.5);
    let n = y.len();
    let caz = zabs(z);
    let rz = two_over(z);
    let inu = order_int(fnu + half)?;
    let dnu = fnu - T::from_f64(inu as f64);
    let dnu2 = if dnu.abs() > lim.tol { dnu * dnu } else { T::zero() };

    if dnu.abs() != half && caz <= T::from_f64(R1) {
        return match temme(z, fnu, dnu, dnu2, scaling, inu > 0 || n > 1, lim)? {
            Start::Single(v) => {
                y[0] = v;
                Ok(0)
            }
            Start::Pair(seed) => Ok(forward(z, fnu, dnu, inu, y, seed, false, rz, lim)),
        };
    }

    let coef = zdiv(Complex::new(T::from_f64(RTHPI), T::zero()), zsqrt(z));
    // exp(-z) would underflow: carry exp(z) K and sort it out at the end
    let guarded = !scaling.is_scaled() && z.re > lim.alim;
    let coef = if scaling.is_scaled() || guarded { coef } else { coef * zexp(-z) };

    let seed = match miller_start(z, dnu, dnu2, coef, caz, lim)? {
        MillerStart::Half => Seed { s1: coef, s2: coef, level: 1 },
        MillerStart::Pair { s1, p1, p2 } if inu > 0 || n > 1 => {
            // K_{dnu+1} = K_dnu ((dnu + 1/2 - p1/p2)/z + 1)
            let ratio = ratio_scaled(p1, p2);
            let q = zdiv(Complex::new(dnu + half - ratio.re, -ratio.im), z);
            Seed { s1, s2: (q + T::one()) * s1, level: 1 }
        }
        MillerStart::Pair { s1, .. } => Seed { s1, s2: s1, level: 1 },
    };
    Ok(forward(z, fnu, dnu, inu, y, seed, guarded, rz, lim))
}

/// Output of the small-argument series.
enum Start<T> {
    /// `n == 1` and `fnu < 1/2`: the final value.
    Single(Complex<T>),
    Pair(Seed<T>),
}

/// Temme's series for `|z| <= 2`.
fn temme<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    dnu: T,
    dnu2: T,
    scaling: Scaling,
    pair: bool,
    lim: &Limits<T>,
) -> Result<Start<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let half = T::from_f64(0.5);
    let quarter = T::from_f64(0.25);
    let caz = zabs(z);
    let rz = two_over(z);

    let lnrz = rz.ln();
    let fmu = lnrz * dnu;
    let (csh, cch) = sinh_cosh(fmu);
    let (fc, smu) = if dnu != zero {
        let x = dnu * T::from_f64(PI);
        (x / x.sin(), csh / dnu)
    } else {
        (one, lnrz)
    };
    // t1 = 1/Γ(1-dnu), t2 = 1/Γ(1+dnu)
    let t2 = (-gamln(one + dnu)?).exp();
    let t1 = one / (t2 * fc);
    let g1 = if dnu.abs() > T::from_f64(0.1) {
        (t1 - t2) / (dnu + dnu)
    } else {
        let mut ak = one;
        let mut s = T::from_f64(CC[0]);
        for &c in &CC[1..] {
            ak = ak * dnu2;
            let tm = T::from_f64(c) * ak;
            s = s + tm;
            if tm.abs() < lim.tol {
                break;
            }
        }
        -s
    };
    let g2 = (t1 + t2) * half;

    let efmu = zexp(fmu);
    let mut f = (cch * g1 + smu * g2) * fc;
    let mut p = efmu * (half / t2);
    let mut q = zdiv(Complex::new(half, zero), efmu) / t1;
    let mut s1 = f;
    let mut s2 = p;
    if caz >= lim.tol {
        let cz = z * z * quarter;
        let t1 = quarter * caz * caz;
        let mut ak = one;
        let mut a1 = one;
        let mut bk = one - dnu2;
        let mut ck = Complex::new(one, zero);
        loop {
            f = (f * ak + p + q) / bk;
            p = p / (ak - dnu);
            q = q / (ak + dnu);
            let rak = one / ak;
            ck = ck * cz * rak;
            s1 = s1 + ck * f;
            if pair {
                s2 = s2 + ck * (p - f * ak);
            }
            a1 = a1 * t1 * rak;
            bk = bk + ak + ak + one;
            ak = ak + one;
            if a1 <= lim.tol {
                break;
            }
        }
    }

    if !pair {
        return Ok(Start::Single(if scaling.is_scaled() { s1 * zexp(z) } else { s1 }));
    }

    let level = if (fnu + one) * smu.re.abs() > lim.alim { 2 } else { 1 };
    let levels = ScaleLevels::new(lim);
    let sc = levels.scale[level];
    let mut s1 = s1 * sc;
    let mut s2 = (s2 * sc) * rz;
    if scaling.is_scaled() {
        let ez = zexp(z);
        s1 = s1 * ez;
        s2 = s2 * ez;
    }
    Ok(Start::Pair(Seed { s1, s2, level }))
}

enum MillerStart<T> {
    /// `|dnu| = 1/2`: `K_{±1/2}(z) = sqrt(π/2z) exp(-z)` exactly.
    Half,
    /// Normalised `K_dnu` and the last two unnormalised Miller values.
    Pair {
        s1: Complex<T>,
        p1: Complex<T>,
        p2: Complex<T>,
    },
}

/// Miller's algorithm for `|z| > 2`.
fn miller_start<T: BesselFloat>(
    z: Complex<T>,
    dnu: T,
    dnu2: T,
    coef: Complex<T>,
    caz: T,
    lim: &Limits<T>,
) -> Result<MillerStart<T>, Error> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let quarter = T::from_f64(0.25);

    if dnu.abs() == T::from_f64(0.5) {
        return Ok(MillerStart::Half);
    }
    let ak = (T::from_f64(PI) * dnu).cos().abs();
    let mut fhs = (quarter - dnu2).abs();
    if ak == zero || fhs == zero {
        return Ok(MillerStart::Half);
    }

    // r2 = f(e), a straight line on 12 <= e <= 60 with 2^-e = tol
    let e = (T::from_f64((T::MACH_DIGITS - 1) as f64) * T::from_f64(R1M5) * T::from_f64(3.321928094))
        .max(T::from_f64(12.0))
        .min(T::from_f64(60.0));
    let r2 = T::from_f64(TTH) * e - T::from_f64(6.0);
    let theta = if z.re != zero { (z.im / z.re).atan().abs() } else { T::from_f64(HPI) };

    let fk = if r2 <= caz {
        // forward recurrence to find the backward index
        let etest = ak / (T::from_f64(PI) * caz * lim.tol);
        let mut fk = one;
        if etest >= one {
            let mut fks = two;
            let mut ck = caz + caz + two;
            let (mut p1, mut p2) = (zero, one);
            let mut found = false;
            for _ in 0..KMAX {
                let a = fhs / fks;
                let cb = ck / (fk + one);
                let pt = p2;
                p2 = cb * p2 - p1 * a;
                p1 = pt;
                ck = ck + two;
                fks = fks + fk + fk + two;
                fhs = fhs + fk + fk;
                fk = fk + one;
                if etest < p2.abs() * fk {
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(Error::ConvergenceFailure);
            }
            fk = fk + T::from_f64(SPI) * theta * (r2 / caz).sqrt();
            fhs = (quarter - dnu2).abs();
        }
        fk
    } else {
        let a2 = caz.sqrt();
        let a = T::from_f64(FPI) * ak / (lim.tol * a2.sqrt());
        let aa = T::from_f64(3.0) * theta / (one + caz);
        let bb = T::from_f64(14.7) * theta / (T::from_f64(28.0) + caz);
        let a = (a.ln() + caz * aa.cos() / (one + T::from_f64(0.008) * caz)) / bb.cos();
        T::from_f64(0.12125) * a * a / caz + T::from_f64(1.5)
    };

    let k = order_int(fk)?;
    let mut fk = T::from_f64(k as f64);
    let mut fks = fk * fk;
    let mut p1 = Complex::new(zero, zero);
    let mut p2 = Complex::new(lim.tol, zero);
    let mut cs = p2;
    for _ in 0..k {
        let a1 = fks - fk;
        let a = (fks + fk) / (a1 + fhs);
        let rak = two / (fk + one);
        let cb = Complex::new((fk + z.re) * rak, z.im * rak);
        let pt = p2;
        p2 = (pt * cb - p1) * a;
        p1 = pt;
        cs = cs + p2;
        fks = a1 - fk + one;
        fk = fk - one;
    }

    // p2/cs as (p2/|cs|)(conj(cs)/|cs|)
    let r = one / zabs(cs);
    let s1 = coef * (p2 * r) * (cs.conj() * r);
    Ok(MillerStart::Pair { s1, p1, p2 })
}

/// `p1/p2` formed as `(p1/|p2|)(conj(p2)/|p2|)`.
#[inline]
fn ratio_scaled<T: BesselFloat>(p1: Complex<T>, p2: Complex<T>) -> Complex<T> {
    let r = T::one() / zabs(p2);
    (p1 * r) * (p2.conj() * r)
}

/// Forward recurrence from the seed pair to `K_{fnu+n-1}`.
#[allow(clippy::too_many_arguments)]
fn forward<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    dnu: T,
    inu: i32,
    y: &mut [Complex<T>],
    seed: Seed<T>,
    guarded: bool,
    rz: Complex<T>,
    lim: &Limits<T>,
) -> usize {
    let n = y.len();
    let Seed { mut s1, mut s2, level } = seed;
    let mut ck = rz * (dnu + T::one());
    let steps = if n == 1 { inu - 1 } else { inu };
    let mut tracker = ScaleTracker::new(ScaleLevels::new(lim), level);
    let mut first = 0;

    if steps > 0 && guarded {
        match climb(z, &mut s1, &mut s2, &mut ck, rz, steps, lim) {
            Climb::OnScale { next } => {
                first = next;
                tracker.level = 0;
            }
            Climb::Below { zd } => {
                if n == 1 {
                    s1 = s2;
                }
                return finish_guarded(zd, fnu, y, s1, s2, rz, lim);
            }
        }
    }
    for _ in first..steps.max(0) {
        let prev = s2;
        s2 = mul_add(ck, prev, s1);
        s1 = prev;
        ck = ck + rz;
        tracker.advance(&mut s1, &mut s2);
    }
    if n == 1 {
        s1 = s2;
    }
    if guarded && steps <= 0 {
        return finish_guarded(z, fnu, y, s1, s2, rz, lim);
    }
    emit(y, 0, s1, s2, ck, rz, tracker);
    0
}

/// Stores `y[start]`, `y[start + 1]` from the scaled pair and recurs on.
fn emit<T: BesselFloat>(
    y: &mut [Complex<T>],
    start: usize,
    mut s1: Complex<T>,
    mut s2: Complex<T>,
    mut ck: Complex<T>,
    rz: Complex<T>,
    mut tracker: ScaleTracker<T>,
) {
    let n = y.len();
    let u = tracker.unscale();
    y[start] = s1 * u;
    if start + 1 >= n {
        return;
    }
    y[start + 1] = s2 * u;
    for slot in y.iter_mut().skip(start + 2) {
        let prev = s2;
        s2 = mul_add(ck, prev, s1);
        s1 = prev;
        ck = ck + rz;
        *slot = tracker.advance(&mut s1, &mut s2);
    }
}

enum Climb<T> {
    /// Two consecutive members came on scale; resume at step `next`.
    OnScale { next: i32 },
    /// Still below scale after all steps; `zd` is the shifted argument.
    Below { zd: Complex<T> },
}

/// Recurrence on `exp(z)`-scaled values until two consecutive members
/// survive removal of the scale.
fn climb<T: BesselFloat>(
    z: Complex<T>,
    s1: &mut Complex<T>,
    s2: &mut Complex<T>,
    ck: &mut Complex<T>,
    rz: Complex<T>,
    steps: i32,
    lim: &Limits<T>,
) -> Climb<T> {
    let helim = T::from_f64(0.5) * lim.elim;
    let shrink = (-lim.elim).exp();
    let ascle = lim.ascle();
    let mut zd = z;
    let mut cy = [Complex::new(T::zero(), T::zero()); 2];
    let mut j = 1;
    let mut last: Option<i32> = None;
    for i in 0..steps {
        let prev = *s2;
        *s2 = mul_add(*ck, prev, *s1);
        *s1 = prev;
        *ck = *ck + rz;
        let alas = zabs(*s2).ln();
        if -zd.re + alas >= -lim.elim {
            let p = zexp(s2.ln() - zd) / lim.tol;
            if !underflows(p, ascle, lim.tol) {
                j = 1 - j;
                cy[j] = p;
                if last == Some(i - 1) {
                    *s2 = cy[j];
                    *s1 = cy[1 - j];
                    return Climb::OnScale { next: i + 1 };
                }
                last = Some(i);
                continue;
            }
        }
        if alas >= helim {
            zd.re = zd.re - lim.elim;
            *s1 = *s1 * shrink;
            *s2 = *s2 * shrink;
        }
    }
    Climb::Below { zd }
}

/// Removes the `exp(zd)` scale from the pair and completes the run.
fn finish_guarded<T: BesselFloat>(
    zd: Complex<T>,
    fnu: T,
    y: &mut [Complex<T>],
    s1: Complex<T>,
    s2: Complex<T>,
    rz: Complex<T>,
    lim: &Limits<T>,
) -> usize {
    let n = y.len();
    y[0] = s1;
    if n > 1 {
        y[1] = s2;
    }
    let nz = unscale_k_run(zd, fnu, y, rz, lim.ascle(), lim);
    if nz >= n {
        return nz;
    }
    // survivors come back at level 0
    let tracker = ScaleTracker::new(ScaleLevels::new(lim), 0);
    let s1 = y[nz];
    let s2 = if nz + 1 < n { y[nz + 1] } else { s1 };
    let ck = rz * (fnu + T::from_f64((nz + 1) as f64));
    emit(y, nz, s1, s2, ck, rz, tracker);
    nz
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn run(z: Complex64, fnu: f64, n: usize, scaling: Scaling) -> (Vec<Complex64>, usize) {
        let mut y = vec![Complex64::new(0.0, 0.0); n];
        let nz = knu(z, fnu, scaling, &mut y, &Limits::new()).unwrap();
        (y, nz)
    }

    fn close(a: Complex64, b: Complex64, rel: f64) {
        assert!((a - b).norm() <= rel * b.norm(), "{a} vs {b}");
    }

    #[test]
    fn small_argument_series() {
        let (y, nz) = run(Complex64::new(0.5, 0.0), 0.0, 1, Scaling::Unscaled);
        assert_eq!(nz, 0);
        assert_relative_eq!(y[0].re, 0.92441907122766586, max_relative = 1e-14);

        let (y, _) = run(Complex64::new(0.5, 0.0), 0.0, 3, Scaling::Unscaled);
        assert_relative_eq!(y[1].re, 1.6564411200033009, max_relative = 1e-14);
        assert_relative_eq!(y[2].re, 7.5501835512408694, max_relative = 1e-14);
    }

    #[test]
    fn fractional_order_inside_unit_disk() {
        let (y, _) = run(Complex64::new(1.0, 1.0), 0.3, 1, Scaling::Unscaled);
        close(y[0], Complex64::new(0.07622288651015994, -0.36592454260706584), 1e-14);
    }

    #[test]
    fn miller_region_run() {
        let (y, nz) = run(Complex64::new(3.0, 2.0), 0.0, 4, Scaling::Unscaled);
        assert_eq!(nz, 0);
        close(y[0], Complex64::new(-0.020787225587429772, -0.024312663567167654), 1e-13);
        close(y[1], Complex64::new(-0.024809520070151529, -0.025570749056351798), 1e-13);
        close(y[3], Complex64::new(-0.079356839092875281, -0.027180335393067673), 1e-13);

        let (y, _) = run(Complex64::new(5.0, -1.0), 1.3, 2, Scaling::Unscaled);
        close(y[0], Complex64::new(0.0018426586934547585, 0.0038262481265866945), 1e-13);
        close(y[1], Complex64::new(0.0022240274624549125, 0.0053768255119029433), 1e-13);
    }

    #[test]
    fn half_order_is_elementary() {
        let z = Complex64::new(4.0, 1.5);
        let (y, _) = run(z, 0.5, 1, Scaling::Unscaled);
        let expected = (core::f64::consts::FRAC_PI_2 / z).sqrt() * (-z).exp();
        close(y[0], expected, 1e-14);
    }

    #[test]
    fn scaled_values_far_out() {
        let (y, _) = run(Complex64::new(750.0, 0.0), 0.0, 2, Scaling::Exponential);
        assert_relative_eq!(y[0].re, 0.045756939928889065, max_relative = 1e-13);
        assert_relative_eq!(y[1].re, 0.045787434400828896, max_relative = 1e-13);
    }

    #[test]
    fn unscaled_near_underflow_uses_guarded_path() {
        let (y, nz) = run(Complex64::new(680.0, 0.0), 0.0, 1, Scaling::Unscaled);
        assert_eq!(nz, 0);
        assert_relative_eq!(y[0].re, 2.298677331415874e-297, max_relative = 1e-12);
    }
}
