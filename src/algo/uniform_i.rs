//! `I_{fnu+k}(z)` for large order from the uniform asymptotic expansions.
//!
//! For `|arg z| <= π/3` the Debye form is used; closer to the imaginary axis
//! the Airy-type turning-point form is applied to the rotated argument.
//! The two highest members are evaluated directly and the rest follow by
//! backward recurrence.

use num_complex::Complex;

use crate::airy::ai;
use crate::algo::constants::{AIC, HPI};
use crate::algo::debye::Debye;
use crate::algo::overflow::screen;
use crate::algo::scaling::{ScaleLevels, ScaleTracker, underflows};
use crate::algo::turning::Turning;
use crate::complex::{mul_add_scalar, two_over, zabs, zexp};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::{AiryDerivative, IkFlag, Scaling};

/// Outcome of a uniform-expansion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UniformRun {
    /// Members set to zero by underflow, counted from the top.
    pub nz: usize,
    /// Nonzero when the expansion stopped short: members `0..nlast` fall
    /// below the order threshold and must come from another method.
    pub nlast: usize,
}

/// One member of an expansion before scaling.
pub(crate) struct Member<T> {
    pub exponent: Complex<T>,
    /// `ln` of the prefactor magnitude, added when refining the screen.
    pub log_prefactor: T,
    pub value: Complex<T>,
}

/// A member brought onto the scale of the run, or the side it fell off.
pub(crate) enum Scaled<T> {
    Value(Complex<T>),
    Underflow,
    Overflow,
}

/// `value * exp(exponent)` multiplied by the scale of `level`.
///
/// With `choose_level` the level is picked from the size of the member;
/// otherwise the given level is kept.
pub(crate) fn scale_member<T: BesselFloat>(
    m: &Member<T>,
    level: &mut usize,
    choose_level: bool,
    levels: &ScaleLevels<T>,
    lim: &Limits<T>,
) -> Scaled<T> {
    let zero = T::zero();
    let off = |rs1: T| if rs1 > zero { Scaled::Overflow } else { Scaled::Underflow };
    let mut rs1 = m.exponent.re;
    if rs1.abs() > lim.elim {
        return off(rs1);
    }
    if choose_level {
        *level = 1;
    }
    if rs1.abs() >= lim.alim {
        rs1 = rs1 + m.log_prefactor;
        if rs1.abs() > lim.elim {
            return off(rs1);
        }
        if choose_level {
            *level = if rs1 < zero { 0 } else { 2 };
        }
    }
    let v = m.value * zexp(m.exponent) * levels.scale[*level];
    if *level == 0 && underflows(v, levels.bounds[0], lim.tol) {
        return Scaled::Underflow;
    }
    Scaled::Value(v)
}

/// The two forms of the expansion.
trait Expansion<T: BesselFloat> {
    /// Real part of the exponent alone, for the screen of the first member.
    fn lead_exponent(&self, fnu: T, lim: &Limits<T>) -> T;

    fn member(&self, fnu: T, lim: &Limits<T>) -> Result<Member<T>, Error>;

    /// Maps a scaled member of order `fnu + m` back to `I`.
    fn orient(&self, v: Complex<T>, m: usize) -> Complex<T>;
}

struct DebyeForm<T> {
    z: Complex<T>,
    scaled: bool,
}

impl<T: BesselFloat> Expansion<T> for DebyeForm<T> {
    fn lead_exponent(&self, fnu: T, lim: &Limits<T>) -> T {
        Debye::new(self.z, fnu, false, lim.tol)
            .exponent(IkFlag::I, self.z, fnu, self.scaled)
            .re
    }

    fn member(&self, fnu: T, lim: &Limits<T>) -> Result<Member<T>, Error> {
        let d = Debye::new(self.z, fnu, true, lim.tol);
        let mut exponent = d.exponent(IkFlag::I, self.z, fnu, self.scaled);
        if self.scaled {
            // only exp(-|Re z|) is removed
            exponent.im = exponent.im + self.z.im;
        }
        let phi = d.phi(IkFlag::I);
        Ok(Member { exponent, log_prefactor: zabs(phi).ln(), value: phi * d.sum(IkFlag::I) })
    }

    fn orient(&self, v: Complex<T>, _m: usize) -> Complex<T> {
        v
    }
}

struct TurningForm<T> {
    /// `∓iz`, in the fourth quadrant.
    zn: Complex<T>,
    /// `z` reflected into the first quadrant.
    zb: Complex<T>,
    scaled: bool,
    upper: bool,
    abs_im: T,
    /// `exp(iπ frac(fnu)/2)`
    phase: Complex<T>,
    inu: i32,
}

impl<T: BesselFloat> TurningForm<T> {
    fn new(z: Complex<T>, fnu: T, scaled: bool) -> Result<Self, Error> {
        let upper = z.im > T::zero();
        let (zn, zb) = if upper {
            (Complex::new(z.im, -z.re), z)
        } else {
            (Complex::new(-z.im, -z.re), z.conj())
        };
        let inu = order_int(fnu)?;
        let ang = T::from_f64(HPI) * (fnu - T::from_f64(inu as f64));
        Ok(Self {
            zn,
            zb,
            scaled,
            upper,
            abs_im: z.im.abs(),
            phase: Complex::new(ang.cos(), ang.sin()),
            inu,
        })
    }
}

impl<T: BesselFloat> Expansion<T> for TurningForm<T> {
    fn lead_exponent(&self, fnu: T, lim: &Limits<T>) -> T {
        Turning::new(self.zn, fnu, false, lim.tol)
            .exponent(IkFlag::I, self.zb, fnu, self.scaled)
            .re
    }

    fn member(&self, fnu: T, lim: &Limits<T>) -> Result<Member<T>, Error> {
        let t = Turning::new(self.zn, fnu, true, lim.tol);
        let mut exponent = t.exponent(IkFlag::I, self.zb, fnu, self.scaled);
        if self.scaled {
            exponent.im = exponent.im + self.abs_im;
        }
        let log_prefactor = zabs(t.phi).ln() - T::from_f64(0.25) * zabs(t.arg).ln() - T::from_f64(AIC);
        let a = ai(t.arg, AiryDerivative::Value, Scaling::Exponential, lim)?.value;
        let da = ai(t.arg, AiryDerivative::Derivative, Scaling::Exponential, lim)?.value;
        let value = t.phi * (a * t.asum + da * t.bsum);
        Ok(Member { exponent, log_prefactor, value })
    }

    fn orient(&self, v: Complex<T>, m: usize) -> Complex<T> {
        // exp(iπ fnu/2) steps by i per order
        let quarter = [
            Complex::new(T::one(), T::zero()),
            Complex::new(T::zero(), T::one()),
            Complex::new(-T::one(), T::zero()),
            Complex::new(T::zero(), -T::one()),
        ];
        let rot = self.phase * quarter[(self.inu as usize + m) % 4];
        if self.upper {
            v * rot
        } else {
            v.conj() * rot.conj()
        }
    }
}

/// Debye form, `|arg z| <= π/3`.
pub(crate) fn debye_run<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<UniformRun, Error> {
    let form = DebyeForm { z, scaled: scaling.is_scaled() };
    run(&form, z, fnu, scaling, y, lim)
}

/// Turning-point form, `|arg z| > π/3`.
pub(crate) fn turning_run<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<UniformRun, Error> {
    let form = TurningForm::new(z, fnu, scaling.is_scaled())?;
    run(&form, z, fnu, scaling, y, lim)
}

fn run<T: BesselFloat, E: Expansion<T>>(
    form: &E,
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<UniformRun, Error> {
    let zero = T::zero();
    let czero = Complex::new(zero, zero);
    let n = y.len();
    let levels = ScaleLevels::new(lim);

    let rs1 = form.lead_exponent(fnu.max(T::one()), lim);
    if rs1.abs() > lim.elim {
        if rs1 > zero {
            return Err(Error::Overflow);
        }
        y.fill(czero);
        return Ok(UniformRun { nz: n, nlast: 0 });
    }

    let mut nz = 0;
    let mut nd = n;
    loop {
        let mut level = 1;
        let mut cy = [czero; 2];
        let mut failed = None;
        for i in 0..nd.min(2) {
            let m = nd - 1 - i;
            let member = form.member(fnu + T::from_f64(m as f64), lim)?;
            match scale_member(&member, &mut level, i == 0, &levels, lim) {
                Scaled::Value(s2) => {
                    let s2 = form.orient(s2, m);
                    cy[i] = s2;
                    y[m] = s2 * levels.unscale[level];
                }
                off => {
                    failed = Some(off);
                    break;
                }
            }
        }

        if let Some(off) = failed {
            if matches!(off, Scaled::Overflow) {
                return Err(Error::Overflow);
            }
            y[nd - 1] = czero;
            nz += 1;
            nd -= 1;
            if nd == 0 {
                return Ok(UniformRun { nz, nlast: 0 });
            }
            let nuf = screen(z, fnu, scaling, IkFlag::I, &mut y[..nd], lim)?;
            nd -= nuf;
            nz += nuf;
            if nd == 0 {
                return Ok(UniformRun { nz, nlast: 0 });
            }
            if fnu + T::from_f64((nd - 1) as f64) < lim.fnul {
                return Ok(UniformRun { nz, nlast: nd });
            }
            continue;
        }

        if nd > 2 {
            let rz = two_over(z);
            let (mut s1, mut s2) = (cy[0], cy[1]);
            let mut tracker = ScaleTracker::new(levels, level);
            let mut fk = T::from_f64((nd - 2) as f64);
            for k in (0..nd - 2).rev() {
                let c2 = s2;
                s2 = mul_add_scalar(rz * c2, fnu + fk, s1);
                s1 = c2;
                y[k] = tracker.advance(&mut s1, &mut s2);
                fk = fk - T::one();
            }
        }
        return Ok(UniformRun { nz, nlast: 0 });
    }
}

/// `I_{fnu+k}(z)` for `fnu + n - 1 + nui >= fnul`.
///
/// With `nui > 0` the expansion is applied at order `fnu + n - 1 + nui`
/// and the run is recovered by `nui + n - 1` steps of backward recurrence.
pub(crate) fn large_order_i<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    nui: usize,
    lim: &Limits<T>,
) -> Result<UniformRun, Error> {
    let zero = T::zero();
    let one = T::one();
    let turning = z.im.abs() > z.re.abs() * T::from_f64(1.7321);
    let expand = |fnu: T, y: &mut [Complex<T>]| {
        if turning {
            turning_run(z, fnu, scaling, y, lim)
        } else {
            debye_run(z, fnu, scaling, y, lim)
        }
    };
    if nui == 0 {
        return expand(fnu, y);
    }

    let n = y.len();
    let dfnu = fnu + T::from_f64((n - 1) as f64);
    let mut fnui = T::from_f64(nui as f64);
    let mut cy = [Complex::new(zero, zero); 2];
    if expand(dfnu + fnui, &mut cy)?.nz != 0 {
        return Ok(UniformRun { nz: 0, nlast: n });
    }

    // the top level is never left once entered
    let levels = ScaleLevels::with_top(lim, one / lim.ascle());
    let mut tracker = ScaleTracker::new(levels, levels.level_for(zabs(cy[0])));
    let sc = tracker.scale();
    let mut s1 = cy[1] * sc;
    let mut s2 = cy[0] * sc;
    let rz = two_over(z);
    for _ in 0..nui {
        let st = s2;
        s2 = mul_add_scalar(rz * st, dfnu + fnui, s1);
        s1 = st;
        fnui = fnui - one;
        tracker.advance(&mut s1, &mut s2);
    }
    y[n - 1] = s2 * tracker.unscale();
    let mut fk = T::from_f64((n - 1) as f64);
    for k in (0..n - 1).rev() {
        let st = s2;
        s2 = mul_add_scalar(rz * st, fnu + fk, s1);
        s1 = st;
        y[k] = tracker.advance(&mut s1, &mut s2);
        fk = fk - one;
    }
    Ok(UniformRun { nz: 0, nlast: 0 })
}
