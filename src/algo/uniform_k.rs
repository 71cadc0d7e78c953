//! `K_{fnu+k}(z)` for large order from the uniform asymptotic expansions,
//! with the continuation to `Re z < 0`.
//!
//! K is evaluated at `zr`, the argument reflected into the right half plane.
//! For `mr != 0` the run is continued with
//! `K(z) = exp(-iπ mr fnu) K(zr) - iπ sign(mr) I(zr)`, the I terms coming
//! from the same expansion.

use num_complex::Complex;

use crate::airy::ai;
use crate::algo::constants::{AIC, HPI, PI};
use crate::algo::debye::Debye;
use crate::algo::scaling::{ScaleLevels, ScaleTracker, continuation_underflow};
use crate::algo::turning::Turning;
use crate::algo::uniform_i::{Member, Scaled, scale_member};
use crate::complex::{mul_add, mul_add_scalar, two_over, zabs};
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::{AiryDerivative, IkFlag, Scaling};

/// `(-i)^k`
fn neg_i_pow<T: BesselFloat>(k: usize) -> Complex<T> {
    let (one, zero) = (T::one(), T::zero());
    match k % 4 {
        0 => Complex::new(one, zero),
        1 => Complex::new(zero, -one),
        2 => Complex::new(-one, zero),
        _ => Complex::new(zero, one),
    }
}

/// An expansion that yields both K and I members at one order.
trait Expansion<T: BesselFloat> {
    type Params: Copy;

    fn params(&self, fnu: T, with_sums: bool, lim: &Limits<T>) -> Self::Params;

    /// Real part of the K exponent and the log prefactor, without the sums.
    fn k_size(&self, p: &Self::Params, fnu: T) -> (T, T);

    fn k_member(&self, p: &Self::Params, m: usize, fnu: T, lim: &Limits<T>) -> Result<Member<T>, Error>;

    /// The I term of the continuation, coefficient included.
    fn i_member(&self, p: &Self::Params, m: usize, fnu: T, lim: &Limits<T>) -> Result<Member<T>, Error>;

    fn orient(&self, v: Complex<T>) -> Complex<T>;
}

struct DebyeForm<T> {
    zr: Complex<T>,
    scaled: bool,
    /// `i` times this multiplies the I term.
    csgn: T,
}

impl<T: BesselFloat> Expansion<T> for DebyeForm<T> {
    type Params = Debye<T>;

    fn params(&self, fnu: T, with_sums: bool, lim: &Limits<T>) -> Debye<T> {
        Debye::new(self.zr, fnu, with_sums, lim.tol)
    }

    fn k_size(&self, d: &Debye<T>, fnu: T) -> (T, T) {
        let e = d.exponent(IkFlag::K, self.zr, fnu, self.scaled);
        (e.re, zabs(d.phi(IkFlag::K)).ln())
    }

    fn k_member(&self, d: &Debye<T>, _m: usize, fnu: T, _lim: &Limits<T>) -> Result<Member<T>, Error> {
        let phi = d.phi(IkFlag::K);
        Ok(Member {
            exponent: d.exponent(IkFlag::K, self.zr, fnu, self.scaled),
            log_prefactor: zabs(phi).ln(),
            value: phi * d.sum(IkFlag::K),
        })
    }

    fn i_member(&self, d: &Debye<T>, _m: usize, fnu: T, _lim: &Limits<T>) -> Result<Member<T>, Error> {
        let phi = d.phi(IkFlag::I);
        Ok(Member {
            exponent: d.exponent(IkFlag::I, self.zr, fnu, self.scaled),
            log_prefactor: zabs(phi).ln(),
            value: phi * d.sum(IkFlag::I) * Complex::new(T::zero(), self.csgn),
        })
    }

    fn orient(&self, v: Complex<T>) -> Complex<T> {
        v
    }
}

/// K from `H^(2)(fnu, -i zr)` and I from `J(fnu, -i zr)`, with `zr` in the
/// first quadrant; the fourth quadrant follows by conjugation.
struct TurningForm<T> {
    zn: Complex<T>,
    zb: Complex<T>,
    scaled: bool,
    upper: bool,
    /// K coefficient at order offset 0, before the `(-i)^(inu+m)` step.
    k_coef: Complex<T>,
    /// I coefficient at order offset 0, before the `i^(inu+m)` step.
    i_coef: Complex<T>,
    inu: usize,
}

impl<T: BesselFloat> TurningForm<T> {
    fn new(zr: Complex<T>, fnu: T, scaled: bool, sgn: T) -> Result<Self, Error> {
        let upper = zr.im > T::zero();
        let (zn, zb) = if upper {
            (Complex::new(zr.im, -zr.re), zr)
        } else {
            (Complex::new(-zr.im, -zr.re), zr.conj())
        };
        let inu = order_int(fnu)?;
        let fnf = fnu - T::from_f64(inu as f64);
        let ang = T::from_f64(HPI) * fnf;
        let half = Complex::new(ang.cos(), ang.sin());
        // (1 + i√3) π/2 (-i) exp(-iπ fnf/2)
        let cr1 = Complex::new(T::one(), T::from_f64(1.732_050_807_568_877_29));
        let k_coef = cr1 * Complex::new(T::zero(), -T::from_f64(HPI)) * half.conj();
        let csgn = if upper { sgn } else { -sgn };
        let i_coef = Complex::new(T::zero(), csgn) * half;
        Ok(Self { zn, zb, scaled, upper, k_coef, i_coef, inu: inu as usize })
    }

    fn log_prefactor(t: &Turning<T>) -> T {
        zabs(t.phi).ln() - T::from_f64(0.25) * zabs(t.arg).ln() - T::from_f64(AIC)
    }
}

impl<T: BesselFloat> Expansion<T> for TurningForm<T> {
    type Params = Turning<T>;

    fn params(&self, fnu: T, with_sums: bool, lim: &Limits<T>) -> Turning<T> {
        Turning::new(self.zn, fnu, with_sums, lim.tol)
    }

    fn k_size(&self, t: &Turning<T>, fnu: T) -> (T, T) {
        let e = t.exponent(IkFlag::K, self.zb, fnu, self.scaled);
        (e.re, Self::log_prefactor(t))
    }

    fn k_member(&self, t: &Turning<T>, m: usize, fnu: T, lim: &Limits<T>) -> Result<Member<T>, Error> {
        // exp(-2πi/3)
        let cr2 = Complex::new(T::from_f64(-0.5), T::from_f64(-0.866_025_403_784_438_647));
        let arg = t.arg * cr2;
        let a = ai(arg, AiryDerivative::Value, Scaling::Exponential, lim)?.value;
        let da = ai(arg, AiryDerivative::Derivative, Scaling::Exponential, lim)?.value;
        let sum = mul_add(da * t.bsum, cr2, a * t.asum);
        let coef = self.k_coef * neg_i_pow(self.inu + m);
        Ok(Member {
            exponent: t.exponent(IkFlag::K, self.zb, fnu, self.scaled),
            log_prefactor: Self::log_prefactor(t),
            value: t.phi * sum * coef,
        })
    }

    fn i_member(&self, t: &Turning<T>, m: usize, fnu: T, lim: &Limits<T>) -> Result<Member<T>, Error> {
        let a = ai(t.arg, AiryDerivative::Value, Scaling::Exponential, lim)?.value;
        let da = ai(t.arg, AiryDerivative::Derivative, Scaling::Exponential, lim)?.value;
        // i^k = conj((-i)^k)
        let coef = self.i_coef * neg_i_pow::<T>(self.inu + m).conj();
        Ok(Member {
            exponent: t.exponent(IkFlag::I, self.zb, fnu, self.scaled),
            log_prefactor: Self::log_prefactor(t),
            value: t.phi * (a * t.asum + da * t.bsum) * coef,
        })
    }

    fn orient(&self, v: Complex<T>) -> Complex<T> {
        if self.upper { v } else { v.conj() }
    }
}

/// Expansions already computed for a few orders, keyed by order offset.
struct Memo<P> {
    slots: [Option<(usize, P)>; 3],
    next: usize,
}

impl<P: Copy> Memo<P> {
    fn new() -> Self {
        Self { slots: [None; 3], next: 0 }
    }

    fn get(&self, m: usize) -> Option<P> {
        self.slots.iter().flatten().find(|(k, _)| *k == m).map(|(_, p)| *p)
    }

    fn put(&mut self, m: usize, p: P) {
        self.slots[self.next] = Some((m, p));
        self.next = (self.next + 1) % self.slots.len();
    }
}

/// `K_{fnu+k}(z)` for large order. `mr = 0` requires `Re z >= 0`; otherwise
/// `mr = ±1` selects the direction of the continuation from `-z`.
///
/// Returns the number of members that underflowed.
pub(crate) fn large_order_k<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    mr: i32,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let zr = if z.re < T::zero() { -z } else { z };
    let scaled = scaling.is_scaled();
    let sgn = if mr > 0 { -T::from_f64(PI) } else { T::from_f64(PI) };
    if z.im.abs() > z.re.abs() * T::from_f64(1.7321) {
        let form = TurningForm::new(zr, fnu, scaled, sgn)?;
        run(&form, z, zr, fnu, scaled, mr, y, lim)
    } else {
        let form = DebyeForm { zr, scaled, csgn: sgn };
        run(&form, z, zr, fnu, scaled, mr, y, lim)
    }
}

#[allow(clippy::too_many_arguments)]
fn run<T: BesselFloat, E: Expansion<T>>(
    form: &E,
    z: Complex<T>,
    zr: Complex<T>,
    fnu: T,
    scaled: bool,
    mr: i32,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let zero = T::zero();
    let czero = Complex::new(zero, zero);
    let n = y.len();
    let levels = ScaleLevels::new(lim);
    let rz = two_over(zr);
    let mut memo = Memo::new();

    // K at zr: two consecutive members on scale start the forward recurrence
    let mut level = 1;
    let mut pending = false;
    let mut cy = [czero; 2];
    let mut nz = 0;
    let mut last = n - 1;
    for i in 0..n {
        let fnn = fnu + T::from_f64(i as f64);
        let p = form.params(fnn, true, lim);
        memo.put(i, p);
        let member = form.k_member(&p, i, fnn, lim)?;
        match scale_member(&member, &mut level, !pending, &levels, lim) {
            Scaled::Value(v) => {
                let v = form.orient(v);
                cy[pending as usize] = v;
                y[i] = v * levels.unscale[level];
                if pending {
                    last = i;
                    break;
                }
                pending = true;
            }
            Scaled::Overflow => return Err(Error::Overflow),
            Scaled::Underflow => {
                // the I term added for Re z < 0 would overflow
                if z.re < zero {
                    return Err(Error::Overflow);
                }
                pending = false;
                y[i] = czero;
                nz += 1;
                if i > 0 && y[i - 1] != czero {
                    y[i - 1] = czero;
                    nz += 1;
                }
            }
        }
    }

    if last + 1 < n {
        let fnn = fnu + T::from_f64((n - 1) as f64);
        let p = form.params(fnn, mr != 0, lim);
        if mr != 0 {
            memo.put(n - 1, p);
        }
        let (mut rs1, log_prefactor) = form.k_size(&p, fnn);
        let mut on_scale = rs1.abs() <= lim.elim;
        if on_scale && rs1.abs() >= lim.alim {
            rs1 = rs1 + log_prefactor;
            on_scale = rs1.abs() < lim.elim;
        }
        if !on_scale {
            if rs1 > zero || z.re < zero {
                return Err(Error::Overflow);
            }
            y.fill(czero);
            return Ok(n);
        }

        let mut ck = rz * (fnu + T::from_f64(last as f64));
        let (mut s1, mut s2) = (cy[0], cy[1]);
        let mut tracker = ScaleTracker::new(levels, level);
        for v in y.iter_mut().skip(last + 1) {
            let c2 = s2;
            s2 = mul_add(ck, c2, s1);
            s1 = c2;
            ck = ck + rz;
            *v = tracker.advance(&mut s1, &mut s2);
        }
    }
    if mr == 0 {
        return Ok(nz);
    }

    // continuation: add the I terms from the top order down
    let inu = order_int(fnu)?;
    let fnf = fnu - T::from_f64(inu as f64);
    let ang = fnf * if mr > 0 { -T::from_f64(PI) } else { T::from_f64(PI) };
    let mut cspn = Complex::new(ang.cos(), ang.sin());
    if (inu as usize + n - 1) % 2 == 1 {
        cspn = -cspn;
    }
    let asc = lim.ascle();
    let mut iuf = 0;
    let mut nz = 0;
    let mut level = 1;
    let mut pending = false;
    let mut cy = [czero; 2];
    let mut kk = n;
    let mut add = |k_val: Complex<T>, i_val: Complex<T>, nz: &mut usize, cspn: &mut Complex<T>| {
        let (mut s1, mut s2) = (k_val, i_val);
        if scaled {
            let t = continuation_underflow(zr, s1, s2, asc, lim.alim, &mut iuf);
            s1 = t.k_part;
            s2 = t.i_part;
            *nz += t.underflow as usize;
        }
        let sum = s1 * *cspn + s2;
        *cspn = -*cspn;
        sum
    };
    while kk > 0 {
        let m = kk - 1;
        let fnn = fnu + T::from_f64(m as f64);
        let p = match memo.get(m) {
            Some(p) => p,
            None => form.params(fnn, true, lim),
        };
        let member = form.i_member(&p, m, fnn, lim)?;
        let c2 = match scale_member(&member, &mut level, !pending, &levels, lim) {
            Scaled::Value(v) => form.orient(v),
            Scaled::Underflow => czero,
            Scaled::Overflow => return Err(Error::Overflow),
        };
        cy[pending as usize] = c2;
        y[m] = add(y[m], c2 * levels.unscale[level], &mut nz, &mut cspn);
        kk -= 1;
        if c2 == czero {
            pending = false;
            continue;
        }
        if pending {
            break;
        }
        pending = true;
    }
    if kk == 0 {
        return Ok(nz);
    }

    // backward recurrence for the rest of the I run
    let (mut s1, mut s2) = (cy[0], cy[1]);
    let mut tracker = ScaleTracker::new(levels, level);
    let mut fk = T::from_f64((inu as usize + kk) as f64);
    while kk > 0 {
        let c2 = s2;
        s2 = mul_add_scalar(rz * c2, fk + fnf, s1);
        s1 = c2;
        fk = fk - T::one();
        let i_val = tracker.advance(&mut s1, &mut s2);
        y[kk - 1] = add(y[kk - 1], i_val, &mut nz, &mut cspn);
        kk -= 1;
    }
    Ok(nz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn close(a: Complex64, b: Complex64, rel: f64) {
        assert!((a - b).norm() <= rel * b.norm(), "{a} vs {b}");
    }

    #[test]
    fn debye_form_matches_reference() {
        let mut y = [Complex64::new(0.0, 0.0); 1];
        let nz = large_order_k(Complex64::new(108.0, 36.0), 90.0, Scaling::Unscaled, 0, &mut y, &Limits::new())
            .unwrap();
        assert_eq!(nz, 0);
        close(y[0], Complex64::new(-1.1240518679700672e-34, -1.8122134406829613e-34), 1e-13);
    }

    #[test]
    fn forward_run_satisfies_recurrence() {
        let z = Complex64::new(60.0, 20.0);
        let fnu = 90.0;
        let mut y = [Complex64::new(0.0, 0.0); 5];
        large_order_k(z, fnu, Scaling::Exponential, 0, &mut y, &Limits::new()).unwrap();
        for k in 1..4 {
            let lhs = y[k + 1];
            let rhs = y[k - 1] + y[k] * (2.0 * (fnu + k as f64) / z);
            close(lhs, rhs, 1e-12);
        }
    }

    #[test]
    fn lower_half_plane_is_the_conjugate() {
        let lim = Limits::new();
        let z = Complex64::new(20.0, 70.0);
        let mut up = [Complex64::new(0.0, 0.0); 2];
        let mut down = [Complex64::new(0.0, 0.0); 2];
        large_order_k(z, 100.0, Scaling::Unscaled, 0, &mut up, &lim).unwrap();
        large_order_k(z.conj(), 100.0, Scaling::Unscaled, 0, &mut down, &lim).unwrap();
        for (a, b) in up.iter().zip(&down) {
            close(*b, a.conj(), 1e-13);
        }
    }

    #[test]
    fn forms_agree_across_the_sector_edge() {
        let lim = Limits::new();
        let zr = Complex64::new(30.0, 51.5);
        let mut a = [Complex64::new(0.0, 0.0); 2];
        let debye = DebyeForm { zr, scaled: false, csgn: 0.0 };
        run(&debye, zr, zr, 100.0, false, 0, &mut a, &lim).unwrap();
        let mut b = [Complex64::new(0.0, 0.0); 2];
        let turning = TurningForm::new(zr, 100.0, false, 0.0).unwrap();
        run(&turning, zr, zr, 100.0, false, 0, &mut b, &lim).unwrap();
        close(b[0], a[0], 1e-11);
        close(b[1], a[1], 1e-11);
    }
}
