//! Scale tracking for recurrences and the underflow accounting built on it.
//!
//! A recurrence carries its values multiplied by one of three scale factors
//! (`1/tol`, `1`, `tol`). [`ScaleTracker`] holds the current level; the
//! functions below decide whether a scaled value is really zero once the
//! scale is removed, which is how the run's underflow count is formed.

use num_complex::Complex;

use crate::complex::{max_abs, mul_add, zabs, zexp};
use crate::machine::{BesselFloat, Limits};

/// Scale factors, their inverses and the magnitude bound of each level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScaleLevels<T> {
    /// Applied to values when they enter a level.
    pub scale: [T; 3],
    /// Removes the level's scale on output.
    pub unscale: [T; 3],
    /// A value above `bounds[k]` moves the recurrence to level `k + 1`.
    pub bounds: [T; 3],
}

impl<T: BesselFloat> ScaleLevels<T> {
    pub fn new(lim: &Limits<T>) -> Self {
        Self::with_top(lim, T::MACH_HUGE)
    }

    /// Levels whose last bound is `top` instead of the largest float.
    pub fn with_top(lim: &Limits<T>, top: T) -> Self {
        let one = T::one();
        let up = one / lim.tol;
        let low = lim.ascle();
        Self {
            scale: [up, one, lim.tol],
            unscale: [lim.tol, one, up],
            bounds: [low, one / low, top],
        }
    }

    /// Level whose range holds a value of magnitude `m`.
    #[inline]
    pub fn level_for(&self, m: T) -> usize {
        if m <= self.bounds[0] {
            0
        } else if m >= self.bounds[1] {
            2
        } else {
            1
        }
    }
}

/// Current level of a scaled recurrence.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScaleTracker<T> {
    pub levels: ScaleLevels<T>,
    pub level: usize,
}

impl<T: BesselFloat> ScaleTracker<T> {
    pub fn new(levels: ScaleLevels<T>, level: usize) -> Self {
        Self { levels, level }
    }

    #[inline]
    pub fn scale(&self) -> T {
        self.levels.scale[self.level]
    }

    #[inline]
    pub fn unscale(&self) -> T {
        self.levels.unscale[self.level]
    }

    #[inline]
    pub fn bound(&self) -> T {
        self.levels.bounds[self.level]
    }

    /// Returns `s2` with its scale removed.
    ///
    /// When that value has outgrown the current level the tracker moves up
    /// one level and `s1`, `s2` are re-expressed in the new scale.
    #[inline]
    pub fn advance(&mut self, s1: &mut Complex<T>, s2: &mut Complex<T>) -> Complex<T> {
        let out = *s2 * self.unscale();
        if self.level < 2 && max_abs(out) > self.bound() {
            self.raise(s1, s2, out);
        }
        out
    }

    /// Moves up one level; `s1` is rescaled and `s2` is rebuilt from the
    /// unscaled value `out`.
    #[inline]
    pub fn raise(&mut self, s1: &mut Complex<T>, s2: &mut Complex<T>, out: Complex<T>) {
        let old = self.unscale();
        self.level += 1;
        let sc = self.scale();
        *s1 = *s1 * old * sc;
        *s2 = out * sc;
    }
}

/// True when a value scaled up by `1/tol` would lose its smaller component
/// to underflow once scaled back.
#[inline]
pub(crate) fn underflows<T: BesselFloat>(y: Complex<T>, ascle: T, tol: T) -> bool {
    let wr = y.re.abs();
    let wi = y.im.abs();
    let small = wr.min(wi);
    if small > ascle {
        return false;
    }
    wr.max(wi) < small / tol
}

/// Removes the `exp(z)` scale from a run of K values computed with it,
/// zeroing members that underflow.
///
/// The recurrence is continued on the scaled values until two consecutive
/// members come back on scale. Returns the number of leading zeros.
pub(crate) fn unscale_k_run<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    y: &mut [Complex<T>],
    rz: Complex<T>,
    ascle: T,
    lim: &Limits<T>,
) -> usize {
    let zero = Complex::new(T::zero(), T::zero());
    let n = y.len();
    let elim = lim.elim;

    // Brings one scaled member back; None when it underflows.
    let restore = |s: Complex<T>, zd: Complex<T>| -> Option<Complex<T>> {
        let m = zabs(s);
        if -zd.re + m.ln() < -elim {
            return None;
        }
        let c = zexp(s.ln() - zd) / lim.tol;
        if underflows(c, ascle, lim.tol) { None } else { Some(c) }
    };

    let mut nz = 0;
    // last member (1-based) known to be on scale
    let mut on_scale = 0;
    let head = n.min(2);
    let mut saved = [zero; 2];
    for i in 0..head {
        saved[i] = y[i];
        match restore(y[i], z) {
            Some(v) => {
                y[i] = v;
                on_scale = i + 1;
            }
            None => {
                y[i] = zero;
                nz += 1;
            }
        }
    }
    if n == 1 {
        return nz;
    }
    if on_scale <= 1 {
        y[0] = zero;
        nz = 2;
    }
    if n == 2 || nz == 0 {
        return nz;
    }

    let mut ck = rz * (fnu + T::one());
    let mut s1 = saved[0];
    let mut s2 = saved[1];
    let helim = T::from_f64(0.5) * elim;
    let shrink = (-elim).exp();
    let mut zd = z;
    let mut settled = None;
    for i in 2..n {
        let prev = s2;
        s2 = mul_add(ck, prev, s1);
        s1 = prev;
        ck = ck + rz;
        y[i] = zero;
        if let Some(v) = restore(s2, zd) {
            y[i] = v;
            if on_scale == i {
                settled = Some(i + 1);
                break;
            }
            on_scale = i + 1;
            continue;
        }
        if zabs(s2).ln() >= helim {
            zd = zd - Complex::new(elim, T::zero());
            s1 = s1 * shrink;
            s2 = s2 * shrink;
        }
    }

    let nz = match settled {
        Some(kk) => kk - 2,
        None if on_scale == n => n - 1,
        None => n,
    };
    y[..nz].fill(zero);
    nz
}

/// Outcome of [`continuation_underflow`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct ContinuationTerms<T> {
    pub k_part: Complex<T>,
    pub i_part: Complex<T>,
    /// Both parts vanished.
    pub underflow: bool,
}

/// Rescales the K term of `K + I` continuation sums by `exp(-2z)` and tests
/// whether both terms are negligible.
///
/// `rescaled` counts consecutive successful rescales and is reset when the
/// pair underflows.
pub(crate) fn continuation_underflow<T: BesselFloat>(
    z: Complex<T>,
    k_part: Complex<T>,
    i_part: Complex<T>,
    ascle: T,
    alim: T,
    rescaled: &mut usize,
) -> ContinuationTerms<T> {
    let zero = T::zero();
    let czero = Complex::new(zero, zero);
    let mut k = k_part;
    let mut ak = zabs(k_part);
    let ai = zabs(i_part);
    if ak != zero {
        let aln = -z.re - z.re + ak.ln();
        k = czero;
        ak = zero;
        if aln >= -alim {
            k = zexp(k_part.ln() - (z + z));
            ak = zabs(k);
            *rescaled += 1;
        }
    }
    if ak.max(ai) > ascle {
        return ContinuationTerms { k_part: k, i_part, underflow: false };
    }
    *rescaled = 0;
    ContinuationTerms { k_part: czero, i_part: czero, underflow: true }
}

/// `c * w`, with `w` lifted by `1/tol` first when it sits near the underflow
/// limit so the product keeps its low-order bits.
#[inline]
pub(crate) fn guarded_mul<T: BesselFloat>(w: Complex<T>, c: Complex<T>, lim: &Limits<T>) -> Complex<T> {
    if max_abs(w) <= lim.ascle() {
        (w / lim.tol) * c * lim.tol
    } else {
        w * c
    }
}

/// Multiplies a run by a phase that advances between orders.
pub(crate) fn rotate_run<T, F>(y: &mut [Complex<T>], mut phase: Complex<T>, step: F, lim: &Limits<T>)
where
    T: BesselFloat,
    F: Fn(Complex<T>) -> Complex<T>,
{
    for v in y.iter_mut() {
        *v = guarded_mul(*v, phase, lim);
        phase = step(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn rotation_keeps_tiny_values() {
        let lim = Limits::<f64>::new();
        let mut y = [Complex64::new(3e-306, 1e-320), Complex64::new(2.0, 0.0)];
        rotate_run(&mut y, Complex64::new(0.0, 1.0), |c| -c, &lim);
        assert_eq!(y[0].re, -1e-320);
        assert!((y[0].im - 3e-306).abs() < 1e-320);
        assert_eq!(y[1], Complex64::new(0.0, -2.0));
    }

    #[test]
    fn tracker_moves_up_once_past_bound() {
        let lim = Limits::<f64>::new();
        let levels = ScaleLevels::new(&lim);
        let mut t = ScaleTracker::new(levels, 0);
        let mut s1 = Complex64::new(1.0, 0.0);
        let big = levels.bounds[0] * 4.0 / lim.tol;
        let mut s2 = Complex64::new(big, 0.0);
        let out = t.advance(&mut s1, &mut s2);
        assert_eq!(t.level, 1);
        assert!((out.re - big * lim.tol).abs() <= 1e-12 * out.re);
        // the pair is now held unscaled
        assert_eq!(s2, out);
        assert!((s1.re - lim.tol).abs() < 1e-30);
    }

    #[test]
    fn tracker_stays_below_bound() {
        let lim = Limits::<f64>::new();
        let mut t = ScaleTracker::new(ScaleLevels::new(&lim), 1);
        let mut s1 = Complex64::new(1.0, 1.0);
        let mut s2 = Complex64::new(2.0, -3.0);
        let out = t.advance(&mut s1, &mut s2);
        assert_eq!(t.level, 1);
        assert_eq!(out, Complex64::new(2.0, -3.0));
    }

    #[test]
    fn level_for_picks_the_band() {
        let lim = Limits::<f64>::new();
        let levels = ScaleLevels::new(&lim);
        assert_eq!(levels.level_for(1e-300), 0);
        assert_eq!(levels.level_for(1.0), 1);
        assert_eq!(levels.level_for(1e300), 2);
    }

    #[test]
    fn underflow_test_on_tiny_parts() {
        let tol = f64::EPSILON;
        let ascle = 1e-280;
        assert!(!underflows(Complex64::new(1.0, 1.0), ascle, tol));
        assert!(underflows(Complex64::new(1e-300, 1e-310), ascle, tol));
        // both parts tiny, the larger one below min/tol
        assert!(underflows(Complex64::new(1e-300, 1e-301), ascle, tol));
        // larger part dominates by more than 1/tol
        assert!(!underflows(Complex64::new(1e-290, 1e-306), ascle, tol));
    }

    #[test]
    fn continuation_zeroes_negligible_pairs() {
        let lim = Limits::<f64>::new();
        let mut count = 3;
        let z = Complex64::new(400.0, 1.0);
        let out = continuation_underflow(
            z,
            Complex64::new(1.0, 0.0),
            Complex64::new(1e-320, 0.0),
            lim.ascle(),
            lim.alim,
            &mut count,
        );
        assert!(out.underflow);
        assert_eq!(count, 0);
    }

    #[test]
    fn continuation_rescales_k_by_exp_minus_2z() {
        let lim = Limits::<f64>::new();
        let mut count = 0;
        let z = Complex64::new(1.0, 0.5);
        let k = Complex64::new(2.0, 1.0);
        let out = continuation_underflow(z, k, Complex64::new(1.0, 0.0), lim.ascle(), lim.alim, &mut count);
        let expected = k * (-(z + z)).exp();
        assert!(!out.underflow);
        assert_eq!(count, 1);
        assert!((out.k_part - expected).norm() < 1e-14);
    }

    #[test]
    fn unscale_k_run_restores_small_arguments() {
        let lim = Limits::<f64>::new();
        let z = Complex64::new(0.5, 0.0);
        // input carries the exp(z) scale, output comes back at level 0
        let k0 = 0.9244190712276659;
        let mut y = [Complex64::new(k0 * 0.5f64.exp(), 0.0)];
        let nz = unscale_k_run(z, 0.0, &mut y, crate::complex::two_over(z), lim.ascle(), &lim);
        assert_eq!(nz, 0);
        assert!((y[0].re * lim.tol - k0).abs() < 1e-14);
    }
}
