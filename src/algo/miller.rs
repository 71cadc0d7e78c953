//! Miller backward recurrence for `I_{fnu+k}(z)`, `Re z >= 0`.
//!
//! The start index is chosen from two truncation tests (one for the
//! normalising sum, one for the ratios). The unnormalised run is scaled by
//! the Neumann series `sum_k (2(v+k) Γ(2v+k)/k!) I_{v+k}(z) = (z/2)^v e^z / Γ(v+1)`.

use num_complex::Complex;

use crate::algo::gamln::gamln;
use crate::complex::{mul_add, mul_add_scalar, two_over, zabs, zexp};
use crate::error::Error;
use crate::machine::{BesselFloat, order_int};
use crate::types::Scaling;

/// Iterations allowed for each start-index test.
const MAX_PROBE: i32 = 80;

pub(crate) fn miller<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    tol: T,
) -> Result<(), Error> {
    let zero = T::zero();
    let one = T::one();
    let czero = Complex::new(zero, zero);
    let cone = Complex::new(one, zero);
    let n = y.len();

    let az = zabs(z);
    let iaz = order_int(az)?;
    let ifnu = order_int(fnu)?;
    let inu = ifnu + n as i32 - 1;
    let raz = one / az;
    let rz = two_over(z);

    // series truncation index
    let at = T::from_f64(iaz as f64) + one;
    let mut ck = z.conj() * (at * raz * raz);
    let ack = (at + one) * raz;
    let rho = ack + (ack * ack - one).sqrt();
    let rho2 = rho * rho;
    let tst = (rho2 + rho2) / ((rho2 - one) * (rho - one)) / tol;
    let (mut p1, mut p2) = (czero, cone);
    let mut ak = at;
    let mut series_index = None;
    for i in 1..=MAX_PROBE {
        let pt = p2;
        p2 = mul_add(-ck, pt, p1);
        p1 = pt;
        ck = ck + rz;
        if zabs(p2) > tst * ak * ak {
            series_index = Some(i + 1);
            break;
        }
        ak = ak + one;
    }
    let Some(i_series) = series_index else {
        return Err(Error::ConvergenceFailure);
    };

    // ratio truncation index, only needed when the top order passes |z|
    let mut k_ratio = 0;
    if inu >= iaz {
        let at = T::from_f64(inu as f64) + one;
        let mut ck = z.conj() * (at * raz * raz);
        let mut tst = (at * raz / tol).sqrt();
        let (mut p1, mut p2) = (czero, cone);
        let mut refined = false;
        let mut found = None;
        for k in 1..=MAX_PROBE {
            let pt = p2;
            p2 = mul_add(-ck, pt, p1);
            p1 = pt;
            ck = ck + rz;
            let ap = zabs(p2);
            if ap < tst {
                continue;
            }
            if refined {
                found = Some(k);
                break;
            }
            let ack = zabs(ck);
            let flam = ack + (ack * ack - one).sqrt();
            let fkap = ap / zabs(p1);
            let rho = flam.min(fkap);
            tst = tst * (rho / (rho * rho - one)).sqrt();
            refined = true;
        }
        k_ratio = found.ok_or(Error::ConvergenceFailure)?;
    }

    // backward recurrence from kk, accumulating the Neumann sum
    let kk = (i_series + iaz).max(k_ratio + 1 + inu);
    let mut fkk = T::from_f64(kk as f64);
    let fnf = fnu - T::from_f64(ifnu as f64);
    let tfnf = fnf + fnf;
    let mut bk = zexp(Complex::new(
        gamln(fkk + tfnf + one)? - gamln(fkk + one)? - gamln(tfnf + one)?,
        zero,
    ))
    .re;
    let mut p1 = czero;
    let mut p2 = Complex::new(T::MACH_TINY / tol, zero);
    let mut sum = czero;
    let mut step = |p1: &mut Complex<T>, p2: &mut Complex<T>, sum: &mut Complex<T>| {
        let pt = *p2;
        *p2 = mul_add_scalar(rz * pt, fkk + fnf, *p1);
        *p1 = pt;
        let next = bk * (one - tfnf / (fkk + tfnf));
        *sum = mul_add_scalar(*p1, next + bk, *sum);
        bk = next;
        fkk = fkk - one;
    };

    for _ in 0..(kk - inu) {
        step(&mut p1, &mut p2, &mut sum);
    }
    y[n - 1] = p2;
    for m in (0..n - 1).rev() {
        step(&mut p1, &mut p2, &mut sum);
        y[m] = p2;
    }
    for _ in 0..ifnu {
        step(&mut p1, &mut p2, &mut sum);
    }

    // exp(z) (z/2)^fnf / Γ(1+fnf), divided by the sum without squaring it
    let growth = if scaling.is_scaled() { Complex::new(zero, z.im) } else { z };
    let mut lead = growth - rz.ln() * fnf;
    lead.re = lead.re - gamln(one + fnf)?;
    let total = p2 + sum;
    let inv = one / zabs(total);
    let norm = zexp(lead) * inv * (total.conj() * inv);
    for v in y.iter_mut() {
        *v = *v * norm;
    }
    Ok(())
}
