//! Ratios `I_{fnu+k+1}(z) / I_{fnu+k}(z)` by backward recurrence.
//!
//! The start index follows Sookne's test (J. Res. NBS 77B, 1973): recur
//! forward from `max(|z|, fnu)` until the recessive solution is resolved to
//! `tol`, then recur back down normalising as a continued fraction.

#![allow(clippy::excessive_precision)]

use num_complex::Complex;

use crate::complex::{mul_add, two_over, zabs, zdiv};
use crate::error::Error;
use crate::machine::{BesselFloat, order_int};

/// sqrt(2)
const RT2: f64 = 1.41421356237309505;

/// Steps allowed beyond the start order before giving up.
const MAX_STEPS: usize = 50_000;

/// Writes `cy[k] = I_{fnu+k+1}(z) / I_{fnu+k}(z)` for `k = 0..cy.len()`.
pub(crate) fn ratios<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    cy: &mut [Complex<T>],
    tol: T,
) -> Result<(), Error> {
    let zero = T::zero();
    let one = T::one();
    let n = cy.len();

    let az = zabs(z);
    let idnu = order_int(fnu)? + n as i32 - 1;
    let magz = order_int(az)?;
    let fnup = T::from_f64((magz + 1) as f64).max(T::from_f64(idnu as f64));
    let id = (idnu - magz - 1).min(0);
    let rz = two_over(z);

    // forward pass from p1 = 1, so no normalisation of the pair is needed
    let mut t1 = rz * fnup;
    let mut p2 = -t1;
    let mut p1 = Complex::new(one, zero);
    t1 = t1 + rz;
    let mut ap2 = zabs(p2);
    let test1 = ((ap2 + ap2) / tol).sqrt();
    let mut test = test1;
    let mut refined = false;
    let mut k: i32 = 1;
    let mut steps = 0;
    loop {
        k += 1;
        steps += 1;
        if steps > MAX_STEPS {
            return Err(Error::ConvergenceFailure);
        }
        let ap1 = ap2;
        let pt = p2;
        p2 = mul_add(-t1, pt, p1);
        p1 = pt;
        t1 = t1 + rz;
        ap2 = zabs(p2);
        if ap1 <= test {
            continue;
        }
        if refined {
            break;
        }
        // sharpen the test with the growth rate now visible
        let ak = zabs(t1) * T::from_f64(0.5);
        let flam = ak + (ak * ak - one).sqrt();
        let rho = (ap2 / ap1).min(flam);
        test = test1 * (rho / (rho * rho - one)).sqrt();
        refined = true;
    }

    let kk = (k + 1 - id) as usize;
    let dfnu = fnu + T::from_f64((n - 1) as f64);
    let mut p1 = Complex::new(one / ap2, zero);
    let mut p2 = Complex::new(zero, zero);
    let mut t = T::from_f64(kk as f64);
    for _ in 0..kk {
        let pt = p1;
        p1 = mul_add(pt, rz * (dfnu + t), p2);
        p2 = pt;
        t = t - one;
    }
    if p1.re == zero && p1.im == zero {
        p1 = Complex::new(tol, tol);
    }
    cy[n - 1] = zdiv(p2, p1);

    let cdfnu = rz * fnu;
    for k in (0..n - 1).rev() {
        let mut pt = cdfnu + rz * T::from_f64((k + 1) as f64) + cy[k + 1];
        let mut ak = zabs(pt);
        if ak == zero {
            pt = Complex::new(tol, tol);
            ak = tol * T::from_f64(RT2);
        }
        let rak = one / ak;
        cy[k] = Complex::new(rak * pt.re * rak, -rak * pt.im * rak);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn real_argument_ratios() {
        // I_1(2)/I_0(2) and I_2(2)/I_1(2)
        let mut cy = [Complex64::new(0.0, 0.0); 2];
        ratios(Complex64::new(2.0, 0.0), 0.0, &mut cy, f64::EPSILON).unwrap();
        assert_relative_eq!(cy[0].re, 1.590636854637329 / 2.2795853023360673, max_relative = 1e-14);
        assert_relative_eq!(cy[1].re, 0.6889484476987382 / 1.590636854637329, max_relative = 1e-14);
        assert!(cy[0].im.abs() < 1e-15);
    }

    #[test]
    fn ratios_satisfy_the_recurrence() {
        // r_{k-1} = 1 / (2(v+k)/z + r_k)
        let z = Complex64::new(3.0, -4.5);
        let fnu = 0.3;
        let mut cy = [Complex64::new(0.0, 0.0); 4];
        ratios(z, fnu, &mut cy, f64::EPSILON).unwrap();
        for k in 1..4 {
            let v = fnu + k as f64;
            let expected = 1.0 / (2.0 * v / z + cy[k]);
            assert!((cy[k - 1] - expected).norm() < 1e-14 * expected.norm());
        }
    }
}
