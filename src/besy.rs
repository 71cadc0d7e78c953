//! Y Bessel function driver.
//!
//! With `zn = -iz` rotated into the right half plane (`Im z >= 0`),
//! `Y_v(z) = i e^{iπv/2} I_v(zn) - (2/π) e^{-iπv/2} K_v(zn)`, and the lower
//! half plane follows by conjugation. I and K are formed in fixed stack
//! buffers, one block of orders at a time, so the driver needs no allocation.

use num_complex::Complex;
use tracing::{debug, warn};

use crate::algo::constants::HPI;
use crate::algo::scaling::guarded_mul;
use crate::besi::zbesi;
use crate::besk::zbesk;
use crate::complex::{mul_i, mul_neg_i};
use crate::error::Error;
use crate::machine::{order_int, BesselFloat, Limits};
use crate::types::{Accuracy, Scaling};

/// Orders per block of the I and K runs.
const BLOCK: usize = 16;

/// Compute `Y_{fnu+j}(z)` for `j = 0, 1, ..., n-1` into `y`.
///
/// # Parameters
/// - `z`: complex argument, `z != 0`
/// - `fnu`: starting order, `fnu >= 0`
/// - `scaling`: `Exponential` returns `exp(-|Im z|) Y(z)`
/// - `y`: output slice of length `n >= 1`
///
/// # Returns
/// `(nz, status)`: `nz` members underflowed to zero.
///
/// # Errors
/// As for the I and K functions of `-iz`.
pub(crate) fn zbesy<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    let zero = T::zero();
    let czero = Complex::new(zero, zero);
    if y.is_empty() || !(fnu >= zero) || z == czero {
        return Err(Error::InvalidInput);
    }
    let n = y.len();
    let lim = Limits::new();
    let zn = Complex::new(z.im.abs(), -z.re);

    // csgn = i exp(iπ fnu/2), cspn = (2/π) exp(-iπ fnu/2)
    let ifnu = order_int(fnu)?;
    let arg = (fnu - T::from_f64(ifnu as f64)) * T::from_f64(HPI);
    let mut csgn = Complex::new(arg.cos(), arg.sin());
    csgn = match ifnu % 4 {
        0 => csgn,
        1 => mul_i(csgn),
        2 => -csgn,
        _ => mul_neg_i(csgn),
    };
    let mut cspn = csgn.conj() * (T::one() / T::from_f64(HPI));
    csgn = mul_i(csgn);
    let ey = match scaling {
        Scaling::Unscaled => None,
        Scaling::Exponential => {
            // brings exp(zn) K to exp(-|Im z|) K
            let tay = (z.im + z.im).abs();
            let ey = if tay < lim.elim { (-tay).exp() } else { zero };
            cspn = cspn * Complex::new(z.re.cos(), z.re.sin()) * ey;
            Some(ey)
        }
    };

    let mut nz = 0;
    let mut status = Accuracy::Normal;
    let mut ib = [czero; BLOCK];
    let mut kb = [czero; BLOCK];
    for (b, block) in y.chunks_mut(BLOCK).enumerate() {
        let order = fnu + T::from_f64((b * BLOCK) as f64);
        let m = block.len();
        let (nz1, s1) = zbesi(zn, order, scaling, &mut ib[..m])?;
        let (nz2, s2) = zbesk(zn, order, scaling, &mut kb[..m]).inspect_err(|e| {
            warn!(fnu = ?fnu, n, error = %e, "Y: K of -iz failed");
        })?;
        if s1 == Accuracy::Reduced || s2 == Accuracy::Reduced {
            status = Accuracy::Reduced;
        }
        match ey {
            None => {
                for (v, (i, k)) in block.iter_mut().zip(ib.iter().zip(kb.iter())) {
                    *v = csgn * *i - cspn * *k;
                    csgn = mul_i(csgn);
                    cspn = mul_neg_i(cspn);
                }
                nz += nz1.min(nz2);
            }
            Some(ey) => {
                for (v, (i, k)) in block.iter_mut().zip(ib.iter().zip(kb.iter())) {
                    *v = guarded_mul(*i, csgn, &lim) - guarded_mul(*k, cspn, &lim);
                    if *v == czero && ey == zero {
                        nz += 1;
                    }
                    csgn = mul_i(csgn);
                    cspn = mul_neg_i(cspn);
                }
            }
        }
    }
    if z.im < zero {
        for v in y.iter_mut() {
            *v = v.conj();
        }
    }
    if nz > 0 {
        debug!(nz, "Y: members underflow");
    }
    Ok((nz, status))
}
