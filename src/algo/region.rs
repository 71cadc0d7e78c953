//! Choice of method for `I_{fnu+k}(z)`, `Re z >= 0`, and the dispatcher
//! that runs it.

use num_complex::Complex;
use tracing::debug;

use crate::algo::asymptotic::large_argument;
use crate::algo::miller::miller;
use crate::algo::overflow::screen;
use crate::algo::series::power_series;
use crate::algo::uniform_i::large_order_i;
use crate::algo::wronskian::wronskian;
use crate::complex::zabs;
use crate::error::Error;
use crate::machine::{BesselFloat, Limits, order_int};
use crate::types::{IkFlag, Scaling};

/// Method for an I run, by `|z|` and the top order `dfnu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Region {
    /// `|z| <= 2` or `|z|²/4 <= dfnu + 1`.
    Series,
    /// `|z| >= rl` with `dfnu <= 1` or `2|z| >= dfnu²`.
    Asymptotic,
    /// Backward recurrence normalised by the Neumann series, `|z| <= rl`.
    Miller,
    /// Ratios normalised by the Wronskian with K, `rl < |z| <= fnul`.
    Wronskian,
    /// Uniform expansion in order, `dfnu > fnul` or `|z| > fnul`.
    UniformOrder,
}

/// Pure classification of `(|z|, dfnu)`.
pub(crate) fn classify<T: BesselFloat>(az: T, dfnu: T, lim: &Limits<T>) -> Region {
    let one = T::one();
    if az <= T::from_f64(2.0) || T::from_f64(0.25) * az * az <= dfnu + one {
        Region::Series
    } else {
        beyond_series(az, dfnu, lim)
    }
}

fn beyond_series<T: BesselFloat>(az: T, dfnu: T, lim: &Limits<T>) -> Region {
    if az >= lim.rl && (dfnu <= T::one() || az + az >= dfnu * dfnu) {
        Region::Asymptotic
    } else {
        by_order(az, dfnu, lim)
    }
}

fn by_order<T: BesselFloat>(az: T, dfnu: T, lim: &Limits<T>) -> Region {
    if dfnu > lim.fnul || az > lim.fnul {
        Region::UniformOrder
    } else if az > lim.rl {
        Region::Wronskian
    } else {
        Region::Miller
    }
}

/// `I_{fnu+k}(z)` for `Re z >= 0`, `k = 0..y.len()`.
///
/// Returns the number of trailing members set to zero by underflow.
pub(crate) fn binu<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<usize, Error> {
    let zero = T::zero();
    let one = T::one();
    let az = zabs(z);
    let top = |nn: usize| fnu + T::from_f64((nn - 1) as f64);
    let mut nz = 0;
    let mut nn = y.len();

    let mut region = classify(az, top(nn), lim);
    debug!(?region, fnu = ?fnu, az = ?az, n = nn, "I region");
    if region == Region::Series {
        let run = power_series(z, fnu, scaling, &mut y[..nn], lim)?;
        nz += run.nz;
        nn -= run.nz;
        if nn == 0 || run.complete {
            return Ok(nz);
        }
        region = beyond_series(az, top(nn), lim);
        debug!(?region, n = nn, "series stopped short");
    }
    if region == Region::Asymptotic {
        large_argument(z, fnu, scaling, &mut y[..nn], lim)?;
        return Ok(nz);
    }

    if top(nn) > one {
        let nw = screen(z, fnu, scaling, IkFlag::I, &mut y[..nn], lim)?;
        if nw > 0 {
            debug!(nw, "I members underflow");
        }
        nz += nw;
        nn -= nw;
        if nn == 0 {
            return Ok(nz);
        }
        region = by_order(az, top(nn), lim);
    }

    loop {
        match region {
            Region::UniformOrder => {
                let dfnu = top(nn);
                let nui = if dfnu < lim.fnul + one {
                    order_int((lim.fnul - dfnu).trunc() + one)? as usize
                } else {
                    0
                };
                let run = large_order_i(z, fnu, scaling, &mut y[..nn], nui, lim)?;
                nz += run.nz;
                if run.nlast == 0 {
                    return Ok(nz);
                }
                nn = run.nlast;
                region = if az > lim.rl { Region::Wronskian } else { Region::Miller };
            }
            Region::Wronskian => {
                // I underflows where K overflows; K underflow means I overflows
                let mut cw = [Complex::new(zero, zero); 2];
                match screen(z, fnu, scaling, IkFlag::K, &mut cw, lim) {
                    Err(Error::Overflow) => {
                        y[..nn].fill(Complex::new(zero, zero));
                        return Ok(nz + nn);
                    }
                    Err(e) => return Err(e),
                    Ok(0) => {}
                    Ok(_) => return Err(Error::Overflow),
                }
                wronskian(z, fnu, scaling, &mut y[..nn], lim)?;
                return Ok(nz);
            }
            _ => {
                miller(z, fnu, scaling, &mut y[..nn], lim.tol)?;
                return Ok(nz);
            }
        }
    }
}
