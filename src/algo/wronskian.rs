//! `I_{fnu+k}(z)` for `Re z >= 0` from ratios normalised by the Wronskian
//! `I_v K_{v+1} + I_{v+1} K_v = 1/z`.

use num_complex::Complex;

use crate::algo::knu::knu;
use crate::algo::ratios::ratios;
use crate::algo::scaling::ScaleLevels;
use crate::complex::zabs;
use crate::error::Error;
use crate::machine::{BesselFloat, Limits};
use crate::types::Scaling;

pub(crate) fn wronskian<T: BesselFloat>(
    z: Complex<T>,
    fnu: T,
    scaling: Scaling,
    y: &mut [Complex<T>],
    lim: &Limits<T>,
) -> Result<(), Error> {
    let zero = T::zero();
    let one = T::one();
    let mut cw = [Complex::new(zero, zero); 2];
    // the caller has checked that K is on scale, so any underflow here is fatal
    if knu(z, fnu, scaling, &mut cw, lim)? != 0 {
        return Err(Error::Overflow);
    }
    ratios(z, fnu, y, lim.tol)?;

    // K can sit near either exponent limit; keep the normalisation on scale
    let levels = ScaleLevels::new(lim);
    let sc = levels.scale[levels.level_for(zabs(cw[1]))];
    let c1 = cw[0] * sc;
    let c2 = cw[1] * sc;

    // I_v = 1 / (z (K_{v+1} + r_v K_v)), divided without squaring |ct|
    let mut cinu = if scaling.is_scaled() {
        Complex::new(z.im.cos(), z.im.sin())
    } else {
        Complex::new(one, zero)
    };
    let ct = z * (y[0] * c1 + c2);
    let ract = one / zabs(ct);
    cinu = (cinu * ract) * (ct.conj() * ract);

    let mut ratio = y[0];
    y[0] = cinu * sc;
    for v in y.iter_mut().skip(1) {
        cinu = ratio * cinu;
        ratio = *v;
        *v = cinu * sc;
    }
    Ok(())
}
