//! Complex Bessel, Hankel and Airy functions of real order, in pure Rust.
//!
//! The evaluation engine follows Amos' algorithm (ACM TOMS 644): the
//! argument is rotated into the right half plane, a method is chosen from
//! `|z|` and the order (power series, large-argument expansion, Miller
//! recurrence, Wronskian normalisation, uniform expansions in order), and
//! a run of consecutive orders is filled by recurrence under a three-level
//! scale so intermediate values stay representable.
//!
//! Three layers of entry points:
//!
//! - single values: [`besselj`], [`besselk_scaled`], [`airy`], ... Negative
//!   orders are accepted and handled by reflection.
//! - runs of orders `nu, nu+1, ..., nu+n-1`: [`besselj_seq`] and friends
//!   (feature `alloc`) or the slice-filling [`besselj_into`] and friends.
//! - the integer status convention in [`contract`].
//!
//! ```
//! use num_complex::Complex64;
//!
//! let j0 = zbessel::besselj(0.0, Complex64::new(1.0, 0.0)).unwrap();
//! assert!((j0.re - 0.7651976865579666).abs() < 1e-14);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;

pub mod contract;
pub mod machine;
pub mod types;

mod airy;
mod algo;
mod besh;
mod besi;
mod besj;
mod besk;
mod besy;
mod complex;
mod error;

pub use error::Error;
pub use machine::BesselFloat;
#[cfg(feature = "alloc")]
pub use types::BesselResult;
pub use types::{Accuracy, AiryDerivative, AiryResult, HankelKind, Scaling};

use num_complex::Complex;

use crate::algo::constants::PI;
use crate::complex::{cospi, sinpi, zexp};

// ── Runs of orders into caller storage ──

/// `J_{nu+j}(z)`, `j = 0..y.len()`, into `y`. Returns `(nz, status)`.
pub fn besselj_into<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    besj::zbesj(z, nu, scaling, y)
}

/// `Y_{nu+j}(z)` into `y`.
pub fn bessely_into<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    besy::zbesy(z, nu, scaling, y)
}

/// `I_{nu+j}(z)` into `y`.
pub fn besseli_into<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    besi::zbesi(z, nu, scaling, y)
}

/// `K_{nu+j}(z)` into `y`.
pub fn besselk_into<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    besk::zbesk(z, nu, scaling, y)
}

/// `H^(kind)_{nu+j}(z)` into `y`.
pub fn hankel_into<T: BesselFloat>(
    kind: HankelKind,
    nu: T,
    z: Complex<T>,
    scaling: Scaling,
    y: &mut [Complex<T>],
) -> Result<(usize, Accuracy), Error> {
    besh::zbesh(z, nu, kind, scaling, y)
}

// ── Runs of orders, owned ──

#[cfg(feature = "alloc")]
fn seq<T: BesselFloat>(
    n: usize,
    fill: impl FnOnce(&mut [Complex<T>]) -> Result<(usize, Accuracy), Error>,
) -> Result<BesselResult<T>, Error> {
    let mut values = vec![Complex::new(T::zero(), T::zero()); n];
    let (underflow_count, status) = fill(&mut values)?;
    Ok(BesselResult { values, underflow_count, status })
}

/// Compute `J_{nu+j}(z)` for `j = 0, 1, ..., n-1`.
#[cfg(feature = "alloc")]
pub fn besselj_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    seq(n, |y| besj::zbesj(z, nu, scaling, y))
}

/// Compute `Y_{nu+j}(z)` for `j = 0, 1, ..., n-1`.
#[cfg(feature = "alloc")]
pub fn bessely_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    seq(n, |y| besy::zbesy(z, nu, scaling, y))
}

/// Compute `I_{nu+j}(z)` for `j = 0, 1, ..., n-1`.
#[cfg(feature = "alloc")]
pub fn besseli_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    seq(n, |y| besi::zbesi(z, nu, scaling, y))
}

/// Compute `K_{nu+j}(z)` for `j = 0, 1, ..., n-1`.
#[cfg(feature = "alloc")]
pub fn besselk_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    seq(n, |y| besk::zbesk(z, nu, scaling, y))
}

/// Compute `H^(1)_{nu+j}(z)` for `j = 0, 1, ..., n-1`.
#[cfg(feature = "alloc")]
pub fn hankel1_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    seq(n, |y| besh::zbesh(z, nu, HankelKind::First, scaling, y))
}

/// Compute `H^(2)_{nu+j}(z)` for `j = 0, 1, ..., n-1`.
#[cfg(feature = "alloc")]
pub fn hankel2_seq<T: BesselFloat>(
    nu: T,
    z: Complex<T>,
    n: usize,
    scaling: Scaling,
) -> Result<BesselResult<T>, Error> {
    seq(n, |y| besh::zbesh(z, nu, HankelKind::Second, scaling, y))
}

// ── Single values, any real order ──

type Driver<T> = fn(Complex<T>, T, Scaling, &mut [Complex<T>]) -> Result<(usize, Accuracy), Error>;

fn single<T: BesselFloat>(f: Driver<T>, nu: T, z: Complex<T>, scaling: Scaling) -> Result<Complex<T>, Error> {
    let mut y = [Complex::new(T::zero(), T::zero())];
    f(z, nu, scaling, &mut y)?;
    Ok(y[0])
}

fn hankel_single<T: BesselFloat>(kind: HankelKind, nu: T, z: Complex<T>, scaling: Scaling) -> Result<Complex<T>, Error> {
    let mut y = [Complex::new(T::zero(), T::zero())];
    besh::zbesh(z, nu, kind, scaling, &mut y)?;
    Ok(y[0])
}

/// `a f(v) + b g(v)`, skipping a term whose weight is exactly zero.
fn combine<T: BesselFloat>(
    a: T,
    f: impl FnOnce() -> Result<Complex<T>, Error>,
    b: Complex<T>,
    g: impl FnOnce() -> Result<Complex<T>, Error>,
) -> Result<Complex<T>, Error> {
    let zero = T::zero();
    let mut out = Complex::new(zero, zero);
    if a != zero {
        out = out + f()? * a;
    }
    if b != Complex::new(zero, zero) {
        out = out + g()? * b;
    }
    Ok(out)
}

/// `J_{-v} = cos(vπ) J_v - sin(vπ) Y_v`.
fn j_any<T: BesselFloat>(nu: T, z: Complex<T>, scaling: Scaling) -> Result<Complex<T>, Error> {
    if nu >= T::zero() {
        return single(besj::zbesj, nu, z, scaling);
    }
    let v = -nu;
    combine(
        cospi(v),
        || single(besj::zbesj, v, z, scaling),
        Complex::new(-sinpi(v), T::zero()),
        || single(besy::zbesy, v, z, scaling),
    )
}

/// `Y_{-v} = sin(vπ) J_v + cos(vπ) Y_v`.
fn y_any<T: BesselFloat>(nu: T, z: Complex<T>, scaling: Scaling) -> Result<Complex<T>, Error> {
    if nu >= T::zero() {
        return single(besy::zbesy, nu, z, scaling);
    }
    let v = -nu;
    combine(
        sinpi(v),
        || single(besj::zbesj, v, z, scaling),
        Complex::new(cospi(v), T::zero()),
        || single(besy::zbesy, v, z, scaling),
    )
}

/// `I_{-v} = I_v + (2/π) sin(vπ) K_v`; the K term is brought to the I
/// scale by `exp(-|Re z| - z)` when scaled.
fn i_any<T: BesselFloat>(nu: T, z: Complex<T>, scaling: Scaling) -> Result<Complex<T>, Error> {
    if nu >= T::zero() {
        return single(besi::zbesi, nu, z, scaling);
    }
    let v = -nu;
    let mut w = Complex::new(T::from_f64(2.0 / PI) * sinpi(v), T::zero());
    if scaling.is_scaled() && w.re != T::zero() {
        w = w * zexp(Complex::new(-z.re.abs() - z.re, -z.im));
    }
    combine(
        T::one(),
        || single(besi::zbesi, v, z, scaling),
        w,
        || single(besk::zbesk, v, z, scaling),
    )
}

/// `H1_{-v} = exp(ivπ) H1_v`, `H2_{-v} = exp(-ivπ) H2_v`.
fn hankel_any<T: BesselFloat>(kind: HankelKind, nu: T, z: Complex<T>, scaling: Scaling) -> Result<Complex<T>, Error> {
    if nu >= T::zero() {
        return hankel_single(kind, nu, z, scaling);
    }
    let v = -nu;
    let s = match kind {
        HankelKind::First => sinpi(v),
        HankelKind::Second => -sinpi(v),
    };
    Ok(hankel_single(kind, v, z, scaling)? * Complex::new(cospi(v), s))
}

/// Bessel function of the first kind, `J_nu(z)`.
pub fn besselj<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    j_any(nu, z, Scaling::Unscaled)
}

/// `exp(-|Im z|) J_nu(z)`.
pub fn besselj_scaled<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    j_any(nu, z, Scaling::Exponential)
}

/// Bessel function of the second kind, `Y_nu(z)`.
pub fn bessely<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    y_any(nu, z, Scaling::Unscaled)
}

/// `exp(-|Im z|) Y_nu(z)`.
pub fn bessely_scaled<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    y_any(nu, z, Scaling::Exponential)
}

/// Modified Bessel function of the first kind, `I_nu(z)`.
pub fn besseli<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    i_any(nu, z, Scaling::Unscaled)
}

/// `exp(-|Re z|) I_nu(z)`.
pub fn besseli_scaled<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    i_any(nu, z, Scaling::Exponential)
}

/// Modified Bessel function of the second kind, `K_nu(z)`. `K_{-nu} = K_nu`.
pub fn besselk<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    single(besk::zbesk, nu.abs(), z, Scaling::Unscaled)
}

/// `exp(z) K_nu(z)`.
pub fn besselk_scaled<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    single(besk::zbesk, nu.abs(), z, Scaling::Exponential)
}

/// Hankel function of the first kind, `H^(1)_nu(z)`.
pub fn hankel1<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    hankel_any(HankelKind::First, nu, z, Scaling::Unscaled)
}

/// `exp(-iz) H^(1)_nu(z)`.
pub fn hankel1_scaled<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    hankel_any(HankelKind::First, nu, z, Scaling::Exponential)
}

/// Hankel function of the second kind, `H^(2)_nu(z)`.
pub fn hankel2<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    hankel_any(HankelKind::Second, nu, z, Scaling::Unscaled)
}

/// `exp(iz) H^(2)_nu(z)`.
pub fn hankel2_scaled<T: BesselFloat>(nu: T, z: Complex<T>) -> Result<Complex<T>, Error> {
    hankel_any(HankelKind::Second, nu, z, Scaling::Exponential)
}

// ── Airy ──

/// `Ai(z)` or `Ai'(z)` with the underflow flag and accuracy status.
pub fn airy_raw<T: BesselFloat>(
    z: Complex<T>,
    deriv: AiryDerivative,
    scaling: Scaling,
) -> Result<AiryResult<T>, Error> {
    airy::zairy(z, deriv, scaling)
}

/// `Bi(z)` or `Bi'(z)` with the accuracy status.
pub fn biry_raw<T: BesselFloat>(
    z: Complex<T>,
    deriv: AiryDerivative,
    scaling: Scaling,
) -> Result<AiryResult<T>, Error> {
    airy::zbiry(z, deriv, scaling)
}

/// Airy function `Ai(z)`.
pub fn airy<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zairy(z, AiryDerivative::Value, Scaling::Unscaled)?.value)
}

/// `Ai'(z)`.
pub fn airyprime<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zairy(z, AiryDerivative::Derivative, Scaling::Unscaled)?.value)
}

/// `exp(ζ) Ai(z)`, `ζ = (2/3) z^{3/2}`.
pub fn airy_scaled<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zairy(z, AiryDerivative::Value, Scaling::Exponential)?.value)
}

/// `exp(ζ) Ai'(z)`.
pub fn airyprime_scaled<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zairy(z, AiryDerivative::Derivative, Scaling::Exponential)?.value)
}

/// Airy function of the second kind, `Bi(z)`.
pub fn biry<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zbiry(z, AiryDerivative::Value, Scaling::Unscaled)?.value)
}

/// `Bi'(z)`.
pub fn biryprime<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zbiry(z, AiryDerivative::Derivative, Scaling::Unscaled)?.value)
}

/// `exp(-|Re ζ|) Bi(z)`.
pub fn biry_scaled<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zbiry(z, AiryDerivative::Value, Scaling::Exponential)?.value)
}

/// `exp(-|Re ζ|) Bi'(z)`.
pub fn biryprime_scaled<T: BesselFloat>(z: Complex<T>) -> Result<Complex<T>, Error> {
    Ok(airy::zbiry(z, AiryDerivative::Derivative, Scaling::Exponential)?.value)
}
