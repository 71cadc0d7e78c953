//! Numeric constants shared by several kernels.

#![allow(clippy::excessive_precision)]
#![allow(clippy::approx_constant)]

pub(crate) const PI: f64 = 3.14159265358979324e+00;
pub(crate) const HPI: f64 = 1.57079632679489662e+00;
/// 3π/2
pub(crate) const THPI: f64 = 4.71238898038468986e+00;
/// log10(2)
pub(crate) const R1M5: f64 = 0.30102999566398120;
pub(crate) const TTH: f64 = 6.66666666666666667e-01;
/// sqrt(π/2)
pub(crate) const RTHPI: f64 = 1.25331413731550025e+00;
/// 1/sqrt(2π)
pub(crate) const RSQ2PI: f64 = 3.98942280401432678e-01;
/// ln(2 sqrt(π))
pub(crate) const AIC: f64 = 1.26551212348464539e+00;
