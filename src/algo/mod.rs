//! Numerical kernels behind the drivers.
//!
//! Kernels fill a slice with a run of consecutive orders and return
//! `Result<usize, Error>`, the `usize` counting members set to zero by
//! underflow. Which end of the run those members sit at depends on the
//! function: the top of an I run, the bottom of a K run.
//!
//! Every kernel takes a [`Limits`](crate::machine::Limits) for the
//! precision-dependent thresholds.
//!
//! Coefficient tables are written at full precision, hence the
//! `clippy::excessive_precision` allowances in several modules.

pub(crate) mod constants;
pub(crate) mod gamln;
pub(crate) mod scaling;

// I in the right half plane
pub(crate) mod asymptotic;
pub(crate) mod miller;
pub(crate) mod ratios;
pub(crate) mod region;
pub(crate) mod series;
pub(crate) mod wronskian;

// K in the right half plane and its continuation
pub(crate) mod continuation;
pub(crate) mod knu;

// uniform expansions in order
pub(crate) mod debye;
pub(crate) mod overflow;
pub(crate) mod turning;
pub(crate) mod uniform_i;
pub(crate) mod uniform_k;
