//! Integer status calling convention.
//!
//! Each entry takes the mode selectors as integers (`kode` 1 unscaled or
//! 2 scaled, `m` 1 or 2, `id` 0 or 1) and the run length as a signed count,
//! fills the caller's buffer and reports a [`Status`] instead of a `Result`.
//! This is the shape a foreign-function layer would wrap.
//!
//! Status codes: 0 ok, 1 invalid input, 2 overflow, 3 values valid but
//! more than half the digits may be lost, 4 total loss of significance,
//! 5 convergence failure.

use num_complex::Complex;

use crate::error::Error;
use crate::machine::BesselFloat;
use crate::types::{Accuracy, AiryDerivative, AiryResult, HankelKind, Scaling};
use crate::{airy, besh, besi, besj, besk, besy};

/// Underflow count and status code of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    pub nz: usize,
    pub ierr: i32,
}

impl Status {
    /// Code for values returned with reduced accuracy.
    pub const REDUCED: i32 = 3;

    fn from_run(r: Result<(usize, Accuracy), Error>) -> Self {
        match r {
            Ok((nz, Accuracy::Normal)) => Status { nz, ierr: 0 },
            Ok((nz, Accuracy::Reduced)) => Status { nz, ierr: Self::REDUCED },
            Err(e) => Status { nz: 0, ierr: e.code() },
        }
    }

    fn invalid() -> Self {
        Status { nz: 0, ierr: Error::InvalidInput.code() }
    }

    pub fn is_ok(&self) -> bool {
        self.ierr == 0
    }
}

type Run<T> = fn(Complex<T>, T, Scaling, &mut [Complex<T>]) -> Result<(usize, Accuracy), Error>;

/// Decodes `kode` and `n`, then runs the driver on the first `n` slots.
fn run<T: BesselFloat>(f: Run<T>, z: Complex<T>, fnu: T, kode: i32, n: i32, cy: &mut [Complex<T>]) -> Status {
    let Ok(scaling) = Scaling::from_kode(kode) else {
        return Status::invalid();
    };
    let Ok(n) = usize::try_from(n) else {
        return Status::invalid();
    };
    if n == 0 || n > cy.len() {
        return Status::invalid();
    }
    Status::from_run(f(z, fnu, scaling, &mut cy[..n]))
}

/// `J_{fnu+k}(z)`, `k = 0..n`, into `cy`.
pub fn zbesj<T: BesselFloat>(z: Complex<T>, fnu: T, kode: i32, n: i32, cy: &mut [Complex<T>]) -> Status {
    run(besj::zbesj, z, fnu, kode, n, cy)
}

/// `Y_{fnu+k}(z)`. Working storage for the I and K runs is internal.
pub fn zbesy<T: BesselFloat>(z: Complex<T>, fnu: T, kode: i32, n: i32, cy: &mut [Complex<T>]) -> Status {
    run(besy::zbesy, z, fnu, kode, n, cy)
}

/// `I_{fnu+k}(z)`.
pub fn zbesi<T: BesselFloat>(z: Complex<T>, fnu: T, kode: i32, n: i32, cy: &mut [Complex<T>]) -> Status {
    run(besi::zbesi, z, fnu, kode, n, cy)
}

/// `K_{fnu+k}(z)`.
pub fn zbesk<T: BesselFloat>(z: Complex<T>, fnu: T, kode: i32, n: i32, cy: &mut [Complex<T>]) -> Status {
    run(besk::zbesk, z, fnu, kode, n, cy)
}

/// `H^(m)_{fnu+k}(z)`, `m` 1 or 2.
pub fn zbesh<T: BesselFloat>(z: Complex<T>, fnu: T, kode: i32, m: i32, n: i32, cy: &mut [Complex<T>]) -> Status {
    let Ok(kind) = HankelKind::from_m(m) else {
        return Status::invalid();
    };
    let first: Run<T> = |z, fnu, s, y| besh::zbesh(z, fnu, HankelKind::First, s, y);
    let second: Run<T> = |z, fnu, s, y| besh::zbesh(z, fnu, HankelKind::Second, s, y);
    match kind {
        HankelKind::First => run(first, z, fnu, kode, n, cy),
        HankelKind::Second => run(second, z, fnu, kode, n, cy),
    }
}

type AiryFn<T> = fn(Complex<T>, AiryDerivative, Scaling) -> Result<AiryResult<T>, Error>;

fn airy_call<T: BesselFloat>(f: AiryFn<T>, z: Complex<T>, id: i32, kode: i32) -> (Complex<T>, Status) {
    let zero = Complex::new(T::zero(), T::zero());
    let (Ok(d), Ok(scaling)) = (AiryDerivative::from_id(id), Scaling::from_kode(kode)) else {
        return (zero, Status::invalid());
    };
    match f(z, d, scaling) {
        Ok(r) => {
            let ierr = if r.status == Accuracy::Reduced { Status::REDUCED } else { 0 };
            (r.value, Status { nz: r.underflow_count, ierr })
        }
        Err(e) => (zero, Status { nz: 0, ierr: e.code() }),
    }
}

/// `Ai(z)` (`id = 0`) or `Ai'(z)` (`id = 1`).
pub fn zairy<T: BesselFloat>(z: Complex<T>, id: i32, kode: i32) -> (Complex<T>, Status) {
    airy_call(airy::zairy, z, id, kode)
}

/// `Bi(z)` (`id = 0`) or `Bi'(z)` (`id = 1`).
pub fn zbiry<T: BesselFloat>(z: Complex<T>, id: i32, kode: i32) -> (Complex<T>, Status) {
    airy_call(airy::zbiry, z, id, kode)
}
