//! # Section Calculations
//!
//! Each analysis is a pure function of a [`ConcreteSection`](crate::section::ConcreteSection)
//! and its settings, returning a serializable result record:
//!
//! - `calculate(section, ...) -> CalcResult<*Result>`
//! - `*Result` - immutable, JSON-serializable output
//!
//! Failures local to one point of a sweep (an infeasible axial level, a
//! non-converged solve) are recorded in the result; anything else is
//! returned as an error.
//!
//! ## Available Calculations
//!
//! - [`gross`] - Gross and transformed elastic properties
//! - [`cracked`] - Cracking moment and cracked elastic properties
//! - [`equilibrium`] - Stress integration and the neutral-axis solver
//! - [`stress`] - Elastic region stresses, uncracked and cracked
//! - [`ultimate`] - Ultimate bending capacity under an axial force
//! - [`moment_curvature`] - Service moment-curvature trace
//! - [`interaction`] - Axial force / moment interaction diagram
//! - [`biaxial`] - Biaxial bending diagram at constant axial force

pub mod biaxial;
pub mod cracked;
pub mod equilibrium;
pub mod gross;
pub mod interaction;
pub mod moment_curvature;
pub mod roots;
pub mod stress;
pub mod ultimate;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Re-export commonly used types
pub use biaxial::BiaxialBendingResult;
pub use cracked::{CrackedResult, TransformedCrackedProperties};
pub use equilibrium::{EquilibriumSolution, SectionActions, StrainControl, StrainPlane};
pub use gross::{GrossProperties, TransformedProperties};
pub use interaction::{FailedPoint, MomentInteractionResult};
pub use moment_curvature::{MomentCurvatureResult, Termination};
pub use stress::{RegionStress, StressResult};
pub use ultimate::{SolveStatus, UltimateBendingResult};

/// Map `f` over independent sweep points, keeping their order.
/// Uses parallel processing when the `parallel` feature is enabled.
#[inline]
pub(crate) fn sweep<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        sweep_parallel(items, f)
    }
    #[cfg(not(feature = "parallel"))]
    {
        sweep_sequential(items, f)
    }
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn sweep_sequential<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    F: Fn(&T) -> R,
{
    items.iter().map(f).collect()
}

#[cfg(feature = "parallel")]
fn sweep_parallel<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(f).collect()
}
