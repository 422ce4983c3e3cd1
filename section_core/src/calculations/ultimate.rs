//! # Ultimate Bending Capacity
//!
//! Capacity of a section under a given axial force, bent with its neutral
//! axis at angle θ. The extreme compressive fibre is pinned at the section's
//! concrete ultimate strain, every material follows its ultimate stress law,
//! and the neutral-axis depth is solved so the section carries `n`.
//! Moments are taken about the plastic centroid.
//!
//! ## Example
//!
//! ```rust
//! use section_core::calculations::ultimate;
//! use section_core::config::SolverSettings;
//! use section_core::geometry::{concrete_rectangular_section, BarLayout, RectangularSectionInput};
//! use section_core::materials::presets::{concrete, steel_elastic_plastic, ConcreteParameters};
//! use section_core::section::ConcreteSection;
//!
//! let input = RectangularSectionInput {
//!     width: 300.0,
//!     depth: 500.0,
//!     concrete: concrete("Concrete", &ConcreteParameters::as3600(32.0)),
//!     steel: steel_elastic_plastic("Steel", 500.0, 200e3, 0.05),
//!     top: None,
//!     bottom: Some(BarLayout { count: 4, diameter: 20.0, area: None }),
//!     cover: 40.0,
//!     n_circle: 8,
//! };
//! let section = ConcreteSection::new(concrete_rectangular_section(&input).unwrap()).unwrap();
//! let result = ultimate::calculate(&section, 0.0, 0.0, &SolverSettings::default()).unwrap();
//!
//! assert!(result.status.is_converged());
//! assert!(result.k_u > 0.0 && result.k_u < 0.5);
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::equilibrium::{self, section_actions, SectionActions, StrainControl, StrainPlane};
use crate::config::SolverSettings;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::Point;
use crate::materials::ProfileKind;
use crate::section::ConcreteSection;

/// Outcome of the equilibrium search behind a capacity point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum SolveStatus {
    Converged { iterations: usize },
    /// Iteration cap hit; the record holds the best estimate found
    NotConverged { iterations: usize, residual: f64 },
}

impl SolveStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, SolveStatus::Converged { .. })
    }
}

/// Ultimate capacity for one orientation and axial force.
///
/// ## JSON Example
///
/// ```json
/// {
///   "theta": 0.0, "d_n": 55.1, "k_u": 0.0918, "n": 0.0,
///   "mx": 3.62e8, "my": 0.0, "mv": 3.62e8,
///   "status": { "status": "Converged", "iterations": 9 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltimateBendingResult {
    /// Neutral-axis angle (radians)
    pub theta: f64,
    /// Neutral-axis depth from the extreme compressive fibre (mm)
    pub d_n: f64,
    /// d_n / section depth
    pub k_u: f64,
    /// Axial force carried (N)
    pub n: f64,
    /// Moment about x through the plastic centroid (N·mm)
    pub mx: f64,
    /// Moment about y through the plastic centroid (N·mm)
    pub my: f64,
    /// Resultant moment (N·mm)
    pub mv: f64,
    pub status: SolveStatus,
}

impl UltimateBendingResult {
    /// Signed moment about the neutral-axis direction
    pub fn moment_about_axis(&self) -> f64 {
        let (s, c) = self.theta.sin_cos();
        self.mx * c - self.my * s
    }

    fn from_actions(theta: f64, d_n: f64, depth: f64, actions: &SectionActions, status: SolveStatus) -> Self {
        UltimateBendingResult {
            theta,
            d_n,
            k_u: d_n / depth,
            n: actions.n,
            mx: actions.mx,
            my: actions.my,
            mv: actions.mv(),
            status,
        }
    }
}

/// Ultimate bending capacity at `theta` under axial force `n_target`.
///
/// # Errors
///
/// - `InfeasibleTarget` when `n_target` lies outside `[tensile_load, squash_load]`
/// - `SolverNonConvergence` only when no usable estimate exists; otherwise
///   non-convergence is reported through [`SolveStatus::NotConverged`]
pub fn calculate(
    section: &ConcreteSection,
    theta: f64,
    n_target: f64,
    settings: &SolverSettings,
) -> CalcResult<UltimateBendingResult> {
    let gross = section.gross_properties();
    let pivot = gross.conc_ultimate_strain;
    let reference = gross.plastic_centroid();
    let depth = section.depth(theta);

    let solved = equilibrium::solve(
        section,
        theta,
        StrainControl::UltimateStrain(pivot),
        n_target,
        ProfileKind::Ultimate,
        reference,
        settings,
        None,
    );

    match solved {
        Ok(solution) => {
            debug!(
                "ultimate at theta = {:.4}, n = {:.1}: d_n = {:.3}, mv = {:.4e}",
                theta,
                n_target,
                solution.d_n,
                solution.actions.mv()
            );
            Ok(UltimateBendingResult::from_actions(
                theta,
                solution.d_n,
                depth,
                &solution.actions,
                SolveStatus::Converged {
                    iterations: solution.iterations,
                },
            ))
        }
        Err(CalcError::SolverNonConvergence {
            iterations,
            best_estimate,
            residual,
        }) if best_estimate > 0.0 && best_estimate.is_finite() => {
            warn!(
                "ultimate solve at theta = {:.4}, n = {:.1} stopped after {} iterations (residual {:.3e})",
                theta, n_target, iterations, residual
            );
            let ext = section.geometry().extents(theta, Point::ORIGIN);
            let plane = StrainPlane {
                theta,
                v_na: ext.v_max - best_estimate,
                kappa: pivot / best_estimate,
            };
            let actions = section_actions(section.geometry(), &plane, ProfileKind::Ultimate, reference);
            Ok(UltimateBendingResult::from_actions(
                theta,
                best_estimate,
                depth,
                &actions,
                SolveStatus::NotConverged { iterations, residual },
            ))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::section::singly_reinforced_moment_capacity;
    use crate::testing::{reference_section, symmetric_section};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_pure_bending_near_hand_calculation() {
        let section = reference_section();
        let result = calculate(&section, 0.0, 0.0, &SolverSettings::default()).unwrap();
        let hand = singly_reinforced_moment_capacity(400.0, 558.0, 1350.0, 500.0, 0.85, 40.0);

        assert!(result.status.is_converged());
        assert!(result.n.abs() <= 1e-6 * section.gross_properties().squash_load);
        assert_relative_eq!(result.mx, hand, max_relative = 0.03);
        assert!(result.my.abs() < 1e-6 * result.mx);
        assert_relative_eq!(result.mv, result.moment_about_axis(), max_relative = 1e-12);
        assert_relative_eq!(result.k_u, result.d_n / 600.0);
    }

    #[test]
    fn test_axial_load_changes_capacity() {
        let section = reference_section();
        let gross = section.gross_properties();
        let settings = SolverSettings::default();
        let bending = calculate(&section, 0.0, 0.0, &settings).unwrap();
        let compressed = calculate(&section, 0.0, 0.3 * gross.squash_load, &settings).unwrap();
        assert!(compressed.d_n > bending.d_n);
        assert!(compressed.mx > bending.mx);
        assert_relative_eq!(compressed.n, 0.3 * gross.squash_load, max_relative = 1e-5);
    }

    #[test]
    fn test_symmetric_section_reverses_under_half_turn() {
        let section = symmetric_section();
        let settings = SolverSettings::default();
        let sagging = calculate(&section, 0.0, 0.0, &settings).unwrap();
        let hogging = calculate(&section, PI, 0.0, &settings).unwrap();
        assert_relative_eq!(hogging.mx, -sagging.mx, max_relative = 1e-4);
        assert_relative_eq!(hogging.d_n, sagging.d_n, max_relative = 1e-4);
    }

    #[test]
    fn test_iteration_cap_reports_best_estimate() {
        let section = reference_section();
        let settings = SolverSettings {
            tolerance: 1e-14,
            max_iterations: 4,
        };
        let result = calculate(&section, 0.0, 0.0, &settings).unwrap();
        match result.status {
            SolveStatus::NotConverged { iterations, .. } => assert!(iterations >= 4),
            other => panic!("unexpected status {:?}", other),
        }
        assert!(result.d_n > 0.0);
    }

    #[test]
    fn test_feasible_range_ends_converge() {
        let section = reference_section();
        let gross = section.gross_properties();
        let settings = SolverSettings::default();
        let f_tol = settings.tolerance * gross.squash_load;
        for n_target in [gross.tensile_load, gross.squash_load] {
            let result = calculate(&section, 0.0, n_target, &settings).unwrap();
            assert!(result.status.is_converged(), "n = {}: {:?}", n_target, result.status);
            assert!((result.n - n_target).abs() <= f_tol);
            assert!(result.d_n > 0.0);
        }
    }

    #[test]
    fn test_infeasible_target_is_error() {
        let section = reference_section();
        let n = section.gross_properties().squash_load * 1.5;
        let err = calculate(&section, 0.0, n, &SolverSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INFEASIBLE_TARGET");
    }
}
