//! # Biaxial Bending Diagram
//!
//! Ultimate moment capacity under a constant axial force as the neutral
//! axis turns through a full revolution. Orientations are spaced evenly
//! over `[0, 2π)`; each one is an independent ultimate bending solve.
//!
//! With `symmetric` set, only `[0, π)` is solved and the second half is
//! filled in from `M(θ + π) = −M(θ)`, which holds for sections symmetric
//! about their plastic centroid.

use std::f64::consts::TAU;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::equilibrium;
use super::interaction::FailedPoint;
use super::sweep;
use super::ultimate::{self, SolveStatus};
use crate::config::AnalysisSettings;
use crate::errors::{CalcError, CalcResult};
use crate::section::ConcreteSection;

/// Biaxial capacity contour at one axial force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiaxialBendingResult {
    /// Axial force (N)
    pub n: f64,
    /// Neutral-axis angle of each point (radians), increasing
    pub theta: Vec<f64>,
    /// Moment about x through the plastic centroid (N·mm)
    pub mx: Vec<f64>,
    /// Moment about y through the plastic centroid (N·mm)
    pub my: Vec<f64>,
    pub failed: Vec<FailedPoint>,
}

impl BiaxialBendingResult {
    /// Resultant moment at each point
    pub fn mv(&self) -> Vec<f64> {
        self.mx.iter().zip(&self.my).map(|(mx, my)| mx.hypot(*my)).collect()
    }
}

/// Build the biaxial diagram described by `settings.biaxial`.
///
/// # Errors
///
/// `InvalidInput` for invalid settings and `InfeasibleTarget` when the axial
/// force is outside the section's capacity. Orientations that fail to solve
/// are recorded in `failed`.
pub fn calculate(section: &ConcreteSection, settings: &AnalysisSettings) -> CalcResult<BiaxialBendingResult> {
    settings.validate()?;
    let config = &settings.biaxial;
    equilibrium::check_feasible(section, config.n)?;

    let count = config.n_points;
    let thetas: Vec<f64> = (0..count).map(|i| TAU * i as f64 / count as f64).collect();
    let solved = if config.symmetric { count / 2 } else { count };

    info!(
        "biaxial diagram at n = {:.1}: {} orientations, {} solved",
        config.n, count, solved
    );

    let mut outcomes = sweep(&thetas[..solved], |&theta| evaluate(section, theta, config.n, settings));
    if config.symmetric {
        let mirrored: Vec<CalcResult<(f64, f64)>> = outcomes
            .iter()
            .map(|outcome| outcome.clone().map(|(mx, my)| (-mx, -my)))
            .collect();
        outcomes.extend(mirrored);
    }

    let mut result = BiaxialBendingResult {
        n: config.n,
        theta: Vec::with_capacity(count),
        mx: Vec::with_capacity(count),
        my: Vec::with_capacity(count),
        failed: Vec::new(),
    };
    for (&theta, outcome) in thetas.iter().zip(outcomes) {
        match outcome {
            Ok((mx, my)) => {
                result.theta.push(theta);
                result.mx.push(mx);
                result.my.push(my);
            }
            Err(error) if error.is_local() => {
                warn!("biaxial point at theta = {:.4} failed: {}", theta, error);
                result.failed.push(FailedPoint { target: theta, error });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(result)
}

fn evaluate(section: &ConcreteSection, theta: f64, n: f64, settings: &AnalysisSettings) -> CalcResult<(f64, f64)> {
    let result = ultimate::calculate(section, theta, n, &settings.solver)?;
    match result.status {
        SolveStatus::Converged { .. } => Ok((result.mx, result.my)),
        SolveStatus::NotConverged { iterations, residual } => {
            Err(CalcError::non_convergence(iterations, result.d_n, residual))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BiaxialSettings;
    use crate::testing::{reference_section, symmetric_section};
    use approx::assert_relative_eq;

    fn settings_with(biaxial: BiaxialSettings) -> AnalysisSettings {
        AnalysisSettings {
            biaxial,
            ..AnalysisSettings::default()
        }
    }

    #[test]
    fn test_first_point_matches_uniaxial_capacity() {
        let section = reference_section();
        let settings = settings_with(BiaxialSettings {
            n: 0.0,
            n_points: 8,
            symmetric: false,
        });
        let diagram = calculate(&section, &settings).unwrap();
        let direct = ultimate::calculate(&section, 0.0, 0.0, &settings.solver).unwrap();

        assert_eq!(diagram.theta.len(), 8);
        assert!(diagram.failed.is_empty());
        assert!(diagram.theta.windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(diagram.mx[0], direct.mx, max_relative = 1e-12);
        assert_relative_eq!(diagram.my[0], direct.my, epsilon = 1e-6);
        // half turn bends the section the other way with less tension steel
        assert!(diagram.mx[4] < 0.0 && diagram.mx[4].abs() < diagram.mx[0]);
    }

    #[test]
    fn test_symmetric_mode_matches_full_sweep() {
        let section = symmetric_section();
        let full = calculate(
            &section,
            &settings_with(BiaxialSettings {
                n: 1.0e6,
                n_points: 8,
                symmetric: false,
            }),
        )
        .unwrap();
        let mirrored = calculate(
            &section,
            &settings_with(BiaxialSettings {
                n: 1.0e6,
                n_points: 8,
                symmetric: true,
            }),
        )
        .unwrap();

        assert_eq!(full.theta, mirrored.theta);
        let scale = full.mv().into_iter().fold(0.0, f64::max);
        for i in 0..8 {
            assert!((full.mx[i] - mirrored.mx[i]).abs() < 1e-4 * scale);
            assert!((full.my[i] - mirrored.my[i]).abs() < 1e-4 * scale);
        }
    }

    #[test]
    fn test_infeasible_axial_force_is_error() {
        let section = reference_section();
        let settings = settings_with(BiaxialSettings {
            n: section.gross_properties().squash_load * 1.1,
            ..BiaxialSettings::default()
        });
        assert_eq!(
            calculate(&section, &settings).unwrap_err().error_code(),
            "INFEASIBLE_TARGET"
        );
    }

    #[test]
    fn test_tensile_limit_solves_every_orientation() {
        let section = reference_section();
        let settings = settings_with(BiaxialSettings {
            n: section.gross_properties().tensile_load,
            n_points: 8,
            symmetric: false,
        });
        let diagram = calculate(&section, &settings).unwrap();
        assert!(diagram.failed.is_empty(), "{:?}", diagram.failed);
        assert_eq!(diagram.theta.len(), 8);
    }

    #[test]
    fn test_odd_symmetric_count_rejected() {
        let section = symmetric_section();
        let settings = settings_with(BiaxialSettings {
            n: 0.0,
            n_points: 7,
            symmetric: true,
        });
        assert_eq!(
            calculate(&section, &settings).unwrap_err().error_code(),
            "INVALID_INPUT"
        );
    }
}
