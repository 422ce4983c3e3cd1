//! # Moment Interaction Diagram
//!
//! Ultimate moment capacity over a range of axial forces for a fixed
//! bending orientation θ.
//!
//! The axial levels are either given explicitly or spread evenly over
//! `[tensile_load, squash_load]`. The two end levels are the uniform
//! limit states (pure tension, squash) and are evaluated directly; every
//! interior level is an ultimate bending solve.
//!
//! With `include_negative_moments` the section is also bent the other way
//! (θ + π). That branch is appended in decreasing `n` with its moments
//! expressed about θ, so they are negative and the combined sequence traces
//! a closed envelope.
//!
//! ## Example
//!
//! ```rust,ignore
//! let diagram = section.moment_interaction_diagram(&settings)?;
//! if let Some(capacity) = diagram.moment_capacity(500e3) {
//!     println!("φM at 500 kN: {:.1} kN·m", capacity / 1e6);
//! }
//! ```

use std::f64::consts::PI;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::equilibrium::{self, limit_state_actions, LimitState};
use super::sweep;
use super::ultimate::{self, SolveStatus};
use crate::config::{AnalysisSettings, SolverSettings};
use crate::errors::{CalcError, CalcResult};
use crate::section::ConcreteSection;

/// A sweep point that produced no capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedPoint {
    /// The swept value: axial force (N) or orientation (radians)
    pub target: f64,
    pub error: CalcError,
}

/// Interaction diagram for one orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentInteractionResult {
    /// Bending orientation (radians)
    pub theta: f64,
    /// Requested axial level of each point (N)
    pub n: Vec<f64>,
    /// Moment about the θ axis through the plastic centroid (N·mm)
    pub m: Vec<f64>,
    /// Number of leading points on the positive branch
    pub positive_points: usize,
    pub failed: Vec<FailedPoint>,
}

impl MomentInteractionResult {
    /// Positive-branch moment capacity at axial force `n`
    pub fn moment_capacity(&self, n: f64) -> Option<f64> {
        interpolate(&self.n[..self.positive_points], &self.m[..self.positive_points], n)
    }

    /// Negative-branch moment capacity at axial force `n`; `None` without a negative branch
    pub fn negative_moment_capacity(&self, n: f64) -> Option<f64> {
        interpolate(&self.n[self.positive_points..], &self.m[self.positive_points..], n)
    }

    pub fn has_negative_branch(&self) -> bool {
        self.n.len() > self.positive_points
    }

    /// Whether `(n, m)` lies inside the envelope
    pub fn contains(&self, n: f64, m: f64) -> bool {
        let capacity = if m >= 0.0 {
            self.moment_capacity(n)
        } else {
            self.negative_moment_capacity(n)
        };
        match capacity {
            Some(cap) if m >= 0.0 => m <= cap,
            Some(cap) => m >= cap,
            None => false,
        }
    }
}

/// Linear interpolation of `ms` over `ns` (ascending or descending)
fn interpolate(ns: &[f64], ms: &[f64], n: f64) -> Option<f64> {
    if ns.len() == 1 {
        return (ns[0] == n).then_some(ms[0]);
    }
    ns.windows(2).zip(ms.windows(2)).find_map(|(pair, m)| {
        let (lo, hi) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
        if n < lo || n > hi {
            return None;
        }
        if pair[1] == pair[0] {
            return Some(m[0].max(m[1]));
        }
        Some(m[0] + (n - pair[0]) / (pair[1] - pair[0]) * (m[1] - m[0]))
    })
}

/// Build the interaction diagram described by `settings.interaction`.
///
/// # Errors
///
/// `InvalidInput` for invalid settings. Levels that cannot be solved are
/// recorded in `failed` rather than returned as errors.
pub fn calculate(section: &ConcreteSection, settings: &AnalysisSettings) -> CalcResult<MomentInteractionResult> {
    settings.validate()?;
    let config = &settings.interaction;
    let theta = config.theta;
    let levels = axial_levels(section, settings);

    info!(
        "interaction diagram at theta = {:.4}: {} levels{}",
        theta,
        levels.len(),
        if config.include_negative_moments { ", both branches" } else { "" }
    );

    let mut result = MomentInteractionResult {
        theta,
        n: Vec::with_capacity(levels.len()),
        m: Vec::with_capacity(levels.len()),
        positive_points: 0,
        failed: Vec::new(),
    };

    let positive = sweep(&levels, |&n| evaluate_level(section, theta, theta, n, &settings.solver));
    collect_branch(&mut result, &levels, positive)?;
    result.positive_points = result.n.len();

    if config.include_negative_moments {
        let descending: Vec<f64> = levels.iter().rev().copied().collect();
        let negative = sweep(&descending, |&n| evaluate_level(section, theta + PI, theta, n, &settings.solver));
        collect_branch(&mut result, &descending, negative)?;
    }

    Ok(result)
}

/// Explicit levels sorted ascending, or `n_points` levels from tension to squash
fn axial_levels(section: &ConcreteSection, settings: &AnalysisSettings) -> Vec<f64> {
    let gross = section.gross_properties();
    match &settings.interaction.axial_levels {
        Some(levels) => {
            let mut levels = levels.clone();
            levels.sort_by(f64::total_cmp);
            levels
        }
        None => {
            let count = settings.interaction.n_points;
            let last = count - 1;
            (0..count)
                .map(|i| match i {
                    0 => gross.tensile_load,
                    i if i == last => gross.squash_load,
                    i => gross.tensile_load + (gross.squash_load - gross.tensile_load) * i as f64 / last as f64,
                })
                .collect()
        }
    }
}

/// Solve one axial level bent at `solve_theta`, returning its moment about `axis_theta`
fn evaluate_level(
    section: &ConcreteSection,
    solve_theta: f64,
    axis_theta: f64,
    n: f64,
    solver: &SolverSettings,
) -> CalcResult<f64> {
    let gross = section.gross_properties();
    equilibrium::check_feasible(section, n)?;

    let state = if n == gross.squash_load {
        Some(LimitState::Squash)
    } else if n == gross.tensile_load {
        Some(LimitState::Tension)
    } else {
        None
    };
    if let Some(state) = state {
        let actions = limit_state_actions(section.geometry(), state, gross.plastic_centroid());
        return Ok(actions.moment_about_axis(axis_theta));
    }

    let result = ultimate::calculate(section, solve_theta, n, solver)?;
    match result.status {
        SolveStatus::Converged { .. } => {
            let (s, c) = axis_theta.sin_cos();
            Ok(result.mx * c - result.my * s)
        }
        SolveStatus::NotConverged { iterations, residual } => {
            Err(CalcError::non_convergence(iterations, result.d_n, residual))
        }
    }
}

fn collect_branch(
    result: &mut MomentInteractionResult,
    levels: &[f64],
    outcomes: Vec<CalcResult<f64>>,
) -> CalcResult<()> {
    for (&target, outcome) in levels.iter().zip(outcomes) {
        match outcome {
            Ok(m) => {
                result.n.push(target);
                result.m.push(m);
            }
            Err(error) if error.is_local() => {
                warn!("interaction level n = {:.1} failed: {}", target, error);
                result.failed.push(FailedPoint { target, error });
            }
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InteractionSettings;
    use crate::testing::{reference_section, symmetric_section};
    use approx::assert_relative_eq;

    fn settings_with(interaction: InteractionSettings) -> AnalysisSettings {
        AnalysisSettings {
            interaction,
            ..AnalysisSettings::default()
        }
    }

    #[test]
    fn test_zero_axial_level_matches_pure_bending() {
        let section = reference_section();
        let settings = settings_with(InteractionSettings {
            axial_levels: Some(vec![0.0]),
            ..InteractionSettings::default()
        });
        let diagram = calculate(&section, &settings).unwrap();
        let direct = ultimate::calculate(&section, 0.0, 0.0, &settings.solver).unwrap();

        assert_eq!(diagram.n.len(), 1);
        assert_relative_eq!(diagram.m[0], direct.mx, max_relative = 1e-12);
        assert!(diagram.failed.is_empty());
    }

    #[test]
    fn test_default_levels_span_tension_to_squash() {
        let section = reference_section();
        let gross = section.gross_properties();
        let diagram = calculate(&section, &AnalysisSettings::default()).unwrap();

        assert_eq!(diagram.n.len(), 24);
        assert_eq!(diagram.positive_points, 24);
        assert!(diagram.failed.is_empty());
        assert_relative_eq!(diagram.n[0], gross.tensile_load, max_relative = 1e-12);
        assert_relative_eq!(diagram.n[23], gross.squash_load, max_relative = 1e-12);
        assert!(diagram.n.windows(2).all(|w| w[1] > w[0]));
        assert!(diagram.m[23].abs() < 1e-6 * gross.squash_load);

        let pure = ultimate::calculate(&section, 0.0, 0.0, &SolverSettings::default()).unwrap();
        let peak = diagram.m.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(peak > pure.mx);
    }

    #[test]
    fn test_symmetric_section_branches_mirror() {
        let section = symmetric_section();
        let settings = settings_with(InteractionSettings {
            n_points: 10,
            include_negative_moments: true,
            ..InteractionSettings::default()
        });
        let diagram = calculate(&section, &settings).unwrap();
        assert_eq!(diagram.n.len(), 20);
        assert_eq!(diagram.positive_points, 10);
        assert!(diagram.has_negative_branch());

        let scale = diagram.m.iter().fold(0.0f64, |acc, m| acc.max(m.abs()));
        for i in 0..10 {
            let mirror = 19 - i;
            assert_eq!(diagram.n[i], diagram.n[mirror]);
            assert!((diagram.m[i] + diagram.m[mirror]).abs() < 1e-4 * scale);
        }
    }

    #[test]
    fn test_infeasible_levels_are_recorded() {
        let section = reference_section();
        let gross = section.gross_properties();
        let settings = settings_with(InteractionSettings {
            axial_levels: Some(vec![gross.squash_load * 1.2, 0.0, gross.tensile_load * 1.5]),
            ..InteractionSettings::default()
        });
        let diagram = calculate(&section, &settings).unwrap();
        assert_eq!(diagram.n.len(), 1);
        assert_eq!(diagram.failed.len(), 2);
        assert!(diagram
            .failed
            .iter()
            .all(|f| f.error.error_code() == "INFEASIBLE_TARGET"));
    }

    #[test]
    fn test_capacity_lookup_and_containment() {
        let section = reference_section();
        let gross = section.gross_properties();
        let settings = settings_with(InteractionSettings {
            axial_levels: Some(vec![gross.tensile_load, 0.0, gross.squash_load]),
            ..InteractionSettings::default()
        });
        let diagram = calculate(&section, &settings).unwrap();
        let m0 = diagram.m[1];

        assert_eq!(diagram.n, vec![gross.tensile_load, 0.0, gross.squash_load]);

        assert_relative_eq!(diagram.moment_capacity(0.0).unwrap(), m0, max_relative = 1e-12);
        assert!(diagram.contains(0.0, 0.5 * m0));
        assert!(!diagram.contains(0.0, 1.5 * m0));
        assert!(!diagram.contains(gross.squash_load * 1.1, 0.0));
        assert!(diagram.negative_moment_capacity(0.0).is_none());
        assert!(!diagram.contains(0.0, -0.1 * m0));
    }
}
