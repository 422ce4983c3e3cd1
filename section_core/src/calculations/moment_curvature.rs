//! # Moment-Curvature Analysis
//!
//! Traces the service moment-curvature response of a section under a
//! constant axial force. Curvature is increased step by step; at each step
//! the neutral-axis depth is solved for equilibrium (seeded by the previous
//! depth), the extreme strains of every region are checked against their
//! material's limits, and the moment about the elastic centroid is recorded.
//!
//! The trace always starts at `(0, 0)` and ends on one of the
//! [`Termination`] reasons. Points gathered before a failure are kept.
//!
//! ## Step Control
//!
//! - `Fixed`: constant curvature increment; the first strain-limit breach
//!   ends the trace.
//! - `Adaptive`: the next increment doubles when the relative moment change
//!   of the last step was below `min_moment_change` and halves when it was
//!   above `max_moment_change`. A strain-limit breach halves the increment
//!   and retries from the last accepted point until the increment would drop
//!   below `min_increment`.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::equilibrium::{self, StrainControl, StrainPlane};
use super::sweep;
use crate::config::{AnalysisSettings, CurvatureStep};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::Point;
use crate::materials::ProfileKind;
use crate::section::ConcreteSection;

/// Why a trace stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Termination {
    /// A region's strain left its material's domain
    MaterialFailure { material: String, strain: f64 },
    /// Curvature reached `kappa_max`
    MaxCurvature,
    /// `max_steps` accepted steps were taken
    MaxSteps,
    /// The equilibrium solve failed
    SolverFailure { reason: String },
}

/// Moment-curvature response for one bending orientation.
///
/// `kappa` and `moment` are parallel sequences; `moment` is the moment about
/// the neutral-axis direction through the elastic centroid (N·mm), `kappa`
/// is in 1/mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentCurvatureResult {
    pub theta: f64,
    pub n_target: f64,
    kappa: Vec<f64>,
    moment: Vec<f64>,
    failure: bool,
    termination: Termination,
}

impl MomentCurvatureResult {
    fn start(theta: f64, n_target: f64) -> Self {
        MomentCurvatureResult {
            theta,
            n_target,
            kappa: vec![0.0],
            moment: vec![0.0],
            failure: false,
            termination: Termination::MaxSteps,
        }
    }

    fn push(&mut self, kappa: f64, moment: f64) {
        self.kappa.push(kappa);
        self.moment.push(moment);
    }

    fn finish(mut self, termination: Termination) -> Self {
        self.failure = matches!(termination, Termination::MaterialFailure { .. });
        self.termination = termination;
        self
    }

    pub fn kappa(&self) -> &[f64] {
        &self.kappa
    }

    pub fn moment(&self) -> &[f64] {
        &self.moment
    }

    /// True when the trace ended on a material strain limit
    pub fn failure(&self) -> bool {
        self.failure
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    pub fn len(&self) -> usize {
        self.kappa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kappa.is_empty()
    }

    /// Largest moment reached
    pub fn max_moment(&self) -> f64 {
        self.moment.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Curvature at which the trace first reaches `moment`, by linear interpolation.
    pub fn curvature_at(&self, moment: f64) -> Option<f64> {
        self.kappa
            .windows(2)
            .zip(self.moment.windows(2))
            .find(|(_, m)| (m[0] - moment) * (m[1] - moment) <= 0.0 && m[0] != m[1])
            .map(|(k, m)| k[0] + (moment - m[0]) / (m[1] - m[0]) * (k[1] - k[0]))
    }
}

/// Trace the moment-curvature response at `theta`.
///
/// # Errors
///
/// `InvalidInput` for invalid settings and `InfeasibleTarget` when the axial
/// force is outside the section's capacity. Failures during the trace end
/// it without an error.
pub fn calculate(
    section: &ConcreteSection,
    theta: f64,
    settings: &AnalysisSettings,
) -> CalcResult<MomentCurvatureResult> {
    let mk = &settings.moment_curvature;
    mk.validate()?;
    settings.solver.validate()?;
    equilibrium::check_feasible(section, mk.n_target)?;

    let reference = section.gross_properties().elastic_centroid();
    let mut result = MomentCurvatureResult::start(theta, mk.n_target);

    let (mut increment, min_increment, max_increment) = match mk.step {
        CurvatureStep::Fixed { increment } => (increment, increment, increment),
        CurvatureStep::Adaptive {
            initial_increment,
            min_increment,
            max_increment,
            ..
        } => (initial_increment, min_increment, max_increment),
    };

    info!(
        "moment-curvature trace at theta = {:.4}, n = {:.1}",
        theta, mk.n_target
    );

    let mut kappa = 0.0;
    let mut moment = 0.0;
    let mut d_n: Option<f64> = None;
    let mut retrying = false;
    let mut steps = 0;

    let termination = loop {
        if steps >= mk.max_steps {
            break Termination::MaxSteps;
        }
        let mut trial = kappa + increment;
        if let Some(kappa_max) = mk.kappa_max {
            if kappa >= kappa_max {
                break Termination::MaxCurvature;
            }
            trial = trial.min(kappa_max);
        }

        let solution = match equilibrium::solve(
            section,
            theta,
            StrainControl::Curvature(trial),
            mk.n_target,
            ProfileKind::Service,
            reference,
            &settings.solver,
            d_n,
        ) {
            Ok(solution) => solution,
            Err(e) => {
                warn!("moment-curvature solve failed at kappa = {:.4e}: {}", trial, e);
                break Termination::SolverFailure { reason: e.to_string() };
            }
        };

        if let Err(e) = check_strains(section, &solution.plane) {
            let halved = increment / 2.0;
            if matches!(mk.step, CurvatureStep::Adaptive { .. }) && halved >= min_increment {
                increment = halved;
                retrying = true;
                continue;
            }
            match e {
                CalcError::MaterialDomain { material, strain, .. } => {
                    break Termination::MaterialFailure { material, strain };
                }
                other => break Termination::SolverFailure { reason: other.to_string() },
            }
        }

        let next_moment = solution.actions.moment_about_axis(theta);
        result.push(trial, next_moment);
        steps += 1;

        if let CurvatureStep::Adaptive {
            min_moment_change,
            max_moment_change,
            ..
        } = mk.step
        {
            if moment != 0.0 {
                let change = ((next_moment - moment) / moment).abs();
                if change > max_moment_change {
                    increment = (increment / 2.0).max(min_increment);
                } else if change < min_moment_change && !retrying {
                    increment = (increment * 2.0).min(max_increment);
                }
            }
        }

        retrying = false;
        kappa = trial;
        moment = next_moment;
        d_n = Some(solution.d_n);
    };

    debug!(
        "moment-curvature trace at theta = {:.4} ended after {} points: {:?}",
        theta,
        result.len(),
        termination
    );

    Ok(result.finish(termination))
}

/// Check the strain at every vertex of every load-carrying region.
fn check_strains(section: &ConcreteSection, plane: &StrainPlane) -> CalcResult<()> {
    let geometry = section.geometry();
    for region in geometry.regions().iter().filter(|r| !r.is_displaced()) {
        let material = geometry.material(region.material());
        let law = material.profile(ProfileKind::Service);
        let ext = region.extents(plane.theta, Point::ORIGIN);
        for v in [ext.v_min, ext.v_max] {
            law.check_strain(&material.name, plane.kappa * (v - plane.v_na))?;
        }
    }
    Ok(())
}

/// Trace several orientations, one independent trace each.
///
/// Results come back in the order of `thetas`.
pub fn calculate_many(
    section: &ConcreteSection,
    thetas: &[f64],
    settings: &AnalysisSettings,
) -> Vec<CalcResult<MomentCurvatureResult>> {
    sweep(thetas, |&theta| calculate(section, theta, settings))
}
