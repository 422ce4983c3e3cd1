//! # Analysis Settings
//!
//! Tunable parameters for every analysis, with defaults that suit
//! reinforced concrete sections in N / mm / MPa. Settings serialize to JSON
//! and every field may be omitted, in which case its default is used.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "solver": { "tolerance": 1e-6, "max_iterations": 100 },
//!   "moment_curvature": {
//!     "n_target": 0.0,
//!     "step": { "type": "Adaptive", "initial_increment": 1e-7 },
//!     "kappa_max": null
//!   },
//!   "interaction": { "n_points": 24, "include_negative_moments": true },
//!   "biaxial": { "n": 0.0, "n_points": 48, "symmetric": true }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use section_core::config::AnalysisSettings;
//!
//! let settings = AnalysisSettings::from_json(r#"{ "solver": { "tolerance": 1e-8 } }"#).unwrap();
//! assert_eq!(settings.solver.tolerance, 1e-8);
//! assert_eq!(settings.solver.max_iterations, 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Settings for every analysis in the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Modulus used for transformed properties; the first concrete's modulus when `None`
    pub reference_modulus: Option<f64>,
    pub solver: SolverSettings,
    pub moment_curvature: MomentCurvatureSettings,
    pub interaction: InteractionSettings,
    pub biaxial: BiaxialSettings,
}

/// Root-finding controls shared by all equilibrium solves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Force tolerance as a fraction of the squash load
    pub tolerance: f64,
    /// Iteration cap per solve (bracket expansion and Brent combined)
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// How the moment-curvature tracer advances curvature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurvatureStep {
    /// Constant increment (1/mm)
    Fixed { increment: f64 },
    /// Increment doubles or halves to keep the relative moment change per
    /// step between the two bounds
    Adaptive {
        #[serde(default = "default_initial_increment")]
        initial_increment: f64,
        #[serde(default = "default_min_increment")]
        min_increment: f64,
        #[serde(default = "default_max_increment")]
        max_increment: f64,
        #[serde(default = "default_min_moment_change")]
        min_moment_change: f64,
        #[serde(default = "default_max_moment_change")]
        max_moment_change: f64,
    },
}

fn default_initial_increment() -> f64 {
    1e-7
}
fn default_min_increment() -> f64 {
    1e-10
}
fn default_max_increment() -> f64 {
    5e-6
}
fn default_min_moment_change() -> f64 {
    0.02
}
fn default_max_moment_change() -> f64 {
    0.1
}

impl Default for CurvatureStep {
    fn default() -> Self {
        CurvatureStep::Adaptive {
            initial_increment: default_initial_increment(),
            min_increment: default_min_increment(),
            max_increment: default_max_increment(),
            min_moment_change: default_min_moment_change(),
            max_moment_change: default_max_moment_change(),
        }
    }
}

/// Moment-curvature tracing controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentCurvatureSettings {
    /// Axial force held constant during the trace (N, compression positive)
    pub n_target: f64,
    pub step: CurvatureStep,
    /// Stop (without failure) once curvature exceeds this value (1/mm)
    pub kappa_max: Option<f64>,
    /// Stop after this many accepted steps
    pub max_steps: usize,
}

impl Default for MomentCurvatureSettings {
    fn default() -> Self {
        MomentCurvatureSettings {
            n_target: 0.0,
            step: CurvatureStep::default(),
            kappa_max: None,
            max_steps: 10_000,
        }
    }
}

/// Moment interaction diagram controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Bending orientation (radians)
    pub theta: f64,
    /// Number of evenly spaced axial levels (used when `axial_levels` is `None`)
    pub n_points: usize,
    /// Explicit axial levels (N)
    pub axial_levels: Option<Vec<f64>>,
    /// Also trace the branch at `theta + π`
    pub include_negative_moments: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        InteractionSettings {
            theta: 0.0,
            n_points: 24,
            axial_levels: None,
            include_negative_moments: false,
        }
    }
}

/// Biaxial bending diagram controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiaxialSettings {
    /// Axial force (N)
    pub n: f64,
    /// Number of orientations over [0, 2π)
    pub n_points: usize,
    /// Solve [0, π) only and mirror the rest
    pub symmetric: bool,
}

impl Default for BiaxialSettings {
    fn default() -> Self {
        BiaxialSettings {
            n: 0.0,
            n_points: 48,
            symmetric: false,
        }
    }
}

impl AnalysisSettings {
    /// Parse settings from JSON, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let settings: AnalysisSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty-printed JSON.
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every setting is in range.
    pub fn validate(&self) -> CalcResult<()> {
        if let Some(e_ref) = self.reference_modulus {
            if !(e_ref > 0.0) {
                return Err(CalcError::invalid_input(
                    "reference_modulus",
                    e_ref.to_string(),
                    "Reference modulus must be positive",
                ));
            }
        }
        self.solver.validate()?;
        self.moment_curvature.validate()?;

        let interaction = &self.interaction;
        if interaction.axial_levels.is_none() && interaction.n_points < 2 {
            return Err(CalcError::invalid_input(
                "interaction.n_points",
                interaction.n_points.to_string(),
                "Need at least 2 axial levels",
            ));
        }
        if let Some(levels) = &interaction.axial_levels {
            if levels.is_empty() || levels.iter().any(|n| !n.is_finite()) {
                return Err(CalcError::invalid_input(
                    "interaction.axial_levels",
                    format!("{:?}", levels),
                    "Axial levels must be a non-empty list of finite values",
                ));
            }
        }
        if self.biaxial.n_points < 2 || (self.biaxial.symmetric && self.biaxial.n_points % 2 != 0) {
            return Err(CalcError::invalid_input(
                "biaxial.n_points",
                self.biaxial.n_points.to_string(),
                "Need at least 2 orientations, and an even count when symmetric",
            ));
        }
        Ok(())
    }
}

impl SolverSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(CalcError::invalid_input(
                "solver.tolerance",
                self.tolerance.to_string(),
                "Tolerance must lie in (0, 1)",
            ));
        }
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "solver.max_iterations",
                "0",
                "Need at least one iteration",
            ));
        }
        Ok(())
    }
}

impl MomentCurvatureSettings {
    pub fn validate(&self) -> CalcResult<()> {
        match self.step {
            CurvatureStep::Fixed { increment } => {
                if !(increment > 0.0) {
                    return Err(CalcError::invalid_input(
                        "moment_curvature.step.increment",
                        increment.to_string(),
                        "Curvature increment must be positive",
                    ));
                }
            }
            CurvatureStep::Adaptive {
                initial_increment,
                min_increment,
                max_increment,
                min_moment_change,
                max_moment_change,
            } => {
                if !(min_increment > 0.0 && min_increment <= initial_increment && initial_increment <= max_increment) {
                    return Err(CalcError::invalid_input(
                        "moment_curvature.step",
                        format!("{} <= {} <= {}", min_increment, initial_increment, max_increment),
                        "Increments must satisfy 0 < min <= initial <= max",
                    ));
                }
                if !(min_moment_change > 0.0 && min_moment_change < max_moment_change) {
                    return Err(CalcError::invalid_input(
                        "moment_curvature.step",
                        format!("{} < {}", min_moment_change, max_moment_change),
                        "Moment change bounds must satisfy 0 < min < max",
                    ));
                }
            }
        }
        if let Some(kappa_max) = self.kappa_max {
            if !(kappa_max > 0.0) {
                return Err(CalcError::invalid_input(
                    "moment_curvature.kappa_max",
                    kappa_max.to_string(),
                    "Maximum curvature must be positive",
                ));
            }
        }
        if self.max_steps == 0 {
            return Err(CalcError::invalid_input("moment_curvature.max_steps", "0", "Need at least one step"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        AnalysisSettings::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "reference_modulus": 32800.0,
            "moment_curvature": { "step": { "type": "Fixed", "increment": 1e-6 } },
            "biaxial": { "symmetric": true }
        }"#;
        let settings = AnalysisSettings::from_json(json).unwrap();
        assert_eq!(settings.reference_modulus, Some(32800.0));
        assert_eq!(settings.moment_curvature.step, CurvatureStep::Fixed { increment: 1e-6 });
        assert_eq!(settings.moment_curvature.max_steps, 10_000);
        assert!(settings.biaxial.symmetric);
        assert_eq!(settings.biaxial.n_points, 48);
        assert_eq!(settings.interaction, InteractionSettings::default());
    }

    #[test]
    fn test_adaptive_step_fields_default() {
        let json = r#"{ "moment_curvature": { "step": { "type": "Adaptive", "max_increment": 1e-5 } } }"#;
        let settings = AnalysisSettings::from_json(json).unwrap();
        match settings.moment_curvature.step {
            CurvatureStep::Adaptive {
                initial_increment,
                max_increment,
                ..
            } => {
                assert_eq!(initial_increment, 1e-7);
                assert_eq!(max_increment, 1e-5);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = AnalysisSettings::from_json(r#"{ "reference_modulus": -1.0 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = AnalysisSettings::from_json(r#"{ "solver": { "tolerance": 0.0 } }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = AnalysisSettings::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = AnalysisSettings::default();
        settings.interaction.axial_levels = Some(vec![0.0, 1.0e6]);
        let json = settings.to_json().unwrap();
        assert_eq!(AnalysisSettings::from_json(&json).unwrap(), settings);
    }
}
