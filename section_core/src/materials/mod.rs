//! # Materials
//!
//! Material records for composite sections. A material carries two
//! stress-strain profiles: a **service** law used for cracking and
//! moment-curvature analysis, and an **ultimate** law used for capacity,
//! interaction and biaxial envelopes.
//!
//! ## Material Types
//!
//! - **Concrete**: compressive strength, block factor α₁, flexural tensile
//!   strength and residual shrinkage stress
//! - **Steel**: yield strength
//!
//! ## Example
//!
//! ```rust
//! use section_core::materials::{presets, ProfileKind};
//!
//! let steel = presets::steel_elastic_plastic("N500", 500.0, 200e3, 0.05);
//! assert_eq!(steel.stress(0.01, ProfileKind::Ultimate), 500.0);
//! assert_eq!(steel.stress(-0.01, ProfileKind::Ultimate), -500.0);
//! ```

pub mod presets;
pub mod profiles;

pub use profiles::{ProfileKind, StressStrainProfile};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Index of a material in a section's material table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub usize);

/// Material family and the strength parameters that do not live in a profile.
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Concrete", "compressive_strength": 40.0, "alpha_1": 0.85,
///   "flexural_tensile_strength": 3.79, "residual_shrinkage_stress": 0.0 }
/// { "type": "Steel", "yield_strength": 500.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialKind {
    Concrete {
        /// f'c (MPa)
        compressive_strength: f64,
        /// Squash-load factor: concrete carries α₁·f'c under uniform compression
        alpha_1: f64,
        /// f_ct,f (MPa)
        flexural_tensile_strength: f64,
        /// Tensile stress locked in by restrained shrinkage (MPa)
        #[serde(default)]
        residual_shrinkage_stress: f64,
    },
    Steel {
        /// f_y (MPa)
        yield_strength: f64,
    },
}

/// A structural material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name (e.g., "40 MPa Concrete")
    pub name: String,
    /// Mass density (kg/mm³)
    pub density: f64,
    /// Material family
    pub kind: MaterialKind,
    /// Law used for cracking and moment-curvature
    pub service_profile: StressStrainProfile,
    /// Law used for ultimate capacity
    pub ultimate_profile: StressStrainProfile,
}

impl Material {
    /// True for concrete materials
    pub fn is_concrete(&self) -> bool {
        matches!(self.kind, MaterialKind::Concrete { .. })
    }

    /// Elastic modulus used to weight gross properties (initial service tangent)
    pub fn elastic_modulus(&self) -> f64 {
        self.service_profile.elastic_modulus()
    }

    /// Profile of the requested kind
    pub fn profile(&self, kind: ProfileKind) -> &StressStrainProfile {
        match kind {
            ProfileKind::Service => &self.service_profile,
            ProfileKind::Ultimate => &self.ultimate_profile,
        }
    }

    /// Stress at `strain` under the requested profile
    pub fn stress(&self, strain: f64, kind: ProfileKind) -> f64 {
        self.profile(kind).stress(strain)
    }

    /// Stress carried under uniform ultimate compression (squash load contribution)
    pub fn ultimate_compressive_stress(&self) -> f64 {
        match self.kind {
            MaterialKind::Concrete {
                compressive_strength,
                alpha_1,
                ..
            } => alpha_1 * compressive_strength,
            MaterialKind::Steel { .. } => self.ultimate_profile.compressive_strength(),
        }
    }

    /// Stress carried under uniform ultimate tension (zero or negative)
    pub fn ultimate_tensile_stress(&self) -> f64 {
        match self.kind {
            MaterialKind::Concrete { .. } => 0.0,
            MaterialKind::Steel { .. } => self.ultimate_profile.tensile_strength(),
        }
    }

    /// Tensile stress that cracks the material, net of residual shrinkage.
    ///
    /// `None` for materials that do not crack.
    pub fn effective_tensile_strength(&self) -> Option<f64> {
        match self.kind {
            MaterialKind::Concrete {
                flexural_tensile_strength,
                residual_shrinkage_stress,
                ..
            } => Some((flexural_tensile_strength - residual_shrinkage_stress).max(0.0)),
            MaterialKind::Steel { .. } => None,
        }
    }

    /// Validate parameters and both profiles.
    pub fn validate(&self) -> CalcResult<()> {
        if self.density < 0.0 || !self.density.is_finite() {
            return Err(CalcError::invalid_input(
                "density",
                self.density.to_string(),
                "Density must be non-negative",
            ));
        }
        match self.kind {
            MaterialKind::Concrete {
                compressive_strength,
                alpha_1,
                flexural_tensile_strength,
                residual_shrinkage_stress,
            } => {
                if compressive_strength <= 0.0 {
                    return Err(CalcError::invalid_input(
                        "compressive_strength",
                        compressive_strength.to_string(),
                        "Compressive strength must be positive",
                    ));
                }
                if !(alpha_1 > 0.0 && alpha_1 <= 1.0) {
                    return Err(CalcError::invalid_input(
                        "alpha_1",
                        alpha_1.to_string(),
                        "alpha_1 must lie in (0, 1]",
                    ));
                }
                if flexural_tensile_strength < 0.0 || residual_shrinkage_stress < 0.0 {
                    return Err(CalcError::invalid_input(
                        "flexural_tensile_strength",
                        format!("{} / {}", flexural_tensile_strength, residual_shrinkage_stress),
                        "Tensile strength and shrinkage stress must be non-negative",
                    ));
                }
            }
            MaterialKind::Steel { yield_strength } => {
                if yield_strength <= 0.0 {
                    return Err(CalcError::invalid_input(
                        "yield_strength",
                        yield_strength.to_string(),
                        "Yield strength must be positive",
                    ));
                }
            }
        }
        self.service_profile.validate()?;
        self.ultimate_profile.validate()?;
        if self.elastic_modulus() <= 0.0 {
            return Err(CalcError::invalid_input(
                "service_profile",
                self.name.clone(),
                "Service profile must have a positive initial modulus",
            ));
        }
        Ok(())
    }

    /// Display name for reports
    pub fn display_name(&self) -> String {
        match self.kind {
            MaterialKind::Concrete { compressive_strength, .. } => {
                format!("{} (f'c = {:.0} MPa)", self.name, compressive_strength)
            }
            MaterialKind::Steel { yield_strength } => {
                format!("{} (fy = {:.0} MPa)", self.name, yield_strength)
            }
        }
    }
}
