//! # Material Presets
//!
//! Constructors for common concrete and reinforcing steel definitions.
//!
//! Concrete uses a linear, no-tension service law and an equivalent
//! rectangular stress block for ultimate. Steel uses an elastic-perfectly
//! plastic law for both.
//!
//! ## Stress Block Factors
//!
//! | Code        | α₁ (squash)                  | α₂                         | γ                              |
//! |-------------|------------------------------|----------------------------|--------------------------------|
//! | ACI 318-19  | 0.85                         | 0.85                       | 0.85 − 0.05(f'c − 28)/7, ≥ 0.65 |
//! | AS 3600-2018| 1.0 − 0.003 f'c, 0.72..=0.85 | 0.85 − 0.0015 f'c, ≥ 0.67  | 0.97 − 0.0025 f'c, ≥ 0.67      |
//!
//! When α₁ exceeds α₂ the squash load is larger than any axial force the
//! stress block can reach under the ultimate strain pivot.

use serde::{Deserialize, Serialize};

use super::{Material, MaterialKind, StressStrainProfile};

/// Normal-weight concrete density (kg/mm³)
pub const CONCRETE_DENSITY: f64 = 2.4e-6;

/// Steel density (kg/mm³)
pub const STEEL_DENSITY: f64 = 7.85e-6;

/// Everything needed to build a concrete [`Material`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteParameters {
    /// f'c (MPa)
    pub compressive_strength: f64,
    /// E_c (MPa)
    pub elastic_modulus: f64,
    /// Squash-load factor
    pub alpha_1: f64,
    /// Stress block intensity factor
    pub alpha_2: f64,
    /// Stress block depth factor
    pub gamma: f64,
    /// ε_cu
    pub ultimate_strain: f64,
    /// f_ct,f (MPa)
    pub flexural_tensile_strength: f64,
    /// Restrained shrinkage tension (MPa)
    pub residual_shrinkage_stress: f64,
    /// kg/mm³
    pub density: f64,
}

impl ConcreteParameters {
    /// ACI 318 stress block with E_c = 4700√f'c
    pub fn aci(compressive_strength: f64) -> Self {
        let beta_1 = (0.85 - 0.05 * (compressive_strength - 28.0) / 7.0).clamp(0.65, 0.85);
        ConcreteParameters {
            compressive_strength,
            elastic_modulus: 4700.0 * compressive_strength.sqrt(),
            alpha_1: 0.85,
            alpha_2: 0.85,
            gamma: beta_1,
            ultimate_strain: 0.003,
            flexural_tensile_strength: 0.62 * compressive_strength.sqrt(),
            residual_shrinkage_stress: 0.0,
            density: CONCRETE_DENSITY,
        }
    }

    /// AS 3600 stress block with E_c from the 2400 kg/m³ density formula
    pub fn as3600(compressive_strength: f64) -> Self {
        let f_cmi = 1.1 * compressive_strength;
        ConcreteParameters {
            compressive_strength,
            elastic_modulus: 2400f64.powf(1.5) * 0.043 * f_cmi.sqrt(),
            alpha_1: (1.0 - 0.003 * compressive_strength).clamp(0.72, 0.85),
            alpha_2: (0.85 - 0.0015 * compressive_strength).max(0.67),
            gamma: (0.97 - 0.0025 * compressive_strength).max(0.67),
            ultimate_strain: 0.003,
            flexural_tensile_strength: 0.6 * compressive_strength.sqrt(),
            residual_shrinkage_stress: 0.0,
            density: CONCRETE_DENSITY,
        }
    }

    /// 40 MPa concrete with E_c = 32.8 GPa, α = 0.85, γ = 0.77
    pub fn reference_40mpa() -> Self {
        ConcreteParameters {
            compressive_strength: 40.0,
            elastic_modulus: 32.8e3,
            alpha_1: 0.85,
            alpha_2: 0.85,
            gamma: 0.77,
            ultimate_strain: 0.003,
            flexural_tensile_strength: 0.6 * 40f64.sqrt(),
            residual_shrinkage_stress: 0.0,
            density: CONCRETE_DENSITY,
        }
    }
}

/// Build a concrete material from its parameters.
pub fn concrete(name: impl Into<String>, params: &ConcreteParameters) -> Material {
    Material {
        name: name.into(),
        density: params.density,
        kind: MaterialKind::Concrete {
            compressive_strength: params.compressive_strength,
            alpha_1: params.alpha_1,
            flexural_tensile_strength: params.flexural_tensile_strength,
            residual_shrinkage_stress: params.residual_shrinkage_stress,
        },
        service_profile: StressStrainProfile::LinearNoTension {
            elastic_modulus: params.elastic_modulus,
            ultimate_strain: params.ultimate_strain,
        },
        ultimate_profile: StressStrainProfile::RectangularBlock {
            compressive_strength: params.compressive_strength,
            alpha_2: params.alpha_2,
            gamma: params.gamma,
            ultimate_strain: params.ultimate_strain,
        },
    }
}

/// Elastic-perfectly plastic reinforcing steel.
pub fn steel_elastic_plastic(
    name: impl Into<String>,
    yield_strength: f64,
    elastic_modulus: f64,
    fracture_strain: f64,
) -> Material {
    let profile = StressStrainProfile::ElasticPlastic {
        elastic_modulus,
        yield_strength,
        fracture_strain,
    };
    Material {
        name: name.into(),
        density: STEEL_DENSITY,
        kind: MaterialKind::Steel { yield_strength },
        service_profile: profile.clone(),
        ultimate_profile: profile,
    }
}
