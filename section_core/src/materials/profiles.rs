//! # Stress-Strain Profiles
//!
//! The closed set of constitutive laws a material can use. Every law maps a
//! strain to a stress with **compression positive**, and exposes the strains
//! at which its slope changes (breakpoints) so the equilibrium integrator can
//! split regions into slabs where the law is linear.
//!
//! ## JSON Serialization
//!
//! Profiles serialize with a "type" discriminator:
//!
//! ```json
//! { "type": "LinearNoTension", "elastic_modulus": 32800.0, "ultimate_strain": 0.003 }
//! { "type": "ElasticPlastic", "elastic_modulus": 200000.0, "yield_strength": 500.0, "fracture_strain": 0.05 }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Which of a material's two profiles to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Serviceability law (moment-curvature, cracking)
    Service,
    /// Ultimate law (capacity, interaction, biaxial)
    Ultimate,
}

/// Uniaxial stress-strain law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StressStrainProfile {
    /// σ = E·ε in tension and compression
    Linear {
        elastic_modulus: f64,
        ultimate_strain: f64,
    },
    /// σ = E·ε in compression, zero in tension
    LinearNoTension {
        elastic_modulus: f64,
        ultimate_strain: f64,
    },
    /// Bilinear law, stress plateaus at ±f_y
    ElasticPlastic {
        elastic_modulus: f64,
        yield_strength: f64,
        fracture_strain: f64,
    },
    /// Equivalent rectangular stress block.
    ///
    /// Carries α₂·f'c over the top γ fraction of the compression zone, i.e.
    /// for strains at or above (1 − γ)·ε_cu.
    RectangularBlock {
        compressive_strength: f64,
        alpha_2: f64,
        gamma: f64,
        ultimate_strain: f64,
    },
    /// User-defined law, linearly interpolated, zero outside the defined range
    Piecewise { strains: Vec<f64>, stresses: Vec<f64> },
}

impl StressStrainProfile {
    /// Stress at a given strain
    pub fn stress(&self, strain: f64) -> f64 {
        match self {
            StressStrainProfile::Linear { elastic_modulus, .. } => elastic_modulus * strain,
            StressStrainProfile::LinearNoTension { elastic_modulus, .. } => {
                if strain > 0.0 {
                    elastic_modulus * strain
                } else {
                    0.0
                }
            }
            StressStrainProfile::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => (elastic_modulus * strain).clamp(-yield_strength, *yield_strength),
            StressStrainProfile::RectangularBlock {
                compressive_strength,
                alpha_2,
                gamma,
                ultimate_strain,
            } => {
                if strain > 0.0 && strain >= (1.0 - gamma) * ultimate_strain {
                    alpha_2 * compressive_strength
                } else {
                    0.0
                }
            }
            StressStrainProfile::Piecewise { strains, stresses } => {
                match segment(strains, strain) {
                    Some(i) => {
                        let t = (strain - strains[i]) / (strains[i + 1] - strains[i]);
                        stresses[i] + t * (stresses[i + 1] - stresses[i])
                    }
                    None => 0.0,
                }
            }
        }
    }

    /// Slope dσ/dε at a given strain
    pub fn tangent_modulus(&self, strain: f64) -> f64 {
        match self {
            StressStrainProfile::Linear { elastic_modulus, .. } => *elastic_modulus,
            StressStrainProfile::LinearNoTension { elastic_modulus, .. } => {
                if strain > 0.0 {
                    *elastic_modulus
                } else {
                    0.0
                }
            }
            StressStrainProfile::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => {
                if (elastic_modulus * strain).abs() < *yield_strength {
                    *elastic_modulus
                } else {
                    0.0
                }
            }
            StressStrainProfile::RectangularBlock { .. } => 0.0,
            StressStrainProfile::Piecewise { strains, stresses } => match segment(strains, strain) {
                Some(i) => (stresses[i + 1] - stresses[i]) / (strains[i + 1] - strains[i]),
                None => 0.0,
            },
        }
    }

    /// Strains at which the law changes slope or jumps, ascending
    pub fn breakpoints(&self) -> Vec<f64> {
        match self {
            StressStrainProfile::Linear { .. } => Vec::new(),
            StressStrainProfile::LinearNoTension { .. } => vec![0.0],
            StressStrainProfile::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => {
                let yield_strain = yield_strength / elastic_modulus;
                vec![-yield_strain, yield_strain]
            }
            StressStrainProfile::RectangularBlock {
                gamma,
                ultimate_strain,
                ..
            } => vec![0.0, (1.0 - gamma) * ultimate_strain],
            StressStrainProfile::Piecewise { strains, .. } => strains.clone(),
        }
    }

    /// Range of strains the law is willing to evaluate, `(min, max)`.
    ///
    /// The tension limit is `-inf` for laws that carry no tension.
    pub fn strain_limits(&self) -> (f64, f64) {
        match self {
            StressStrainProfile::Linear { ultimate_strain, .. } => (-ultimate_strain, *ultimate_strain),
            StressStrainProfile::LinearNoTension { ultimate_strain, .. }
            | StressStrainProfile::RectangularBlock { ultimate_strain, .. } => {
                (f64::NEG_INFINITY, *ultimate_strain)
            }
            StressStrainProfile::ElasticPlastic { fracture_strain, .. } => {
                (-fracture_strain, *fracture_strain)
            }
            StressStrainProfile::Piecewise { strains, .. } => (
                strains.first().copied().unwrap_or(0.0),
                strains.last().copied().unwrap_or(0.0),
            ),
        }
    }

    /// Initial tangent modulus (slope just on the compressive side of zero strain)
    pub fn elastic_modulus(&self) -> f64 {
        match self {
            StressStrainProfile::Linear { elastic_modulus, .. }
            | StressStrainProfile::LinearNoTension { elastic_modulus, .. }
            | StressStrainProfile::ElasticPlastic { elastic_modulus, .. } => *elastic_modulus,
            StressStrainProfile::RectangularBlock { .. } => 0.0,
            StressStrainProfile::Piecewise { .. } => self.tangent_modulus(0.0),
        }
    }

    /// Compressive strain limit
    pub fn ultimate_strain(&self) -> f64 {
        self.strain_limits().1
    }

    /// Largest compressive stress the law can reach
    pub fn compressive_strength(&self) -> f64 {
        match self {
            StressStrainProfile::Linear {
                elastic_modulus,
                ultimate_strain,
            }
            | StressStrainProfile::LinearNoTension {
                elastic_modulus,
                ultimate_strain,
            } => elastic_modulus * ultimate_strain,
            StressStrainProfile::ElasticPlastic { yield_strength, .. } => *yield_strength,
            StressStrainProfile::RectangularBlock {
                compressive_strength,
                alpha_2,
                ..
            } => alpha_2 * compressive_strength,
            StressStrainProfile::Piecewise { stresses, .. } => {
                stresses.iter().copied().fold(0.0, f64::max)
            }
        }
    }

    /// Largest tensile stress the law can reach (zero or negative)
    pub fn tensile_strength(&self) -> f64 {
        match self {
            StressStrainProfile::Linear {
                elastic_modulus,
                ultimate_strain,
            } => -elastic_modulus * ultimate_strain,
            StressStrainProfile::LinearNoTension { .. } | StressStrainProfile::RectangularBlock { .. } => 0.0,
            StressStrainProfile::ElasticPlastic { yield_strength, .. } => -yield_strength,
            StressStrainProfile::Piecewise { stresses, .. } => {
                stresses.iter().copied().fold(0.0, f64::min)
            }
        }
    }

    /// Reject strains outside [`strain_limits`](Self::strain_limits).
    pub fn check_strain(&self, material: &str, strain: f64) -> CalcResult<()> {
        let (min_strain, max_strain) = self.strain_limits();
        // small slack so a pivot exactly at the limit is not a failure
        let slack = 1e-9 * max_strain.abs().max(1e-3);
        if strain > max_strain + slack || strain < min_strain - slack {
            return Err(CalcError::material_domain(material, strain, min_strain, max_strain));
        }
        Ok(())
    }

    /// Validate the profile parameters.
    pub fn validate(&self) -> CalcResult<()> {
        match self {
            StressStrainProfile::Linear {
                elastic_modulus,
                ultimate_strain,
            }
            | StressStrainProfile::LinearNoTension {
                elastic_modulus,
                ultimate_strain,
            } => {
                positive("elastic_modulus", *elastic_modulus)?;
                positive("ultimate_strain", *ultimate_strain)
            }
            StressStrainProfile::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                fracture_strain,
            } => {
                positive("elastic_modulus", *elastic_modulus)?;
                positive("yield_strength", *yield_strength)?;
                positive("fracture_strain", *fracture_strain)?;
                if *fracture_strain < yield_strength / elastic_modulus {
                    return Err(CalcError::invalid_input(
                        "fracture_strain",
                        fracture_strain.to_string(),
                        "Fracture strain must not be less than the yield strain",
                    ));
                }
                Ok(())
            }
            StressStrainProfile::RectangularBlock {
                compressive_strength,
                alpha_2,
                gamma,
                ultimate_strain,
            } => {
                positive("compressive_strength", *compressive_strength)?;
                positive("ultimate_strain", *ultimate_strain)?;
                unit_fraction("alpha_2", *alpha_2)?;
                unit_fraction("gamma", *gamma)
            }
            StressStrainProfile::Piecewise { strains, stresses } => {
                if strains.len() < 2 || strains.len() != stresses.len() {
                    return Err(CalcError::invalid_input(
                        "strains",
                        format!("{} strains, {} stresses", strains.len(), stresses.len()),
                        "Need at least two points and one stress per strain",
                    ));
                }
                if strains.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(CalcError::invalid_input(
                        "strains",
                        format!("{:?}", strains),
                        "Strains must be strictly increasing",
                    ));
                }
                if strains.iter().chain(stresses).any(|v| !v.is_finite()) {
                    return Err(CalcError::invalid_input(
                        "stresses",
                        format!("{:?}", stresses),
                        "All points must be finite",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Index `i` of the segment `[strains[i], strains[i+1])` containing `strain`.
///
/// The last point closes its segment.
fn segment(strains: &[f64], strain: f64) -> Option<usize> {
    let n = strains.len();
    if n < 2 || strain < strains[0] || strain > strains[n - 1] {
        return None;
    }
    let i = strains.partition_point(|&s| s <= strain);
    Some(i.saturating_sub(1).min(n - 2))
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive and finite"));
    }
    Ok(())
}

fn unit_fraction(field: &str, value: f64) -> CalcResult<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must lie in (0, 1]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn steel() -> StressStrainProfile {
        StressStrainProfile::ElasticPlastic {
            elastic_modulus: 200e3,
            yield_strength: 500.0,
            fracture_strain: 0.05,
        }
    }

    fn block() -> StressStrainProfile {
        StressStrainProfile::RectangularBlock {
            compressive_strength: 40.0,
            alpha_2: 0.85,
            gamma: 0.77,
            ultimate_strain: 0.003,
        }
    }

    #[test]
    fn test_elastic_plastic() {
        let p = steel();
        assert_relative_eq!(p.stress(0.001), 200.0);
        assert_relative_eq!(p.stress(-0.001), -200.0);
        assert_relative_eq!(p.stress(0.01), 500.0);
        assert_relative_eq!(p.stress(-0.01), -500.0);
        // plateau continues past fracture
        assert_relative_eq!(p.stress(0.08), 500.0);
        assert_relative_eq!(p.tangent_modulus(0.001), 200e3);
        assert_eq!(p.tangent_modulus(0.01), 0.0);
        assert_eq!(p.breakpoints(), vec![-0.0025, 0.0025]);
        assert_eq!(p.strain_limits(), (-0.05, 0.05));
        assert_relative_eq!(p.tensile_strength(), -500.0);
    }

    #[test]
    fn test_rectangular_block() {
        let p = block();
        let onset = 0.23 * 0.003;
        assert_eq!(p.stress(onset * 0.99), 0.0);
        assert_relative_eq!(p.stress(onset * 1.01), 34.0);
        assert_relative_eq!(p.stress(0.003), 34.0);
        assert_eq!(p.stress(-0.001), 0.0);
        assert_relative_eq!(p.compressive_strength(), 34.0);
        assert_eq!(p.tensile_strength(), 0.0);
        assert_eq!(p.strain_limits().0, f64::NEG_INFINITY);
    }

    #[test]
    fn test_linear_no_tension() {
        let p = StressStrainProfile::LinearNoTension {
            elastic_modulus: 32.8e3,
            ultimate_strain: 0.003,
        };
        assert_relative_eq!(p.stress(0.001), 32.8);
        assert_eq!(p.stress(-0.001), 0.0);
        assert_eq!(p.tangent_modulus(-0.001), 0.0);
        assert_relative_eq!(p.elastic_modulus(), 32.8e3);
    }

    #[test]
    fn test_piecewise_interpolation() {
        let p = StressStrainProfile::Piecewise {
            strains: vec![-0.001, 0.0, 0.002, 0.0035],
            stresses: vec![0.0, 0.0, 40.0, 40.0],
        };
        p.validate().unwrap();
        assert_relative_eq!(p.stress(0.001), 20.0);
        assert_relative_eq!(p.stress(0.0035), 40.0);
        assert_eq!(p.stress(0.004), 0.0);
        assert_eq!(p.stress(-0.002), 0.0);
        assert_relative_eq!(p.tangent_modulus(0.001), 20e3);
        assert_relative_eq!(p.elastic_modulus(), 20e3);
        assert_eq!(p.strain_limits(), (-0.001, 0.0035));
    }

    #[test]
    fn test_check_strain() {
        let p = steel();
        assert!(p.check_strain("steel", 0.05).is_ok());
        let err = p.check_strain("steel", -0.06).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_DOMAIN");
        assert!(block().check_strain("concrete", -1.0).is_ok());
    }

    #[test]
    fn test_validation() {
        let bad = StressStrainProfile::Piecewise {
            strains: vec![0.0, 0.0],
            stresses: vec![0.0, 1.0],
        };
        assert!(bad.validate().is_err());

        let bad_gamma = StressStrainProfile::RectangularBlock {
            compressive_strength: 40.0,
            alpha_2: 0.85,
            gamma: 1.5,
            ultimate_strain: 0.003,
        };
        assert!(bad_gamma.validate().is_err());
        assert!(steel().validate().is_ok());
    }

    #[test]
    fn test_json_tag() {
        let json = serde_json::to_string(&steel()).unwrap();
        assert!(json.contains("\"type\":\"ElasticPlastic\""));
        let back: StressStrainProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, steel());
    }
}
