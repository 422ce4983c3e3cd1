//! # Concrete Section
//!
//! A validated geometry together with its gross properties, computed once
//! at construction. Every analysis in [`crate::calculations`] takes a
//! `&ConcreteSection`; the methods here are shorthands for those calls.
//!
//! ## Example
//!
//! ```rust
//! use section_core::config::AnalysisSettings;
//! use section_core::geometry::{concrete_rectangular_section, BarLayout, RectangularSectionInput};
//! use section_core::materials::presets::{concrete, steel_elastic_plastic, ConcreteParameters};
//! use section_core::section::ConcreteSection;
//!
//! let input = RectangularSectionInput {
//!     width: 300.0,
//!     depth: 500.0,
//!     concrete: concrete("Concrete", &ConcreteParameters::aci(32.0)),
//!     steel: steel_elastic_plastic("Steel", 500.0, 200e3, 0.05),
//!     top: None,
//!     bottom: Some(BarLayout { count: 3, diameter: 20.0, area: None }),
//!     cover: 40.0,
//!     n_circle: 8,
//! };
//! let section = ConcreteSection::new(concrete_rectangular_section(&input).unwrap()).unwrap();
//!
//! let result = section
//!     .ultimate_bending_capacity(0.0, 0.0, &AnalysisSettings::default())
//!     .unwrap();
//! assert!(result.mv > 0.0);
//! ```

use log::info;

use crate::calculations::biaxial::{self, BiaxialBendingResult};
use crate::calculations::cracked::{self, CrackedResult};
use crate::calculations::gross::{self, GrossProperties, TransformedProperties};
use crate::calculations::interaction::{self, MomentInteractionResult};
use crate::calculations::moment_curvature::{self, MomentCurvatureResult};
use crate::calculations::stress::{self, StressResult};
use crate::calculations::ultimate::{self, UltimateBendingResult};
use crate::config::AnalysisSettings;
use crate::errors::CalcResult;
use crate::geometry::SectionGeometry;

/// Geometry plus gross properties.
#[derive(Debug, Clone)]
pub struct ConcreteSection {
    geometry: SectionGeometry,
    gross: GrossProperties,
}

impl ConcreteSection {
    /// Validate the geometry and compute its gross properties.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` / `InvalidInput` for empty or degenerate geometry
    /// and invalid materials.
    pub fn new(geometry: SectionGeometry) -> CalcResult<Self> {
        geometry.validate()?;
        let gross = gross::calculate(&geometry)?;
        info!(
            "section ready: {} regions, {} materials, area {:.1} mm², squash load {:.1} kN",
            geometry.regions().len(),
            geometry.materials().len(),
            gross.total_area,
            gross.squash_load / 1e3
        );
        Ok(ConcreteSection { geometry, gross })
    }

    pub fn geometry(&self) -> &SectionGeometry {
        &self.geometry
    }

    pub fn gross_properties(&self) -> &GrossProperties {
        &self.gross
    }

    /// Gross properties divided by `elastic_modulus`
    pub fn transformed_gross_properties(&self, elastic_modulus: f64) -> CalcResult<TransformedProperties> {
        self.gross.transformed(elastic_modulus)
    }

    /// Extreme-fibre distance perpendicular to a neutral axis at `theta`
    pub fn depth(&self, theta: f64) -> f64 {
        self.geometry.depth(theta)
    }

    /// Reference modulus for transformed properties.
    ///
    /// The configured value, else the modulus of the first concrete material,
    /// else the area-weighted mean modulus.
    pub fn reference_modulus(&self, settings: &AnalysisSettings) -> f64 {
        settings
            .reference_modulus
            .or_else(|| {
                self.geometry
                    .materials()
                    .iter()
                    .find(|m| m.is_concrete())
                    .map(|m| m.elastic_modulus())
            })
            .unwrap_or(self.gross.e_a / self.gross.total_area)
    }

    pub fn calculate_cracked_properties(&self, theta: f64) -> CalcResult<CrackedResult> {
        cracked::calculate(self, theta)
    }

    /// Elastic stresses in the uncracked section
    pub fn calculate_uncracked_stress(&self, n: f64, mx: f64, my: f64) -> CalcResult<StressResult> {
        stress::uncracked(self, n, mx, my)
    }

    /// Elastic stresses in the cracked section under `m` about its neutral axis
    pub fn calculate_cracked_stress(&self, cracked: &CrackedResult, m: f64) -> CalcResult<StressResult> {
        stress::cracked(self, cracked, m)
    }

    pub fn moment_curvature_analysis(
        &self,
        theta: f64,
        settings: &AnalysisSettings,
    ) -> CalcResult<MomentCurvatureResult> {
        moment_curvature::calculate(self, theta, settings)
    }

    pub fn ultimate_bending_capacity(
        &self,
        theta: f64,
        n: f64,
        settings: &AnalysisSettings,
    ) -> CalcResult<UltimateBendingResult> {
        ultimate::calculate(self, theta, n, &settings.solver)
    }

    pub fn moment_interaction_diagram(&self, settings: &AnalysisSettings) -> CalcResult<MomentInteractionResult> {
        interaction::calculate(self, settings)
    }

    pub fn biaxial_bending_diagram(&self, settings: &AnalysisSettings) -> CalcResult<BiaxialBendingResult> {
        biaxial::calculate(self, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryBuilder, Point, Polygon};
    use crate::materials::presets::{concrete, ConcreteParameters};
    use crate::testing::{reference_section, E_C};
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_modulus_defaults_to_concrete() {
        let section = reference_section();
        let mut settings = AnalysisSettings::default();
        assert_relative_eq!(section.reference_modulus(&settings), E_C);
        settings.reference_modulus = Some(200e3);
        assert_relative_eq!(section.reference_modulus(&settings), 200e3);
    }

    #[test]
    fn test_displaced_only_geometry_fails_fast() {
        let mut builder = GeometryBuilder::new();
        let conc = builder.add_material(concrete("C", &ConcreteParameters::reference_40mpa()));
        builder.add_bar(Point::new(0.0, 0.0), 100.0, 4, conc, conc).unwrap();
        // bar and its displaced twin cancel to zero net area
        let geometry = builder.build().unwrap();
        assert_eq!(ConcreteSection::new(geometry).unwrap_err().error_code(), "INVALID_GEOMETRY");
    }

    #[test]
    fn test_depth() {
        let section = reference_section();
        assert_relative_eq!(section.depth(0.0), 600.0);
        let mut builder = GeometryBuilder::new();
        let conc = builder.add_material(concrete("C", &ConcreteParameters::reference_40mpa()));
        builder
            .add_polygon(Polygon::rectangle(100.0, 100.0, Point::ORIGIN).unwrap(), conc)
            .unwrap();
        let square = ConcreteSection::new(builder.build().unwrap()).unwrap();
        assert_relative_eq!(square.depth(std::f64::consts::FRAC_PI_4), 100.0 * 2f64.sqrt(), max_relative = 1e-12);
    }
}
