//! # Cracked Section Analysis
//!
//! Finds the cracking moment of a section bent about a neutral axis at
//! angle θ, then the neutral-axis depth and modulus-weighted properties of
//! the fully cracked elastic section.
//!
//! ## Method
//!
//! 1. **Cracking moment.** With `E·I_uu` the gross stiffness about the
//!    centroidal axis parallel to the neutral axis, a moment `M` stresses a
//!    concrete fibre at distance `d_t` below the centroid to
//!    `σ = E_c·M·d_t / E·I_uu`. Setting `σ` to the effective flexural tensile
//!    strength of each concrete gives `m_cr`; the smallest one governs.
//! 2. **Cracked neutral axis.** Concrete on the tension side of the neutral
//!    axis is discarded. The neutral axis of the remaining elastic section
//!    passes through its modulus-weighted centroid, which itself depends on
//!    where the axis is, so the depth `d_nc` is found with Brent's method.
//! 3. **Cracked properties.** Recomputed over the remaining regions exactly
//!    as for the gross section.
//!
//! A section with no concrete on the tension side of its centroid never
//! cracks: `m_cr` is `+inf` and the gross properties are returned.

use log::{debug, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::gross::{rotated_second_moment, WeightedMoments};
use super::roots;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Point, Region, SectionGeometry};
use crate::section::ConcreteSection;

/// Cracked section state for one bending orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackedResult {
    /// Neutral-axis angle (radians)
    pub theta: f64,
    /// Cracking moment (N·mm); `+inf` when the section does not crack,
    /// written as `null` in JSON
    #[serde(with = "unbounded")]
    pub m_cr: f64,
    /// Cracked neutral-axis depth from the extreme compressive fibre (mm)
    pub d_nc: f64,
    /// False when no concrete lies on the tension side
    pub cracks: bool,
    /// Regions that remain effective after cracking
    pub cracked_regions: Vec<Region>,

    pub e_a_cr: f64,
    pub e_qx_cr: f64,
    pub e_qy_cr: f64,
    /// Cracked centroid x (mm)
    pub cx: f64,
    /// Cracked centroid y (mm)
    pub cy: f64,
    pub e_ixx_g_cr: f64,
    pub e_iyy_g_cr: f64,
    pub e_ixy_g_cr: f64,
    pub e_ixx_c_cr: f64,
    pub e_iyy_c_cr: f64,
    pub e_ixy_c_cr: f64,
    /// E·I about the cracked centroidal axis parallel to the neutral axis
    pub e_iuu_cr: f64,

    #[serde(skip)]
    transformed: OnceCell<TransformedCrackedProperties>,
}

/// Cracked properties expressed in a single reference material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedCrackedProperties {
    pub elastic_modulus: f64,
    pub a_cr: f64,
    pub qx_cr: f64,
    pub qy_cr: f64,
    pub ixx_g_cr: f64,
    pub iyy_g_cr: f64,
    pub ixy_g_cr: f64,
    pub ixx_c_cr: f64,
    pub iyy_c_cr: f64,
    pub ixy_c_cr: f64,
    pub iuu_cr: f64,
}

impl CrackedResult {
    /// Transformed cracked properties, computed on first request and cached.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive modulus, or for a modulus different
    /// from the one the cache was first filled with.
    pub fn transformed(&self, elastic_modulus: f64) -> CalcResult<&TransformedCrackedProperties> {
        if !(elastic_modulus > 0.0) || !elastic_modulus.is_finite() {
            return Err(CalcError::invalid_input(
                "elastic_modulus",
                elastic_modulus.to_string(),
                "Reference modulus must be positive",
            ));
        }
        let props = self.transformed.get_or_init(|| {
            let e = elastic_modulus;
            TransformedCrackedProperties {
                elastic_modulus: e,
                a_cr: self.e_a_cr / e,
                qx_cr: self.e_qx_cr / e,
                qy_cr: self.e_qy_cr / e,
                ixx_g_cr: self.e_ixx_g_cr / e,
                iyy_g_cr: self.e_iyy_g_cr / e,
                ixy_g_cr: self.e_ixy_g_cr / e,
                ixx_c_cr: self.e_ixx_c_cr / e,
                iyy_c_cr: self.e_iyy_c_cr / e,
                ixy_c_cr: self.e_ixy_c_cr / e,
                iuu_cr: self.e_iuu_cr / e,
            }
        });
        if props.elastic_modulus != elastic_modulus {
            return Err(CalcError::invalid_input(
                "elastic_modulus",
                elastic_modulus.to_string(),
                format!(
                    "Transformed cracked properties were already computed with E = {}",
                    props.elastic_modulus
                ),
            ));
        }
        Ok(props)
    }

    /// Transformed cracked properties, if they have been computed
    pub fn cached_transformed(&self) -> Option<&TransformedCrackedProperties> {
        self.transformed.get()
    }

    fn from_moments(theta: f64, m_cr: f64, d_nc: f64, cracks: bool, regions: Vec<Region>, w: &WeightedMoments) -> Self {
        CrackedResult {
            theta,
            m_cr,
            d_nc,
            cracks,
            cracked_regions: regions,
            e_a_cr: w.e_a,
            e_qx_cr: w.e_qx,
            e_qy_cr: w.e_qy,
            cx: w.cx,
            cy: w.cy,
            e_ixx_g_cr: w.e_ixx_g(),
            e_iyy_g_cr: w.e_iyy_g(),
            e_ixy_g_cr: w.e_ixy_g(),
            e_ixx_c_cr: w.e_ixx_c,
            e_iyy_c_cr: w.e_iyy_c,
            e_ixy_c_cr: w.e_ixy_c,
            e_iuu_cr: rotated_second_moment(w.e_ixx_c, w.e_iyy_c, w.e_ixy_c, theta),
            transformed: OnceCell::new(),
        }
    }
}

/// `+inf` as JSON `null`; JSON has no infinity.
mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f64::INFINITY {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Calculate the cracking moment and cracked properties for bending at `theta`.
pub fn calculate(section: &ConcreteSection, theta: f64) -> CalcResult<CrackedResult> {
    let geometry = section.geometry();
    let gross = section.gross_properties();
    let centroid = gross.elastic_centroid();
    let e_iuu = gross.e_iuu(theta);

    // cracking moment: smallest over concrete materials with fibres below the centroid
    let mut m_cr = f64::INFINITY;
    for (index, material) in geometry.materials().iter().enumerate() {
        let Some(f_eff) = material.effective_tensile_strength() else {
            continue;
        };
        let v_min = geometry
            .regions()
            .iter()
            .filter(|r| r.material().0 == index && !r.is_displaced())
            .map(|r| r.extents(theta, centroid).v_min)
            .fold(f64::INFINITY, f64::min);
        let d_t = -v_min;
        if !(d_t > 0.0) || !d_t.is_finite() {
            continue;
        }
        m_cr = m_cr.min(f_eff * e_iuu / (material.elastic_modulus() * d_t));
    }

    let ext = geometry.extents(theta, Point::ORIGIN);
    let depth = ext.depth();

    if !m_cr.is_finite() {
        info!("section does not crack at theta = {:.4}", theta);
        let regions = geometry.regions().to_vec();
        let weighted = weigh(geometry, &regions)
            .ok_or_else(|| CalcError::invalid_geometry("modulus-weighted area must be positive"))?;
        let d_nc = ext.v_max - centroid.v(theta, Point::ORIGIN);
        return Ok(CrackedResult::from_moments(theta, m_cr, d_nc, false, regions, &weighted));
    }

    // v_na − v_centroid of the cracked section; positive while the axis sits above its centroid
    let offset = |d_n: f64| -> CalcResult<f64> {
        let v_na = ext.v_max - d_n;
        let regions = cracked_regions(geometry, theta, v_na);
        match weigh(geometry, &regions) {
            Some(w) => Ok(v_na - Point::new(w.cx, w.cy).v(theta, Point::ORIGIN)),
            None => Ok(depth),
        }
    };

    let lo = depth * 1e-9;
    let f_lo = offset(lo)?;
    let f_hi = offset(depth)?;
    if !(f_lo > 0.0) {
        return Err(CalcError::invalid_geometry(
            "cracked section has no tension reinforcement to balance the compression zone",
        ));
    }
    let root = roots::brent(offset, lo, depth, f_lo, f_hi, depth * 1e-12, 0.0, 200)?;
    let d_nc = root.x;

    let regions = cracked_regions(geometry, theta, ext.v_max - d_nc);
    let weighted = weigh(geometry, &regions)
        .ok_or_else(|| CalcError::invalid_geometry("cracked section has no stiffness"))?;

    debug!(
        "cracked at theta = {:.4}: m_cr = {:.4e}, d_nc = {:.3} after {} iterations",
        theta, m_cr, d_nc, root.iterations
    );

    Ok(CrackedResult::from_moments(theta, m_cr, d_nc, true, regions, &weighted))
}

/// Regions that remain after discarding concrete below `v_na`.
fn cracked_regions(geometry: &SectionGeometry, theta: f64, v_na: f64) -> Vec<Region> {
    geometry
        .regions()
        .iter()
        .filter_map(|region| {
            if geometry.material(region.material()).is_concrete() {
                region.clip(theta, v_na, true)
            } else {
                Some(region.clone())
            }
        })
        .collect()
}

fn weigh(geometry: &SectionGeometry, regions: &[Region]) -> Option<WeightedMoments> {
    WeightedMoments::accumulate(
        regions
            .iter()
            .map(|r| (geometry.material(r.material()).elastic_modulus(), r)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::section::doubly_reinforced_cracked_depth;
    use crate::geometry::{GeometryBuilder, Polygon};
    use crate::materials::presets::steel_elastic_plastic;
    use crate::testing::{reference_section, E_C, E_S};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_cracked_depth_matches_quadratic() {
        let section = reference_section();
        let cracked = calculate(&section, 0.0).unwrap();
        let expected = doubly_reinforced_cracked_depth(400.0, E_C, E_S, 600.0, 38.0, 1350.0, 558.0);
        assert!(cracked.cracks);
        assert_relative_eq!(cracked.d_nc, expected, max_relative = 1e-6);
        assert!(cracked.d_nc > 0.0 && cracked.d_nc < section.depth(0.0));
    }

    #[test]
    fn test_cracking_moment_closed_form() {
        let section = reference_section();
        let gross = section.gross_properties();
        let cracked = calculate(&section, 0.0).unwrap();
        let f_ct = 0.6 * 40f64.sqrt();
        let expected = f_ct * (gross.e_ixx_c / E_C) / gross.cy;
        assert_relative_eq!(cracked.m_cr, expected, max_relative = 1e-9);
        assert!(cracked.m_cr > 0.0);
    }

    #[test]
    fn test_cracked_centroid_on_neutral_axis() {
        let section = reference_section();
        let cracked = calculate(&section, 0.0).unwrap();
        assert_relative_eq!(cracked.cy, 600.0 - cracked.d_nc, max_relative = 1e-9);
        assert!(cracked.e_iuu_cr < section.gross_properties().e_ixx_c);
        assert_relative_eq!(cracked.e_iuu_cr, cracked.e_ixx_c_cr, max_relative = 1e-12);
    }

    #[test]
    fn test_hogging_uses_top_steel() {
        let section = reference_section();
        let sagging = calculate(&section, 0.0).unwrap();
        let hogging = calculate(&section, PI).unwrap();
        // less steel in tension when hogging: shallower compression zone
        assert!(hogging.d_nc < sagging.d_nc);
        let expected = doubly_reinforced_cracked_depth(400.0, E_C, E_S, 1350.0, 42.0, 600.0, 562.0);
        assert_relative_eq!(hogging.d_nc, expected, max_relative = 1e-6);
    }

    #[test]
    fn test_transformed_cache() {
        let section = reference_section();
        let cracked = calculate(&section, 0.0).unwrap();
        assert!(cracked.cached_transformed().is_none());

        let t = cracked.transformed(E_C).unwrap();
        assert_relative_eq!(t.iuu_cr, cracked.e_iuu_cr / E_C);
        assert!(cracked.cached_transformed().is_some());
        assert!(cracked.transformed(E_C).is_ok());

        let err = cracked.transformed(E_S).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(cracked.cached_transformed().unwrap().elastic_modulus, E_C);
        assert!(cracked.transformed(0.0).is_err());
    }

    #[test]
    fn test_steel_section_does_not_crack() {
        let mut builder = GeometryBuilder::new();
        let steel = builder.add_material(steel_elastic_plastic("Steel", 250.0, E_S, 0.05));
        builder
            .add_polygon(Polygon::rectangle(100.0, 200.0, Point::ORIGIN).unwrap(), steel)
            .unwrap();
        let section = ConcreteSection::new(builder.build().unwrap()).unwrap();
        let cracked = calculate(&section, 0.0).unwrap();
        assert!(!cracked.cracks);
        assert_eq!(cracked.m_cr, f64::INFINITY);
        assert_relative_eq!(cracked.e_a_cr, section.gross_properties().e_a, max_relative = 1e-12);
        assert_relative_eq!(cracked.d_nc, 100.0, max_relative = 1e-12);

        let json = serde_json::to_string(&cracked).unwrap();
        assert!(json.contains("\"m_cr\":null"));
        let back: CrackedResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.m_cr, f64::INFINITY);
        assert!(!back.cracks);
        assert_eq!(back.cracked_regions.len(), cracked.cracked_regions.len());
    }

    #[test]
    fn test_serialization_skips_cache() {
        let cracked = calculate(&reference_section(), 0.0).unwrap();
        cracked.transformed(E_C).unwrap();
        let json = serde_json::to_string(&cracked).unwrap();
        assert!(!json.contains("transformed"));
        let back: CrackedResult = serde_json::from_str(&json).unwrap();
        assert!(back.cached_transformed().is_none());
        assert_relative_eq!(back.d_nc, cracked.d_nc);
        assert_relative_eq!(back.m_cr, cracked.m_cr);
    }
}
