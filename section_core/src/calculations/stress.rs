//! # Elastic Stress Analysis
//!
//! Stresses in every region of a section under service actions, assuming
//! plane sections and linear elastic materials.
//!
//! ## Uncracked
//!
//! With the gross modulus-weighted properties about the elastic centroid:
//!
//! ```text
//! ε(x, y) = N/EA + κx·(y − cy) + κy·(x − cx)
//! κx = (EIyy·Mx − EIxy·My) / (EIxx·EIyy − EIxy²)
//! κy = (EIxx·My − EIxy·Mx) / (EIxx·EIyy − EIxy²)
//! σ    = E_i·ε
//! ```
//!
//! ## Cracked
//!
//! Over the regions of a [`CrackedResult`] bent about its neutral axis:
//!
//! ```text
//! σ = E_i·M·v_c / EI_uu,cr
//! ```
//!
//! with `v_c` measured from the cracked centroid, which lies on the neutral
//! axis. Cracked stresses carry no axial force.
//!
//! Stress is linear over each region, so the resultant of a region is its
//! centroid stress times its signed area.

use log::debug;
use serde::{Deserialize, Serialize};

use super::cracked::CrackedResult;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Point, Region, SectionGeometry};
use crate::section::ConcreteSection;

/// Stresses over one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStress {
    pub material: String,
    /// True for the host material displaced by a bar; its force is negative
    pub displaced: bool,
    pub vertices: Vec<Point>,
    /// Stress at each vertex (MPa, compression positive)
    pub stresses: Vec<f64>,
    /// Stress at the region centroid (MPa)
    pub centroid_stress: f64,
    /// Resultant force (N)
    pub force: f64,
}

/// Stress state of a section under one set of actions.
///
/// ## JSON Example
///
/// ```json
/// {
///   "n": 0.0, "mx": 8.0e7, "my": 0.0,
///   "regions": [
///     { "material": "40 MPa Concrete", "displaced": false,
///       "vertices": [{ "x": 0.0, "y": 0.0 }, ...],
///       "stresses": [-4.1, -4.1, 4.2, 4.2],
///       "centroid_stress": 0.03, "force": 7.5e3 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressResult {
    /// Axial force (N)
    pub n: f64,
    /// Moment about x through the elastic centroid (N·mm)
    pub mx: f64,
    /// Moment about y through the elastic centroid (N·mm)
    pub my: f64,
    pub regions: Vec<RegionStress>,
}

impl StressResult {
    /// Sum of the region forces
    pub fn total_force(&self) -> f64 {
        self.regions.iter().map(|r| r.force).sum()
    }

    /// Smallest and largest vertex stress in regions of `material`
    pub fn stress_range(&self, material: &str) -> Option<(f64, f64)> {
        self.regions
            .iter()
            .filter(|r| r.material == material && !r.displaced)
            .flat_map(|r| r.stresses.iter().copied())
            .fold(None, |range, s| match range {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })
    }
}

/// ε = eps0 + kx·(y − origin.y) + ky·(x − origin.x)
#[derive(Debug, Clone, Copy)]
struct LinearStrain {
    origin: Point,
    eps0: f64,
    kx: f64,
    ky: f64,
}

impl LinearStrain {
    fn at(&self, p: Point) -> f64 {
        self.eps0 + self.kx * (p.y - self.origin.y) + self.ky * (p.x - self.origin.x)
    }
}

/// Stresses in the uncracked section under `n`, `mx` and `my`.
///
/// # Errors
///
/// `InvalidInput` for non-finite actions.
pub fn uncracked(section: &ConcreteSection, n: f64, mx: f64, my: f64) -> CalcResult<StressResult> {
    check_finite("n", n)?;
    check_finite("mx", mx)?;
    check_finite("my", my)?;

    let gross = section.gross_properties();
    let det = gross.e_ixx_c * gross.e_iyy_c - gross.e_ixy_c * gross.e_ixy_c;
    if !(det > 0.0) || !(gross.e_a > 0.0) {
        return Err(CalcError::invalid_geometry("section has no flexural stiffness"));
    }
    let field = LinearStrain {
        origin: gross.elastic_centroid(),
        eps0: n / gross.e_a,
        kx: (gross.e_iyy_c * mx - gross.e_ixy_c * my) / det,
        ky: (gross.e_ixx_c * my - gross.e_ixy_c * mx) / det,
    };
    debug!(
        "uncracked stress: eps0 = {:.4e}, kx = {:.4e}, ky = {:.4e}",
        field.eps0, field.kx, field.ky
    );

    let geometry = section.geometry();
    Ok(StressResult {
        n,
        mx,
        my,
        regions: region_stresses(geometry, geometry.regions(), &field),
    })
}

/// Stresses in the cracked section under a moment `m` about its neutral axis.
///
/// `m` is positive when it compresses the side kept by the cracked analysis.
///
/// # Errors
///
/// `InvalidInput` for a non-finite moment, `InvalidGeometry` when the
/// cracked section has no stiffness.
pub fn cracked(section: &ConcreteSection, cracked: &CrackedResult, m: f64) -> CalcResult<StressResult> {
    check_finite("m", m)?;
    if !(cracked.e_iuu_cr > 0.0) {
        return Err(CalcError::invalid_geometry("cracked section has no flexural stiffness"));
    }

    // ε = m·v_c / EI_uu with v_c = −(x − cx)·sinθ + (y − cy)·cosθ
    let (s, c) = cracked.theta.sin_cos();
    let curvature = m / cracked.e_iuu_cr;
    let field = LinearStrain {
        origin: Point::new(cracked.cx, cracked.cy),
        eps0: 0.0,
        kx: curvature * c,
        ky: -curvature * s,
    };

    Ok(StressResult {
        n: 0.0,
        mx: m * c,
        my: -m * s,
        regions: region_stresses(section.geometry(), &cracked.cracked_regions, &field),
    })
}

fn region_stresses(geometry: &SectionGeometry, regions: &[Region], field: &LinearStrain) -> Vec<RegionStress> {
    regions
        .iter()
        .map(|region| {
            let material = geometry.material(region.material());
            let e = material.elastic_modulus();
            let vertices = region.polygon().vertices().to_vec();
            let stresses = vertices.iter().map(|p| e * field.at(*p)).collect();
            let centroid_stress = e * field.at(region.centroid());
            RegionStress {
                material: material.name.clone(),
                displaced: region.is_displaced(),
                vertices,
                stresses,
                centroid_stress,
                force: centroid_stress * region.area(),
            }
        })
        .collect()
}

fn check_finite(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Action must be finite"))
    }
}
