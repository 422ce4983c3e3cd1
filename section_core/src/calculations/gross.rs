//! # Gross and Transformed Section Properties
//!
//! Linear-elastic, modulus-weighted properties of the uncracked section.
//! Every `e_` field is a sum over regions weighted by the material's service
//! elastic modulus; dividing by a reference modulus gives the familiar
//! transformed-section properties.
//!
//! ## Notation
//!
//! - `_g` suffix: about the global x and y axes through the origin
//! - `_c` suffix: about x and y axes through the elastic centroid
//! - `11` / `22`: principal axes, rotated by `phi` from x and y
//! - `plus` / `minus`: extreme fibre on the positive / negative side
//!
//! ## Example
//!
//! ```rust
//! use section_core::calculations::gross;
//! use section_core::geometry::{GeometryBuilder, Point, Polygon};
//! use section_core::materials::presets::steel_elastic_plastic;
//!
//! let mut builder = GeometryBuilder::new();
//! let steel = builder.add_material(steel_elastic_plastic("Plate", 250.0, 200e3, 0.05));
//! builder.add_polygon(Polygon::rectangle(100.0, 20.0, Point::ORIGIN).unwrap(), steel).unwrap();
//! let props = gross::calculate(&builder.build().unwrap()).unwrap();
//!
//! assert!((props.total_area - 2000.0).abs() < 1e-9);
//! assert!((props.squash_load - 500_000.0).abs() < 1e-6);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use super::equilibrium::{limit_state_actions, LimitState};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Point, Region, SectionGeometry};

/// Modulus-weighted properties of the uncracked section.
///
/// ## JSON Example
///
/// ```json
/// { "total_area": 240000.0, "e_a": 8.14e9, "cx": 200.0, "cy": 297.2, "phi": 0.0, "...": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossProperties {
    /// Net area of all regions (mm²)
    pub total_area: f64,
    /// Net area of concrete regions (mm²)
    pub concrete_area: f64,
    /// Area of non-concrete regions (mm²)
    pub steel_area: f64,
    /// Σ E·A (N)
    pub e_a: f64,
    /// Mass per unit length (kg/mm)
    pub mass: f64,
    /// Perimeter of the outer polygons (mm)
    pub perimeter: f64,

    /// Σ E·A·y (N·mm)
    pub e_qx: f64,
    /// Σ E·A·x (N·mm)
    pub e_qy: f64,
    /// Elastic centroid x (mm)
    pub cx: f64,
    /// Elastic centroid y (mm)
    pub cy: f64,

    pub e_ixx_g: f64,
    pub e_iyy_g: f64,
    pub e_ixy_g: f64,
    pub e_ixx_c: f64,
    pub e_iyy_c: f64,
    pub e_ixy_c: f64,
    /// Major principal E·I
    pub e_i11: f64,
    /// Minor principal E·I
    pub e_i22: f64,
    /// Principal axis angle (radians)
    pub phi: f64,

    pub e_zxx_plus: f64,
    pub e_zxx_minus: f64,
    pub e_zyy_plus: f64,
    pub e_zyy_minus: f64,
    pub e_z11_plus: f64,
    pub e_z11_minus: f64,
    pub e_z22_plus: f64,
    pub e_z22_minus: f64,

    /// Axial capacity under uniform ultimate compression (N, positive)
    pub squash_load: f64,
    /// Axial capacity under uniform ultimate tension (N, zero or negative)
    pub tensile_load: f64,
    /// Plastic centroid x (mm)
    pub axial_pc_x: f64,
    /// Plastic centroid y (mm)
    pub axial_pc_y: f64,
    /// Strain at the extreme compressive fibre at ultimate
    pub conc_ultimate_strain: f64,
}

impl GrossProperties {
    pub fn elastic_centroid(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn plastic_centroid(&self) -> Point {
        Point::new(self.axial_pc_x, self.axial_pc_y)
    }

    /// E·I about the axis through the elastic centroid at angle `theta` from x
    pub fn e_iuu(&self, theta: f64) -> f64 {
        rotated_second_moment(self.e_ixx_c, self.e_iyy_c, self.e_ixy_c, theta)
    }

    /// Divide every modulus-weighted quantity by `elastic_modulus`.
    pub fn transformed(&self, elastic_modulus: f64) -> CalcResult<TransformedProperties> {
        if !(elastic_modulus > 0.0) || !elastic_modulus.is_finite() {
            return Err(CalcError::invalid_input(
                "elastic_modulus",
                elastic_modulus.to_string(),
                "Reference modulus must be positive",
            ));
        }
        let e = elastic_modulus;
        let area = self.e_a / e;
        Ok(TransformedProperties {
            elastic_modulus: e,
            area,
            qx: self.e_qx / e,
            qy: self.e_qy / e,
            ixx_g: self.e_ixx_g / e,
            iyy_g: self.e_iyy_g / e,
            ixy_g: self.e_ixy_g / e,
            ixx_c: self.e_ixx_c / e,
            iyy_c: self.e_iyy_c / e,
            ixy_c: self.e_ixy_c / e,
            i11: self.e_i11 / e,
            i22: self.e_i22 / e,
            zxx_plus: self.e_zxx_plus / e,
            zxx_minus: self.e_zxx_minus / e,
            zyy_plus: self.e_zyy_plus / e,
            zyy_minus: self.e_zyy_minus / e,
            z11_plus: self.e_z11_plus / e,
            z11_minus: self.e_z11_minus / e,
            z22_plus: self.e_z22_plus / e,
            z22_minus: self.e_z22_minus / e,
            rx: (self.e_ixx_c / self.e_a).sqrt(),
            ry: (self.e_iyy_c / self.e_a).sqrt(),
            r11: (self.e_i11 / self.e_a).sqrt(),
            r22: (self.e_i22 / self.e_a).sqrt(),
        })
    }
}

/// Gross properties expressed in a single reference material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedProperties {
    /// Reference modulus (MPa)
    pub elastic_modulus: f64,
    pub area: f64,
    pub qx: f64,
    pub qy: f64,
    pub ixx_g: f64,
    pub iyy_g: f64,
    pub ixy_g: f64,
    pub ixx_c: f64,
    pub iyy_c: f64,
    pub ixy_c: f64,
    pub i11: f64,
    pub i22: f64,
    pub zxx_plus: f64,
    pub zxx_minus: f64,
    pub zyy_plus: f64,
    pub zyy_minus: f64,
    pub z11_plus: f64,
    pub z11_minus: f64,
    pub z22_plus: f64,
    pub z22_minus: f64,
    /// Radii of gyration (independent of the reference modulus)
    pub rx: f64,
    pub ry: f64,
    pub r11: f64,
    pub r22: f64,
}

/// Second moment about an axis through the centroid at angle `theta` from x.
#[inline]
pub fn rotated_second_moment(ixx: f64, iyy: f64, ixy: f64, theta: f64) -> f64 {
    let (s, c) = theta.sin_cos();
    ixx * c * c + iyy * s * s - 2.0 * ixy * s * c
}

/// Principal angle and moments `(phi, i11, i22)` of a centroidal inertia tensor
pub fn principal_axes(ixx: f64, iyy: f64, ixy: f64) -> (f64, f64, f64) {
    let phi = 0.5 * (-2.0 * ixy).atan2(ixx - iyy);
    let mean = 0.5 * (ixx + iyy);
    let radius = (0.25 * (ixx - iyy).powi(2) + ixy * ixy).sqrt();
    (phi, mean + radius, mean - radius)
}

/// Modulus-weighted sums over a set of regions, centroidal and global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeightedMoments {
    pub e_a: f64,
    pub e_qx: f64,
    pub e_qy: f64,
    pub cx: f64,
    pub cy: f64,
    pub e_ixx_c: f64,
    pub e_iyy_c: f64,
    pub e_ixy_c: f64,
}

impl WeightedMoments {
    /// Accumulate `(E, region)` pairs. `None` when the weighted area is not positive.
    pub(crate) fn accumulate<'a, I>(items: I) -> Option<WeightedMoments>
    where
        I: Iterator<Item = (f64, &'a Region)> + Clone,
    {
        let mut e_a = 0.0;
        let mut e_qx = 0.0;
        let mut e_qy = 0.0;
        for (e, region) in items.clone() {
            let c = region.centroid();
            e_a += e * region.area();
            e_qx += e * region.area() * c.y;
            e_qy += e * region.area() * c.x;
        }
        if !(e_a > 0.0) {
            return None;
        }
        let cx = e_qy / e_a;
        let cy = e_qx / e_a;

        let mut e_ixx_c = 0.0;
        let mut e_iyy_c = 0.0;
        let mut e_ixy_c = 0.0;
        for (e, region) in items {
            let c = region.centroid();
            let (ixx, iyy, ixy) = region.local_second_moments();
            let (dx, dy) = (c.x - cx, c.y - cy);
            e_ixx_c += e * (ixx + region.area() * dy * dy);
            e_iyy_c += e * (iyy + region.area() * dx * dx);
            e_ixy_c += e * (ixy + region.area() * dx * dy);
        }

        Some(WeightedMoments {
            e_a,
            e_qx,
            e_qy,
            cx,
            cy,
            e_ixx_c,
            e_iyy_c,
            e_ixy_c,
        })
    }

    pub fn e_ixx_g(&self) -> f64 {
        self.e_ixx_c + self.e_a * self.cy * self.cy
    }

    pub fn e_iyy_g(&self) -> f64 {
        self.e_iyy_c + self.e_a * self.cx * self.cx
    }

    pub fn e_ixy_g(&self) -> f64 {
        self.e_ixy_c + self.e_a * self.cx * self.cy
    }
}

/// Calculate gross properties of a section.
///
/// # Errors
///
/// `InvalidGeometry` when the geometry has no regions or its net area or
/// modulus-weighted area is not positive.
pub fn calculate(geometry: &SectionGeometry) -> CalcResult<GrossProperties> {
    if geometry.regions().is_empty() {
        return Err(CalcError::invalid_geometry("section has no regions"));
    }

    let mut total_area = 0.0;
    let mut concrete_area = 0.0;
    let mut steel_area = 0.0;
    let mut mass = 0.0;

    for region in geometry.regions() {
        let material = geometry.material(region.material());
        let area = region.area();
        total_area += area;
        if material.is_concrete() {
            concrete_area += area;
        } else {
            steel_area += area;
        }
        mass += area * material.density;
    }

    if !(total_area > 0.0) {
        return Err(CalcError::invalid_geometry(format!(
            "net section area must be positive, got {}",
            total_area
        )));
    }

    let weighted = WeightedMoments::accumulate(
        geometry
            .regions()
            .iter()
            .map(|r| (geometry.material(r.material()).elastic_modulus(), r)),
    )
    .ok_or_else(|| CalcError::invalid_geometry("modulus-weighted area must be positive"))?;

    let (phi, e_i11, e_i22) = principal_axes(weighted.e_ixx_c, weighted.e_iyy_c, weighted.e_ixy_c);

    let centroid = Point::new(weighted.cx, weighted.cy);
    let ext_x = geometry.extents(0.0, centroid);
    let ext_p = geometry.extents(phi, centroid);

    let conc_ultimate_strain = ultimate_pivot_strain(geometry);

    // plastic centroid: first moment of the squash forces about the origin
    let squash = limit_state_actions(geometry, LimitState::Squash, Point::ORIGIN);
    let tension = limit_state_actions(geometry, LimitState::Tension, Point::ORIGIN);
    let squash_load = squash.n;
    let tensile_load = tension.n;
    let (axial_pc_x, axial_pc_y) = if squash_load > 0.0 {
        (squash.my / squash_load, squash.mx / squash_load)
    } else {
        (weighted.cx, weighted.cy)
    };

    let props = GrossProperties {
        total_area,
        concrete_area,
        steel_area,
        e_a: weighted.e_a,
        mass,
        perimeter: geometry.perimeter(),
        e_qx: weighted.e_qx,
        e_qy: weighted.e_qy,
        cx: weighted.cx,
        cy: weighted.cy,
        e_ixx_g: weighted.e_ixx_g(),
        e_iyy_g: weighted.e_iyy_g(),
        e_ixy_g: weighted.e_ixy_g(),
        e_ixx_c: weighted.e_ixx_c,
        e_iyy_c: weighted.e_iyy_c,
        e_ixy_c: weighted.e_ixy_c,
        e_i11,
        e_i22,
        phi,
        e_zxx_plus: weighted.e_ixx_c / ext_x.v_max.abs(),
        e_zxx_minus: weighted.e_ixx_c / ext_x.v_min.abs(),
        e_zyy_plus: weighted.e_iyy_c / ext_x.u_max.abs(),
        e_zyy_minus: weighted.e_iyy_c / ext_x.u_min.abs(),
        e_z11_plus: e_i11 / ext_p.v_max.abs(),
        e_z11_minus: e_i11 / ext_p.v_min.abs(),
        e_z22_plus: e_i22 / ext_p.u_max.abs(),
        e_z22_minus: e_i22 / ext_p.u_min.abs(),
        squash_load,
        tensile_load,
        axial_pc_x,
        axial_pc_y,
        conc_ultimate_strain,
    };

    debug!(
        "gross properties: A = {:.1}, EA = {:.4e}, centroid = ({:.3}, {:.3}), phi = {:.4}",
        props.total_area, props.e_a, props.cx, props.cy, props.phi
    );

    Ok(props)
}

/// Strain pinned at the extreme compressive fibre at ultimate.
///
/// The smallest concrete ultimate strain; sections without concrete use the
/// smallest ultimate strain of any material.
fn ultimate_pivot_strain(geometry: &SectionGeometry) -> f64 {
    let min_strain = |concrete_only: bool| {
        geometry
            .materials()
            .iter()
            .filter(|m| !concrete_only || m.is_concrete())
            .map(|m| m.ultimate_profile.ultimate_strain())
            .fold(f64::INFINITY, f64::min)
    };
    let concrete = min_strain(true);
    if concrete.is_finite() {
        concrete
    } else {
        min_strain(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::section::{parallel_axis, rectangular_moment_of_inertia, regular_polygon_moment_of_inertia};
    use crate::geometry::{GeometryBuilder, Polygon};
    use crate::materials::presets::steel_elastic_plastic;
    use crate::testing::{reference_section_geometry, E_C, E_S};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Closed-form transformed section: concrete 400 x 600 net of bars, plus bars at E_s
    fn hand_calculation() -> (f64, f64, f64, f64) {
        let bars = [(200.0, 562.0), (450.0, 42.0)];
        let a_bars: f64 = bars.iter().map(|(a, _)| 3.0 * a).sum();
        let a_total = 240_000.0;
        let a_conc = a_total - a_bars;

        let e_a = E_C * a_conc + E_S * a_bars;
        let e_q = E_C * (240_000.0 * 300.0 - bars.iter().map(|(a, y)| 3.0 * a * y).sum::<f64>())
            + E_S * bars.iter().map(|(a, y)| 3.0 * a * y).sum::<f64>();
        let cy = e_q / e_a;

        let mut e_ixx = E_C * parallel_axis(rectangular_moment_of_inertia(400.0, 600.0), 240_000.0, 300.0 - cy);
        for (a, y) in bars {
            let i_bar = regular_polygon_moment_of_inertia(a, 4);
            e_ixx += 3.0 * (E_S - E_C) * parallel_axis(i_bar, a, y - cy);
        }
        (a_total, e_a, cy, e_ixx)
    }

    #[test]
    fn test_reference_section_matches_hand_calculation() {
        let props = calculate(&reference_section_geometry()).unwrap();
        let (area, e_a, cy, e_ixx) = hand_calculation();
        assert_relative_eq!(props.total_area, area, max_relative = 1e-6);
        assert_relative_eq!(props.e_a, e_a, max_relative = 1e-6);
        assert_relative_eq!(props.cx, 200.0, max_relative = 1e-6);
        assert_relative_eq!(props.cy, cy, max_relative = 1e-6);
        assert_relative_eq!(props.e_ixx_c, e_ixx, max_relative = 1e-6);
        assert_relative_eq!(props.concrete_area, 240_000.0 - 1950.0, max_relative = 1e-9);
        assert_relative_eq!(props.steel_area, 1950.0, max_relative = 1e-9);
    }

    #[test]
    fn test_parallel_axis_invariant() {
        let props = calculate(&reference_section_geometry()).unwrap();
        assert_relative_eq!(
            props.e_ixx_g,
            props.e_ixx_c + props.e_a * props.cy * props.cy,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            props.e_ixy_g,
            props.e_ixy_c + props.e_a * props.cx * props.cy,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_principal_moments() {
        let props = calculate(&reference_section_geometry()).unwrap();
        assert!(props.e_i11 >= props.e_i22);
        assert_relative_eq!(
            props.e_i11 + props.e_i22,
            props.e_ixx_c + props.e_iyy_c,
            max_relative = 1e-12
        );
        assert_relative_eq!(props.e_iuu(props.phi), props.e_i11, max_relative = 1e-9);
    }

    #[test]
    fn test_principal_axes_rotated_tensor() {
        let (phi, i11, i22) = principal_axes(5.0, 5.0, 3.0);
        assert_relative_eq!(i11, 8.0);
        assert_relative_eq!(i22, 2.0);
        assert_relative_eq!(rotated_second_moment(5.0, 5.0, 3.0, phi), 8.0, max_relative = 1e-12);
        assert_relative_eq!(phi.abs(), PI / 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_section_moduli_and_loads() {
        let props = calculate(&reference_section_geometry()).unwrap();
        assert_relative_eq!(props.e_zxx_plus, props.e_ixx_c / (600.0 - props.cy), max_relative = 1e-12);
        assert_relative_eq!(props.e_zxx_minus, props.e_ixx_c / props.cy, max_relative = 1e-12);
        assert_relative_eq!(props.e_zyy_plus, props.e_zyy_minus, max_relative = 1e-9);

        let squash = 0.85 * 40.0 * (240_000.0 - 1950.0) + 500.0 * 1950.0;
        assert_relative_eq!(props.squash_load, squash, max_relative = 1e-9);
        assert_relative_eq!(props.tensile_load, -500.0 * 1950.0, max_relative = 1e-9);
        assert_relative_eq!(props.conc_ultimate_strain, 0.003);
        assert!(props.axial_pc_y < 300.0 && props.axial_pc_y > props.cy - 20.0);
    }

    #[test]
    fn test_homogeneous_transformed_round_trip() {
        let mut builder = GeometryBuilder::new();
        let steel = builder.add_material(steel_elastic_plastic("Plate", 250.0, 200e3, 0.05));
        builder
            .add_polygon(Polygon::rectangle(150.0, 300.0, Point::new(10.0, 20.0)).unwrap(), steel)
            .unwrap();
        let props = calculate(&builder.build().unwrap()).unwrap();
        let t = props.transformed(200e3).unwrap();

        assert_relative_eq!(t.area, props.total_area, max_relative = 1e-12);
        assert_relative_eq!(t.ixx_c, rectangular_moment_of_inertia(150.0, 300.0), max_relative = 1e-9);
        assert_relative_eq!(t.iyy_c, rectangular_moment_of_inertia(300.0, 150.0), max_relative = 1e-9);
        assert_relative_eq!(t.qx, props.total_area * 170.0, max_relative = 1e-12);
        assert_relative_eq!(t.zxx_plus, 150.0 * 300.0 * 300.0 / 6.0, max_relative = 1e-9);
        assert_relative_eq!(props.mass, 45_000.0 * 7.85e-6, max_relative = 1e-12);
        assert_relative_eq!(props.axial_pc_x, props.cx, max_relative = 1e-12);
    }

    #[test]
    fn test_transformed_rejects_bad_modulus() {
        let props = calculate(&reference_section_geometry()).unwrap();
        assert_eq!(props.transformed(0.0).unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(props.transformed(-5.0).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
