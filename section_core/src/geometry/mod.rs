//! # Discretized Geometry
//!
//! A section is a material table plus a list of material-tagged polygon
//! regions. Reinforcing bars are modelled as a bar region together with a
//! *displaced* region of the host material at the same location, so the
//! host's area is reduced by the bar area without cutting holes.
//!
//! ## Coordinates
//!
//! Global axes are x (right) and y (up). For a bending orientation `theta`
//! (angle of the neutral axis from x) the local frame is
//!
//! ```text
//! u =  x·cosθ + y·sinθ     (along the neutral axis)
//! v = −x·sinθ + y·cosθ     (towards the compressive face)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use section_core::geometry::{GeometryBuilder, Point, Polygon};
//! use section_core::materials::presets::{concrete, steel_elastic_plastic, ConcreteParameters};
//!
//! let mut builder = GeometryBuilder::new();
//! let conc = builder.add_material(concrete("Concrete", &ConcreteParameters::reference_40mpa()));
//! let steel = builder.add_material(steel_elastic_plastic("Steel", 500.0, 200e3, 0.05));
//! builder
//!     .add_polygon(Polygon::rectangle(300.0, 500.0, Point::ORIGIN).unwrap(), conc)
//!     .unwrap();
//! builder.add_bar(Point::new(150.0, 50.0), 314.0, 8, steel, conc).unwrap();
//!
//! let geometry = builder.build().unwrap();
//! assert_eq!(geometry.regions().len(), 3);
//! assert!((geometry.depth(0.0) - 500.0).abs() < 1e-9);
//! ```

pub mod library;
pub mod polygon;
pub mod region;

pub use library::{
    concrete_circular_section, concrete_rectangular_section, BarLayout, CircularSectionInput,
    RectangularSectionInput,
};
pub use polygon::{AreaProperties, Extents, Point, Polygon};
pub use region::Region;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{Material, MaterialId};

/// Materials and regions of one cross-section.
///
/// Deserialization goes through [`SectionGeometry::new`], so material ids
/// are checked on load as well as on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryData", into = "GeometryData")]
pub struct SectionGeometry {
    materials: Vec<Material>,
    regions: Vec<Region>,
    perimeter: f64,
}

#[derive(Clone, Serialize, Deserialize)]
struct GeometryData {
    materials: Vec<Material>,
    regions: Vec<Region>,
    #[serde(default)]
    perimeter: f64,
}

impl TryFrom<GeometryData> for SectionGeometry {
    type Error = CalcError;

    fn try_from(data: GeometryData) -> CalcResult<Self> {
        SectionGeometry::new(data.materials, data.regions, data.perimeter)
    }
}

impl From<SectionGeometry> for GeometryData {
    fn from(geometry: SectionGeometry) -> Self {
        GeometryData {
            materials: geometry.materials,
            regions: geometry.regions,
            perimeter: geometry.perimeter,
        }
    }
}

impl SectionGeometry {
    /// Assemble a geometry, checking that every region's material exists.
    pub fn new(materials: Vec<Material>, regions: Vec<Region>, perimeter: f64) -> CalcResult<Self> {
        let geometry = SectionGeometry {
            materials,
            regions,
            perimeter,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check region/material consistency and validate every material.
    pub fn validate(&self) -> CalcResult<()> {
        if self.regions.is_empty() {
            return Err(CalcError::invalid_geometry("section has no regions"));
        }
        for (i, region) in self.regions.iter().enumerate() {
            if region.material().0 >= self.materials.len() {
                return Err(CalcError::invalid_input(
                    format!("regions[{}].material", i),
                    region.material().0.to_string(),
                    format!("Only {} materials defined", self.materials.len()),
                ));
            }
        }
        for material in &self.materials {
            material.validate()?;
        }
        Ok(())
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material referenced by a region. Ids are checked at construction.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Outer perimeter (sum of the boundaries of the non-bar polygons)
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Extents of all regions in the bending frame relative to `about`
    pub fn extents(&self, theta: f64, about: Point) -> Extents {
        let mut ext = Extents::EMPTY;
        for region in &self.regions {
            ext.merge(&region.extents(theta, about));
        }
        ext
    }

    /// Distance between the extreme fibres perpendicular to the neutral axis
    pub fn depth(&self, theta: f64) -> f64 {
        self.extents(theta, Point::ORIGIN).depth()
    }
}

/// Incremental construction of a [`SectionGeometry`].
#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    materials: Vec<Material>,
    regions: Vec<Region>,
    perimeter: f64,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and return its id
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Add a solid polygon of `material`; its boundary counts towards the perimeter.
    pub fn add_polygon(&mut self, polygon: Polygon, material: MaterialId) -> CalcResult<&mut Self> {
        self.check_id(material)?;
        self.perimeter += polygon.perimeter();
        self.regions.push(Region::new(polygon, material, false));
        Ok(self)
    }

    /// Add a bar of `area` as a regular `n_circle`-gon at `centre`, displacing `host`.
    pub fn add_bar(
        &mut self,
        centre: Point,
        area: f64,
        n_circle: usize,
        material: MaterialId,
        host: MaterialId,
    ) -> CalcResult<&mut Self> {
        self.check_id(material)?;
        self.check_id(host)?;
        let polygon = Polygon::with_area(centre, area, n_circle)?;
        self.regions.push(Region::new(polygon.clone(), material, false));
        self.regions.push(Region::new(polygon, host, true));
        Ok(self)
    }

    pub fn build(self) -> CalcResult<SectionGeometry> {
        SectionGeometry::new(self.materials, self.regions, self.perimeter)
    }

    fn check_id(&self, id: MaterialId) -> CalcResult<()> {
        if id.0 >= self.materials.len() {
            return Err(CalcError::invalid_input(
                "material",
                id.0.to_string(),
                "Material id was not registered with this builder",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::presets::steel_elastic_plastic;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_geometry_fails() {
        let err = GeometryBuilder::new().build().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GEOMETRY");
    }

    #[test]
    fn test_unknown_material_rejected() {
        let mut builder = GeometryBuilder::new();
        let rect = Polygon::rectangle(10.0, 10.0, Point::ORIGIN).unwrap();
        assert!(builder.add_polygon(rect, MaterialId(0)).is_err());
    }

    #[test]
    fn test_deserialize_checks_material_ids() {
        let mut builder = GeometryBuilder::new();
        let steel = builder.add_material(steel_elastic_plastic("Steel", 250.0, 200e3, 0.05));
        builder
            .add_polygon(Polygon::rectangle(100.0, 200.0, Point::ORIGIN).unwrap(), steel)
            .unwrap();
        let geometry = builder.build().unwrap();

        let mut value = serde_json::to_value(&geometry).unwrap();
        let back: SectionGeometry = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, geometry);

        value["regions"][0]["material"] = serde_json::json!(7);
        let err = serde_json::from_value::<SectionGeometry>(value).unwrap_err();
        assert!(err.to_string().contains("regions[0].material"));
    }

    #[test]
    fn test_depth_and_perimeter() {
        let mut builder = GeometryBuilder::new();
        let steel = builder.add_material(steel_elastic_plastic("Steel", 250.0, 200e3, 0.05));
        builder
            .add_polygon(Polygon::rectangle(100.0, 200.0, Point::ORIGIN).unwrap(), steel)
            .unwrap();
        let geometry = builder.build().unwrap();
        assert_relative_eq!(geometry.perimeter(), 600.0);
        assert_relative_eq!(geometry.depth(0.0), 200.0);
        assert_relative_eq!(geometry.depth(PI / 2.0), 100.0, max_relative = 1e-12);
        let ext = geometry.extents(PI, Point::new(50.0, 100.0));
        assert_relative_eq!(ext.v_max, 100.0, max_relative = 1e-12);
    }
}
