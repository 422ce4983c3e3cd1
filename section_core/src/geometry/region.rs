//! Material-tagged regions.

use serde::{Deserialize, Serialize};

use super::polygon::{AreaProperties, Extents, Point, Polygon};
use crate::materials::MaterialId;

/// A polygon of a single material.
///
/// A *displaced* region has negative signed area: it removes the host
/// material where a bar sits, so the host area is the gross area minus the
/// bar area. Area properties are computed once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegionData", into = "RegionData")]
pub struct Region {
    polygon: Polygon,
    material: MaterialId,
    displaced: bool,
    props: AreaProperties,
}

#[derive(Clone, Serialize, Deserialize)]
struct RegionData {
    polygon: Polygon,
    material: MaterialId,
    #[serde(default)]
    displaced: bool,
}

impl From<RegionData> for Region {
    fn from(data: RegionData) -> Self {
        Region::new(data.polygon, data.material, data.displaced)
    }
}

impl From<Region> for RegionData {
    fn from(region: Region) -> Self {
        RegionData {
            polygon: region.polygon,
            material: region.material,
            displaced: region.displaced,
        }
    }
}

impl Region {
    pub fn new(polygon: Polygon, material: MaterialId, displaced: bool) -> Self {
        let mut props = polygon.properties();
        if displaced {
            props.area = -props.area;
            props.ixx = -props.ixx;
            props.iyy = -props.iyy;
            props.ixy = -props.ixy;
        }
        Region {
            polygon,
            material,
            displaced,
            props,
        }
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn is_displaced(&self) -> bool {
        self.displaced
    }

    /// Signed area (negative for displaced regions)
    pub fn area(&self) -> f64 {
        self.props.area
    }

    pub fn centroid(&self) -> Point {
        Point::new(self.props.cx, self.props.cy)
    }

    /// Signed centroidal second moments `(ixx, iyy, ixy)`
    pub fn local_second_moments(&self) -> (f64, f64, f64) {
        (self.props.ixx, self.props.iyy, self.props.ixy)
    }

    pub fn extents(&self, theta: f64, about: Point) -> Extents {
        self.polygon.extents(theta, about)
    }

    /// Part of the region on one side of `v = v_cut` (see [`Polygon::clip`])
    pub fn clip(&self, theta: f64, v_cut: f64, keep_above: bool) -> Option<Region> {
        self.polygon
            .clip(theta, v_cut, keep_above)
            .map(|polygon| Region::new(polygon, self.material, self.displaced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_displaced_region_is_negative() {
        let square = Polygon::with_area(Point::new(50.0, 50.0), 200.0, 4).unwrap();
        let bar = Region::new(square.clone(), MaterialId(1), false);
        let hole = Region::new(square, MaterialId(0), true);
        assert_relative_eq!(bar.area(), 200.0, max_relative = 1e-12);
        assert_relative_eq!(hole.area(), -200.0, max_relative = 1e-12);
        assert_relative_eq!(hole.local_second_moments().0, -bar.local_second_moments().0);
        assert_eq!(hole.centroid(), bar.centroid());
    }

    #[test]
    fn test_clip_keeps_tags() {
        let rect = Polygon::rectangle(100.0, 100.0, Point::ORIGIN).unwrap();
        let region = Region::new(rect, MaterialId(3), true);
        let half = region.clip(0.0, 50.0, true).unwrap();
        assert_eq!(half.material(), MaterialId(3));
        assert!(half.is_displaced());
        assert_relative_eq!(half.area(), -5000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_serde_recomputes_properties() {
        let rect = Polygon::rectangle(100.0, 50.0, Point::ORIGIN).unwrap();
        let region = Region::new(rect, MaterialId(0), false);
        let json = serde_json::to_string(&region).unwrap();
        assert!(!json.contains("props"));
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);
    }
}
