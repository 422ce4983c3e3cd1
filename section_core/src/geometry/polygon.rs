//! Simple polygons: area properties, extents and half-plane clipping.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::errors::{CalcError, CalcResult};

/// A point in the section plane (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Coordinates in the bending frame rotated by `theta`, relative to `about`.
    ///
    /// `u` runs along the neutral axis, `v` points to the compressive face.
    #[inline]
    pub fn to_local(self, theta: f64, about: Point) -> (f64, f64) {
        let (s, c) = theta.sin_cos();
        let dx = self.x - about.x;
        let dy = self.y - about.y;
        (dx * c + dy * s, -dx * s + dy * c)
    }

    /// Perpendicular coordinate `v` of [`to_local`](Self::to_local)
    #[inline]
    pub fn v(self, theta: f64, about: Point) -> f64 {
        self.to_local(theta, about).1
    }
}

/// Extents of a shape in the bending frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl Extents {
    pub(crate) const EMPTY: Extents = Extents {
        u_min: f64::INFINITY,
        u_max: f64::NEG_INFINITY,
        v_min: f64::INFINITY,
        v_max: f64::NEG_INFINITY,
    };

    pub(crate) fn include(&mut self, u: f64, v: f64) {
        self.u_min = self.u_min.min(u);
        self.u_max = self.u_max.max(u);
        self.v_min = self.v_min.min(v);
        self.v_max = self.v_max.max(v);
    }

    pub(crate) fn merge(&mut self, other: &Extents) {
        self.u_min = self.u_min.min(other.u_min);
        self.u_max = self.u_max.max(other.u_max);
        self.v_min = self.v_min.min(other.v_min);
        self.v_max = self.v_max.max(other.v_max);
    }

    /// Distance between the extreme fibres perpendicular to the neutral axis
    pub fn depth(&self) -> f64 {
        self.v_max - self.v_min
    }
}

/// Area properties of a polygon.
///
/// Second moments are about axes through the centroid, parallel to x and y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaProperties {
    pub area: f64,
    pub cx: f64,
    pub cy: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub ixy: f64,
}

/// Closed simple polygon, stored counter-clockwise without a repeated closing vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = CalcError;

    fn try_from(vertices: Vec<Point>) -> CalcResult<Self> {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

impl Polygon {
    /// Create a polygon, normalising it to counter-clockwise order.
    ///
    /// Errors on fewer than three distinct vertices, non-finite coordinates
    /// or zero area.
    pub fn new(mut vertices: Vec<Point>) -> CalcResult<Self> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(CalcError::invalid_geometry(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(CalcError::invalid_geometry("polygon has non-finite coordinates"));
        }
        let signed = signed_area(&vertices);
        if signed == 0.0 {
            return Err(CalcError::invalid_geometry("polygon has zero area"));
        }
        if signed < 0.0 {
            vertices.reverse();
        }
        Ok(Polygon { vertices })
    }

    /// Axis-aligned rectangle `b` wide and `d` deep with its lower-left corner at `origin`
    pub fn rectangle(b: f64, d: f64, origin: Point) -> CalcResult<Self> {
        if !(b > 0.0) || !(d > 0.0) {
            return Err(CalcError::invalid_input(
                "rectangle",
                format!("{} x {}", b, d),
                "Width and depth must be positive",
            ));
        }
        Polygon::new(vec![
            origin,
            Point::new(origin.x + b, origin.y),
            Point::new(origin.x + b, origin.y + d),
            Point::new(origin.x, origin.y + d),
        ])
    }

    /// Regular `n`-gon with its first vertex on the +x side of `centre`
    pub fn regular(centre: Point, circumradius: f64, n: usize) -> CalcResult<Self> {
        if n < 3 {
            return Err(CalcError::invalid_input("n", n.to_string(), "Need at least 3 sides"));
        }
        if !(circumradius > 0.0) {
            return Err(CalcError::invalid_input(
                "circumradius",
                circumradius.to_string(),
                "Radius must be positive",
            ));
        }
        let vertices = (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64;
                Point::new(
                    centre.x + circumradius * angle.cos(),
                    centre.y + circumradius * angle.sin(),
                )
            })
            .collect();
        Polygon::new(vertices)
    }

    /// Regular `n`-gon whose area equals `area` (e.g. a bar of prescribed area)
    pub fn with_area(centre: Point, area: f64, n: usize) -> CalcResult<Self> {
        if !(area > 0.0) {
            return Err(CalcError::invalid_input("area", area.to_string(), "Area must be positive"));
        }
        if n < 3 {
            return Err(CalcError::invalid_input("n", n.to_string(), "Need at least 3 sides"));
        }
        let n_f = n as f64;
        let radius = (2.0 * area / (n_f * (2.0 * PI / n_f).sin())).sqrt();
        Polygon::regular(centre, radius, n)
    }

    /// Counter-clockwise vertices
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Enclosed area (positive)
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    /// Boundary length
    pub fn perimeter(&self) -> f64 {
        self.edges()
            .map(|(a, b)| ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt())
            .sum()
    }

    /// Area, centroid and centroidal second moments.
    ///
    /// The shoelace sums run relative to the first vertex so that small
    /// slabs far from the origin keep their precision.
    pub fn properties(&self) -> AreaProperties {
        let p0 = self.vertices[0];
        let mut a = 0.0;
        let mut qx = 0.0;
        let mut qy = 0.0;
        let mut ixx = 0.0;
        let mut iyy = 0.0;
        let mut ixy = 0.0;
        for (p, q) in self.edges() {
            let (xi, yi) = (p.x - p0.x, p.y - p0.y);
            let (xj, yj) = (q.x - p0.x, q.y - p0.y);
            let cross = xi * yj - xj * yi;
            a += cross;
            qx += cross * (yi + yj);
            qy += cross * (xi + xj);
            ixx += cross * (yi * yi + yi * yj + yj * yj);
            iyy += cross * (xi * xi + xi * xj + xj * xj);
            ixy += cross * (xi * yj + 2.0 * xi * yi + 2.0 * xj * yj + xj * yi);
        }
        let area = a / 2.0;
        let cx_local = qy / 6.0 / area;
        let cy_local = qx / 6.0 / area;
        AreaProperties {
            area,
            cx: p0.x + cx_local,
            cy: p0.y + cy_local,
            ixx: ixx / 12.0 - area * cy_local * cy_local,
            iyy: iyy / 12.0 - area * cx_local * cx_local,
            ixy: ixy / 24.0 - area * cx_local * cy_local,
        }
    }

    /// Extents in the bending frame relative to `about`
    pub fn extents(&self, theta: f64, about: Point) -> Extents {
        let mut ext = Extents::EMPTY;
        for p in &self.vertices {
            let (u, v) = p.to_local(theta, about);
            ext.include(u, v);
        }
        ext
    }

    /// Clip against the half-plane `v >= v_cut` (`keep_above`) or `v <= v_cut`,
    /// with `v` measured from the origin in the frame rotated by `theta`.
    ///
    /// Returns `None` when nothing of measurable area remains.
    pub fn clip(&self, theta: f64, v_cut: f64, keep_above: bool) -> Option<Polygon> {
        let side = |p: &Point| {
            let d = p.v(theta, Point::ORIGIN) - v_cut;
            if keep_above {
                d
            } else {
                -d
            }
        };

        let distances: Vec<f64> = self.vertices.iter().map(side).collect();
        if distances.iter().all(|&d| d >= 0.0) {
            return Some(self.clone());
        }
        if distances.iter().all(|&d| d <= 0.0) {
            return None;
        }

        let n = self.vertices.len();
        let mut out = Vec::with_capacity(n + 2);
        for i in 0..n {
            let j = (i + 1) % n;
            let (p, q) = (self.vertices[i], self.vertices[j]);
            let (dp, dq) = (distances[i], distances[j]);
            if dp >= 0.0 {
                out.push(p);
            }
            if (dp > 0.0 && dq < 0.0) || (dp < 0.0 && dq > 0.0) {
                let t = dp / (dp - dq);
                out.push(Point::new(p.x + t * (q.x - p.x), p.y + t * (q.y - p.y)));
            }
        }

        if out.len() < 3 {
            return None;
        }
        let clipped = Polygon { vertices: out };
        if clipped.area() <= self.area() * 1e-12 {
            return None;
        }
        Some(clipped)
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let (p, q) = (vertices[i], vertices[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>()
        / 2.0
}
