//! # Section Library
//!
//! Ready-made reinforced concrete sections.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "width": 400.0,
//!   "depth": 600.0,
//!   "concrete": { "...": "Material" },
//!   "steel": { "...": "Material" },
//!   "top": { "count": 3, "diameter": 16.0, "area": 200.0 },
//!   "bottom": { "count": 3, "diameter": 24.0, "area": 450.0 },
//!   "cover": 30.0,
//!   "n_circle": 4
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{GeometryBuilder, Point, Polygon, SectionGeometry};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Material;

/// One layer (or ring) of identical bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    /// Number of bars
    pub count: usize,
    /// Nominal diameter (mm), used for placement
    pub diameter: f64,
    /// Bar area (mm²); defaults to π·d²/4
    #[serde(default)]
    pub area: Option<f64>,
}

impl BarLayout {
    pub fn bar_area(&self) -> f64 {
        self.area.unwrap_or(PI * self.diameter * self.diameter / 4.0)
    }

    fn validate(&self, field: &str) -> CalcResult<()> {
        if !(self.diameter > 0.0) || self.area.is_some_and(|a| !(a > 0.0)) {
            return Err(CalcError::invalid_input(
                field,
                format!("{:?}", self),
                "Bar diameter and area must be positive",
            ));
        }
        Ok(())
    }
}

/// Rectangular section with top and bottom bar layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangularSectionInput {
    /// Section width b (mm)
    pub width: f64,
    /// Section depth d (mm)
    pub depth: f64,
    pub concrete: Material,
    pub steel: Material,
    /// Bars along the top face
    #[serde(default)]
    pub top: Option<BarLayout>,
    /// Bars along the bottom face
    #[serde(default)]
    pub bottom: Option<BarLayout>,
    /// Clear cover to the bars (mm)
    pub cover: f64,
    /// Number of sides used to discretize each bar
    pub n_circle: usize,
}

/// Circular section with a ring of bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularSectionInput {
    /// Section diameter (mm)
    pub diameter: f64,
    /// Number of sides used to discretize the section outline
    pub n_segments: usize,
    pub concrete: Material,
    pub steel: Material,
    pub bars: BarLayout,
    /// Clear cover to the bars (mm)
    pub cover: f64,
    /// Number of sides used to discretize each bar
    pub n_circle: usize,
}

/// Build a rectangular reinforced concrete section with its lower-left corner at the origin.
///
/// Bars in a layer are spread evenly between the side covers; a single bar
/// sits on the centreline.
pub fn concrete_rectangular_section(input: &RectangularSectionInput) -> CalcResult<SectionGeometry> {
    let mut builder = GeometryBuilder::new();
    let conc = builder.add_material(input.concrete.clone());
    let steel = builder.add_material(input.steel.clone());
    builder.add_polygon(Polygon::rectangle(input.width, input.depth, Point::ORIGIN)?, conc)?;

    let layers = [("top", input.top), ("bottom", input.bottom)];
    for (name, layout) in layers {
        let Some(layout) = layout else { continue };
        layout.validate(name)?;
        let offset = input.cover + layout.diameter / 2.0;
        if 2.0 * offset >= input.width.min(input.depth) {
            return Err(CalcError::invalid_geometry(format!(
                "{} bars with cover {} do not fit in a {} x {} section",
                name, input.cover, input.width, input.depth
            )));
        }
        let y = if name == "top" { input.depth - offset } else { offset };
        for x in layer_positions(layout.count, offset, input.width - offset) {
            builder.add_bar(Point::new(x, y), layout.bar_area(), input.n_circle, steel, conc)?;
        }
    }

    builder.build()
}

/// Build a circular reinforced concrete section centred on the origin.
pub fn concrete_circular_section(input: &CircularSectionInput) -> CalcResult<SectionGeometry> {
    input.bars.validate("bars")?;
    let radius = input.diameter / 2.0;
    let ring = radius - input.cover - input.bars.diameter / 2.0;
    if !(ring > 0.0) {
        return Err(CalcError::invalid_geometry(format!(
            "bars with cover {} do not fit in a {} diameter section",
            input.cover, input.diameter
        )));
    }

    let mut builder = GeometryBuilder::new();
    let conc = builder.add_material(input.concrete.clone());
    let steel = builder.add_material(input.steel.clone());
    builder.add_polygon(Polygon::regular(Point::ORIGIN, radius, input.n_segments)?, conc)?;

    let area = input.bars.bar_area();
    for i in 0..input.bars.count {
        let angle = 2.0 * PI * i as f64 / input.bars.count as f64;
        let centre = Point::new(ring * angle.cos(), ring * angle.sin());
        builder.add_bar(centre, area, input.n_circle, steel, conc)?;
    }

    builder.build()
}

fn layer_positions(count: usize, start: f64, end: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![(start + end) / 2.0],
        _ => {
            let spacing = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + spacing * i as f64).collect()
        }
    }
}
