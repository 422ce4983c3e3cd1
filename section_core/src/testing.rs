//! Shared fixtures for unit tests.

use crate::geometry::{concrete_rectangular_section, BarLayout, RectangularSectionInput, SectionGeometry};
use crate::materials::presets::{concrete, steel_elastic_plastic, ConcreteParameters};
use crate::section::ConcreteSection;

pub const E_C: f64 = 32.8e3;
pub const E_S: f64 = 200e3;

/// 400 x 600, 40 MPa concrete, 3 x 16 top and 3 x 24 bottom bars of 500 MPa steel, 30 cover
pub fn reference_input() -> RectangularSectionInput {
    RectangularSectionInput {
        width: 400.0,
        depth: 600.0,
        concrete: concrete("40 MPa Concrete", &ConcreteParameters::reference_40mpa()),
        steel: steel_elastic_plastic("500 MPa Steel", 500.0, E_S, 0.05),
        top: Some(BarLayout {
            count: 3,
            diameter: 16.0,
            area: Some(200.0),
        }),
        bottom: Some(BarLayout {
            count: 3,
            diameter: 24.0,
            area: Some(450.0),
        }),
        cover: 30.0,
        n_circle: 4,
    }
}

pub fn reference_section_geometry() -> SectionGeometry {
    concrete_rectangular_section(&reference_input()).unwrap()
}

pub fn reference_section() -> ConcreteSection {
    ConcreteSection::new(reference_section_geometry()).unwrap()
}

/// Same bars top and bottom: doubly symmetric about the section centre
pub fn symmetric_section() -> ConcreteSection {
    let mut input = reference_input();
    input.top = input.bottom;
    ConcreteSection::new(concrete_rectangular_section(&input).unwrap()).unwrap()
}
