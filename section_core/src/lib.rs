//! # section_core - Reinforced Concrete Section Analysis
//!
//! `section_core` computes the properties and capacities of arbitrary
//! composite cross-sections: concrete regions with embedded reinforcement,
//! each region carrying its own stress-strain laws. All inputs, settings and
//! results are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: analyses are pure functions of a section and settings
//! - **JSON-First**: every record implements Serialize/Deserialize
//! - **Rich Errors**: structured error types; per-point failures are
//!   recorded in results instead of aborting a sweep
//!
//! ## Quick Start
//!
//! ```rust
//! use section_core::geometry::{concrete_rectangular_section, BarLayout, RectangularSectionInput};
//! use section_core::materials::presets::{concrete, steel_elastic_plastic, ConcreteParameters};
//! use section_core::ConcreteSection;
//!
//! let input = RectangularSectionInput {
//!     width: 400.0,
//!     depth: 600.0,
//!     concrete: concrete("40 MPa", &ConcreteParameters::as3600(40.0)),
//!     steel: steel_elastic_plastic("500N", 500.0, 200e3, 0.05),
//!     top: None,
//!     bottom: Some(BarLayout { count: 3, diameter: 24.0, area: None }),
//!     cover: 30.0,
//!     n_circle: 12,
//! };
//! let section = ConcreteSection::new(concrete_rectangular_section(&input).unwrap()).unwrap();
//!
//! let cracked = section.calculate_cracked_properties(0.0).unwrap();
//! assert!(cracked.m_cr > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`section`] - The analysed section: geometry plus gross properties
//! - [`calculations`] - Gross, cracked, stress, ultimate, moment-curvature and envelope analyses
//! - [`geometry`] - Polygons, regions and section builders
//! - [`materials`] - Materials and stress-strain laws
//! - [`equations`] - Closed-form reference formulas
//! - [`config`] - Analysis settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod equations;
pub mod errors;
pub mod geometry;
pub mod materials;
pub mod section;
pub mod units;

#[cfg(test)]
mod testing;

// Re-export commonly used types at crate root for convenience
pub use config::AnalysisSettings;
pub use errors::{CalcError, CalcResult};
pub use section::ConcreteSection;
