//! # Structural Engineering Equations
//!
//! Closed-form section equations kept in one place so the numerical engine
//! can be verified against textbook hand calculations.
//!
//! ## Modules
//!
//! - [`section`] - Rectangular, polygonal and reinforced-concrete section formulas
//!
//! ## Sign Conventions
//!
//! - **Strain / stress / axial force**: compression positive
//! - **Depths**: measured downward from the extreme compressive fibre
//! - **Moment**: positive causes compression on the top fibre (sagging)

pub mod section;

pub use section::{
    cracking_moment,
    doubly_reinforced_cracked_depth,
    modular_ratio,
    parallel_axis,
    rectangular_area,
    rectangular_moment_of_inertia,
    rectangular_section_modulus,
    regular_polygon_circumradius,
    regular_polygon_moment_of_inertia,
    singly_reinforced_moment_capacity,
};
