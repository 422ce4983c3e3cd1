//! # Cross-Section Property Formulas
//!
//! Closed-form formulas for the properties of simple reinforced sections.
//! The numerical engine never calls these to produce results; they are the
//! hand calculations its output is checked against.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Second moment of area about a centroidal axis
//! - `S` = Section modulus (I/c, where c = distance to extreme fibre)
//! - `b` = Width of section
//! - `d` = Depth (height) of section
//! - `n` = Number of sides of a regular polygon
//!
//! ## References
//!
//! - Warner, Foster & Kilpatrick, *Reinforced Concrete Basics*, Ch. 3 and 4
//! - ACI 318-19 Section 22.2.2 (equivalent rectangular stress block)
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1

use std::f64::consts::PI;

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Calculate cross-sectional area for rectangular section
///
/// # Formula
/// A = b × d
///
/// # Example
/// ```rust
/// use section_core::equations::section::rectangular_area;
///
/// let area = rectangular_area(400.0, 600.0);
/// assert!((area - 240_000.0).abs() < 1e-9);
/// ```
#[inline]
pub fn rectangular_area(b: f64, d: f64) -> f64 {
    b * d
}

/// Calculate second moment of area for rectangular section about its centroid
///
/// ```text
///     ┌─────────┐
///     │         │
///   d │ ════════│ ← centroidal axis at d/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = bd³/12
///
/// # Example
/// ```rust
/// use section_core::equations::section::rectangular_moment_of_inertia;
///
/// let i = rectangular_moment_of_inertia(400.0, 600.0);
/// assert!((i - 7.2e9).abs() < 1.0);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, d: f64) -> f64 {
    b * d.powi(3) / 12.0
}

/// Calculate elastic section modulus for rectangular section
///
/// # Formula
/// S = I/c = bd²/6
#[inline]
pub fn rectangular_section_modulus(b: f64, d: f64) -> f64 {
    b * d.powi(2) / 6.0
}

// =============================================================================
// REGULAR POLYGONS (reinforcing bars)
// =============================================================================

/// Circumradius of a regular `n`-gon with the given area
///
/// # Formula
/// A = (n/2)·R²·sin(2π/n)  →  R = √(2A / (n·sin(2π/n)))
#[inline]
pub fn regular_polygon_circumradius(area: f64, n: usize) -> f64 {
    let n_f = n as f64;
    (2.0 * area / (n_f * (2.0 * PI / n_f).sin())).sqrt()
}

/// Second moment of area of a regular `n`-gon about any centroidal axis
///
/// Regular polygons (n ≥ 3) have an isotropic inertia tensor, so the value
/// is the same about every axis through the centroid.
///
/// # Formula
/// I = A·(6R² − a²)/24, with side a = 2R·sin(π/n)
///
/// # Example
/// ```rust
/// use section_core::equations::section::regular_polygon_moment_of_inertia;
///
/// // a square of area 450 mm² has I = A²/12
/// let i = regular_polygon_moment_of_inertia(450.0, 4);
/// assert!((i - 450.0_f64.powi(2) / 12.0).abs() < 1e-6);
/// ```
#[inline]
pub fn regular_polygon_moment_of_inertia(area: f64, n: usize) -> f64 {
    let r = regular_polygon_circumradius(area, n);
    let side = 2.0 * r * (PI / n as f64).sin();
    area * (6.0 * r * r - side * side) / 24.0
}

/// Transfer a centroidal second moment to a parallel axis
///
/// # Formula
/// I = I_c + A·d²
#[inline]
pub fn parallel_axis(i_centroidal: f64, area: f64, distance: f64) -> f64 {
    i_centroidal + area * distance * distance
}

// =============================================================================
// REINFORCED CONCRETE: ELASTIC AND CRACKED
// =============================================================================

/// Modular ratio n = E_s / E_c
#[inline]
pub fn modular_ratio(e_steel: f64, e_concrete: f64) -> f64 {
    e_steel / e_concrete
}

/// Cracking moment of an uncracked section
///
/// # Formula
/// M_cr = f_ct,f · I_t / y_t
///
/// where `I_t` is the transformed (concrete-referenced) second moment and
/// `y_t` the distance from the centroid to the extreme tension fibre.
#[inline]
pub fn cracking_moment(flexural_tensile_strength: f64, i_transformed: f64, y_tension: f64) -> f64 {
    flexural_tensile_strength * i_transformed / y_tension
}

/// Cracked neutral-axis depth of a doubly reinforced rectangular section
///
/// Concrete below the neutral axis carries no stress. Taking first moments
/// of the transformed section about the neutral axis, with the top layer in
/// compression (x > d_top) and the displaced concrete at that layer removed:
///
/// ```text
/// E_c·b·x²/2 + (E_s − E_c)·A_top·(x − d_top) = E_s·A_bot·(d_bot − x)
/// ```
///
/// The positive root of the resulting quadratic is returned.
///
/// # Arguments
/// * `b` - Section width
/// * `e_c`, `e_s` - Concrete and steel elastic moduli
/// * `a_top`, `d_top` - Compression steel area and depth from the top fibre
/// * `a_bot`, `d_bot` - Tension steel area and depth from the top fibre
pub fn doubly_reinforced_cracked_depth(
    b: f64,
    e_c: f64,
    e_s: f64,
    a_top: f64,
    d_top: f64,
    a_bot: f64,
    d_bot: f64,
) -> f64 {
    let qa = e_c * b / 2.0;
    let qb = (e_s - e_c) * a_top + e_s * a_bot;
    let qc = -((e_s - e_c) * a_top * d_top + e_s * a_bot * d_bot);
    (-qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
}

// =============================================================================
// REINFORCED CONCRETE: ULTIMATE
// =============================================================================

/// Pure-bending capacity of a singly reinforced rectangular section
///
/// Uses the equivalent rectangular stress block with tension steel yielding.
///
/// # Formula
/// a = A_s·f_y / (α₂·f'c·b),  M_u = A_s·f_y·(d − a/2)
pub fn singly_reinforced_moment_capacity(
    b: f64,
    d: f64,
    a_s: f64,
    yield_strength: f64,
    alpha_2: f64,
    compressive_strength: f64,
) -> f64 {
    let a = a_s * yield_strength / (alpha_2 * compressive_strength * b);
    a_s * yield_strength * (d - a / 2.0)
}

// =============================================================================
// UNIT TESTS
// =============================================================================
