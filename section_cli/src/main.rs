//! # Section Analysis CLI
//!
//! Runs every analysis on a 400 x 600 reinforced concrete beam and prints a
//! summary in kN and kN·m.
//!
//! ```text
//! section_cli [settings.json]
//! ```
//!
//! The optional argument is a JSON file of analysis settings; omitted
//! fields take their defaults. Set `RUST_LOG=debug` for solver detail.

use std::env;
use std::f64::consts::PI;
use std::fs;
use std::process::ExitCode;

use log::{error, info};
use section_core::calculations::moment_curvature;
use section_core::geometry::{concrete_rectangular_section, BarLayout, RectangularSectionInput};
use section_core::materials::presets::{concrete, steel_elastic_plastic, ConcreteParameters};
use section_core::units::{KilonewtonMetres, Kilonewtons, NewtonMillimetres, Newtons, PerMetre, PerMillimetre};
use section_core::{AnalysisSettings, CalcError, CalcResult, ConcreteSection};

fn kn(n: f64) -> f64 {
    Kilonewtons::from(Newtons(n)).value()
}

fn knm(m: f64) -> f64 {
    KilonewtonMetres::from(NewtonMillimetres(m)).value()
}

fn per_m(kappa: f64) -> f64 {
    PerMetre::from(PerMillimetre(kappa)).value()
}

fn banner(title: &str) {
    println!();
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
}

fn load_settings() -> CalcResult<AnalysisSettings> {
    match env::args().nth(1) {
        Some(path) => {
            info!("reading settings from {}", path);
            let json = fs::read_to_string(&path)
                .map_err(|e| CalcError::invalid_input("settings", path.clone(), e.to_string()))?;
            AnalysisSettings::from_json(&json)
        }
        None => Ok(AnalysisSettings::default()),
    }
}

fn reference_section() -> CalcResult<ConcreteSection> {
    let input = RectangularSectionInput {
        width: 400.0,
        depth: 600.0,
        concrete: concrete("40 MPa Concrete", &ConcreteParameters::reference_40mpa()),
        steel: steel_elastic_plastic("500 MPa Steel", 500.0, 200e3, 0.05),
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
        n_circle: 12,
    };
    ConcreteSection::new(concrete_rectangular_section(&input)?)
}

fn run() -> CalcResult<()> {
    let settings = load_settings()?;
    let section = reference_section()?;
    let gross = section.gross_properties();
    let e_ref = section.reference_modulus(&settings);
    let transformed = section.transformed_gross_properties(e_ref)?;

    banner("GROSS PROPERTIES");
    println!("  Total area:        {:.0} mm²", gross.total_area);
    println!("  Concrete area:     {:.0} mm²", gross.concrete_area);
    println!("  Steel area:        {:.0} mm²", gross.steel_area);
    println!("  Mass:              {:.1} kg/m", gross.mass * 1000.0);
    println!("  Elastic centroid:  ({:.1}, {:.1}) mm", gross.cx, gross.cy);
    println!("  Plastic centroid:  ({:.1}, {:.1}) mm", gross.axial_pc_x, gross.axial_pc_y);
    println!("  Squash load:       {:.0} kN", kn(gross.squash_load));
    println!("  Tensile load:      {:.0} kN", kn(gross.tensile_load));

    banner("TRANSFORMED PROPERTIES");
    println!("  E_ref:             {:.0} MPa", transformed.elastic_modulus);
    println!("  A:                 {:.0} mm²", transformed.area);
    println!("  Ixx:               {:.4e} mm⁴", transformed.ixx_c);
    println!("  Iyy:               {:.4e} mm⁴", transformed.iyy_c);
    println!("  Zxx+ / Zxx-:       {:.4e} / {:.4e} mm³", transformed.zxx_plus, transformed.zxx_minus);

    banner("CRACKED SECTION");
    for (label, theta) in [("Sagging", 0.0), ("Hogging", PI)] {
        let cracked = section.calculate_cracked_properties(theta)?;
        let props = cracked.transformed(e_ref)?;
        println!(
            "  {}: M_cr = {:.1} kN·m, d_nc = {:.1} mm, I_cr = {:.4e} mm⁴",
            label,
            knm(cracked.m_cr),
            cracked.d_nc,
            props.iuu_cr
        );
    }

    banner("ELASTIC STRESS");
    let uncracked = section.calculate_uncracked_stress(0.0, 80e6, 0.0)?;
    let cracked = section.calculate_cracked_properties(0.0)?;
    let cracked_stress = section.calculate_cracked_stress(&cracked, 120e6)?;
    for (label, result) in [("Uncracked, 80 kN·m", &uncracked), ("Cracked, 120 kN·m", &cracked_stress)] {
        println!("  {}:", label);
        for material in section.geometry().materials() {
            if let Some((lo, hi)) = result.stress_range(&material.name) {
                println!("    {:<18} {:>8.2} to {:>8.2} MPa", material.name, lo, hi);
            }
        }
    }

    banner("ULTIMATE BENDING");
    let ultimate = section.ultimate_bending_capacity(0.0, 0.0, &settings)?;
    println!("  d_n = {:.1} mm, k_u = {:.3}", ultimate.d_n, ultimate.k_u);
    println!("  M_u = {:.1} kN·m", knm(ultimate.moment_about_axis()));

    banner("MOMENT-CURVATURE");
    let traces = moment_curvature::calculate_many(&section, &[0.0, PI], &settings);
    for (label, trace) in ["Sagging", "Hogging"].iter().zip(traces) {
        match trace {
            Ok(trace) => {
                let kappa = trace.kappa().last().copied().unwrap_or(0.0);
                println!(
                    "  {}: {} points, M_max = {:.1} kN·m, κ_end = {:.4e} 1/m ({:?})",
                    label,
                    trace.len(),
                    knm(trace.max_moment()),
                    per_m(kappa),
                    trace.termination()
                );
            }
            Err(e) => error!("{} trace failed: {}", label, e),
        }
    }

    banner("MOMENT INTERACTION");
    let diagram = section.moment_interaction_diagram(&settings)?;
    println!("  {:>10}  {:>10}", "N (kN)", "M (kN·m)");
    for (n, m) in diagram.n.iter().zip(&diagram.m) {
        println!("  {:>10.0}  {:>10.1}", kn(*n), knm(*m));
    }
    if !diagram.failed.is_empty() {
        println!("  {} levels failed", diagram.failed.len());
    }

    banner("BIAXIAL BENDING");
    let biaxial = section.biaxial_bending_diagram(&settings)?;
    println!("  N = {:.0} kN", kn(biaxial.n));
    println!("  {:>8}  {:>10}  {:>10}", "θ (deg)", "Mx (kN·m)", "My (kN·m)");
    for ((theta, mx), my) in biaxial.theta.iter().zip(&biaxial.mx).zip(&biaxial.my) {
        println!("  {:>8.1}  {:>10.1}  {:>10.1}", theta.to_degrees(), knm(*mx), knm(*my));
    }

    banner("ULTIMATE RESULT (JSON)");
    println!("{}", serde_json::to_string_pretty(&ultimate)?);

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error [{}]: {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}
