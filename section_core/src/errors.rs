//! # Error Types
//!
//! Structured error types for section_core. Each variant carries enough
//! context for a caller (human or program) to decide what to do next:
//! invalid geometry is fatal, while infeasible targets, solver
//! non-convergence and material domain errors are local to a single sweep
//! point or trace and never abort sibling computations.
//!
//! ## Example
//!
//! ```rust
//! use section_core::errors::{CalcError, CalcResult};
//!
//! fn validate_modulus(elastic_modulus: f64) -> CalcResult<()> {
//!     if elastic_modulus <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "elastic_modulus",
//!             elastic_modulus.to_string(),
//!             "Reference modulus must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_modulus(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for section_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for section analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Geometry cannot be analysed (no regions, zero or negative area)
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Requested axial force lies outside [tensile_load, squash_load]
    #[error("Infeasible axial target {n_target:.6e}: must lie within [{n_min:.6e}, {n_max:.6e}]")]
    InfeasibleTarget {
        n_target: f64,
        n_min: f64,
        n_max: f64,
    },

    /// Root finder exceeded its iteration cap or could not bracket a root
    #[error("Solver did not converge after {iterations} iterations (best estimate {best_estimate:.6e}, residual {residual:.6e})")]
    SolverNonConvergence {
        iterations: usize,
        best_estimate: f64,
        residual: f64,
    },

    /// A strain fell outside the domain of a material's stress-strain law
    #[error("Strain {strain:.6e} outside domain [{min_strain:.6e}, {max_strain:.6e}] of material '{material}'")]
    MaterialDomain {
        material: String,
        strain: f64,
        min_strain: f64,
        max_strain: f64,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Create an InfeasibleTarget error
    pub fn infeasible_target(n_target: f64, n_min: f64, n_max: f64) -> Self {
        CalcError::InfeasibleTarget {
            n_target,
            n_min,
            n_max,
        }
    }

    /// Create a SolverNonConvergence error
    pub fn non_convergence(iterations: usize, best_estimate: f64, residual: f64) -> Self {
        CalcError::SolverNonConvergence {
            iterations,
            best_estimate,
            residual,
        }
    }

    /// Create a MaterialDomain error
    pub fn material_domain(material: impl Into<String>, strain: f64, min_strain: f64, max_strain: f64) -> Self {
        CalcError::MaterialDomain {
            material: material.into(),
            strain,
            min_strain,
            max_strain,
        }
    }

    /// Check if this is a recoverable error (e.g., can retry with relaxed tolerance)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::SolverNonConvergence { .. })
    }

    /// Check if this error is local to one sweep point or trace.
    ///
    /// Local errors are recorded against the offending point; everything
    /// else stops the analysis.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            CalcError::InfeasibleTarget { .. }
                | CalcError::SolverNonConvergence { .. }
                | CalcError::MaterialDomain { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::InfeasibleTarget { .. } => "INFEASIBLE_TARGET",
            CalcError::SolverNonConvergence { .. } => "SOLVER_NON_CONVERGENCE",
            CalcError::MaterialDomain { .. } => "MATERIAL_DOMAIN",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
