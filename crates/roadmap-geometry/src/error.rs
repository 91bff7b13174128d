#![warn(missing_docs)]

//! Error types for the geometry library.
//!
//! This module defines the errors that can occur while assembling
//! transforms from caller-supplied components.

use thiserror::Error;

/// Errors that can occur when building geometric primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A location component is NaN or infinite.
    #[error("Non-finite location: {0}")]
    NonFiniteLocation(&'static str),
    /// A rotation component is NaN or infinite.
    #[error("Non-finite rotation: {0}")]
    NonFiniteRotation(&'static str),
}
