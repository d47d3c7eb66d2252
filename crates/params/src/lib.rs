//! Constant values for the starksig library
//!
//! Curve and encoding parameters are grouped per family; today the only
//! family is the Stark curve.

#![no_std]

pub mod stark;

pub use stark::*;
