//! Public API traits and types for the starksig library
//!
//! This crate provides the public API surface for the starksig workspace:
//! trait definitions and error types shared by every signature scheme
//! implementation.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod traits;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result};

// Re-export all traits from the traits module
pub use traits::{Signature, SignatureSerialize};

// Re-export trait modules for direct access
pub use traits::signature;
