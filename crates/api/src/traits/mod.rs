//! Trait definitions for the starksig public API

pub mod signature;

pub use signature::{Signature, SignatureSerialize};
