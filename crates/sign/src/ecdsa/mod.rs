//! ECDSA signature implementation for the Stark curve
//!
//! This module provides the StarkNet variant of ECDSA: deterministic
//! RFC 6979 nonces, Pedersen-hashed messages, and the `2^251` range
//! bounds the on-chain verifier expects.

pub mod stark;

// Re-export the Stark scheme types
pub use stark::{EcdsaStark, EcdsaStarkPublicKey, EcdsaStarkSecretKey, EcdsaStarkSignature};
