//! Stark-curve digital signatures
//!
//! This crate implements the StarkNet variant of ECDSA with fully
//! deterministic RFC 6979 nonces, together with the canonical message
//! pipeline that turns arbitrary byte strings into signable field
//! elements.
//!
//! The pipeline runs leaves-first:
//!
//! 1. [`encoding::encode_message`] chunks a byte string into field
//!    elements plus a bit-length trailer.
//! 2. [`hashing::hash_elements`] folds the elements through the Pedersen
//!    two-to-one hash, mixing the element count in last.
//! 3. [`rfc6979::generate_k`] derives the signing nonce from the curve
//!    order, the private scalar and the message digest.
//! 4. [`ecdsa::EcdsaStark`] orchestrates the above into `(r, s)`
//!    signatures and their verification.

pub mod ecdsa;
pub mod encoding;
pub mod hashing;
pub mod rfc6979;

// Re-exports of the scheme and its key/signature types
pub use ecdsa::{EcdsaStark, EcdsaStarkPublicKey, EcdsaStarkSecretKey, EcdsaStarkSignature};
