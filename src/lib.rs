//! # starksig
//!
//! Deterministic ECDSA over the Stark curve, bit-compatible with the
//! StarkNet reference implementation.
//!
//! The two pieces that make interoperability hard live here:
//!
//! - RFC 6979 nonce derivation (`sign::rfc6979::generate_k`) with the
//!   reference implementation's bit-truncation toggle, retry-skip counter
//!   and extra-entropy slot.
//! - The canonical message pipeline (`sign::encoding` and `sign::hashing`)
//!   that chunks a byte string into field elements and folds them through
//!   the Pedersen hash with a trailing length mix.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! starksig = "0.2"
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several
//! sub-crates:
//!
//! - `starksig-api`: traits and error types
//! - `starksig-params`: Stark curve parameters
//! - `starksig-sign`: encoder, chained hash, nonce engine and the
//!   signing/verification wrapper

#![cfg_attr(not(feature = "std"), no_std)]

// Core re-exports (always available)
pub use starksig_api as api;
pub use starksig_params as params;
pub use starksig_sign as sign;

/// Common imports for starksig users
pub mod prelude {
    // Re-export error types
    pub use crate::api::{Error, Result};

    // Re-export core traits
    pub use crate::api::{Signature, SignatureSerialize};

    // The Stark ECDSA scheme and its key/signature types
    pub use crate::sign::{
        EcdsaStark, EcdsaStarkPublicKey, EcdsaStarkSecretKey, EcdsaStarkSignature,
    };

    // Message pipeline entry points
    pub use crate::sign::encoding::encode_message;
    pub use crate::sign::hashing::{hash_elements, hash_message};
}
