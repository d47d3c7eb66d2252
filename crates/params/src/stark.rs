//! Parameters for the Stark curve and its ECDSA variant
//!
//! The curve is `y^2 = x^3 + x + b` over the 252-bit Stark field prime.
//! Scalars (private keys, nonces, signature components) live in the
//! prime-order subgroup bounded by [`STARK_EC_ORDER_BE`].

/// Order of the Stark curve base point, big-endian
///
/// Decimal: 3618502788666131213697322783095070105526743751716087489154079457884512865583
pub const STARK_EC_ORDER_BE: [u8; 32] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xb7, 0x81, 0x12, 0x6d, 0xca, 0xe7, 0xb2, 0x32, 0x1e, 0x66, 0xa2, 0x41, 0xad, 0xc6,
    0x4d, 0x2f,
];

/// Stark field prime `2^251 + 17 * 2^192 + 1`, big-endian
pub const STARK_FIELD_PRIME_BE: [u8; 32] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x01,
];

/// Bit bound for message hashes and signature components
///
/// The StarkNet ECDSA variant requires the message hash, `r` and
/// `s^-1` to be strictly below `2^251` so they always fit a Cairo
/// field element with room for range checks.
pub const N_ELEMENT_BITS_ECDSA: usize = 251;

/// Size of a serialized Stark scalar or field element in bytes
pub const STARK_SCALAR_SIZE: usize = 32;

/// Bytes of message consumed per field element by the canonical encoder
///
/// One less than the field width so a chunk can never wrap the modulus.
pub const STARK_MSG_CHUNK_SIZE: usize = 31;

/// Size of a serialized public key in bytes (x || y, big-endian)
pub const STARK_PUBLIC_KEY_SIZE: usize = 64;

/// Size of a serialized secret key in bytes
pub const STARK_SECRET_KEY_SIZE: usize = 32;

/// Size of a serialized signature in bytes (r || s, big-endian)
pub const STARK_SIGNATURE_SIZE: usize = 64;
