//! Deterministic nonce derivation per RFC 6979 §3.2
//!
//! This is the engine that makes signing reproducible across
//! implementations: the same curve order, private scalar and message
//! digest must yield the same nonce here as in the StarkNet reference
//! code, bit for bit. Two quirks of that reference are therefore part of
//! the contract and preserved as first-class parameters rather than
//! normalized away:
//!
//! - a bit-truncation toggle (`truncate_by_shift`): candidate buffers
//!   wider than the order's bit length are either right-shifted down to
//!   `qlen` bits (standard RFC 6979 behavior) or taken verbatim;
//! - a retry-skip counter: the caller may ask for the n-th valid
//!   candidate instead of the first, which also serves as a deterministic
//!   retry channel for the signing wrapper.
//!
//! Malformed inputs (zero order, oversized private scalar) are programmer
//! errors; this module does not validate them.

use core::marker::PhantomData;

use hmac::digest::core_api::BlockSizeUser;
use hmac::digest::Digest;
use hmac::{Mac, SimpleHmac};
use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroize;

/// Interpret `data` as a big-endian integer of at most `qlen` bits.
///
/// With `should_shift` set, a buffer wider than `qlen` bits is
/// right-shifted so only its `qlen` most significant bits survive; with
/// the toggle off the raw integer is returned regardless of width. The
/// width is the buffer's, `8 * data.len()`, not the integer's.
pub fn bits2int(data: &[u8], qlen: u64, should_shift: bool) -> BigUint {
    let x = BigUint::from_bytes_be(data);
    let blen = 8 * data.len() as u64;

    if should_shift && blen > qlen {
        x >> (blen - qlen) as usize
    } else {
        x
    }
}

/// RFC 6979 `bits2octets`: truncate, conditionally subtract the order
/// once, serialize to `rolen` bytes.
///
/// The single subtraction is intentional - the RFC specifies one
/// conditional subtraction, not a full reduction, and the reference
/// implementation depends on it.
fn bits2octets(data: &[u8], order: &BigUint, qlen: u64, rolen: usize) -> Vec<u8> {
    let z1 = bits2int(data, qlen, true);
    let z2 = if z1 >= *order { z1 - order } else { z1 };
    int2octets_crop(&z2, rolen)
}

/// Serialize to exactly `rolen` bytes; the value must fit.
fn int2octets(x: &BigUint, rolen: usize) -> Vec<u8> {
    let bytes = minimal_bytes_be(x);
    debug_assert!(bytes.len() <= rolen, "scalar wider than the curve order");
    left_pad(bytes, rolen)
}

/// Serialize to exactly `rolen` bytes, keeping the leading bytes when the
/// value is wider instead of failing.
fn int2octets_crop(x: &BigUint, rolen: usize) -> Vec<u8> {
    let bytes = minimal_bytes_be(x);
    if bytes.len() >= rolen {
        bytes[..rolen].to_vec()
    } else {
        left_pad(bytes, rolen)
    }
}

fn left_pad(bytes: Vec<u8>, rolen: usize) -> Vec<u8> {
    let mut out = vec![0u8; rolen - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}

fn minimal_bytes_be(x: &BigUint) -> Vec<u8> {
    if x.is_zero() {
        Vec::new()
    } else {
        x.to_bytes_be()
    }
}

/// HMAC-chained `(k, v)` working state (RFC 6979 §3.2 steps B-G),
/// generic over the caller-selected digest.
///
/// Never escapes this module; both halves are scrubbed on drop.
struct HmacDrbg<D: Digest + BlockSizeUser + Clone> {
    k: Vec<u8>,
    v: Vec<u8>,
    _digest: PhantomData<D>,
}

impl<D: Digest + BlockSizeUser + Clone> HmacDrbg<D> {
    /// Run the two seeding rounds over
    /// `v || round_byte || x_octets || digest_octets || extra_entropy`.
    fn new(suite: [&[u8]; 3]) -> Self {
        let holen = <D as Digest>::output_size();
        let mut state = Self {
            k: vec![0x00; holen],
            v: vec![0x01; holen],
            _digest: PhantomData,
        };

        for round in 0x00u8..=0x01 {
            let mut mac = Self::keyed(&state.k);
            mac.update(&state.v);
            mac.update(&[round]);
            for part in suite {
                mac.update(part);
            }
            state.k = mac.finalize().into_bytes().to_vec();
            state.v = Self::prf(&state.k, &state.v);
        }

        state
    }

    /// Step H2: advance `v` and hand back the fresh output.
    fn next(&mut self) -> &[u8] {
        self.v = Self::prf(&self.k, &self.v);
        &self.v
    }

    /// Step H retry update: fold a zero byte into `k`, refresh `v`.
    fn bump(&mut self) {
        let mut mac = Self::keyed(&self.k);
        mac.update(&self.v);
        mac.update(&[0x00]);
        self.k = mac.finalize().into_bytes().to_vec();
        self.v = Self::prf(&self.k, &self.v);
    }

    fn keyed(key: &[u8]) -> SimpleHmac<D> {
        SimpleHmac::<D>::new_from_slice(key).expect("HMAC accepts keys of any length")
    }

    fn prf(key: &[u8], message: &[u8]) -> Vec<u8> {
        let mut mac = Self::keyed(key);
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }
}

impl<D: Digest + BlockSizeUser + Clone> Drop for HmacDrbg<D> {
    fn drop(&mut self) {
        self.k.zeroize();
        self.v.zeroize();
    }
}

/// Derive a deterministic nonce in `[1, order)`.
///
/// * `order` - order of the generator used in the signature
/// * `private_key` - private scalar in numeric form
/// * `digest` - hash of the signing data, big-endian
/// * `retry_skip` - how many valid candidates to skip before returning
/// * `extra_entropy` - additional seeding material per RFC 6979 §3.6
/// * `truncate_by_shift` - candidate truncation policy (see module docs)
///
/// The digest algorithm `D` keys every HMAC step and should match the
/// hash the caller signed with.
pub fn generate_k<D>(
    order: &BigUint,
    private_key: &BigUint,
    digest: &[u8],
    retry_skip: u32,
    extra_entropy: &[u8],
    truncate_by_shift: bool,
) -> BigUint
where
    D: Digest + BlockSizeUser + Clone,
{
    let qlen = order.bits();
    let rolen = ((qlen + 7) / 8) as usize;

    let mut x_octets = int2octets(private_key, rolen);
    let digest_octets = bits2octets(digest, order, qlen, rolen);

    let mut drbg = HmacDrbg::<D>::new([x_octets.as_slice(), digest_octets.as_slice(), extra_entropy]);
    x_octets.zeroize();

    let mut skips_left = retry_skip;
    loop {
        // Step H2: stretch `v` until at least `rolen` bytes are buffered
        let mut t = Vec::with_capacity(rolen);
        while t.len() < rolen {
            t.extend_from_slice(drbg.next());
        }

        // Step H3: derive and range-check the candidate
        let secret = bits2int(&t, qlen, truncate_by_shift);
        if !secret.is_zero() && secret < *order {
            if skips_left == 0 {
                return secret;
            }
            skips_left -= 1;
        }

        drbg.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use sha2::Sha256;
    use starksig_params::STARK_EC_ORDER_BE;

    fn stark_order() -> BigUint {
        BigUint::from_bytes_be(&STARK_EC_ORDER_BE)
    }

    fn biguint_from_hex(hex: &str) -> BigUint {
        BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()
    }

    // Reference vectors: order = Stark curve order, key = 1, digest = the
    // minimal big-endian form of 5, SHA-256. Produced by the reference
    // implementation's generate_k with and without shifting.
    #[test]
    fn reference_vector_with_shifting() {
        let k = generate_k::<Sha256>(&stark_order(), &BigUint::one(), b"\x05", 0, b"", true);
        assert_eq!(
            k,
            biguint_from_hex("02707E03E7F40F39667D5ACD867D25D6E29FF18976642E7F9BD45D0F07D57B17")
        );
    }

    #[test]
    fn reference_vector_without_shifting() {
        let k = generate_k::<Sha256>(&stark_order(), &BigUint::one(), b"\x05", 0, b"", false);
        assert_eq!(
            k,
            biguint_from_hex("019D482B334A0B9F7E335A96AF94AB94DAE0F18D40E7DBC8A47D4427E0EFB480")
        );
    }

    #[test]
    fn same_inputs_same_nonce() {
        let order = stark_order();
        let key = biguint_from_hex("03c1e9550e66958296d11b60f8e8e7a7ad990d07fa65d5f7652c4a6c87d4e3cc");
        let digest = hex::decode("c7e5895713c5e9642d1adf9a1e46c7e5895713c5e9642d1adf9a1e46").unwrap();
        let a = generate_k::<Sha256>(&order, &key, &digest, 0, b"", true);
        let b = generate_k::<Sha256>(&order, &key, &digest, 0, b"", true);
        assert_eq!(a, b);
        assert!(!a.is_zero() && a < order);
    }

    #[test]
    fn retry_skip_walks_the_candidate_stream() {
        let order = stark_order();
        let first = generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 0, b"", true);
        let second = generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 1, b"", true);
        let third = generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 2, b"", true);
        assert_ne!(first, second);
        assert_ne!(second, third);
        // Deterministic: skipping is repeatable
        assert_eq!(
            second,
            generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 1, b"", true)
        );
    }

    #[test]
    fn extra_entropy_changes_the_nonce() {
        let order = stark_order();
        let plain = generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 0, b"", true);
        let seeded = generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 0, b"\x00\x00\x00\x01", true);
        assert_ne!(plain, seeded);
    }

    #[test]
    fn shift_toggle_is_inert_when_qlen_covers_the_buffer() {
        // With a 256-bit order the 256-bit candidate buffer is never
        // wider than qlen, so both policies must agree.
        let order = (BigUint::one() << 256u32) - BigUint::one();
        let shifted = generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 0, b"", true);
        let raw = generate_k::<Sha256>(&order, &BigUint::one(), b"\x05", 0, b"", false);
        assert_eq!(shifted, raw);
    }

    #[test]
    fn bits2int_truncates_only_when_asked() {
        let data = [0xffu8; 32];
        assert_eq!(
            bits2int(&data, 252, true),
            (BigUint::one() << 252u32) - BigUint::one()
        );
        assert_eq!(
            bits2int(&data, 252, false),
            (BigUint::one() << 256u32) - BigUint::one()
        );
        // Narrow buffers are never shifted
        assert_eq!(bits2int(b"\x05", 252, true), BigUint::from(5u8));
        assert_eq!(bits2int(b"", 252, true), BigUint::zero());
    }

    #[test]
    fn bits2octets_subtracts_the_order_at_most_once() {
        let order = stark_order();
        let qlen = order.bits();

        // A 256-bit digest is truncated to qlen bits first; one that
        // truncates to exactly the order then serializes as zero
        let shifted_order = order.clone() << 4u32;
        assert_eq!(
            bits2octets(&shifted_order.to_bytes_be(), &order, qlen, 32),
            vec![0u8; 32]
        );

        // A small digest passes through untouched, left-padded
        let five = bits2octets(b"\x05", &order, qlen, 32);
        assert_eq!(five[31], 0x05);
        assert!(five[..31].iter().all(|&b| b == 0));
    }

    #[test]
    fn int2octets_pads_to_width() {
        assert_eq!(int2octets(&BigUint::from(5u8), 4), vec![0, 0, 0, 5]);
        assert_eq!(int2octets(&BigUint::zero(), 2), vec![0, 0]);
        // Crop keeps the leading bytes when the value overflows the width
        let wide = BigUint::from(0x0102030405u64);
        assert_eq!(int2octets_crop(&wide, 4), vec![0x01, 0x02, 0x03, 0x04]);
    }
}
