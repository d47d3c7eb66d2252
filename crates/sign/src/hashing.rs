//! Chained Pedersen hashing of field-element sequences
//!
//! The chain follows the StarkNet `compute_hash_on_elements` convention:
//! fold the sequence through the two-to-one Pedersen hash starting from a
//! zero accumulator, then mix in the element count last. The trailing
//! length mix mirrors the encoder's bit-length trailer; both guard
//! against variable-length collisions.
//!
//! The two-to-one primitive itself is external - this module only fixes
//! the iteration order and the initial value.

use starknet_types_core::felt::Felt;
use starknet_types_core::hash::{Pedersen, StarkHash};

use crate::encoding::encode_message;

/// Fold an ordered sequence of field elements into a single element.
///
/// `h(...h(h(0, e_0), e_1)..., e_{n-1})` followed by a final
/// `h(acc, n)`.
pub fn hash_elements(elements: &[Felt]) -> Felt {
    let acc = elements
        .iter()
        .fold(Felt::ZERO, |acc, e| Pedersen::hash(&acc, e));
    Pedersen::hash(&acc, &Felt::from(elements.len() as u64))
}

/// Hash a raw byte string through the full canonical pipeline.
pub fn hash_message(input: &[u8]) -> Felt {
    hash_elements(&encode_message(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vector for the external two-to-one primitive, from the
    // Cairo implementation: pedersen_hash(17, 71)
    #[test]
    fn pedersen_matches_cairo_reference() {
        let expected = Felt::from_dec_str(
            "1785999660572583615240258164082465668299482253941125073628479392605449162275",
        )
        .unwrap();
        assert_eq!(
            Pedersen::hash(&Felt::from(17u64), &Felt::from(71u64)),
            expected
        );
    }

    #[test]
    fn matches_the_public_array_construction() {
        // `Pedersen::hash_array` implements the same publicly specified
        // chain; the two must agree on every input
        let elements: Vec<Felt> = (1u64..=5).map(Felt::from).collect();
        assert_eq!(hash_elements(&elements), Pedersen::hash_array(&elements));
        assert_eq!(hash_elements(&[]), Pedersen::hash_array(&[]));
    }

    #[test]
    fn sensitive_to_any_single_element() {
        let base: Vec<Felt> = (1u64..=5).map(Felt::from).collect();
        let base_hash = hash_elements(&base);
        for i in 0..base.len() {
            let mut tampered = base.clone();
            tampered[i] = tampered[i] + Felt::ONE;
            assert_ne!(hash_elements(&tampered), base_hash);
        }
    }

    #[test]
    fn sensitive_to_length_alone() {
        let short: Vec<Felt> = (1u64..=4).map(Felt::from).collect();
        let mut long = short.clone();
        long.push(Felt::ZERO);
        // Identical prefix, differing only in length
        assert_ne!(hash_elements(&short), hash_elements(&long));
    }

    #[test]
    fn message_pipeline_is_deterministic() {
        let msg = b"deterministic signing needs deterministic hashing";
        assert_eq!(hash_message(msg), hash_message(msg));
        assert_ne!(hash_message(msg), hash_message(b""));
    }
}
