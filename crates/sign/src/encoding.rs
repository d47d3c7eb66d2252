//! Canonical encoding of byte strings into Stark field elements
//!
//! A message is split into 31-byte big-endian chunks (one byte short of
//! the field width, so a chunk can never wrap the modulus), followed by
//! the remainder chunk and a trailer carrying the bit length of the
//! input. The trailer doubles as a length-extension guard: two messages
//! that differ only in trailing zero bytes encode differently.
//!
//! The output order is significant - it is exactly the order the chained
//! hash consumes.

use starknet_types_core::felt::Felt;
use starksig_params::STARK_MSG_CHUNK_SIZE;

/// Encode a byte string as an ordered sequence of field elements.
///
/// For an input of length `31 * n + r` (`0 <= r < 31`) the output holds
/// `n` full chunks, one remainder chunk (emitted even when empty, as the
/// value 0) and the bit-length trailer - `n + 2` elements in total. The
/// empty input encodes as `[0, 0]`.
pub fn encode_message(input: &[u8]) -> Vec<Felt> {
    let full_len = (input.len() / STARK_MSG_CHUNK_SIZE) * STARK_MSG_CHUNK_SIZE;
    let (full, remainder) = input.split_at(full_len);

    let mut elements = Vec::with_capacity(full_len / STARK_MSG_CHUNK_SIZE + 2);
    for chunk in full.chunks(STARK_MSG_CHUNK_SIZE) {
        elements.push(Felt::from_bytes_be_slice(chunk));
    }

    // The remainder chunk is always emitted, a zero when nothing is left
    if remainder.is_empty() {
        elements.push(Felt::ZERO);
    } else {
        elements.push(Felt::from_bytes_be_slice(remainder));
    }

    elements.push(Felt::from(8 * input.len() as u64));
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_encodes_as_two_zeros() {
        assert_eq!(encode_message(b""), vec![Felt::ZERO, Felt::ZERO]);
    }

    #[test]
    fn single_byte() {
        assert_eq!(
            encode_message(b"\x01"),
            vec![Felt::ONE, Felt::from(8u64)]
        );
    }

    #[test]
    fn chunk_boundary_emits_empty_remainder() {
        // 31 bytes of 0xff: one full chunk, a zero remainder, 248-bit trailer
        let input = [0xffu8; STARK_MSG_CHUNK_SIZE];
        let elements = encode_message(&input);
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0], Felt::from_bytes_be_slice(&input));
        assert_eq!(elements[1], Felt::ZERO);
        assert_eq!(elements[2], Felt::from(248u64));
    }

    #[test]
    fn chunks_are_big_endian() {
        let mut input = vec![0u8; STARK_MSG_CHUNK_SIZE];
        input.push(0x02);
        let elements = encode_message(&input);
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0], Felt::ZERO);
        assert_eq!(elements[1], Felt::TWO);
        assert_eq!(elements[2], Felt::from(8 * 32u64));
    }

    #[test]
    fn encoding_is_deterministic() {
        let input = b"a message long enough to span several 31-byte chunks before hashing";
        assert_eq!(encode_message(input), encode_message(input));
    }

    proptest! {
        #[test]
        fn element_count_matches_chunking_law(input in proptest::collection::vec(any::<u8>(), 0..256)) {
            let elements = encode_message(&input);
            prop_assert_eq!(elements.len(), input.len() / STARK_MSG_CHUNK_SIZE + 2);
            // Trailer is always the bit length
            prop_assert_eq!(
                elements[elements.len() - 1],
                Felt::from(8 * input.len() as u64)
            );
        }
    }
}
