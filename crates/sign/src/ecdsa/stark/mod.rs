//! ECDSA over the Stark curve, StarkNet variant
//!
//! Differences from textbook ECDSA, all required for compatibility with
//! the on-chain verifier:
//!
//! - the message hash, `r` and `s^-1` must lie in `[1, 2^251)`;
//! - the nonce comes from the RFC 6979 engine with the reference
//!   implementation's truncation policy (shift enabled);
//! - signing retries walk the deterministic candidate stream via the
//!   engine's skip counter, so a retried signature is still a pure
//!   function of the key and message.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use starknet_types_core::curve::{AffinePoint, ProjectivePoint};
use starknet_types_core::felt::Felt;
use starksig_api::{error::Error as ApiError, Result as ApiResult, Signature as SignatureTrait};
use starksig_api::SignatureSerialize;
use starksig_params::{
    N_ELEMENT_BITS_ECDSA, STARK_EC_ORDER_BE, STARK_PUBLIC_KEY_SIZE, STARK_SCALAR_SIZE,
    STARK_SECRET_KEY_SIZE, STARK_SIGNATURE_SIZE,
};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::encoding::encode_message;
use crate::hashing::hash_elements;
use crate::rfc6979::generate_k;

/// ECDSA signature scheme over the Stark curve
pub struct EcdsaStark;

/// Stark curve public key, an affine point `(x, y)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaStarkPublicKey {
    x: Felt,
    y: Felt,
}

/// Stark curve secret key
///
/// Contains both the numeric scalar and its fixed-width byte
/// representation. The scalar `d` satisfies `1 <= d < n` where `n` is
/// the order of the base point.
#[derive(Clone)]
pub struct EcdsaStarkSecretKey {
    scalar: BigUint,
    bytes: [u8; STARK_SECRET_KEY_SIZE],
}

/// Stark curve signature `(r, s)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaStarkSignature {
    r: Felt,
    s: Felt,
}

impl EcdsaStarkPublicKey {
    /// Build a public key from affine coordinates, checking the point is
    /// on the curve.
    pub fn new(x: Felt, y: Felt) -> ApiResult<Self> {
        AffinePoint::new(x, y).map_err(|_| ApiError::InvalidKey {
            context: "ECDSA-Stark public key",
            #[cfg(feature = "std")]
            message: "point is not on the curve".to_string(),
        })?;
        Ok(Self { x, y })
    }

    /// Affine x-coordinate
    pub fn x(&self) -> Felt {
        self.x
    }

    /// Affine y-coordinate
    pub fn y(&self) -> Felt {
        self.y
    }
}

impl EcdsaStarkSecretKey {
    /// Import a secret scalar from its 32-byte big-endian form.
    ///
    /// The scalar must lie in `[1, n)`.
    pub fn from_bytes(bytes: &[u8]) -> ApiResult<Self> {
        if bytes.len() != STARK_SECRET_KEY_SIZE {
            return Err(ApiError::InvalidLength {
                context: "ECDSA-Stark secret key",
                expected: STARK_SECRET_KEY_SIZE,
                actual: bytes.len(),
            });
        }

        let scalar = BigUint::from_bytes_be(bytes);
        if scalar.is_zero() || scalar >= curve_order() {
            return Err(ApiError::InvalidKey {
                context: "ECDSA-Stark secret key",
                #[cfg(feature = "std")]
                message: "scalar outside [1, n)".to_string(),
            });
        }

        let mut fixed = [0u8; STARK_SECRET_KEY_SIZE];
        fixed.copy_from_slice(bytes);
        Ok(Self {
            scalar,
            bytes: fixed,
        })
    }
}

impl AsRef<[u8]> for EcdsaStarkSecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

// No AsMut for the secret key: direct mutation could push the scalar
// outside [1, n-1].

impl Zeroize for EcdsaStarkSecretKey {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
        // BigUint has no Zeroize impl; overwrite so the limbs are
        // released rather than kept alive
        self.scalar = BigUint::zero();
    }
}

impl Drop for EcdsaStarkSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl EcdsaStarkSignature {
    /// Signature component `r`
    pub fn r(&self) -> Felt {
        self.r
    }

    /// Signature component `s`
    pub fn s(&self) -> Felt {
        self.s
    }
}

impl SignatureTrait for EcdsaStark {
    type PublicKey = EcdsaStarkPublicKey;
    type SecretKey = EcdsaStarkSecretKey;
    type SignatureData = EcdsaStarkSignature;
    type KeyPair = (Self::PublicKey, Self::SecretKey);

    fn name() -> &'static str {
        "ECDSA-Stark"
    }

    /// Generate a key pair with the secret scalar in `[1, n-1]`.
    ///
    /// Candidates are drawn with the top nibble masked so they land
    /// below `2^252`; the loop rejects the few that still reach `n`.
    fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> ApiResult<Self::KeyPair> {
        let order = curve_order();
        let mut buf = [0u8; STARK_SECRET_KEY_SIZE];

        let scalar = loop {
            rng.fill_bytes(&mut buf);
            buf[0] &= 0x0f;
            let candidate = BigUint::from_bytes_be(&buf);
            if !candidate.is_zero() && candidate < order {
                break candidate;
            }
        };

        let secret_key = EcdsaStarkSecretKey {
            scalar,
            bytes: buf,
        };
        buf.zeroize();

        let public_key = Self::public_key_from_secret(&secret_key)?;
        Ok((public_key, secret_key))
    }

    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey {
        keypair.0.clone()
    }

    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey {
        keypair.1.clone()
    }

    /// Sign a byte message through the canonical pipeline.
    fn sign(message: &[u8], secret_key: &Self::SecretKey) -> ApiResult<Self::SignatureData> {
        Self::sign_elements(&encode_message(message), secret_key)
    }

    /// Verify a byte message through the canonical pipeline.
    fn verify(
        message: &[u8],
        signature: &Self::SignatureData,
        public_key: &Self::PublicKey,
    ) -> ApiResult<()> {
        Self::verify_elements(&encode_message(message), signature, public_key)
    }
}

impl EcdsaStark {
    /// Sign an already-encoded sequence of field elements.
    pub fn sign_elements(
        msg_elements: &[Felt],
        secret_key: &EcdsaStarkSecretKey,
    ) -> ApiResult<EcdsaStarkSignature> {
        Self::sign_hash(&hash_elements(msg_elements), secret_key)
    }

    /// Verify a signature over an already-encoded element sequence.
    pub fn verify_elements(
        msg_elements: &[Felt],
        signature: &EcdsaStarkSignature,
        public_key: &EcdsaStarkPublicKey,
    ) -> ApiResult<()> {
        Self::verify_hash(&hash_elements(msg_elements), signature, public_key)
    }

    /// Sign a precomputed message hash.
    ///
    /// Algorithm (StarkNet ECDSA):
    /// 1. Require `z < 2^251`
    /// 2. Derive `k` deterministically per RFC 6979 (attempt counter as
    ///    the candidate skip)
    /// 3. `r = (k*G).x`; retry unless `1 <= r < 2^251`
    /// 4. `w = k * (z + r*d)^-1 mod n`; retry unless `1 <= w < 2^251`
    /// 5. `s = w^-1 mod n`; return `(r, s)`
    pub fn sign_hash(
        msg_hash: &Felt,
        secret_key: &EcdsaStarkSecretKey,
    ) -> ApiResult<EcdsaStarkSignature> {
        let order = curve_order();
        let bound = element_bound();

        let z = felt_to_biguint(msg_hash);
        // Hashes at or above 2^251 cannot be signed. This happens with a
        // very small probability and only for caller-supplied hashes.
        if z >= bound {
            return Err(ApiError::MessageOutOfRange {
                context: "ECDSA-Stark sign",
            });
        }
        let z_bytes = minimal_bytes_be(&z);

        let d = &secret_key.scalar;

        let mut attempt: u32 = 0;
        loop {
            let k = generate_k::<Sha256>(&order, d, &z_bytes, attempt, b"", true);
            attempt += 1;

            let r_point = match mul_generator(&biguint_to_felt(&k)).to_affine() {
                Ok(point) => point,
                // k*G at the identity cannot happen for k in [1, n);
                // treat it like any other bad candidate
                Err(_) => continue,
            };

            let r = felt_to_biguint(&r_point.x());
            if r.is_zero() || r >= bound {
                // Bad value. This fails with negligible probability.
                continue;
            }

            let temp = (&z + &r * d) % &order;
            if temp.is_zero() {
                // Bad value. This fails with negligible probability.
                continue;
            }

            let w = (&k * inv_mod_order(&temp, &order)) % &order;
            if w.is_zero() || w >= bound {
                // Bad value. This fails with negligible probability.
                continue;
            }

            let s = inv_mod_order(&w, &order);

            return Ok(EcdsaStarkSignature {
                r: biguint_to_felt(&r),
                s: biguint_to_felt(&s),
            });
        }
    }

    /// Verify a signature over a precomputed message hash.
    ///
    /// Recomputes `R' = (z*w)*G + (r*w)*Q` with `w = s^-1 mod n` and
    /// accepts iff `R'.x == r`.
    pub fn verify_hash(
        msg_hash: &Felt,
        signature: &EcdsaStarkSignature,
        public_key: &EcdsaStarkPublicKey,
    ) -> ApiResult<()> {
        let order = curve_order();
        let bound = element_bound();

        let r = felt_to_biguint(&signature.r);
        if r.is_zero() || r >= bound {
            return Err(ApiError::InvalidSignature {
                context: "ECDSA-Stark verify",
                #[cfg(feature = "std")]
                message: "r out of range".to_string(),
            });
        }

        let s = felt_to_biguint(&signature.s);
        if s.is_zero() || s >= order {
            return Err(ApiError::InvalidSignature {
                context: "ECDSA-Stark verify",
                #[cfg(feature = "std")]
                message: "s out of range".to_string(),
            });
        }

        let z = felt_to_biguint(msg_hash);
        if z >= bound {
            return Err(ApiError::MessageOutOfRange {
                context: "ECDSA-Stark verify",
            });
        }

        let q = ProjectivePoint::from_affine(public_key.x, public_key.y).map_err(|_| {
            ApiError::InvalidKey {
                context: "ECDSA-Stark verify",
                #[cfg(feature = "std")]
                message: "public key is not on the curve".to_string(),
            }
        })?;

        let w = inv_mod_order(&s, &order);
        let u1 = (&z * &w) % &order;
        let u2 = (&r * &w) % &order;

        let point = linear_combination(&biguint_to_felt(&u1), &biguint_to_felt(&u2), &q)
            .to_affine()
            .map_err(|_| ApiError::InvalidSignature {
                context: "ECDSA-Stark verify",
                #[cfg(feature = "std")]
                message: "verification point is the identity".to_string(),
            })?;

        // Accept iff the recovered x-coordinate matches r
        let recovered = point.x().to_bytes_be();
        let expected = signature.r.to_bytes_be();
        if bool::from(recovered[..].ct_eq(&expected[..])) {
            Ok(())
        } else {
            Err(ApiError::InvalidSignature {
                context: "ECDSA-Stark verify",
                #[cfg(feature = "std")]
                message: "signature verification failed".to_string(),
            })
        }
    }

    /// Derive the public key `d*G` for a secret key.
    pub fn public_key_from_secret(
        secret_key: &EcdsaStarkSecretKey,
    ) -> ApiResult<EcdsaStarkPublicKey> {
        let point = mul_generator(&biguint_to_felt(&secret_key.scalar))
            .to_affine()
            .map_err(|_| ApiError::InvalidKey {
                context: "ECDSA-Stark public key",
                #[cfg(feature = "std")]
                message: "secret scalar maps to the identity".to_string(),
            })?;
        Ok(EcdsaStarkPublicKey {
            x: point.x(),
            y: point.y(),
        })
    }
}

impl SignatureSerialize for EcdsaStark {
    const PUBLIC_KEY_SIZE: usize = STARK_PUBLIC_KEY_SIZE;
    const SECRET_KEY_SIZE: usize = STARK_SECRET_KEY_SIZE;
    const SIGNATURE_SIZE: usize = STARK_SIGNATURE_SIZE;

    fn serialize_public_key(key: &Self::PublicKey) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::PUBLIC_KEY_SIZE);
        out.extend_from_slice(&key.x.to_bytes_be());
        out.extend_from_slice(&key.y.to_bytes_be());
        out
    }

    fn deserialize_public_key(bytes: &[u8]) -> ApiResult<Self::PublicKey> {
        if bytes.len() != Self::PUBLIC_KEY_SIZE {
            return Err(ApiError::InvalidLength {
                context: "ECDSA-Stark public key",
                expected: Self::PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let (x_bytes, y_bytes) = bytes.split_at(STARK_SCALAR_SIZE);
        let x = felt_from_be_checked(x_bytes, "ECDSA-Stark public key")?;
        let y = felt_from_be_checked(y_bytes, "ECDSA-Stark public key")?;
        EcdsaStarkPublicKey::new(x, y)
    }

    fn serialize_secret_key(key: &Self::SecretKey) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(key.bytes.to_vec())
    }

    fn deserialize_secret_key(bytes: &[u8]) -> ApiResult<Self::SecretKey> {
        EcdsaStarkSecretKey::from_bytes(bytes)
    }

    fn serialize_signature(sig: &Self::SignatureData) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIGNATURE_SIZE);
        out.extend_from_slice(&sig.r.to_bytes_be());
        out.extend_from_slice(&sig.s.to_bytes_be());
        out
    }

    fn deserialize_signature(bytes: &[u8]) -> ApiResult<Self::SignatureData> {
        if bytes.len() != Self::SIGNATURE_SIZE {
            return Err(ApiError::InvalidLength {
                context: "ECDSA-Stark signature",
                expected: Self::SIGNATURE_SIZE,
                actual: bytes.len(),
            });
        }
        let (r_bytes, s_bytes) = bytes.split_at(STARK_SCALAR_SIZE);
        Ok(EcdsaStarkSignature {
            r: felt_from_be_checked(r_bytes, "ECDSA-Stark signature")?,
            s: felt_from_be_checked(s_bytes, "ECDSA-Stark signature")?,
        })
    }
}

/* ------------------------------------------------------------------------- */
/*                     Scalar ring and curve helpers                         */
/* ------------------------------------------------------------------------- */

fn curve_order() -> BigUint {
    BigUint::from_bytes_be(&STARK_EC_ORDER_BE)
}

/// Upper bound `2^251` for message hashes, `r` and `s^-1`.
fn element_bound() -> BigUint {
    BigUint::one() << N_ELEMENT_BITS_ECDSA
}

/// Inverse mod the (prime) curve order via Fermat's little theorem.
fn inv_mod_order(x: &BigUint, order: &BigUint) -> BigUint {
    x.modpow(&(order - BigUint::from(2u8)), order)
}

fn felt_to_biguint(value: &Felt) -> BigUint {
    BigUint::from_bytes_be(&value.to_bytes_be())
}

/// Lossless for values below the field prime, which is all this module
/// ever converts (scalars are bounded by the smaller curve order).
fn biguint_to_felt(value: &BigUint) -> Felt {
    Felt::from_bytes_be_slice(&value.to_bytes_be())
}

fn minimal_bytes_be(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

/// Decode a 32-byte big-endian field element, rejecting values at or
/// above the field prime instead of silently reducing them.
fn felt_from_be_checked(bytes: &[u8], context: &'static str) -> ApiResult<Felt> {
    let felt = Felt::from_bytes_be_slice(bytes);
    if felt.to_bytes_be()[..] != *bytes {
        return Err(ApiError::InvalidParameter {
            context,
            #[cfg(feature = "std")]
            message: "field element out of range".to_string(),
        });
    }
    Ok(felt)
}

/// `scalar * G` on the Stark curve.
fn mul_generator(scalar: &Felt) -> ProjectivePoint {
    &ProjectivePoint::generator() * *scalar
}

/// `a*G + b*Q`, the verification linear combination.
fn linear_combination(a: &Felt, b: &Felt, q: &ProjectivePoint) -> ProjectivePoint {
    &(&ProjectivePoint::generator() * *a) + &(q * *b)
}
