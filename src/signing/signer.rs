//! Digest signers
//!
//! The encoders never see key material; anything able to produce a
//! recoverable secp256k1 signature over a 32-byte digest can plug in here.

use crate::error::{TxError, TxResult};
use crate::evm::keccak256;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use std::fmt;

/// Recoverable ECDSA signature over a digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// 0 or 1 in practice
    pub recovery_id: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl RecoverableSignature {
    /// `r || s`
    pub fn to_compact(&self) -> [u8; 64] {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        compact
    }
}

/// Something that signs 32-byte digests (local key, HSM, hardware wallet)
pub trait DigestSigner {
    fn sign_digest(&self, digest: &[u8; 32]) -> TxResult<RecoverableSignature>;

    /// SEC1 compressed public key
    fn public_key(&self) -> [u8; 33];
}

/// In-process signer backed by libsecp256k1
///
/// Signatures are RFC 6979 deterministic and low-S.
pub struct Secp256k1Signer {
    secp: Secp256k1<secp256k1::All>,
    secret_key: SecretKey,
}

impl Secp256k1Signer {
    pub fn new(secret_key: SecretKey) -> Self {
        Self {
            secp: Secp256k1::new(),
            secret_key,
        }
    }

    pub fn from_slice(private_key: &[u8]) -> TxResult<Self> {
        if private_key.len() != 32 {
            return Err(TxError::Signing(format!(
                "invalid private key length: expected 32, got {}",
                private_key.len()
            )));
        }
        let secret_key = SecretKey::from_slice(private_key)?;
        Ok(Self::new(secret_key))
    }

    pub fn from_hex(private_key_hex: &str) -> TxResult<Self> {
        let bytes = hex::decode(private_key_hex.trim_start_matches("0x"))?;
        Self::from_slice(&bytes)
    }

    fn secp_public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(&self.secp, &self.secret_key)
    }

    /// Ethereum address of this key
    pub fn address(&self) -> [u8; 20] {
        public_key_to_address(&self.secp_public_key())
    }
}

impl fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Signer")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}

impl DigestSigner for Secp256k1Signer {
    fn sign_digest(&self, digest: &[u8; 32]) -> TxResult<RecoverableSignature> {
        let message = Message::from_digest(*digest);
        let (recovery_id, compact) = self
            .secp
            .sign_ecdsa_recoverable(&message, &self.secret_key)
            .serialize_compact();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);

        Ok(RecoverableSignature {
            recovery_id: recovery_id.to_i32() as u8,
            r,
            s,
        })
    }

    fn public_key(&self) -> [u8; 33] {
        self.secp_public_key().serialize()
    }
}

/// keccak256 of the uncompressed point, last 20 bytes
pub fn public_key_to_address(public_key: &PublicKey) -> [u8; 20] {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Ethereum address for a compressed or uncompressed SEC1 key
pub fn address_from_public_key(public_key: &[u8]) -> TxResult<[u8; 20]> {
    let key = PublicKey::from_slice(public_key)?;
    Ok(public_key_to_address(&key))
}

/// Recover the signer's Ethereum address from a digest signature
pub fn recover_address(digest: &[u8; 32], sig: &RecoverableSignature) -> TxResult<[u8; 20]> {
    let recovery_id = secp256k1::ecdsa::RecoveryId::from_i32(sig.recovery_id as i32)?;
    let recoverable =
        secp256k1::ecdsa::RecoverableSignature::from_compact(&sig.to_compact(), recovery_id)?;
    let message = Message::from_digest(*digest);
    let public_key = Secp256k1::verification_only().recover_ecdsa(&message, &recoverable)?;
    Ok(public_key_to_address(&public_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Private key 1: G itself
    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_public_key_of_key_one() {
        let signer = Secp256k1Signer::from_hex(KEY_ONE).unwrap();
        assert_eq!(
            hex::encode(signer.public_key()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(
            hex::encode(signer.address()),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_sign_and_recover() {
        let signer = Secp256k1Signer::from_hex(KEY_ONE).unwrap();
        let digest = keccak256(b"txwire");
        let sig = signer.sign_digest(&digest).unwrap();
        assert!(sig.recovery_id <= 1);
        assert_eq!(recover_address(&digest, &sig).unwrap(), signer.address());
        assert_eq!(
            address_from_public_key(&signer.public_key()).unwrap(),
            signer.address()
        );
    }

    #[test]
    fn test_signatures_are_deterministic_and_low_s() {
        let signer = Secp256k1Signer::from_hex(KEY_ONE).unwrap();
        let digest = [0x42; 32];
        let a = signer.sign_digest(&digest).unwrap();
        let b = signer.sign_digest(&digest).unwrap();
        assert_eq!(a, b);
        // Upper half of the curve order starts at 0x7fff...5d576e73...
        assert!(a.s[0] <= 0x7f);
    }

    #[test]
    fn test_rejects_bad_keys() {
        assert!(matches!(
            Secp256k1Signer::from_slice(&[1u8; 31]),
            Err(TxError::Signing(_))
        ));
        assert!(matches!(
            Secp256k1Signer::from_slice(&[0u8; 32]),
            Err(TxError::Signing(_))
        ));
        assert!(matches!(
            Secp256k1Signer::from_hex("zz"),
            Err(TxError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = Secp256k1Signer::from_hex(KEY_ONE).unwrap();
        let dbg = format!("{:?}", signer);
        assert!(dbg.contains("0279be66"));
        assert!(!dbg.contains(KEY_ONE));
    }
}
