//! Opaque signing capability

use std::fmt;

use hashnet_api::proto;
use hashnet_api::proto::signature_pair::Signature;

/// Algorithm a public key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyKind {
    Ed25519,
    EcdsaSecp256k1,
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    kind: KeyKind,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn ed25519(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: KeyKind::Ed25519,
            bytes: bytes.into(),
        }
    }

    pub fn ecdsa_secp256k1(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: KeyKind::EcdsaSecp256k1,
            bytes: bytes.into(),
        }
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn to_signature_pair(&self, signature: &[u8]) -> proto::SignaturePair {
        let signature = match self.kind {
            KeyKind::Ed25519 => Signature::Ed25519(signature.to_vec()),
            KeyKind::EcdsaSecp256k1 => Signature::EcdsaSecp256k1(signature.to_vec()),
        };
        proto::SignaturePair {
            pub_key_prefix: self.bytes.clone(),
            signature: Some(signature),
        }
    }

    /// Inverse of [`PublicKey::to_signature_pair`]; `None` for an empty pair.
    pub(crate) fn from_signature_pair(pair: &proto::SignaturePair) -> Option<(Self, Vec<u8>)> {
        match pair.signature.as_ref()? {
            Signature::Ed25519(signature) => {
                Some((Self::ed25519(pair.pub_key_prefix.clone()), signature.clone()))
            }
            Signature::EcdsaSecp256k1(signature) => Some((
                Self::ecdsa_secp256k1(pair.pub_key_prefix.clone()),
                signature.clone(),
            )),
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, const_hex::encode(&self.bytes))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode(&self.bytes))
    }
}

/// Something that can sign transaction bodies.
///
/// Key generation and the signature algorithm live outside this crate.
pub trait Signer: Send + Sync {
    fn public_key(&self) -> PublicKey;

    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_pair_tags() {
        let key = PublicKey::ed25519(vec![1, 2, 3]);
        let pair = key.to_signature_pair(&[9, 9]);
        assert_eq!(pair.pub_key_prefix, vec![1, 2, 3]);
        assert_eq!(pair.signature, Some(Signature::Ed25519(vec![9, 9])));

        let (back, signature) = PublicKey::from_signature_pair(&pair).unwrap();
        assert_eq!(back, key);
        assert_eq!(signature, vec![9, 9]);

        let ecdsa = PublicKey::ecdsa_secp256k1(vec![4]).to_signature_pair(&[7]);
        assert_eq!(ecdsa.signature, Some(Signature::EcdsaSecp256k1(vec![7])));
    }

    #[test]
    fn test_display_is_hex() {
        let key = PublicKey::ed25519(vec![0xab, 0x01]);
        assert_eq!(key.to_string(), "ab01");
        assert_eq!(format!("{:?}", key), "Ed25519(ab01)");
    }
}
