//! # Claims and Submissions
//!
//! The call-scoped values a caller hands to a gate. None of them is
//! persisted; only the payload digest of an accepted submission is.

use certgate_core::{hex, FieldElement, PayloadDigest, SubjectId};
use certgate_crypto::RingSignature;
use serde::{Deserialize, Serialize};

/// A key/value fact claimed to be a leaf of the subject's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Leaf key.
    pub key: FieldElement,
    /// Leaf value.
    pub value: FieldElement,
}

impl Claim {
    /// Build a claim.
    pub fn new(key: FieldElement, value: FieldElement) -> Self {
        Self { key, value }
    }
}

/// Everything a gated call needs.
///
/// `payload` is the message the ring signature covers. On the wire it is
/// a `0x`-prefixed hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    /// Subject whose anchored root the claim is proven against.
    pub subject: SubjectId,
    /// The claimed leaf.
    pub claim: Claim,
    /// Leaf-first sibling path.
    pub proof: Vec<FieldElement>,
    /// Ring signature over `payload`.
    pub signature: RingSignature,
    /// Signed payload bytes.
    #[serde(with = "payload_hex")]
    pub payload: Vec<u8>,
    /// Metadata URI handed to the minter on credential issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_uri: Option<String>,
}

impl ClaimSubmission {
    /// SHA-256 of the payload.
    pub fn payload_digest(&self) -> PayloadDigest {
        PayloadDigest::of(&self.payload)
    }
}

mod payload_hex {
    use super::hex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode_prefixed(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certgate_crypto::testing::{sign_ring, RingKeyPair};

    fn submission() -> ClaimSubmission {
        let key = RingKeyPair::from_seed(b"student");
        let payload = b"ipfs-cid".to_vec();
        let signature = sign_ring(&payload, &[*key.public_key()], 0, &key).unwrap();
        ClaimSubmission {
            subject: SubjectId::from_label("course").unwrap(),
            claim: Claim::new(FieldElement::from_u64(1), FieldElement::from_u64(7)),
            proof: vec![FieldElement::zero()],
            signature,
            payload,
            metadata_uri: None,
        }
    }

    #[test]
    fn payload_serialises_as_hex() {
        let json = serde_json::to_value(submission()).unwrap();
        assert_eq!(json["payload"], "0x697066732d636964");
        assert!(json.get("metadata_uri").is_none());
    }

    #[test]
    fn submission_json_roundtrip() {
        let mut original = submission();
        original.metadata_uri = Some("ipfs/ uri".into());
        let json = serde_json::to_string(&original).unwrap();
        let back: ClaimSubmission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
        assert_eq!(back.payload_digest(), PayloadDigest::of(b"ipfs-cid"));
    }

    #[test]
    fn bad_payload_hex_rejected() {
        let mut json = serde_json::to_value(submission()).unwrap();
        json["payload"] = serde_json::Value::String("0xzz".into());
        assert!(serde_json::from_value::<ClaimSubmission>(json).is_err());
    }
}
