//! Shared helpers for route tests.

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use certgate_core::{ActorId, FieldElement, SubjectId};
use certgate_crypto::testing::{sign_ring, RingKeyPair, SparseMerkleTree};
use certgate_crypto::{RingPublicKey, Sha256FieldHash};
use certgate_registry::{Claim, ClaimSubmission, LedgerConfig};
use http_body_util::BodyExt;

use crate::state::AppState;

/// A fresh app with `owner` as the writer, plus a handle on its state.
pub(crate) fn test_app() -> (Router, AppState) {
    let config = LedgerConfig::new(ActorId::new("owner").unwrap());
    let state = AppState::from_config(config).unwrap();
    (crate::app(state.clone()), state)
}

pub(crate) fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn post_json(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Read the response body as bytes and deserialize from JSON.
pub(crate) async fn body_json<T: serde::de::DeserializeOwned>(
    resp: axum::response::Response,
) -> T {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Anchor a three-leaf tree under `label` and return a valid submission
/// for leaf `2 -> 200`, signed by the middle member of a three-key ring.
pub(crate) fn anchored_submission(state: &AppState, label: &str, payload: &[u8]) -> ClaimSubmission {
    let mut tree = SparseMerkleTree::new(Sha256FieldHash);
    for (k, v) in [(1u64, 100u64), (2, 200), (3, 300)] {
        tree.insert(FieldElement::from_u64(k), FieldElement::from_u64(v));
    }
    let subject = SubjectId::from_label(label).unwrap();
    state.with_ledger(|ledger| {
        ledger
            .append_state(
                &ActorId::new("owner").unwrap(),
                &[subject.clone()],
                &[tree.root()],
            )
            .unwrap();
    });

    let key = FieldElement::from_u64(2);
    let keypairs: Vec<_> = [&b"alice"[..], &b"bob"[..], &b"carol"[..]]
        .iter()
        .map(|seed| RingKeyPair::from_seed(seed))
        .collect();
    let ring: Vec<RingPublicKey> = keypairs.iter().map(|kp| *kp.public_key()).collect();
    let signature = sign_ring(payload, &ring, 1, &keypairs[1]).unwrap();

    ClaimSubmission {
        subject,
        claim: Claim::new(key, FieldElement::from_u64(200)),
        proof: tree.proof(&key).unwrap(),
        signature,
        payload: payload.to_vec(),
        metadata_uri: None,
    }
}
