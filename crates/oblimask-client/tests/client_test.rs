//! Client tests against a mock masking service
//!
//! The mock checks the exact request bodies the client sends and feeds back
//! success, failure, and malformed responses.

use oblimask_client::{ClientConfig, ClientError, MaskingClient};
use oblimask_core::ErrorKind;
use oblimask_crypto::{DataElement, MASK_SEED_SIZE, Mask, MaskedElement, encode};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn setup(server: &MockServer) -> MaskingClient {
    MaskingClient::new(ClientConfig::new(server.uri())).unwrap()
}

fn masked(input: &[u8]) -> MaskedElement {
    Mask::from_seed(&[7u8; MASK_SEED_SIZE]).unwrap().apply(&DataElement::hash(input))
}

#[tokio::test]
async fn request_masks_sends_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mask"))
        .and(body_json(json!({ "count": 2 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "mask": ["t1", "t2"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tokens = setup(&server).request_masks(2).await.unwrap();

    assert_eq!(tokens, vec!["t1".to_string(), "t2".to_string()]);
}

#[tokio::test]
async fn request_masks_rejects_short_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mask"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "mask": ["t1"] })),
        )
        .mount(&server)
        .await;

    let err = setup(&server).request_masks(3).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)), "{err}");
}

#[tokio::test]
async fn apply_masks_sends_encoded_elements() {
    let server = MockServer::start().await;
    let tokens = vec!["t1".to_string()];
    let elements = vec![DataElement::hash(b"abc")];
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .and(body_json(json!({
            "mask": ["t1"],
            "data": [encode(&elements[0])],
            "encoding": "element",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [encode(&masked(b"abc"))],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = setup(&server).apply_masks(&tokens, &elements).await.unwrap();

    assert_eq!(result, vec![masked(b"abc")]);
}

#[tokio::test]
async fn failure_body_becomes_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "failure",
            "error": "invalid_token",
            "message": "invalid mask token at index 0",
        })))
        .mount(&server)
        .await;

    let err = setup(&server)
        .apply_masks(&["t1".to_string()], &[DataElement::hash(b"x")])
        .await
        .unwrap_err();

    assert!(err.is_stale_token());
    match err {
        ClientError::Rejected { kind, message } => {
            assert_eq!(kind, ErrorKind::InvalidToken);
            assert_eq!(message, "invalid mask token at index 0");
        },
        other => panic!("expected rejection, got {other}"),
    }
}

#[tokio::test]
async fn non_json_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = setup(&server).request_masks(1).await.unwrap_err();

    assert!(matches!(err, ClientError::UnexpectedStatus(502)), "{err}");
}

#[tokio::test]
async fn undecodable_element_is_crypto_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "data": ["%%%"] })),
        )
        .mount(&server)
        .await;

    let err = setup(&server)
        .apply_masks(&["t1".to_string()], &[DataElement::hash(b"x")])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Crypto(_)), "{err}");
}

#[tokio::test]
async fn mask_inputs_hashes_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mask"))
        .and(body_json(json!({ "count": 2 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "mask": ["t1", "t2"] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .and(body_json(json!({
            "mask": ["t1", "t2"],
            "data": [encode(&DataElement::hash(b"alice")), encode(&DataElement::hash(b"bob"))],
            "encoding": "element",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [encode(&masked(b"alice")), encode(&masked(b"bob"))],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = setup(&server).mask_inputs(&["alice", "bob"]).await.unwrap();

    assert_eq!(result, vec![masked(b"alice"), masked(b"bob")]);
}

#[tokio::test]
async fn mask_inputs_with_nothing_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let result = setup(&server).mask_inputs::<&str>(&[]).await.unwrap();

    assert!(result.is_empty());
}
