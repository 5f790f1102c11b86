//! JSON wire shapes.
//!
//! ```text
//! obtain-mask  →  {} | {"count": N}
//!              ←  {"status": "success", "mask": ["<token>", ...]}
//! apply-mask   →  {"mask": ["<token>", ...], "data": ["<element>", ...]}
//!              ←  {"status": "success", "data": ["<masked>", ...]}
//! failure      ←  {"status": "failure", "error": "<kind>", "message": "..."}
//! ```
//!
//! All binary values are standard padded base64. Every request body must be
//! a JSON object; arrays and explicit `null` fields are rejected.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    config::DEFAULT_MASK_COUNT,
    error::{ErrorKind, MaskingError},
};

/// Outcome marker present in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The call succeeded
    Success,
    /// The call failed; see the error code
    Failure,
}

/// How the entries of `data` in an apply request are to be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataEncoding {
    /// Compressed group elements, already hashed by the caller
    #[default]
    Element,
    /// Arbitrary bytes for the server to hash into the group
    Raw,
}

/// Obtain-mask request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaskRequest {
    /// Number of masks to issue (default 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl MaskRequest {
    /// Request for `count` masks.
    pub fn with_count(count: usize) -> Self {
        Self { count: Some(count) }
    }

    /// Requested number of masks, after applying the default.
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_MASK_COUNT)
    }

    /// Parse an obtain-mask body.
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: not a JSON object, a `null` or unknown field, or a
    ///   `count` that is not a non-negative integer
    pub fn from_json(body: &[u8]) -> Result<Self, MaskingError> {
        from_fields(parse_object(body)?)
    }
}

/// Apply-mask request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplyRequest {
    /// Tokens from earlier obtain-mask calls
    pub mask: Vec<String>,
    /// Data entries, index-aligned with `mask`
    pub data: Vec<String>,
    /// How to read `data`
    #[serde(default)]
    pub encoding: DataEncoding,
}

impl ApplyRequest {
    /// Parse an apply-mask body.
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: not a JSON object, a `null`, missing or unknown
    ///   field, or an entry that is not a string
    pub fn from_json(body: &[u8]) -> Result<Self, MaskingError> {
        from_fields(parse_object(body)?)
    }
}

/// Obtain-mask response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskResponse {
    /// Always `success`
    pub status: Status,
    /// Issued tokens
    pub mask: Vec<String>,
}

impl MaskResponse {
    /// Successful response carrying `mask`.
    pub fn new(mask: Vec<String>) -> Self {
        Self { status: Status::Success, mask }
    }
}

/// Apply-mask response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResponse {
    /// Always `success`
    pub status: Status,
    /// Masked elements, index-aligned with the request
    pub data: Vec<String>,
}

impl ApplyResponse {
    /// Successful response carrying `data`.
    pub fn new(data: Vec<String>) -> Self {
        Self { status: Status::Success, data }
    }
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `failure`
    pub status: Status,
    /// Machine-readable code
    pub error: ErrorKind,
    /// Human-readable detail, free of secrets
    pub message: String,
}

impl From<&MaskingError> for ErrorResponse {
    fn from(err: &MaskingError) -> Self {
        Self { status: Status::Failure, error: err.kind(), message: err.public_message() }
    }
}

/// A request to the shape-dispatched endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// No `mask`/`data` fields: issue masks
    Mask(MaskRequest),
    /// Both `mask` and `data`: apply masks
    Apply(ApplyRequest),
}

impl Request {
    /// Parse a JSON body and decide which operation it asks for.
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: invalid JSON, unknown fields, `mask` without
    ///   `data` (or vice versa), or an option used with the wrong operation
    pub fn from_json(body: &[u8]) -> Result<Self, MaskingError> {
        from_fields::<RequestEnvelope>(parse_object(body)?)?.classify()
    }
}

/// Response from the shape-dispatched endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Answer to [`Request::Mask`]
    Mask(MaskResponse),
    /// Answer to [`Request::Apply`]
    Apply(ApplyResponse),
}

/// Parse `body` as a JSON object with no `null` members.
///
/// Derived struct deserializers also accept a positional array, so the
/// object check has to happen before any typed request is built.
fn parse_object(body: &[u8]) -> Result<Map<String, Value>, MaskingError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| MaskingError::malformed(format!("invalid request body: {e}")))?;
    let Value::Object(fields) = value else {
        return Err(MaskingError::malformed("request body must be a JSON object"));
    };
    if let Some(name) = fields.iter().find_map(|(name, value)| value.is_null().then_some(name)) {
        return Err(MaskingError::malformed(format!("`{name}` must not be null")));
    }
    Ok(fields)
}

fn from_fields<T: DeserializeOwned>(fields: Map<String, Value>) -> Result<T, MaskingError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| MaskingError::malformed(format!("invalid request body: {e}")))
}

/// Union of every field the dispatching endpoint accepts.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestEnvelope {
    #[serde(default)]
    mask: Option<Vec<String>>,
    #[serde(default)]
    data: Option<Vec<String>>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    encoding: Option<DataEncoding>,
}

impl RequestEnvelope {
    fn classify(self) -> Result<Request, MaskingError> {
        match (self.mask, self.data) {
            (None, None) => {
                if self.encoding.is_some() {
                    return Err(MaskingError::malformed(
                        "`encoding` is only valid together with `mask` and `data`",
                    ));
                }
                Ok(Request::Mask(MaskRequest { count: self.count }))
            },
            (Some(mask), Some(data)) => {
                if self.count.is_some() {
                    return Err(MaskingError::malformed(
                        "`count` is only valid when requesting masks",
                    ));
                }
                Ok(Request::Apply(ApplyRequest {
                    mask,
                    data,
                    encoding: self.encoding.unwrap_or_default(),
                }))
            },
            (Some(_), None) => Err(MaskingError::malformed("`mask` given without `data`")),
            (None, Some(_)) => Err(MaskingError::malformed("`data` given without `mask`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn empty_object_requests_one_mask() {
        let request = Request::from_json(b"{}").unwrap();

        assert_eq!(request, Request::Mask(MaskRequest::default()));
        let Request::Mask(mask) = request else { unreachable!() };
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn count_is_honored() {
        let request = Request::from_json(br#"{"count": 5}"#).unwrap();
        assert_eq!(request, Request::Mask(MaskRequest::with_count(5)));
    }

    #[test]
    fn mask_and_data_request_apply() {
        let request = Request::from_json(br#"{"mask": ["a"], "data": ["b"]}"#).unwrap();

        assert_eq!(
            request,
            Request::Apply(ApplyRequest {
                mask: vec!["a".to_string()],
                data: vec!["b".to_string()],
                encoding: DataEncoding::Element,
            })
        );
    }

    #[test]
    fn raw_encoding_is_parsed() {
        let request =
            Request::from_json(br#"{"mask": ["a"], "data": ["b"], "encoding": "raw"}"#).unwrap();

        assert!(matches!(
            request,
            Request::Apply(ApplyRequest { encoding: DataEncoding::Raw, .. })
        ));
    }

    #[test]
    fn mask_without_data_is_malformed() {
        let err = Request::from_json(br#"{"mask": ["a"]}"#).unwrap_err();
        assert_snapshot!(err.to_string(), @"malformed input: `mask` given without `data`");
    }

    #[test]
    fn data_without_mask_is_malformed() {
        let err = Request::from_json(br#"{"data": ["a"]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn count_with_apply_is_malformed() {
        let err = Request::from_json(br#"{"mask": [], "data": [], "count": 2}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn encoding_without_apply_is_malformed() {
        let err = Request::from_json(br#"{"encoding": "raw"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn unknown_fields_are_malformed() {
        let err = Request::from_json(br#"{"masks": ["a"]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        for body in [&b""[..], b"null", b"[]", b"\"{}\"", b"{"] {
            let err = Request::from_json(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn arrays_never_parse_as_requests() {
        insta::allow_duplicates! {
            for body in [&b"[]"[..], b"[null, null, 3]", br#"[["AA=="], ["AA=="]]"#] {
                let err = Request::from_json(body).unwrap_err();
                assert_snapshot!(
                    err.to_string(),
                    @"malformed input: request body must be a JSON object"
                );
            }
        }

        assert!(MaskRequest::from_json(b"[2]").is_err());
        assert!(ApplyRequest::from_json(br#"[["AA=="], ["AA=="]]"#).is_err());
    }

    #[test]
    fn null_fields_are_malformed() {
        let err = Request::from_json(br#"{"mask": ["a"], "data": null}"#).unwrap_err();
        assert_snapshot!(err.to_string(), @"malformed input: `data` must not be null");
        let err = Request::from_json(br#"{"mask": null, "data": null}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        for body in [&br#"{"count": null}"#[..], br#"{"encoding": null}"#] {
            assert_eq!(Request::from_json(body).unwrap_err().kind(), ErrorKind::MalformedInput);
        }
        assert!(MaskRequest::from_json(br#"{"count": null}"#).is_err());
        let body = br#"{"mask": [], "data": [], "encoding": null}"#;
        assert!(ApplyRequest::from_json(body).is_err());
    }

    #[test]
    fn dedicated_parsers_accept_objects() {
        assert_eq!(MaskRequest::from_json(br#"{"count": 4}"#).unwrap().count(), 4);
        assert_eq!(MaskRequest::from_json(b"{}").unwrap().count(), 1);

        let apply = ApplyRequest::from_json(br#"{"mask": ["a"], "data": ["b"]}"#).unwrap();
        assert_eq!(apply.encoding, DataEncoding::Element);
        assert!(ApplyRequest::from_json(br#"{"mask": ["a"]}"#).is_err());
        assert!(ApplyRequest::from_json(br#"{"mask": [], "data": [], "count": 1}"#).is_err());
    }

    #[test]
    fn success_responses_serialize() {
        let mask = Response::Mask(MaskResponse::new(vec!["t".to_string()]));
        let apply = Response::Apply(ApplyResponse::new(vec!["e".to_string()]));

        assert_snapshot!(
            serde_json::to_string(&mask).unwrap(),
            @r#"{"status":"success","mask":["t"]}"#
        );
        assert_snapshot!(
            serde_json::to_string(&apply).unwrap(),
            @r#"{"status":"success","data":["e"]}"#
        );
    }

    #[test]
    fn error_response_serializes() {
        let response = ErrorResponse::from(&MaskingError::InvalidToken { index: 0 });

        assert_snapshot!(
            serde_json::to_string(&response).unwrap(),
            @r#"{"status":"failure","error":"invalid_token","message":"invalid mask token at index 0"}"#
        );
    }

    #[test]
    fn mask_request_omits_absent_count() {
        assert_snapshot!(serde_json::to_string(&MaskRequest::default()).unwrap(), @"{}");
    }
}
