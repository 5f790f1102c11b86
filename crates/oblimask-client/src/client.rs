//! HTTP client for the masking service.

use oblimask_core::{
    ApplyRequest, ApplyResponse, DataEncoding, ErrorResponse, MaskRequest, MaskResponse, Status,
};
use oblimask_crypto::{DataElement, MaskedElement, decode, encode};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{config::ClientConfig, error::ClientError};

/// Client for the obtain-mask and apply-mask endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct MaskingClient {
    client: Client,
    config: ClientConfig,
}

impl MaskingClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// - `Http`: the TLS backend could not be initialized
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Obtain `count` encrypted mask tokens.
    pub async fn request_masks(&self, count: usize) -> Result<Vec<String>, ClientError> {
        let response = self
            .client
            .post(self.config.endpoint("/api/mask"))
            .json(&MaskRequest::with_count(count))
            .send()
            .await?;
        let body: MaskResponse = read_json(response).await?;

        check_success(body.status)?;
        check_len("mask", body.mask.len(), count)?;
        tracing::debug!(count, "received mask tokens");
        Ok(body.mask)
    }

    /// Apply the masks in `tokens` to the index-aligned `elements`.
    pub async fn apply_masks(
        &self,
        tokens: &[String],
        elements: &[DataElement],
    ) -> Result<Vec<MaskedElement>, ClientError> {
        let request = ApplyRequest {
            mask: tokens.to_vec(),
            data: elements.iter().map(encode).collect(),
            encoding: DataEncoding::Element,
        };
        let response =
            self.client.post(self.config.endpoint("/api/apply")).json(&request).send().await?;
        let body: ApplyResponse = read_json(response).await?;

        check_success(body.status)?;
        check_len("data", body.data.len(), elements.len())?;
        let masked = body
            .data
            .iter()
            .map(|text| decode::<MaskedElement>(text))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = masked.len(), "received masked elements");
        Ok(masked)
    }

    /// Mask raw inputs end to end.
    ///
    /// Hashes every input locally, so only group elements reach the server,
    /// then obtains one token per input and applies them.
    pub async fn mask_inputs<I: AsRef<[u8]>>(
        &self,
        inputs: &[I],
    ) -> Result<Vec<MaskedElement>, ClientError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let elements: Vec<DataElement> =
            inputs.iter().map(|input| DataElement::hash(input.as_ref())).collect();
        let tokens = self.request_masks(elements.len()).await?;
        self.apply_masks(&tokens, &elements).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("undecodable body: {e}")));
    }

    match serde_json::from_slice::<ErrorResponse>(&bytes) {
        Ok(failure) => {
            tracing::warn!(status = status.as_u16(), kind = ?failure.error, "request rejected");
            Err(ClientError::Rejected { kind: failure.error, message: failure.message })
        },
        Err(_) => Err(ClientError::UnexpectedStatus(status.as_u16())),
    }
}

fn check_success(status: Status) -> Result<(), ClientError> {
    match status {
        Status::Success => Ok(()),
        Status::Failure => {
            Err(ClientError::InvalidResponse("failure status with a success code".to_string()))
        },
    }
}

fn check_len(field: &str, actual: usize, expected: usize) -> Result<(), ClientError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ClientError::InvalidResponse(format!(
            "expected {expected} entries in `{field}`, got {actual}"
        )))
    }
}
