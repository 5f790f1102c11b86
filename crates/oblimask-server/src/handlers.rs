//! HTTP handlers.
//!
//! Thin adapters from actix-web requests to [`MaskingProtocol`] calls. Bodies
//! are read under one size limit and parsed by the `oblimask-core` wire
//! parsers. Every failure, including an oversized or non-object body, is
//! answered with the `{"status": "failure", ...}` body and a status code
//! chosen by error kind.
//!
//! | Route            | Operation                          |
//! |------------------|------------------------------------|
//! | `POST /`         | obtain-mask or apply-mask by shape |
//! | `POST /api/mask` | obtain-mask                        |
//! | `POST /api/apply`| apply-mask                         |
//! | `GET /health`    | liveness                           |

use std::fmt;

use actix_web::{
    HttpResponse, Responder, ResponseError,
    http::StatusCode,
    web::{self, Bytes},
};
use oblimask_core::{
    ApplyRequest, ApplyResponse, Environment, ErrorKind, ErrorResponse, MaskRequest, MaskResponse,
    MaskingError, MaskingProtocol, Request,
};

/// Protocol error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub MaskingError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<MaskingError> for ApiError {
    fn from(err: MaskingError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidToken => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::CryptoFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if !self.0.is_caller_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(&self.0))
    }
}

/// Largest request body accepted on the protocol routes, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimit(pub usize);

/// Register the routes and body limit on an app or scope.
pub fn configure<E: Environment>(
    cfg: &mut web::ServiceConfig,
    protocol: web::Data<MaskingProtocol<E>>,
    max_body_bytes: usize,
) {
    cfg.app_data(protocol)
        .app_data(web::Data::new(BodyLimit(max_body_bytes)))
        .route("/", web::post().to(dispatch::<E>))
        .route("/api/mask", web::post().to(obtain::<E>))
        .route("/api/apply", web::post().to(apply::<E>))
        .route("/health", web::get().to(health));
}

/// Collect the request body, refusing anything over `limit` as malformed.
async fn read_body(payload: web::Payload, limit: BodyLimit) -> Result<Bytes, ApiError> {
    match payload.to_bytes_limited(limit.0).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "failed to read request body");
            Err(MaskingError::malformed(format!("unreadable request body: {err}")).into())
        },
        Err(_) => {
            tracing::debug!(limit = limit.0, "rejected oversized request body");
            Err(MaskingError::malformed(format!("request body exceeds {} bytes", limit.0)).into())
        },
    }
}

/// `POST /`: pick the operation from the body's shape.
pub async fn dispatch<E: Environment>(
    protocol: web::Data<MaskingProtocol<E>>,
    limit: web::Data<BodyLimit>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let body = read_body(payload, **limit).await?;
    let response = protocol.handle(Request::from_json(&body)?)?;
    Ok(HttpResponse::Ok().json(response))
}

/// `POST /api/mask`: issue encrypted masks.
pub async fn obtain<E: Environment>(
    protocol: web::Data<MaskingProtocol<E>>,
    limit: web::Data<BodyLimit>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let body = read_body(payload, **limit).await?;
    let request = MaskRequest::from_json(&body)?;
    let tokens = protocol.obtain_masks(request.count())?;
    Ok(HttpResponse::Ok().json(MaskResponse::new(tokens)))
}

/// `POST /api/apply`: apply masks to data.
pub async fn apply<E: Environment>(
    protocol: web::Data<MaskingProtocol<E>>,
    limit: web::Data<BodyLimit>,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let body = read_body(payload, **limit).await?;
    let ApplyRequest { mask, data, encoding } = ApplyRequest::from_json(&body)?;
    let masked = protocol.apply_masks(&mask, &data, encoding)?;
    Ok(HttpResponse::Ok().json(ApplyResponse::new(masked)))
}

/// `GET /health`
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "oblimask",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
