// src/services/api_server.rs
//! API Server for the Certificate Registry
//!
//! REST interface over [`RegistryService`]. Mutating endpoints are `POST`s
//! whose caller is authenticated by [`Authenticated`]; queries are public
//! `GET`s that never fail on well-formed input.
//!
//! Bodies and JSON keys are camelCase in both directions.
//!
//! Errors are returned as
//! `{ "error": <kind>, "detail": <context>, "message": <text> }`.

use crate::models::certificate::CertificateId;
use crate::models::metadata::{CertificateMetadata, MetadataError};
use crate::models::role::Role;
use crate::registry::{RegistryError, RegistryEvent};
use crate::services::auth::{Authenticated, ReplayGuard, DEFAULT_SIGNATURE_MAX_AGE};
use crate::services::registry_service::{AuditEntry, RegistryService, ServiceError};
use crate::storage::snapshot::StorageError;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

// API request and response structures

/// Request payload naming a single account
#[derive(Serialize, Deserialize)]
pub struct AccountRequest {
    pub account: Address,
}

/// Request payload for adding a university
#[derive(Serialize, Deserialize)]
pub struct AddUniversityRequest {
    pub account: Address,
    pub uri: String,
}

/// Request payload for discrediting a university
#[derive(Serialize, Deserialize)]
pub struct DiscreditUniversityRequest {
    pub account: Address,
    pub reason: String,
}

/// Request payload for registering a certificate
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCertificateRequest {
    pub id: CertificateId,
    pub issue_date: u64,
    #[serde(default)]
    pub expiration_date: u64,
}

/// Request payload for revoking a certificate
#[derive(Serialize, Deserialize)]
pub struct RevokeCertificateRequest {
    pub id: CertificateId,
    #[serde(default)]
    pub description: String,
}

/// Response for identifier derivation
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateIdResponse {
    pub id: CertificateId,
    pub issue_date: u64,
}

#[derive(Serialize, Deserialize)]
struct AllowanceResponse {
    allowance: U256,
}

/// Response containing the audit log
#[derive(Serialize, Deserialize)]
struct AuditLogResponse {
    logs: Vec<AuditEntry>,
}

/// Failure of an API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    BadRequest(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Registry(e) => ApiError::Registry(e),
            ServiceError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Registry(RegistryError::ExistentCertificate(_))
            | ApiError::Registry(RegistryError::ExistentCertifier(_)) => StatusCode::CONFLICT,
            ApiError::Registry(RegistryError::NonexistentCertificate(_)) => StatusCode::NOT_FOUND,
            ApiError::Registry(_) => StatusCode::FORBIDDEN,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Metadata(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn kind_and_detail(&self) -> (&'static str, String) {
        match self {
            ApiError::Registry(e) => (e.kind(), e.detail()),
            ApiError::Storage(_) => ("StorageFailure", String::new()),
            ApiError::Metadata(_) => ("InvalidMetadata", String::new()),
            ApiError::Unauthenticated(_) => ("Unauthenticated", String::new()),
            ApiError::BadRequest(_) => ("BadRequest", String::new()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (kind, detail) = self.kind_and_detail();
        let body = json!({
            "error": kind,
            "detail": detail,
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

fn parse_address(raw: &str) -> Result<Address, ApiError> {
    Address::from_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid address `{}`", raw)))
}

fn parse_certificate_id(raw: &str) -> Result<CertificateId, ApiError> {
    CertificateId::from_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("invalid certificate id `{}`", raw)))
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// API server state
#[derive(Clone)]
pub struct ApiServer {
    /// Shared registry store
    service: RegistryService,

    /// Whether mutating calls must carry a valid `x-signature`
    require_signatures: bool,

    /// Signed requests already accepted
    replay_guard: Arc<ReplayGuard>,
}

impl ApiServer {
    pub fn new(service: RegistryService, require_signatures: bool) -> Self {
        ApiServer {
            service,
            require_signatures,
            replay_guard: Arc::new(ReplayGuard::new(DEFAULT_SIGNATURE_MAX_AGE)),
        }
    }

    /// Replaces the freshness window for `x-timestamp`.
    pub fn with_signature_max_age(mut self, max_age: Duration) -> Self {
        self.replay_guard = Arc::new(ReplayGuard::new(max_age));
        self
    }

    pub fn require_signatures(&self) -> bool {
        self.require_signatures
    }

    pub(crate) fn replay_guard(&self) -> &ReplayGuard {
        &self.replay_guard
    }

    /// Builds the router with every endpoint.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            // Organizations
            .route("/add-organization", post(Self::add_organization_handler))
            .route("/remove-organization", post(Self::remove_organization_handler))
            .route("/has-role/:role/:account", get(Self::has_role_handler))
            .route("/is-organization/:account", get(Self::is_organization_handler))
            // Universities
            .route("/add-university", post(Self::add_university_handler))
            .route("/remove-university", post(Self::remove_university_handler))
            .route("/discredit-university", post(Self::discredit_university_handler))
            .route("/university/:account", get(Self::get_university_handler))
            .route(
                "/university/:account/discredit-reason",
                get(Self::discredit_reason_handler),
            )
            // Certifiers and allowances
            .route("/add-certifier", post(Self::add_certifier_handler))
            .route("/remove-certifier", post(Self::remove_certifier_handler))
            .route("/certifier/:account/university", get(Self::university_of_certifier_handler))
            .route("/allowance/:university/:certifier", get(Self::allowance_handler))
            .route("/max-allowance", get(Self::max_allowance_handler))
            // Certificates
            .route("/register-certificate", post(Self::register_certificate_handler))
            .route("/revoke-certificate", post(Self::revoke_certificate_handler))
            .route("/certificate/:id", get(Self::get_certificate_handler))
            .route("/certificate/:id/state", get(Self::certificate_state_handler))
            .route("/certificate-id", post(Self::certificate_id_handler))
            // Audit
            .route("/audit-log", get(Self::audit_log_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.clone())
    }

    /// Binds `addr` and serves until the process is stopped.
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("API server listening on http://{}", addr);
        axum::serve(listener, self.router()).await
    }

    async fn health_handler() -> impl IntoResponse {
        Json(json!({ "status": "ok" }))
    }

    // =====================
    // Organizations
    // =====================

    /// POST /add-organization `{ account }`
    async fn add_organization_handler(
        State(state): State<ApiServer>,
        call: Authenticated<AccountRequest>,
    ) -> ApiResult<RegistryEvent> {
        Ok(Json(state.service.add_organization(call.caller, call.payload.account)?))
    }

    /// POST /remove-organization `{ account }`
    async fn remove_organization_handler(
        State(state): State<ApiServer>,
        call: Authenticated<AccountRequest>,
    ) -> ApiResult<RegistryEvent> {
        Ok(Json(state.service.remove_organization(call.caller, call.payload.account)?))
    }

    /// GET /has-role/:role/:account
    async fn has_role_handler(
        State(state): State<ApiServer>,
        Path((role, account)): Path<(String, String)>,
    ) -> Result<impl IntoResponse, ApiError> {
        let role = Role::from_str(&role).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let account = parse_address(&account)?;
        Ok(Json(json!({ "hasRole": state.service.has_role(role, account) })))
    }

    /// GET /is-organization/:account
    async fn is_organization_handler(
        State(state): State<ApiServer>,
        Path(account): Path<String>,
    ) -> Result<impl IntoResponse, ApiError> {
        let account = parse_address(&account)?;
        Ok(Json(json!({ "isOrganization": state.service.is_organization(account) })))
    }

    // =====================
    // Universities
    // =====================

    /// POST /add-university `{ account, uri }`
    async fn add_university_handler(
        State(state): State<ApiServer>,
        call: Authenticated<AddUniversityRequest>,
    ) -> ApiResult<RegistryEvent> {
        let AddUniversityRequest { account, uri } = call.payload;
        Ok(Json(state.service.add_university(call.caller, account, uri)?))
    }

    /// POST /remove-university `{ account }`
    async fn remove_university_handler(
        State(state): State<ApiServer>,
        call: Authenticated<AccountRequest>,
    ) -> ApiResult<RegistryEvent> {
        Ok(Json(state.service.remove_university(call.caller, call.payload.account)?))
    }

    /// POST /discredit-university `{ account, reason }`
    async fn discredit_university_handler(
        State(state): State<ApiServer>,
        call: Authenticated<DiscreditUniversityRequest>,
    ) -> ApiResult<RegistryEvent> {
        let DiscreditUniversityRequest { account, reason } = call.payload;
        Ok(Json(state.service.discredit_university(call.caller, account, reason)?))
    }

    /// GET /university/:account
    async fn get_university_handler(
        State(state): State<ApiServer>,
        Path(account): Path<String>,
    ) -> Result<impl IntoResponse, ApiError> {
        let account = parse_address(&account)?;
        Ok(Json(state.service.get_university(account)))
    }

    /// GET /university/:account/discredit-reason
    async fn discredit_reason_handler(
        State(state): State<ApiServer>,
        Path(account): Path<String>,
    ) -> Result<impl IntoResponse, ApiError> {
        let account = parse_address(&account)?;
        Ok(Json(json!({
            "reason": state.service.get_university_discredit_reason(account)
        })))
    }

    // =====================
    // Certifiers and allowances
    // =====================

    /// POST /add-certifier `{ account }`, called by the owning university
    async fn add_certifier_handler(
        State(state): State<ApiServer>,
        call: Authenticated<AccountRequest>,
    ) -> ApiResult<RegistryEvent> {
        Ok(Json(state.service.add_certifier(call.caller, call.payload.account)?))
    }

    /// POST /remove-certifier `{ account }`
    async fn remove_certifier_handler(
        State(state): State<ApiServer>,
        call: Authenticated<AccountRequest>,
    ) -> ApiResult<RegistryEvent> {
        Ok(Json(state.service.remove_certifier(call.caller, call.payload.account)?))
    }

    /// GET /certifier/:account/university
    async fn university_of_certifier_handler(
        State(state): State<ApiServer>,
        Path(account): Path<String>,
    ) -> Result<impl IntoResponse, ApiError> {
        let account = parse_address(&account)?;
        Ok(Json(json!({
            "university": state.service.get_university_of_certifier(account)
        })))
    }

    /// GET /allowance/:university/:certifier
    async fn allowance_handler(
        State(state): State<ApiServer>,
        Path((university, certifier)): Path<(String, String)>,
    ) -> Result<impl IntoResponse, ApiError> {
        let university = parse_address(&university)?;
        let certifier = parse_address(&certifier)?;
        Ok(Json(AllowanceResponse {
            allowance: state.service.allowance(university, certifier),
        }))
    }

    /// GET /max-allowance
    async fn max_allowance_handler(State(state): State<ApiServer>) -> impl IntoResponse {
        Json(AllowanceResponse {
            allowance: state.service.max_allowance(),
        })
    }

    // =====================
    // Certificates
    // =====================

    /// POST /register-certificate `{ id, issueDate, expirationDate }`
    async fn register_certificate_handler(
        State(state): State<ApiServer>,
        call: Authenticated<RegisterCertificateRequest>,
    ) -> ApiResult<RegistryEvent> {
        let RegisterCertificateRequest { id, issue_date, expiration_date } = call.payload;
        Ok(Json(state.service.register_certificate(
            call.caller,
            id,
            issue_date,
            expiration_date,
        )?))
    }

    /// POST /revoke-certificate `{ id, description }`
    async fn revoke_certificate_handler(
        State(state): State<ApiServer>,
        call: Authenticated<RevokeCertificateRequest>,
    ) -> ApiResult<RegistryEvent> {
        let RevokeCertificateRequest { id, description } = call.payload;
        Ok(Json(state.service.revoke_certificate(call.caller, id, description)?))
    }

    /// GET /certificate/:id
    ///
    /// Unregistered ids return the zero-valued record.
    async fn get_certificate_handler(
        State(state): State<ApiServer>,
        Path(id): Path<String>,
    ) -> Result<impl IntoResponse, ApiError> {
        let id = parse_certificate_id(&id)?;
        Ok(Json(state.service.get_certificate(&id)))
    }

    /// GET /certificate/:id/state
    async fn certificate_state_handler(
        State(state): State<ApiServer>,
        Path(id): Path<String>,
    ) -> Result<impl IntoResponse, ApiError> {
        let id = parse_certificate_id(&id)?;
        Ok(Json(json!({ "state": state.service.certificate_state(&id) })))
    }

    /// POST /certificate-id with document metadata
    ///
    /// Derives the identifier and issue date a certifier should register.
    async fn certificate_id_handler(
        Json(metadata): Json<CertificateMetadata>,
    ) -> ApiResult<CertificateIdResponse> {
        Ok(Json(CertificateIdResponse {
            id: metadata.certificate_id()?,
            issue_date: metadata.issue_date()?,
        }))
    }

    // =====================
    // Audit
    // =====================

    /// GET /audit-log
    async fn audit_log_handler(State(state): State<ApiServer>) -> impl IntoResponse {
        Json(AuditLogResponse {
            logs: state.service.audit_log(),
        })
    }
}
