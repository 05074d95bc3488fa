// src/services/auth.rs
//! Caller authentication for mutating requests.
//!
//! The registry core takes the caller as a plain argument; this extractor is
//! where the HTTP layer establishes who that caller is. The request must name
//! its caller in `x-caller` and, unless signatures are disabled, carry an
//! `x-timestamp` and an `x-signature` that recovers to the same account over
//! [`signing_payload`](crate::wallet::key_management::signing_payload).
//!
//! A signed request is accepted at most once. Its timestamp must lie within
//! the freshness window of the server clock, and every accepted signed
//! message is remembered until its timestamp leaves that window.

use crate::services::api_server::{ApiError, ApiServer};
use crate::utils::crypto::{hash_data, recover_signer};
use crate::wallet::key_management::{
    signing_payload, CALLER_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use chrono::Utc;
use ethers::types::{Address, Signature};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Default freshness window for `x-timestamp`.
pub const DEFAULT_SIGNATURE_MAX_AGE: Duration = Duration::from_secs(300);

/// A JSON request body together with its authenticated caller.
#[derive(Debug)]
pub struct Authenticated<T> {
    pub caller: Address,
    pub payload: T,
}

/// Signed messages seen inside the freshness window.
#[derive(Debug)]
pub struct ReplayGuard {
    max_age_ms: i64,
    /// (caller, keccak of signed payload) -> issue time
    seen: Mutex<HashMap<(Address, [u8; 32]), i64>>,
}

impl ReplayGuard {
    pub fn new(max_age: Duration) -> Self {
        ReplayGuard {
            max_age_ms: i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX),
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Rejects timestamps further than the window from `now`, in either
    /// direction.
    pub fn check_fresh(&self, timestamp: i64, now: i64) -> Result<(), ApiError> {
        if now.saturating_sub(timestamp).saturating_abs() > self.max_age_ms {
            return Err(ApiError::Unauthenticated(format!(
                "x-timestamp {} is outside the accepted window",
                timestamp
            )));
        }
        Ok(())
    }

    /// Records a verified message. Fails if the same caller already used it.
    pub fn remember(
        &self,
        caller: Address,
        payload: &[u8],
        timestamp: i64,
        now: i64,
    ) -> Result<(), ApiError> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let horizon = now.saturating_sub(self.max_age_ms);
        seen.retain(|_, issued| *issued >= horizon);

        if seen.insert((caller, hash_data(payload)), timestamp).is_some() {
            return Err(ApiError::Unauthenticated("request was already accepted once".into()));
        }
        Ok(())
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .ok_or_else(|| ApiError::Unauthenticated(format!("missing {} header", name)))?
        .to_str()
        .map_err(|_| ApiError::Unauthenticated(format!("{} header is not ASCII", name)))
}

#[async_trait]
impl<T> FromRequest<ApiServer> for Authenticated<T>
where
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &ApiServer) -> Result<Self, Self::Rejection> {
        let method = req.method().as_str().to_owned();
        let path = req.uri().path().to_owned();

        let caller = Address::from_str(header(req.headers(), CALLER_HEADER)?)
            .map_err(|_| ApiError::Unauthenticated("malformed x-caller header".into()))?;
        let signed = if state.require_signatures() {
            let timestamp = header(req.headers(), TIMESTAMP_HEADER)?
                .parse::<i64>()
                .map_err(|_| ApiError::Unauthenticated("malformed x-timestamp header".into()))?;
            let signature = Signature::from_str(header(req.headers(), SIGNATURE_HEADER)?)
                .map_err(|_| ApiError::Unauthenticated("malformed x-signature header".into()))?;
            Some((timestamp, signature))
        } else {
            None
        };

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        if let Some((timestamp, signature)) = signed {
            let now = Utc::now().timestamp_millis();
            state.replay_guard().check_fresh(timestamp, now)?;

            let payload = signing_payload(&method, &path, timestamp, &body);
            if recover_signer(&payload, &signature) != Some(caller) {
                log::warn!("signature does not match caller 0x{:x} on {} {}", caller, method, path);
                return Err(ApiError::Unauthenticated(
                    "signature does not match x-caller".into(),
                ));
            }

            if let Err(e) = state.replay_guard().remember(caller, &payload, timestamp, now) {
                log::warn!("replayed request from 0x{:x} on {} {}", caller, method, path);
                return Err(e);
            }
        }

        let payload = serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid request body: {}", e)))?;
        Ok(Authenticated { caller, payload })
    }
}
