//! Request handlers and wire types.
//!
//! The mobile wallet speaks camelCase JSON; every request field is optional
//! on the wire so a missing one surfaces as a proper 4xx instead of an
//! extractor rejection.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use ergauth_proof::{Challenge, MessageSeverity, ProofError, Rejection, VerifyOutcome};
use ergauth_store::ProofBackend;

use crate::state::{blocking, RpcState};
use crate::RpcError;

// ── Challenge ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeQuery {
    pub verification_id: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub address: String,
    pub signing_message: String,
    pub sigma_boolean: String,
    pub user_message: String,
    pub message_severity: MessageSeverity,
    pub reply_to: String,
}

impl From<Challenge> for ChallengeResponse {
    fn from(c: Challenge) -> Self {
        Self {
            address: c.address,
            signing_message: c.signing_message,
            sigma_boolean: c.sigma_boolean,
            user_message: c.user_message,
            message_severity: c.severity,
            reply_to: c.reply_to,
        }
    }
}

pub async fn ergo_auth_request<S: ProofBackend + 'static>(
    State(state): State<Arc<RpcState<S>>>,
    Query(query): Query<ChallengeQuery>,
) -> Result<Json<ChallengeResponse>, RpcError> {
    let ChallengeQuery {
        verification_id,
        address,
    } = query;
    let id = verification_id.unwrap_or_default();
    let result = blocking(&state, {
        let id = id.clone();
        move |st: &RpcState<S>| st.engine.challenges.build(&id, address.as_deref())
    })
    .await?;

    match result {
        Ok(challenge) => {
            state.metrics.challenges_built.inc();
            tracing::info!(verification_id = %id, "challenge issued");
            Ok(Json(challenge.into()))
        }
        Err(e) => {
            state.metrics.challenges_failed.inc();
            tracing::warn!(verification_id = %id, "challenge refused: {e}");
            Err(e.into())
        }
    }
}

// ── Address binding ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindQuery {
    pub verification_id: Option<String>,
    pub p2pk_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindResponse {
    pub message: String,
    pub message_severity: MessageSeverity,
}

pub async fn bind_p2pk<S: ProofBackend + 'static>(
    State(state): State<Arc<RpcState<S>>>,
    Query(query): Query<BindQuery>,
) -> Result<Json<BindResponse>, RpcError> {
    let BindQuery {
        verification_id,
        p2pk_address,
    } = query;
    let id = verification_id.unwrap_or_default();
    let result = blocking(&state, {
        let id = id.clone();
        move |st: &RpcState<S>| st.engine.binder.bind(&id, p2pk_address.as_deref())
    })
    .await?;

    match result {
        Ok(bound) => {
            state.metrics.binds_accepted.inc();
            Ok(Json(BindResponse {
                message: bound.message,
                message_severity: bound.severity,
            }))
        }
        Err(e) => {
            let counter = match &e {
                ProofError::Conflict(_) => &state.metrics.binds_conflicted,
                ProofError::NotFound(_) => &state.metrics.binds_not_found,
                _ => &state.metrics.binds_invalid,
            };
            counter.inc();
            tracing::warn!(verification_id = %id, "bind refused: {e}");
            Err(e.into())
        }
    }
}

// ── Signature verification ───────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    pub verification_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    pub signed_message: Option<String>,
    pub proof: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub status: String,
    pub signed_message: String,
    pub proof: String,
}

pub async fn verify<S: ProofBackend + 'static>(
    State(state): State<Arc<RpcState<S>>>,
    Query(query): Query<VerifyQuery>,
    body: Result<Json<VerifyBody>, JsonRejection>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!("verify body unreadable: {rejection}");
            VerifyBody::default()
        }
    };
    let outcome = blocking(&state, move |st: &RpcState<S>| {
        st.engine.verifier.verify(
            query.verification_id.as_deref(),
            body.signed_message.as_deref(),
            body.proof.as_deref(),
        )
    })
    .await?;

    match outcome {
        VerifyOutcome::Verified(proof) => {
            state.metrics.verifications_verified.inc();
            Ok(Json(VerifyResponse {
                status: proof.status.as_str().to_string(),
                signed_message: proof.signed_message.unwrap_or_default(),
                proof: proof.proof.unwrap_or_default(),
            }))
        }
        VerifyOutcome::Rejected(rejection) => {
            state.metrics.verifications_rejected.inc();
            Err(rejection_error(&rejection))
        }
        VerifyOutcome::Error(e) => {
            state.metrics.verifications_errored.inc();
            Err(RpcError::Internal(e))
        }
    }
}

fn rejection_error(rejection: &Rejection) -> RpcError {
    let detail = rejection.to_string();
    match rejection {
        r if r.is_authentication_failure() => RpcError::Unauthorized(detail),
        Rejection::AddressTaken => RpcError::Conflict(detail),
        _ => RpcError::Validation(detail),
    }
}

// ── Nonce + initiation ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NonceRequest {
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceResponse {
    pub user_id: String,
    pub nonce: String,
}

pub async fn issue_nonce<S: ProofBackend + 'static>(
    State(state): State<Arc<RpcState<S>>>,
    body: Result<Json<NonceRequest>, JsonRejection>,
) -> Result<Json<NonceResponse>, RpcError> {
    let Json(request) = body.map_err(|e| RpcError::Validation(e.body_text()))?;
    let user = blocking(&state, move |st: &RpcState<S>| st.engine.nonces.issue(&request.address)).await??;
    let nonce = user
        .nonce
        .ok_or_else(|| RpcError::Internal(format!("nonce missing after issue for {}", user.id)))?;
    Ok(Json(NonceResponse {
        user_id: user.id.to_string(),
        nonce,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateResponse {
    pub verification_id: String,
    pub status: String,
}

pub async fn initiate<S: ProofBackend + 'static>(
    State(state): State<Arc<RpcState<S>>>,
    body: Result<Json<InitiateRequest>, JsonRejection>,
) -> Result<Json<InitiateResponse>, RpcError> {
    let Json(request) = body.map_err(|e| RpcError::Validation(e.body_text()))?;
    let proof = blocking(&state, move |st: &RpcState<S>| st.engine.initiator.initiate(&request.user_id)).await??;
    Ok(Json(InitiateResponse {
        verification_id: proof.verification_id.to_string(),
        status: proof.status.as_str().to_string(),
    }))
}

// ── Ledger ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct VerifiedQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedResponse {
    pub address: String,
    pub verified: bool,
}

pub async fn verified<S: ProofBackend + 'static>(
    State(state): State<Arc<RpcState<S>>>,
    Query(query): Query<VerifiedQuery>,
) -> Result<Json<VerifiedResponse>, RpcError> {
    let address = query
        .address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| RpcError::Validation("address is required".into()))?;
    let verified = blocking(&state, {
        let address = address.clone();
        move |st: &RpcState<S>| st.engine.ledger.has_verified_proof(&address)
    })
    .await??;
    Ok(Json(VerifiedResponse { address, verified }))
}

// ── Operations ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

pub async fn metrics<S: ProofBackend + 'static>(
    State(state): State<Arc<RpcState<S>>>,
) -> Result<impl IntoResponse, RpcError> {
    let text = state.metrics.encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    ))
}
