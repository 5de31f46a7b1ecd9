//! REST API server for VoteLedger
//!
//! Exposes ballot reads and vote submission over HTTP for a ballot hosted
//! on a shared dev ledger.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::crypto::{address_from_hex, address_to_hex, Address};
use crate::error::LedgerError;
use crate::ledger::{Ledger, TxReceipt};

/// Shared server state: the ledger plus the ballot it fronts.
pub struct AppState {
    pub ledger: RwLock<Ledger>,
    pub ballot: Address,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    NotFound(String),
    CallReverted(LedgerError),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ProposalOutOfRange(_) | LedgerError::UnknownContract(_) => {
                ApiError::NotFound(err.to_string())
            }
            other => ApiError::CallReverted(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::CallReverted(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
struct ProposalView {
    index: usize,
    name: String,
    vote_count: u128,
}

#[derive(Serialize)]
struct VoterView {
    weight: u128,
    voted: bool,
    delegate: Option<String>,
    vote: usize,
}

#[derive(Serialize)]
struct WinnerView {
    index: usize,
    name: String,
}

#[derive(Deserialize)]
struct GiveRightRequest {
    voter: String,
}

#[derive(Deserialize)]
struct VoteRequest {
    voter: String,
    proposal: usize,
}

/// Build the API router over shared state.
pub fn build_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/ballot/proposals", get(list_proposals))
        .route("/api/ballot/proposals/:index", get(get_proposal))
        .route("/api/ballot/chairperson", get(get_chairperson))
        .route("/api/ballot/voters/:address", get(get_voter))
        .route("/api/ballot/winner", get(get_winner))
        .route("/api/ballot/rights", post(give_right))
        .route("/api/ballot/vote", post(submit_vote))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_proposals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProposalView>>, ApiError> {
    let ledger = state.ledger.read();
    let ballot = ledger.ballot(&state.ballot)?;
    let proposals = ballot
        .proposals()
        .iter()
        .enumerate()
        .map(|(index, p)| ProposalView {
            index,
            name: p.name.to_string(),
            vote_count: p.vote_count,
        })
        .collect();
    Ok(Json(proposals))
}

async fn get_proposal(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<ProposalView>, ApiError> {
    let ledger = state.ledger.read();
    let proposal = ledger.ballot(&state.ballot)?.proposal(index)?.clone();
    Ok(Json(ProposalView {
        index,
        name: proposal.name.to_string(),
        vote_count: proposal.vote_count,
    }))
}

async fn get_chairperson(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ledger = state.ledger.read();
    let chairperson = ledger.ballot(&state.ballot)?.chairperson();
    Ok(Json(
        serde_json::json!({ "chairperson": address_to_hex(&chairperson) }),
    ))
}

async fn get_voter(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<VoterView>, ApiError> {
    let account =
        address_from_hex(&address).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let ledger = state.ledger.read();
    let voter = ledger.voter(&state.ballot, &account)?;
    Ok(Json(VoterView {
        weight: voter.weight,
        voted: voter.voted,
        delegate: voter.delegate.as_ref().map(address_to_hex),
        vote: voter.vote,
    }))
}

async fn get_winner(State(state): State<Arc<AppState>>) -> Result<Json<WinnerView>, ApiError> {
    let ledger = state.ledger.read();
    let ballot = ledger.ballot(&state.ballot)?;
    Ok(Json(WinnerView {
        index: ballot.winning_proposal(),
        name: ballot.winner_name().to_string(),
    }))
}

async fn give_right(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GiveRightRequest>,
) -> Result<Json<TxReceipt>, ApiError> {
    let voter =
        address_from_hex(&request.voter).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let mut ledger = state.ledger.write();
    let chairperson = ledger.ballot(&state.ballot)?.chairperson();
    let receipt = ledger.give_right_to_vote(chairperson, state.ballot, voter)?;
    log::info!("Granted voting right to {}", address_to_hex(&voter));
    Ok(Json(receipt))
}

async fn submit_vote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<TxReceipt>, ApiError> {
    let voter =
        address_from_hex(&request.voter).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let mut ledger = state.ledger.write();
    let receipt = ledger.vote(voter, state.ballot, request.proposal)?;
    log::info!(
        "Vote cast by {} for proposal {} (tx {})",
        address_to_hex(&voter),
        request.proposal,
        receipt.tx_hash
    );
    Ok(Json(receipt))
}
