//! API route handlers
//!
//! Every protected handler builds a fresh [`AuthSession`] for the
//! request, validates the bearer credential from the `Authorization`
//! header, and fails closed with 401. Storage failures surface as 500,
//! never as 401 — a broken collaborator must not look like a bad
//! password.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::AuthSession;
use crate::domain::{Agent, Customer, TokenKind};
use crate::error::Result;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub agent: AgentInfo,
}

#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AgentInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Agent> for AgentInfo {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name,
            email: agent.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Build a session with the request's storage collaborators, no
/// identity established yet.
fn new_session(state: &SharedState) -> AuthSession {
    AuthSession::new(
        state.agents.clone(),
        state.tokens.clone(),
        state.customers.clone(),
    )
}

/// Build a session and establish identity from the Authorization
/// header. `Ok(None)` means the request is unauthenticated.
async fn authenticate(state: &SharedState, headers: &HeaderMap) -> Result<Option<AuthSession>> {
    let bearer = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let Some(bearer) = bearer else {
        return Ok(None);
    };
    let mut session = new_session(state);
    if session.validate_token(bearer).await? {
        Ok(Some(session))
    } else {
        Ok(None)
    }
}

fn unauthorized() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::err("Authentication required")),
    )
}

fn internal_error(err: impl std::fmt::Display) -> (StatusCode, Json<ApiResponse<()>>) {
    tracing::error!("request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::err(err.to_string())),
    )
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let mut session = new_session(&state);

    match session.verify_agent(&req.email, &req.password).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::err("Invalid email or password")),
            )
                .into_response()
        }
        Err(e) => return internal_error(e).into_response(),
    }

    let token = match session.issue_token(TokenKind::AgentSession).await {
        Ok(Some(token)) => token,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    let agent = match session.read_agent().await {
        Ok(Some(agent)) => agent,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::ok(LoginResponse {
            token,
            agent: agent.into(),
        })),
    )
        .into_response()
}

pub async fn register_agent(
    State(state): State<SharedState>,
    Json(req): Json<AgentRequest>,
) -> impl IntoResponse {
    let session = new_session(&state);

    match session
        .register_agent(&req.name, &req.email, &req.password)
        .await
    {
        Ok(true) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok("registered".to_string())),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::err("Email already in use")),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn read_agent(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    let session = match authenticate(&state, &headers).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    match session.read_agent().await {
        Ok(Some(agent)) => {
            (StatusCode::OK, Json(ApiResponse::ok(AgentInfo::from(agent)))).into_response()
        }
        Ok(None) => unauthorized().into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn update_agent(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<AgentRequest>,
) -> impl IntoResponse {
    let session = match authenticate(&state, &headers).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    match session
        .update_own_profile(&req.name, &req.email, &req.password)
        .await
    {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::ok("updated".to_string())),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::err("Email already in use")),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// Customer routes

pub async fn list_customers(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let session = match authenticate(&state, &headers).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    match session.find_all_customers().await {
        Ok(Some(customers)) => (StatusCode::OK, Json(ApiResponse::ok(customers))).into_response(),
        Ok(None) => unauthorized().into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn create_customer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<CustomerRequest>,
) -> impl IntoResponse {
    let session = match authenticate(&state, &headers).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    let customer = Customer {
        id: 0,
        agent_id: 0, // overwritten with the session's agent
        firstname: req.firstname,
        lastname: req.lastname,
        email: req.email,
        phone: req.phone,
    };

    match session.create_customer(customer).await {
        Ok(Some(created)) => (StatusCode::CREATED, Json(ApiResponse::ok(created))).into_response(),
        Ok(None) => unauthorized().into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn get_customer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let session = match authenticate(&state, &headers).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    match session.read_customer(id).await {
        Ok(Some(customer)) => (StatusCode::OK, Json(ApiResponse::ok(customer))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::err("Customer not found")),
        )
            .into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn update_customer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<CustomerRequest>,
) -> impl IntoResponse {
    let session = match authenticate(&state, &headers).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    // Fetch the existing record so the owning agent is preserved
    let existing = match session.read_customer(id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::err("Customer not found")),
            )
                .into_response()
        }
        Err(e) => return internal_error(e).into_response(),
    };

    let customer = Customer {
        id,
        agent_id: existing.agent_id,
        firstname: req.firstname,
        lastname: req.lastname,
        email: req.email,
        phone: req.phone,
    };

    match session.update_customer(customer).await {
        Ok(Some(updated)) => (StatusCode::OK, Json(ApiResponse::ok(updated))).into_response(),
        Ok(None) => unauthorized().into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn delete_customer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let session = match authenticate(&state, &headers).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized().into_response(),
        Err(e) => return internal_error(e).into_response(),
    };

    match session.delete_customer(id).await {
        Ok(true) => (StatusCode::OK, Json(ApiResponse::ok("deleted".to_string()))).into_response(),
        Ok(false) => unauthorized().into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}
