use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthResponse, IdentityResponse, LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        services::{login_user, register_user},
    },
    error::AppError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn identity_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/user-profile", get(user_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, token) =
        register_user(state.users.as_ref(), &keys, &payload.email, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".into(),
            token,
            email: user.email,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, token) =
        login_user(state.users.as_ref(), &keys, &payload.email, &payload.password).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        email: user.email,
    }))
}

#[instrument(skip_all)]
pub async fn home(user: AuthUser) -> Json<IdentityResponse> {
    Json(identity("Welcome to the home page!", user))
}

#[instrument(skip_all)]
pub async fn user_profile(user: AuthUser) -> Json<IdentityResponse> {
    Json(identity("User profile", user))
}

fn identity(message: &str, user: AuthUser) -> IdentityResponse {
    IdentityResponse {
        message: message.into(),
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }
}
