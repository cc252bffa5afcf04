use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Identity,
        cookie::{clear_session_cookie, session_cookie},
        dto::{CurrentUser, LoginRequest, MessageResponse, PublicUser, SignupRequest, SignupResponse},
        extractors::AuthUser,
        password::{hash_password, verify_password},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", get(current_user))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trimmed, non-empty email and non-empty password, or a validation error.
fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> AppResult<(String, String)> {
    let email = email.map(|e| e.trim().to_string()).unwrap_or_default();
    let password = password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }
    Ok((email, password))
}

fn bad_body(rejection: JsonRejection) -> AppError {
    warn!(error = %rejection.body_text(), "unreadable request body");
    AppError::Validation("Request body must be a JSON object".into())
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(bad_body)?;
    let (email, password) = require_credentials(payload.email, payload.password)?;

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    if state.store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&password)?;
    let user = state.store.create_user(&email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered".into(),
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(bad_body)?;
    let (email, password) = require_credentials(payload.email, payload.password)?;

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Authentication("Invalid email or password".into()));
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::Authentication("Invalid email or password".into()));
    }

    let token = state.keys.issue(&Identity {
        user_id: user.id,
        email: user.email.clone(),
    })?;
    let cookie = session_cookie(&token, state.config.session_ttl_secs(), state.config.cookie_secure);

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Login successful".into(),
        }),
    ))
}

/// Drops the cookie on the client. The token itself stays valid until expiry.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
    )
}

/// Identity as embedded in the session token.
#[instrument(skip_all)]
pub async fn current_user(AuthUser(identity): AuthUser) -> Json<CurrentUser> {
    Json(CurrentUser {
        id: identity.user_id,
        email: identity.email,
    })
}
